use serde_json::Value;

use crate::domain::ApiResponse;

/// Keep a gateway response body as data.
///
/// JSON bodies are parsed, blank bodies become `null`, and anything else (a proxy's
/// HTML error page, say) is kept as a JSON string. `raw` always holds the text as received.
pub fn decode_json_response(status: u16, raw: String) -> ApiResponse {
    let body = if raw.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&raw).unwrap_or_else(|_| Value::String(raw.clone()))
    };
    ApiResponse { status, body, raw }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_object_verbatim() {
        let parsed = decode_json_response(
            202,
            r#"{"transactionId":"abc123","nested":{"parts":[1,2]}}"#.to_owned(),
        );
        assert_eq!(parsed.status, 202);
        assert_eq!(
            parsed.body,
            json!({"transactionId": "abc123", "nested": {"parts": [1, 2]}})
        );
        assert!(parsed.is_json());
    }

    #[test]
    fn blank_body_is_null() {
        let parsed = decode_json_response(204, "  \n".to_owned());
        assert_eq!(parsed.body, Value::Null);
        assert_eq!(parsed.raw, "  \n");
        assert!(parsed.is_json());
    }

    #[test]
    fn error_payloads_are_data() {
        let parsed = decode_json_response(401, r#"{"message":"Invalid signature"}"#.to_owned());
        assert_eq!(parsed.status, 401);
        assert_eq!(parsed.body["message"], "Invalid signature");
    }

    #[test]
    fn malformed_body_is_kept_as_text() {
        let parsed = decode_json_response(502, "<html>Bad Gateway</html>".to_owned());
        assert_eq!(parsed.status, 502);
        assert_eq!(parsed.body, Value::String("<html>Bad Gateway</html>".to_owned()));
        assert_eq!(parsed.raw, "<html>Bad Gateway</html>");
        assert!(!parsed.is_json());
    }
}
