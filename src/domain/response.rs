use serde::de::IgnoredAny;
use serde_json::Value;

use crate::client::SpiriusError;

#[derive(Debug, Clone, PartialEq)]
/// Response returned by the gateway.
///
/// The body is kept as data whatever the HTTP status: application-level errors and
/// non-JSON bodies both reach the caller. `body` is the parsed JSON, [`Value::Null`]
/// for an empty body, or a [`Value::String`] holding the text when it is not JSON.
/// `raw` is the body exactly as received.
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
    pub raw: String,
}

impl ApiResponse {
    /// `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// `true` when `raw` is empty or valid JSON.
    pub fn is_json(&self) -> bool {
        self.raw.trim().is_empty() || serde_json::from_str::<IgnoredAny>(&self.raw).is_ok()
    }

    /// Turn a non-2xx response into [`SpiriusError::HttpStatus`].
    pub fn error_for_status(self) -> Result<Self, SpiriusError> {
        if self.is_success() {
            return Ok(self);
        }
        let body = match self.body {
            Value::Null => None,
            other => Some(other),
        };
        Err(SpiriusError::HttpStatus {
            status: self.status,
            body,
        })
    }

    /// Turn a non-JSON body into [`SpiriusError::Parse`].
    pub fn error_for_malformed_body(self) -> Result<Self, SpiriusError> {
        if self.raw.trim().is_empty() {
            return Ok(self);
        }
        match serde_json::from_str::<IgnoredAny>(&self.raw) {
            Ok(_) => Ok(self),
            Err(err) => Err(SpiriusError::Parse {
                status: self.status,
                source: Box::new(err),
            }),
        }
    }
}
