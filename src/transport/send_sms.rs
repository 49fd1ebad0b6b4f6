use serde::Serialize;

use crate::domain::SendSms;

// Field order is the serialization order, and the serialized bytes are hashed.
#[derive(Debug, Serialize)]
struct SendSmsJsonBody<'a> {
    message: &'a str,
    from: &'a str,
    to: &'a str,
}

/// Encode the `sms/mt/send` body as compact JSON (`message`, `from`, `to`).
pub fn encode_send_sms_body(request: &SendSms) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&SendSmsJsonBody {
        message: request.message().as_str(),
        from: request.sender().as_str(),
        to: request.recipient().raw(),
    })
}
