use crate::domain::TransactionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// HTTP verbs used by the Spirius REST API.
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    /// Verb as it appears on the wire and in the string to sign.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Method + path of one API call, relative to the `/v1` base URL.
///
/// The path is signed exactly as stored here.
pub struct Endpoint {
    method: HttpMethod,
    path: String,
}

impl Endpoint {
    /// Path of the outgoing-message endpoint.
    pub const SEND_SMS_PATH: &'static str = "/sms/mt/send";

    /// `POST /sms/mt/send`
    pub fn send_sms() -> Self {
        Self::new(HttpMethod::Post, Self::SEND_SMS_PATH)
    }

    /// `GET /sms/mo/status/{id}`
    pub fn message_status(id: &TransactionId) -> Self {
        Self::new(HttpMethod::Get, format!("/sms/mo/status/{}", id.as_str()))
    }

    /// `GET /sms/mo`
    pub fn mo_message_list() -> Self {
        Self::new(HttpMethod::Get, "/sms/mo")
    }

    /// `GET /sms/mo/{id}`
    pub fn mo_message(id: &TransactionId) -> Self {
        Self::new(HttpMethod::Get, format!("/sms/mo/{}", id.as_str()))
    }

    /// `DELETE /sms/mo/{id}`
    pub fn pop_mo_message(id: &TransactionId) -> Self {
        Self::new(HttpMethod::Delete, format!("/sms/mo/{}", id.as_str()))
    }

    /// `DELETE /sms/mo/next`
    pub fn pop_next_message() -> Self {
        Self::new(HttpMethod::Delete, "/sms/mo/next")
    }

    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}
