//! Transport layer: request signing and wire-format details (no I/O).

mod endpoint;
mod response;
mod send_sms;
mod signature;

pub use endpoint::{Endpoint, HttpMethod};
pub use response::decode_json_response;
pub use send_sms::encode_send_sms_body;
pub use signature::{
    AUTH_VERSION, SignatureFormat, SignedHeaders, SignedRequest, SignedRequestBuilder,
    SigningError,
};
