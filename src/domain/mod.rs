//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::SendSms;
pub use response::ApiResponse;
pub use validation::ValidationError;
pub use value::{
    Credentials, MessageText, PhoneNumber, RawPhoneNumber, SenderId, SharedKey, TransactionId,
    UnixTimestamp, Username,
};
