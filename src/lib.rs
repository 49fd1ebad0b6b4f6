//! Typed Rust client for the Spirius SMS gateway REST API.
//!
//! The crate is split into a domain layer of strong types, a transport layer
//! holding the `SpiriusSmsV1` HMAC signing scheme and wire-format details, and a
//! small client layer that stamps, signs and dispatches requests.
//!
//! ```rust,no_run
//! use spirius::{Credentials, MessageText, RawPhoneNumber, SendSms, SenderId, SpiriusClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), spirius::SpiriusError> {
//!     let client = SpiriusClient::new(Credentials::new("shared-key", "username")?)?;
//!     let request = SendSms::new(
//!         MessageText::new("Hello world!")?,
//!         SenderId::new("SPIRIUS")?,
//!         RawPhoneNumber::new("+46123456789")?,
//!     );
//!     let response = client.send_sms(request).await?;
//!     println!("{}", response.body);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{SpiriusClient, SpiriusClientBuilder, SpiriusError};
pub use domain::{
    ApiResponse, Credentials, MessageText, PhoneNumber, RawPhoneNumber, SendSms, SenderId,
    SharedKey, TransactionId, UnixTimestamp, Username, ValidationError,
};
pub use transport::{
    AUTH_VERSION, Endpoint, HttpMethod, SignatureFormat, SignedHeaders, SignedRequest,
    SignedRequestBuilder, SigningError, encode_send_sms_body,
};
