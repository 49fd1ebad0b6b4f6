//! `SpiriusSmsV1` HMAC request signing.
//!
//! The gateway authenticates a request by recomputing:
//! 1. `SHA1(body)`
//! 2. the string to sign: auth version, timestamp, method, path and body hash,
//!    joined by a separator
//! 3. `HMAC-SHA256(shared_key, string_to_sign)`, base64-encoded into the
//!    `Authorization` header
//!
//! Everything here is pure: the caller supplies the timestamp.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use sha1::{Digest, Sha1};
use sha2::Sha256;

use crate::domain::{Credentials, UnixTimestamp};
use crate::transport::endpoint::{Endpoint, HttpMethod};

type HmacSha256 = Hmac<Sha256>;

/// Scheme tag prefixed to both the string to sign and the `Authorization` header.
pub const AUTH_VERSION: &str = "SpiriusSmsV1";

/// Every request declares a JSON body, including body-less GET/DELETE calls.
pub const CONTENT_TYPE: &str = "application/json";

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

#[derive(Debug, thiserror::Error)]
/// Failures while producing the signed request (no I/O involved).
pub enum SigningError {
    /// The request body could not be serialized to JSON.
    #[error("failed to encode request body: {0}")]
    Json(#[from] serde_json::Error),

    /// The shared key was rejected as an HMAC key.
    #[error("invalid HMAC key: {0}")]
    InvalidKey(#[from] hmac::digest::InvalidLength),

    /// A header value contains bytes that cannot be sent in an HTTP header.
    #[error("{header} header contains characters that cannot be sent")]
    InvalidHeaderValue { header: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Rendering of the string to sign.
pub enum SignatureFormat {
    /// Fields joined by a newline (`0x0A`); body hash as lowercase hex.
    #[default]
    Standard,
    /// Fields joined by the two-byte text `\n` (`0x5C 0x6E`); body hash embedded as its
    /// 20 raw digest bytes.
    ///
    /// This is not what the vendor's PHP sample produces: PHP's `sha1()` returns hex, so
    /// that sample signs the literal `\n` separator with a hex digest. No vendor client
    /// emits this raw-digest form; it follows the written description of the scheme only.
    LiteralEscape,
}

impl SignatureFormat {
    fn separator(self) -> &'static [u8] {
        match self {
            Self::Standard => b"\n",
            Self::LiteralEscape => b"\\n",
        }
    }

    fn push_body_hash(self, out: &mut Vec<u8>, digest: &[u8]) {
        match self {
            Self::Standard => out.extend_from_slice(hex::encode(digest).as_bytes()),
            Self::LiteralEscape => out.extend_from_slice(digest),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Authentication headers for one request.
pub struct SignedHeaders {
    timestamp: UnixTimestamp,
    signature: String,
    authorization: String,
}

impl SignedHeaders {
    /// Timestamp that was signed (`X-SMS-Timestamp`).
    pub fn timestamp(&self) -> UnixTimestamp {
        self.timestamp
    }

    /// Base64 HMAC-SHA256 signature.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// `SpiriusSmsV1 <username>:<signature>`
    pub fn authorization(&self) -> &str {
        &self.authorization
    }

    /// `Content-Type` sent with every request, body or not.
    pub fn content_type(&self) -> &'static str {
        CONTENT_TYPE
    }

    /// Header name/value pairs in wire order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            (UnixTimestamp::HEADER, self.timestamp.to_string()),
            (AUTHORIZATION_HEADER, self.authorization.clone()),
            (CONTENT_TYPE_HEADER, self.content_type().to_owned()),
        ]
    }
}

#[derive(Debug, Clone)]
/// A request ready to dispatch.
///
/// `body` is the same buffer whose hash was signed; send it as-is.
pub struct SignedRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: SignedHeaders,
    pub body: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy)]
/// Produces `SpiriusSmsV1` signatures for a set of credentials.
///
/// ```rust
/// use spirius::{Credentials, SignedRequestBuilder, UnixTimestamp};
///
/// let credentials = Credentials::new("testkey", "test")?;
/// let body = br#"{"message":"hi","from":"A","to":"B"}"#;
/// let headers = SignedRequestBuilder::new(&credentials)
///     .sign(UnixTimestamp::new(1_700_000_000), body)?;
/// assert!(headers.authorization().starts_with("SpiriusSmsV1 test:"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct SignedRequestBuilder<'a> {
    credentials: &'a Credentials,
    format: SignatureFormat,
}

impl<'a> SignedRequestBuilder<'a> {
    pub fn new(credentials: &'a Credentials) -> Self {
        Self {
            credentials,
            format: SignatureFormat::default(),
        }
    }

    /// Select how the string to sign is rendered.
    pub fn format(mut self, format: SignatureFormat) -> Self {
        self.format = format;
        self
    }

    /// Sign a `POST /sms/mt/send` call whose JSON body is `body`.
    pub fn sign(
        &self,
        timestamp: UnixTimestamp,
        body: &[u8],
    ) -> Result<SignedHeaders, SigningError> {
        self.sign_request(HttpMethod::Post, Endpoint::SEND_SMS_PATH, timestamp, body)
    }

    /// Sign an arbitrary call. Pass an empty `body` for GET/DELETE.
    pub fn sign_request(
        &self,
        method: HttpMethod,
        path: &str,
        timestamp: UnixTimestamp,
        body: &[u8],
    ) -> Result<SignedHeaders, SigningError> {
        let username = self.credentials.username().as_str();
        if !is_header_safe(username) {
            return Err(SigningError::InvalidHeaderValue {
                header: AUTHORIZATION_HEADER,
            });
        }

        let message = self.string_to_sign(method, path, timestamp, body);
        let mut mac = HmacSha256::new_from_slice(self.credentials.shared_key().as_bytes())?;
        mac.update(&message);
        let signature = BASE64.encode(mac.finalize().into_bytes());

        let authorization = format!("{AUTH_VERSION} {username}:{signature}");
        Ok(SignedHeaders {
            timestamp,
            signature,
            authorization,
        })
    }

    /// Bytes fed into HMAC-SHA256.
    ///
    /// Built as bytes: under [`SignatureFormat::LiteralEscape`] the body hash is not UTF-8.
    pub fn string_to_sign(
        &self,
        method: HttpMethod,
        path: &str,
        timestamp: UnixTimestamp,
        body: &[u8],
    ) -> Vec<u8> {
        let digest = Sha1::digest(body);
        let separator = self.format.separator();
        let timestamp = timestamp.to_string();

        let mut out = Vec::with_capacity(96);
        for field in [AUTH_VERSION, timestamp.as_str(), method.as_str(), path] {
            out.extend_from_slice(field.as_bytes());
            out.extend_from_slice(separator);
        }
        self.format.push_body_hash(&mut out, &digest);
        out
    }

    /// Sign `endpoint` and bundle the headers with the body buffer.
    pub fn build(
        &self,
        endpoint: &Endpoint,
        timestamp: UnixTimestamp,
        body: Option<Vec<u8>>,
    ) -> Result<SignedRequest, SigningError> {
        let headers = self.sign_request(
            endpoint.method(),
            endpoint.path(),
            timestamp,
            body.as_deref().unwrap_or_default(),
        )?;
        Ok(SignedRequest {
            method: endpoint.method(),
            path: endpoint.path().to_owned(),
            headers,
            body,
        })
    }
}

// Same acceptance rule as `http::HeaderValue`: visible bytes, space and tab.
fn is_header_safe(value: &str) -> bool {
    value
        .bytes()
        .all(|b| b == b'\t' || (b >= 0x20 && b != 0x7f))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &[u8] = br#"{"message":"hi","from":"A","to":"B"}"#;

    fn credentials() -> Credentials {
        Credentials::new("testkey", "test").unwrap()
    }

    fn ts() -> UnixTimestamp {
        UnixTimestamp::new(1_700_000_000)
    }

    #[test]
    fn standard_signature_matches_reference_vector() {
        let creds = credentials();
        let headers = SignedRequestBuilder::new(&creds).sign(ts(), BODY).unwrap();

        assert_eq!(
            headers.signature(),
            "wUX+i3p2nrQK55TFVieINuBkL6BLXPopYMp+G55w2es="
        );
        assert_eq!(
            headers.authorization(),
            "SpiriusSmsV1 test:wUX+i3p2nrQK55TFVieINuBkL6BLXPopYMp+G55w2es="
        );
        assert_eq!(headers.timestamp(), ts());
    }

    #[test]
    fn literal_escape_signature_matches_reference_vector() {
        let creds = credentials();
        let headers = SignedRequestBuilder::new(&creds)
            .format(SignatureFormat::LiteralEscape)
            .sign(ts(), BODY)
            .unwrap();

        assert_eq!(
            headers.signature(),
            "V4IDuhtDRdgf0p7CbpUiB3fY6BW382jVmW79Xsgy08w="
        );
    }

    #[test]
    fn empty_body_signature_matches_reference_vector() {
        let creds = credentials();
        let headers = SignedRequestBuilder::new(&creds)
            .sign_request(HttpMethod::Delete, "/sms/mo/next", ts(), b"")
            .unwrap();

        assert_eq!(
            headers.signature(),
            "LzTbYUPRFemIjMeOFg0sAWhllcszzRsHeJgZGPyxcZ8="
        );
    }

    #[test]
    fn standard_string_to_sign_layout() {
        let creds = credentials();
        let message = SignedRequestBuilder::new(&creds).string_to_sign(
            HttpMethod::Post,
            "/sms/mt/send",
            ts(),
            BODY,
        );
        assert_eq!(
            String::from_utf8(message).unwrap(),
            "SpiriusSmsV1\n1700000000\nPOST\n/sms/mt/send\nb734d547ea0d3bbe514d75ef5a63444c828beb2a"
        );
    }

    #[test]
    fn literal_escape_string_to_sign_embeds_raw_digest() {
        let creds = credentials();
        let message = SignedRequestBuilder::new(&creds)
            .format(SignatureFormat::LiteralEscape)
            .string_to_sign(HttpMethod::Post, "/sms/mt/send", ts(), BODY);

        let prefix = b"SpiriusSmsV1\\n1700000000\\nPOST\\n/sms/mt/send\\n";
        assert!(message.starts_with(prefix));
        assert!(!message.contains(&b'\n'));
        let digest = &message[prefix.len()..];
        assert_eq!(
            hex::encode(digest),
            "b734d547ea0d3bbe514d75ef5a63444c828beb2a"
        );
    }

    #[test]
    fn signing_is_deterministic() {
        let creds = credentials();
        let signer = SignedRequestBuilder::new(&creds);
        assert_eq!(
            signer.sign(ts(), BODY).unwrap(),
            signer.sign(ts(), BODY).unwrap()
        );
    }

    #[test]
    fn any_body_byte_change_changes_signature() {
        let creds = credentials();
        let signer = SignedRequestBuilder::new(&creds);
        let base = signer.sign(ts(), BODY).unwrap();

        for idx in 0..BODY.len() {
            let mut altered = BODY.to_vec();
            altered[idx] ^= 0x01;
            let changed = signer.sign(ts(), &altered).unwrap();
            assert_ne!(base.signature(), changed.signature(), "byte {idx}");
        }
    }

    #[test]
    fn timestamp_change_changes_signature() {
        let creds = credentials();
        let signer = SignedRequestBuilder::new(&creds);
        let a = signer.sign(ts(), BODY).unwrap();
        let b = signer.sign(UnixTimestamp::new(1_700_000_001), BODY).unwrap();
        assert_ne!(a.signature(), b.signature());
    }

    #[test]
    fn method_and_path_are_signed() {
        let creds = credentials();
        let signer = SignedRequestBuilder::new(&creds);
        let get = signer
            .sign_request(HttpMethod::Get, "/sms/mo/abc", ts(), b"")
            .unwrap();
        let delete = signer
            .sign_request(HttpMethod::Delete, "/sms/mo/abc", ts(), b"")
            .unwrap();
        let other = signer
            .sign_request(HttpMethod::Get, "/sms/mo/abd", ts(), b"")
            .unwrap();
        assert_ne!(get.signature(), delete.signature());
        assert_ne!(get.signature(), other.signature());
    }

    #[test]
    fn authorization_header_shape_and_digest_length() {
        let creds = Credentials::new("78701a30f3f83437df6284ced6fc9ba5", "SomeUser").unwrap();
        let headers = SignedRequestBuilder::new(&creds).sign(ts(), BODY).unwrap();

        let encoded = headers
            .authorization()
            .strip_prefix("SpiriusSmsV1 SomeUser:")
            .unwrap();
        assert_eq!(encoded, headers.signature());
        assert_eq!(BASE64.decode(encoded).unwrap().len(), 32);
    }

    #[test]
    fn header_pairs_are_in_wire_order() {
        let creds = credentials();
        let headers = SignedRequestBuilder::new(&creds).sign(ts(), BODY).unwrap();
        let pairs = headers.to_pairs();

        assert_eq!(pairs[0], ("X-SMS-Timestamp", "1700000000".to_owned()));
        assert_eq!(pairs[1].0, "Authorization");
        assert_eq!(pairs[1].1, headers.authorization());
        assert_eq!(pairs[2], ("Content-Type", "application/json".to_owned()));
        assert_eq!(pairs[2].1, headers.content_type());
    }

    #[test]
    fn username_with_control_characters_is_rejected() {
        let creds = Credentials::new("testkey", "bad\nuser").unwrap();
        let err = SignedRequestBuilder::new(&creds)
            .sign(ts(), BODY)
            .unwrap_err();
        assert!(matches!(
            err,
            SigningError::InvalidHeaderValue {
                header: "Authorization"
            }
        ));
    }

    #[test]
    fn build_keeps_the_signed_body_buffer() {
        let creds = credentials();
        let signed = SignedRequestBuilder::new(&creds)
            .build(&Endpoint::send_sms(), ts(), Some(BODY.to_vec()))
            .unwrap();

        assert_eq!(signed.method, HttpMethod::Post);
        assert_eq!(signed.path, "/sms/mt/send");
        assert_eq!(signed.body.as_deref(), Some(BODY));
        assert_eq!(
            signed.headers.signature(),
            "wUX+i3p2nrQK55TFVieINuBkL6BLXPopYMp+G55w2es="
        );

        let signed = SignedRequestBuilder::new(&creds)
            .build(&Endpoint::pop_next_message(), ts(), None)
            .unwrap();
        assert!(signed.body.is_none());
        assert_eq!(
            signed.headers.signature(),
            "LzTbYUPRFemIjMeOFg0sAWhllcszzRsHeJgZGPyxcZ8="
        );
    }
}
