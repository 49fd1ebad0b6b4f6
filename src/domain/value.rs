use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::validation::ValidationError;

use phonenumber::country;

#[derive(Clone, PartialEq, Eq)]
/// Shared HMAC key from the Spirius account page.
///
/// Invariant: must not be empty (the value is used byte-for-byte as the HMAC key).
/// `Debug` output is redacted.
pub struct SharedKey(String);

impl SharedKey {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "shared_key";

    /// Environment variable read by [`Credentials::from_env`].
    pub const ENV: &'static str = "SPIRIUS_SHARED_KEY";

    /// Create a validated [`SharedKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Key bytes as fed into HMAC-SHA256.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SharedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedKey(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Spirius account username, sent in the `Authorization` header.
///
/// Invariant: non-empty after trimming.
pub struct Username(String);

impl Username {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "username";

    /// Environment variable read by [`Credentials::from_env`].
    pub const ENV: &'static str = "SPIRIUS_USERNAME";

    /// Create a validated [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated username.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
/// Shared key + username pair used to sign every request.
pub struct Credentials {
    shared_key: SharedKey,
    username: Username,
}

impl Credentials {
    /// Validate and pair a shared key with a username.
    pub fn new(
        shared_key: impl Into<String>,
        username: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            shared_key: SharedKey::new(shared_key)?,
            username: Username::new(username)?,
        })
    }

    /// Read `SPIRIUS_SHARED_KEY` and `SPIRIUS_USERNAME` from the environment.
    pub fn from_env() -> Result<Self, ValidationError> {
        let shared_key = std::env::var(SharedKey::ENV)
            .map_err(|_| ValidationError::MissingEnvVar { name: SharedKey::ENV })?;
        let username = std::env::var(Username::ENV)
            .map_err(|_| ValidationError::MissingEnvVar { name: Username::ENV })?;
        Self::new(shared_key, username)
    }

    pub fn shared_key(&self) -> &SharedKey {
        &self.shared_key
    }

    pub fn username(&self) -> &Username {
        &self.username
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender id (`from`): an alphanumeric sender name or a phone number.
///
/// Invariant: non-empty after trimming. The value must be allowed on your Spirius account.
pub struct SenderId(String);

impl SenderId {
    /// JSON key used by Spirius (`from`).
    pub const FIELD: &'static str = "from";

    /// Create a validated [`SenderId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sender id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text (`message`).
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// JSON key used by Spirius (`message`).
    pub const FIELD: &'static str = "message";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Transaction id of a message, as returned by the gateway.
///
/// Invariant: non-empty after trimming, made only of URL-unreserved ASCII
/// (alphanumerics and `-_.~`), and not a dot segment (`.`, `..`). The id is embedded
/// verbatim in the signed path, so the wire path must not be re-encoded or resolved.
pub struct TransactionId(String);

impl TransactionId {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "transaction_id";

    /// Create a validated [`TransactionId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let unreserved = trimmed
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~'));
        if !unreserved || trimmed.bytes().all(|b| b == b'.') {
            return Err(ValidationError::InvalidTransactionId {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated transaction id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Unvalidated recipient address as sent to Spirius (`to`).
///
/// Invariant: non-empty after trimming. This type does not normalize; if you want E.164
/// normalization, parse into [`PhoneNumber`] and convert it into [`RawPhoneNumber`].
pub struct RawPhoneNumber(String);

impl RawPhoneNumber {
    /// JSON key used by Spirius (`to`).
    pub const FIELD: &'static str = "to";

    /// Create a validated (non-empty) raw phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value as sent to Spirius.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for RawPhoneNumber {
    fn from(value: PhoneNumber) -> Self {
        Self(value.e164)
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality, ordering, and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// JSON key used by Spirius (`to`).
    pub const FIELD: &'static str = "to";

    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

impl std::cmp::PartialOrd for PhoneNumber {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::Ord for PhoneNumber {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.e164.cmp(&other.e164)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Unix timestamp in seconds, sent as `X-SMS-Timestamp` and signed.
pub struct UnixTimestamp(u64);

impl UnixTimestamp {
    /// Header carrying the timestamp.
    pub const HEADER: &'static str = "X-SMS-Timestamp";

    /// Create a timestamp value (no range validation is performed).
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Current wall-clock time, truncated to whole seconds.
    ///
    /// A clock set before the epoch yields `0`.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        Self(secs)
    }

    /// Get the underlying timestamp in seconds.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_key_debug_is_redacted() {
        let key = SharedKey::new("78701a30f3f83437").unwrap();
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("78701a30"));

        let credentials = Credentials::new("78701a30f3f83437", "test").unwrap();
        assert!(!format!("{credentials:?}").contains("78701a30"));
    }

    #[test]
    fn shared_key_keeps_whitespace() {
        let key = SharedKey::new(" k ").unwrap();
        assert_eq!(key.as_bytes(), b" k ");
    }

    #[test]
    fn username_is_trimmed() {
        let username = Username::new("  test ").unwrap();
        assert_eq!(username.as_str(), "test");
    }

    #[test]
    fn transaction_id_rejects_path_characters() {
        assert!(TransactionId::new("abc-123_4.5").is_ok());
        assert!(TransactionId::new("~a.b").is_ok());
        for bad in ["a/b", "a?b", "a#b", "a%2F", "a b", "..", ".", "...", "é", "a\"b"] {
            assert!(
                matches!(
                    TransactionId::new(bad),
                    Err(ValidationError::InvalidTransactionId { .. })
                ),
                "accepted {bad:?}"
            );
        }
        assert!(matches!(
            TransactionId::new("  "),
            Err(ValidationError::Empty {
                field: TransactionId::FIELD
            })
        ));
    }

    #[test]
    fn message_text_preserves_whitespace() {
        let msg = MessageText::new(" hi ").unwrap();
        assert_eq!(msg.as_str(), " hi ");
    }

    #[test]
    fn unix_timestamp_displays_decimal_seconds() {
        assert_eq!(UnixTimestamp::new(1_700_000_000).to_string(), "1700000000");
        assert!(UnixTimestamp::now().value() > 1_600_000_000);
    }
}
