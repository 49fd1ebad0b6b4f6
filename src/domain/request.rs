use crate::domain::value::{MessageText, RawPhoneNumber, SenderId};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Payload of a single `sms/mt/send` call.
///
/// Built per call and passed by value; the client keeps no per-message state.
pub struct SendSms {
    message: MessageText,
    from: SenderId,
    to: RawPhoneNumber,
}

impl SendSms {
    pub fn new(message: MessageText, from: SenderId, to: impl Into<RawPhoneNumber>) -> Self {
        Self {
            message,
            from,
            to: to.into(),
        }
    }

    pub fn message(&self) -> &MessageText {
        &self.message
    }

    pub fn sender(&self) -> &SenderId {
        &self.from
    }

    pub fn recipient(&self) -> &RawPhoneNumber {
        &self.to
    }
}
