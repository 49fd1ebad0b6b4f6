use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    MissingEnvVar { name: &'static str },
    InvalidPhoneNumber { input: String },
    InvalidTransactionId { input: String },
    InvalidBaseUrl { input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::MissingEnvVar { name } => {
                write!(f, "environment variable {name} is not set")
            }
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidTransactionId { input } => {
                write!(f, "invalid transaction id: {input:?}")
            }
            Self::InvalidBaseUrl { input } => write!(f, "invalid base url: {input}"),
        }
    }
}

impl std::error::Error for ValidationError {}
