//! Mailchimp Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, MailchimpError>;

/// Mailchimp-related errors
#[derive(Error, Debug)]
pub enum MailchimpError {
    /// API key or audience id has not been configured
    #[error("Mailchimp API key or list id not set")]
    MissingCredentials,

    /// API key lacks the `-<datacenter>` suffix
    #[error("Invalid Mailchimp API key: {0}")]
    InvalidApiKey(String),

    /// Connection-level failure (no HTTP response)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Payload could not be encoded or decoded
    #[error("Parse error: {0}")]
    Parse(String),
}

impl MailchimpError {
    /// Whether the error only means "not configured yet"
    pub fn is_missing_credentials(&self) -> bool {
        matches!(self, MailchimpError::MissingCredentials)
    }
}

impl From<serde_json::Error> for MailchimpError {
    fn from(err: serde_json::Error) -> Self {
        MailchimpError::Parse(err.to_string())
    }
}
