//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Stripe API key has not been configured
    #[error("Stripe API key not set")]
    MissingCredentials,

    /// Stripe API error
    #[error("Stripe error: {0}")]
    Stripe(String),

    /// Checkout session id is not a valid Stripe id
    #[error("Invalid checkout session id: {0}")]
    InvalidSessionId(String),

    /// Webhook signature verification failed
    #[error("Webhook signature invalid: {0}")]
    WebhookSignature(String),

    /// Webhook payload parsing failed
    #[error("Webhook parse error: {0}")]
    WebhookParse(String),
}

impl PaymentError {
    /// Whether the error only means "not configured yet"
    pub fn is_missing_credentials(&self) -> bool {
        matches!(self, PaymentError::MissingCredentials)
    }
}
