//! Application State

use std::sync::Arc;

use tagbridge_core::{DailyLog, SettingsStore};
use tagbridge_mailchimp::MailchimpClient;
use tagbridge_payments::PaymentGateway;

/// Audit log file prefix (raw webhook payloads and line-item errors)
pub const AUDIT_LOG_PREFIX: &str = "webhook";

/// Failure log file prefix (upsert transport failures)
pub const FAILURE_LOG_PREFIX: &str = "upsert_failures";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Credentials and product/tag rules
    pub settings: Arc<dyn SettingsStore>,

    /// Stripe (live or mock)
    pub gateway: Arc<dyn PaymentGateway>,

    /// Mailchimp client
    pub mailchimp: MailchimpClient,

    /// Raw inbound webhook payloads
    pub audit_log: DailyLog,

    /// Upsert transport failures
    pub failure_log: DailyLog,

    /// Stripe webhook signing secret (optional)
    pub webhook_secret: Option<Arc<str>>,

    /// Admin basic-auth password (optional)
    pub admin_password: Option<Arc<str>>,
}
