//! Shared fixtures for handler and sync tests

use std::sync::Arc;

use tagbridge_core::{Credentials, DailyLog, MemorySettingsStore};
use tagbridge_mailchimp::{MailchimpClient, MailchimpConfig, MockTransport};
use tagbridge_payments::MockGateway;

use crate::state::{AUDIT_LOG_PREFIX, AppState, FAILURE_LOG_PREFIX};

/// Fully configured credentials
pub fn credentials() -> Credentials {
    Credentials {
        stripe_api_key: Some("sk_test_1".into()),
        mailchimp_api_key: Some("abc123-us7".into()),
        mailchimp_list_id: Some("list1".into()),
    }
}

/// App state over in-memory settings, mocks and a throwaway log directory
pub struct TestEnv {
    pub state: AppState,
    pub gateway: Arc<MockGateway>,
    pub transport: Arc<MockTransport>,
}

impl TestEnv {
    /// Environment with every credential configured
    pub fn new(gateway: MockGateway, transport: MockTransport) -> Self {
        let env = Self::unconfigured(gateway, transport);
        env.state
            .settings
            .save_credentials(&credentials())
            .unwrap();
        env
    }

    /// Environment with empty settings
    pub fn unconfigured(gateway: MockGateway, transport: MockTransport) -> Self {
        let dir = std::env::temp_dir().join(format!("tagbridge-server-{}", uuid::Uuid::new_v4()));
        let gateway = Arc::new(gateway);
        let transport = Arc::new(transport);

        let state = AppState {
            settings: Arc::new(MemorySettingsStore::new()),
            gateway: gateway.clone(),
            mailchimp: MailchimpClient::new(transport.clone(), MailchimpConfig::default()),
            audit_log: DailyLog::new(&dir, AUDIT_LOG_PREFIX),
            failure_log: DailyLog::new(&dir, FAILURE_LOG_PREFIX),
            webhook_secret: None,
            admin_password: None,
        };

        Self {
            state,
            gateway,
            transport,
        }
    }

    /// Today's audit log, empty if nothing was written
    pub fn audit_contents(&self) -> String {
        std::fs::read_to_string(self.state.audit_log.today_path()).unwrap_or_default()
    }

    /// Today's failure log, empty if nothing was written
    pub fn failure_contents(&self) -> String {
        std::fs::read_to_string(self.state.failure_log.today_path()).unwrap_or_default()
    }
}

impl Drop for TestEnv {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(self.state.audit_log.dir());
    }
}
