//! Server Configuration
//!
//! Process-level settings from the environment (`.env` is loaded first).
//! API credentials and product/tag rules are not here: they live in the
//! settings store and are edited from the admin pages.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

use tagbridge_mailchimp::DEFAULT_MEMBER_DATACENTER;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: SocketAddr,

    /// JSON file backing the settings store
    pub settings_path: PathBuf,

    /// Directory for the daily audit and failure logs
    pub log_dir: PathBuf,

    /// `<namespace>` in `POST /<namespace>/v1/webhook`
    pub webhook_namespace: String,

    /// Datacenter of the Mailchimp member endpoint
    pub member_datacenter: String,

    /// Verify `Stripe-Signature` when set
    pub webhook_secret: Option<String>,

    /// Require basic auth on admin pages when set
    pub admin_password: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            settings_path: PathBuf::from("settings.json"),
            log_dir: PathBuf::from("logs"),
            webhook_namespace: "stripe-products-mailchimp".into(),
            member_datacenter: DEFAULT_MEMBER_DATACENTER.into(),
            webhook_secret: None,
            admin_password: None,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup; unset or blank values keep defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let bind_addr = match var("BIND_ADDR") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid {
                    name: "BIND_ADDR",
                    value,
                })?,
            None => defaults.bind_addr,
        };

        let webhook_namespace = var("WEBHOOK_NAMESPACE")
            .map(|ns| ns.trim_matches('/').to_string())
            .unwrap_or(defaults.webhook_namespace);
        if webhook_namespace.is_empty() || webhook_namespace.contains('/') {
            return Err(ConfigError::Invalid {
                name: "WEBHOOK_NAMESPACE",
                value: webhook_namespace,
            });
        }

        Ok(Self {
            bind_addr,
            settings_path: var("SETTINGS_PATH").map_or(defaults.settings_path, PathBuf::from),
            log_dir: var("LOG_DIR").map_or(defaults.log_dir, PathBuf::from),
            webhook_namespace,
            member_datacenter: var("MAILCHIMP_MEMBER_DC").unwrap_or(defaults.member_datacenter),
            webhook_secret: var("STRIPE_WEBHOOK_SECRET"),
            admin_password: var("ADMIN_PASSWORD"),
        })
    }

    /// Path of the webhook route
    pub fn webhook_path(&self) -> String {
        format!("/{}/v1/webhook", self.webhook_namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.member_datacenter, "us21");
        assert_eq!(config.webhook_path(), "/stripe-products-mailchimp/v1/webhook");
        assert!(config.webhook_secret.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("WEBHOOK_NAMESPACE", "/bookings/"),
            ("STRIPE_WEBHOOK_SECRET", "whsec_1"),
            ("ADMIN_PASSWORD", " "),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.webhook_path(), "/bookings/v1/webhook");
        assert_eq!(config.webhook_secret.as_deref(), Some("whsec_1"));
        assert!(config.admin_password.is_none());
    }

    #[test]
    fn test_invalid_values() {
        assert!(config_from(&[("BIND_ADDR", "nowhere")]).is_err());
        assert!(config_from(&[("WEBHOOK_NAMESPACE", "a/b")]).is_err());
    }
}
