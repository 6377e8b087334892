//! tagbridge HTTP Server
//!
//! Receives Stripe checkout webhooks and tags the paying customer in a
//! Mailchimp audience. Also serves the admin pages used to enter API
//! credentials and map product titles to tags.

mod auth;
mod config;
mod handlers;
mod routes;
mod state;
mod sync;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tagbridge_core::{DailyLog, JsonFileSettingsStore, SettingsStore};
use tagbridge_mailchimp::{MailchimpClient, MailchimpConfig, ReqwestTransport};
use tagbridge_payments::StripeGateway;

use crate::config::ServerConfig;
use crate::state::{AUDIT_LOG_PREFIX, AppState, FAILURE_LOG_PREFIX};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let settings = Arc::new(JsonFileSettingsStore::new(&config.settings_path));
    let credentials = settings.load_credentials()?;

    if credentials.stripe_key().is_some() {
        tracing::info!("✓ Stripe configured");
    } else {
        tracing::warn!("⚠ Stripe not configured - webhook will answer 400");
    }
    if credentials.mailchimp().is_some() {
        tracing::info!("✓ Mailchimp configured");
    } else {
        tracing::warn!("⚠ Mailchimp not configured - contacts will not be synced");
    }
    tracing::info!(
        rules = settings.load_rules()?.len(),
        path = %config.settings_path.display(),
        "Loaded settings"
    );

    let mailchimp = MailchimpClient::new(
        Arc::new(ReqwestTransport::new()?),
        MailchimpConfig {
            member_datacenter: config.member_datacenter.clone(),
            ..Default::default()
        },
    );

    if config.webhook_secret.is_none() {
        tracing::warn!("⚠ STRIPE_WEBHOOK_SECRET not set - webhook signatures are not checked");
    }
    if config.admin_password.is_none() {
        tracing::warn!("⚠ ADMIN_PASSWORD not set - admin pages are unauthenticated");
    }

    let state = AppState {
        settings,
        gateway: Arc::new(StripeGateway::new()),
        mailchimp,
        audit_log: DailyLog::new(&config.log_dir, AUDIT_LOG_PREFIX),
        failure_log: DailyLog::new(&config.log_dir, FAILURE_LOG_PREFIX),
        webhook_secret: config.webhook_secret.as_deref().map(Arc::from),
        admin_password: config.admin_password.as_deref().map(Arc::from),
    };

    let webhook_path = config.webhook_path();
    let app = routes::router(state, &webhook_path);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    tracing::info!("tagbridge server running on http://{}", config.bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  POST {webhook_path}");
    tracing::info!("  GET  /admin/product-tags");
    tracing::info!("  GET  /admin/api-settings");

    axum::serve(listener, app).await?;

    Ok(())
}
