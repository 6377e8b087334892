//! HTTP Handlers

pub mod admin;
pub mod webhook;

use axum::{Json, extract::State};
use serde::Serialize;
use tagbridge_core::Credentials;

use crate::state::AppState;

pub use admin::{api_settings_page, product_tags_page, save_api_settings, save_product_tag};
pub use webhook::stripe_webhook;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub stripe_configured: bool,
    pub mailchimp_configured: bool,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let credentials = state.settings.load_credentials().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Could not load credentials");
        Credentials::default()
    });

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        stripe_configured: credentials.stripe_key().is_some(),
        mailchimp_configured: credentials.mailchimp().is_some(),
    })
}
