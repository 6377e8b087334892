//! Stripe Webhook Endpoint
//!
//! Open endpoint: every event type is accepted, only
//! `checkout.session.completed` is acted on, and the response is 200 no
//! matter how processing went. The only non-200 answers are a missing Stripe
//! key and, when a signing secret is configured, a bad signature.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tagbridge_core::Credentials;
use tagbridge_payments::{WebhookEvent, parse_event, verify_signature};

use crate::state::AppState;
use crate::sync::sync_checkout;

/// Body returned for every acknowledged delivery
pub const ACK: &str = "Webhook received";

/// POST /<namespace>/v1/webhook
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, &'static str) {
    let credentials = state.settings.load_credentials().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Could not load credentials");
        Credentials::default()
    });

    if credentials.stripe_key().is_none() {
        return (StatusCode::BAD_REQUEST, "Stripe API key not set");
    }

    if let Some(secret) = &state.webhook_secret {
        let signature = headers
            .get("stripe-signature")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if let Err(e) = verify_signature(&body, signature, secret) {
            tracing::warn!(error = %e, "Webhook signature failed");
            return (StatusCode::BAD_REQUEST, "Invalid signature");
        }
    }

    match parse_event(&body) {
        Ok(WebhookEvent::CheckoutCompleted(checkout)) => {
            state.audit_log.record(&body).await;

            let report = sync_checkout(&state, &credentials, &checkout).await;
            tracing::info!(
                session_id = %checkout.session_id,
                outcome = ?report.outcome,
                "Processed checkout webhook"
            );
        }
        Ok(WebhookEvent::Other { event_type }) => {
            tracing::debug!(event_type = %event_type, "Ignoring webhook event");
        }
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring unparseable webhook body");
        }
    }

    (StatusCode::OK, ACK)
}
