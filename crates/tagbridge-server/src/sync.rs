//! Checkout → Contact Sync
//!
//! Turns a completed checkout into a tagged Mailchimp contact. Every step
//! degrades instead of failing: a line-item error leaves only the default
//! tag, a missing email skips the upsert.

use tagbridge_core::{ContactRecord, Credentials, TagSet, compute_tags};
use tagbridge_mailchimp::UpsertOutcome;
use tagbridge_payments::{CompletedCheckout, fetch_line_items};

use crate::state::AppState;

/// What the sync did, for logging and tests
#[derive(Debug)]
pub struct SyncReport {
    pub tags: TagSet,
    /// `None` when no upsert was attempted
    pub outcome: Option<UpsertOutcome>,
}

/// Compute tags for the checkout and push the customer to Mailchimp
pub async fn sync_checkout(
    state: &AppState,
    credentials: &Credentials,
    checkout: &CompletedCheckout,
) -> SyncReport {
    let items = match fetch_line_items(state.gateway.as_ref(), credentials, &checkout.session_id)
        .await
    {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(session_id = %checkout.session_id, error = %e, "Line item fetch failed");
            state
                .audit_log
                .record(&format!("Error fetching line items: {e}"))
                .await;
            Vec::new()
        }
    };

    let rules = state.settings.load_rules().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Could not load product tags");
        Vec::new()
    });

    let descriptions: Vec<&str> = items.iter().map(|i| i.description.as_str()).collect();
    let tags = compute_tags(&descriptions, &rules);

    tracing::info!(
        session_id = %checkout.session_id,
        items = items.len(),
        tags = ?tags,
        "Computed checkout tags"
    );

    let Some(customer) = checkout.customer() else {
        tracing::warn!(session_id = %checkout.session_id, "Checkout has no customer email, skipping upsert");
        return SyncReport {
            tags,
            outcome: None,
        };
    };

    let contact = ContactRecord::new(&customer, tags.clone());
    let outcome = match state
        .mailchimp
        .upsert_contact(&contact, credentials, &state.failure_log)
        .await
    {
        Ok(outcome) => Some(outcome),
        Err(e) if e.is_missing_credentials() => {
            tracing::warn!("Mailchimp not configured, skipping upsert");
            None
        }
        Err(e) => {
            tracing::error!(error = %e, "Mailchimp upsert failed");
            None
        }
    };

    SyncReport { tags, outcome }
}
