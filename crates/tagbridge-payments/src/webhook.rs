//! Stripe Webhook Handling
//!
//! Parses the event envelope loosely (only the fields the bridge reads) and
//! optionally verifies the `Stripe-Signature` header.

use serde_json::Value;
use std::collections::HashMap;
use stripe::{Webhook, WebhookError};
use tagbridge_core::{BookingDetails, CustomerData, split_name};

use crate::error::{PaymentError, Result};

/// The only event type the bridge acts on
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

/// Parsed webhook event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WebhookEvent {
    /// Checkout completed - sync the customer
    CheckoutCompleted(CompletedCheckout),

    /// Any other event type; acknowledged and ignored
    Other { event_type: String },
}

/// Fields of a completed checkout session used by the bridge
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompletedCheckout {
    pub session_id: String,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl CompletedCheckout {
    /// Customer identity for the contact record.
    ///
    /// `None` when the session carries no email. Booking details are read
    /// from the session metadata when it has a `checkin` entry.
    pub fn customer(&self) -> Option<CustomerData> {
        let email = self
            .customer_email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())?;

        let (first_name, last_name) = self
            .customer_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .map(split_name)
            .unwrap_or_default();

        Some(CustomerData {
            email: email.to_string(),
            first_name,
            last_name,
            booking: self.booking(),
        })
    }

    fn booking(&self) -> Option<BookingDetails> {
        let field = |key: &str| self.metadata.get(key).cloned().unwrap_or_default();

        self.metadata.get("checkin").map(|checkin| BookingDetails {
            checkin: checkin.clone(),
            checkout: field("checkout"),
            cdiscount: field("cdiscount"),
            longstay20: field("longstay20"),
            longstay15: field("longstay15"),
        })
    }
}

/// Parse a raw webhook body into our event type.
///
/// Only the `type` field decides the variant. Session fields are read
/// leniently: a field of an unexpected shape is treated as absent, so a
/// checkout event is never dropped over its contents.
pub fn parse_event(payload: &str) -> Result<WebhookEvent> {
    let raw: Value =
        serde_json::from_str(payload).map_err(|e| PaymentError::WebhookParse(e.to_string()))?;

    let event_type = raw
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if event_type != CHECKOUT_SESSION_COMPLETED {
        return Ok(WebhookEvent::Other { event_type });
    }

    let session = raw.pointer("/data/object").unwrap_or(&Value::Null);
    let details = session.get("customer_details").unwrap_or(&Value::Null);

    let metadata: HashMap<String, String> = session
        .get("metadata")
        .and_then(Value::as_object)
        .map(|fields| {
            fields
                .iter()
                .filter_map(|(key, value)| scalar_string(value).map(|v| (key.clone(), v)))
                .collect()
        })
        .unwrap_or_default();

    Ok(WebhookEvent::CheckoutCompleted(CompletedCheckout {
        session_id: session.get("id").and_then(scalar_string).unwrap_or_default(),
        customer_email: details.get("email").and_then(scalar_string),
        customer_name: details.get("name").and_then(scalar_string),
        metadata,
    }))
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Verify a `Stripe-Signature` header against the payload and signing secret.
///
/// A body that is correctly signed but does not deserialize as a full Stripe
/// `Event` still passes; the envelope is read by [`parse_event`].
pub fn verify_signature(payload: &str, header: &str, secret: &str) -> Result<()> {
    match Webhook::construct_event(payload, header, secret) {
        Ok(_) | Err(WebhookError::BadParse(_)) => Ok(()),
        Err(e) => Err(PaymentError::WebhookSignature(e.to_string())),
    }
}
