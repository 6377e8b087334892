//! # tagbridge-payments
//!
//! Stripe side of the tag bridge.
//!
//! - **Product catalog**: up to 100 products for the mapping editor dropdown
//! - **Line items**: the purchased entries of a completed checkout session
//! - **Webhooks**: loose envelope parsing plus optional signature checks
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tagbridge_payments::{StripeGateway, fetch_line_items, parse_event, WebhookEvent};
//!
//! let gateway = StripeGateway::new();
//!
//! if let WebhookEvent::CheckoutCompleted(checkout) = parse_event(&body)? {
//!     let items = fetch_line_items(&gateway, &credentials, &checkout.session_id).await?;
//! }
//! ```

mod error;
mod gateway;
mod webhook;

pub use error::{PaymentError, Result};
pub use gateway::{
    LINE_ITEM_LIMIT, MockGateway, PRODUCT_LIMIT, PaymentGateway, ProductSummary, StripeGateway,
    fetch_line_items, fetch_products,
};
pub use webhook::{
    CHECKOUT_SESSION_COMPLETED, CompletedCheckout, WebhookEvent, parse_event, verify_signature,
};
