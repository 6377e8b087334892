//! # tagbridge-core
//!
//! Shared model for the Stripe → Mailchimp tag bridge.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐   ┌────────────────┐   ┌─────────────────┐
//! │   Settings   │──▶│ Mapping Engine │──▶│ Contact Record  │
//! │ (rules/keys) │   │ (title ⊂ item) │   │ (merge + tags)  │
//! └──────────────┘   └────────────────┘   └─────────────────┘
//!                            ▲
//!                    purchased line items
//! ```
//!
//! The payment and email sides live in `tagbridge-payments` and
//! `tagbridge-mailchimp`; this crate holds what both of them and the server
//! agree on: credentials, product/tag rules, the tag matcher, the settings
//! store and the date-stamped log files.

pub mod daily_log;
pub mod error;
pub mod mapping;
pub mod model;
pub mod settings;
pub mod text;

pub use daily_log::DailyLog;
pub use error::{CoreError, Result};
pub use mapping::{DEFAULT_TAG, compute_tags};
pub use model::{
    BookingDetails, ContactRecord, Credentials, CustomerData, ProductTagRule, PurchasedLineItem,
    TagSet,
};
pub use settings::{JsonFileSettingsStore, MemorySettingsStore, SettingsStore};
pub use text::{sanitize_text_field, split_name};
