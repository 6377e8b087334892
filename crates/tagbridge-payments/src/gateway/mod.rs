//! Stripe Gateway
//!
//! Abstraction over the two Stripe calls the bridge makes: listing products
//! for the mapping editor and listing a checkout session's line items.

mod mock;
mod stripe_api;

pub use mock::MockGateway;
pub use stripe_api::StripeGateway;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tagbridge_core::{Credentials, PurchasedLineItem};

use crate::error::{PaymentError, Result};

/// Products shown in the mapping editor dropdown
pub const PRODUCT_LIMIT: u64 = 100;

/// Line items requested per checkout session
pub const LINE_ITEM_LIMIT: u64 = 100;

/// Product as listed in the mapping editor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
}

/// Payment provider client (Strategy pattern)
///
/// The API key is passed per call; credentials are loaded per request.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// List up to `limit` products
    async fn list_products(&self, api_key: &str, limit: u64) -> Result<Vec<ProductSummary>>;

    /// List the purchased items of a checkout session
    async fn list_line_items(
        &self,
        api_key: &str,
        session_id: &str,
    ) -> Result<Vec<PurchasedLineItem>>;
}

/// Fetch the product catalog for the mapping editor.
///
/// Fails with [`PaymentError::MissingCredentials`] when no Stripe key is set.
pub async fn fetch_products(
    gateway: &dyn PaymentGateway,
    credentials: &Credentials,
) -> Result<Vec<ProductSummary>> {
    let api_key = credentials
        .stripe_key()
        .ok_or(PaymentError::MissingCredentials)?;
    gateway.list_products(api_key, PRODUCT_LIMIT).await
}

/// Fetch the line items of a completed checkout session
pub async fn fetch_line_items(
    gateway: &dyn PaymentGateway,
    credentials: &Credentials,
    session_id: &str,
) -> Result<Vec<PurchasedLineItem>> {
    let api_key = credentials
        .stripe_key()
        .ok_or(PaymentError::MissingCredentials)?;
    gateway.list_line_items(api_key, session_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Credentials {
        Credentials {
            stripe_api_key: Some("sk_test_123".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_key_is_distinct_from_empty_catalog() {
        let gateway = MockGateway::new();

        let err = fetch_products(&gateway, &Credentials::default())
            .await
            .unwrap_err();
        assert!(err.is_missing_credentials());
        assert!(gateway.calls().is_empty());

        let products = fetch_products(&gateway, &configured()).await.unwrap();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_products_requested_with_limit() {
        let gateway = MockGateway::new().with_products(vec![ProductSummary {
            id: "prod_1".into(),
            name: "Deluxe Room".into(),
        }]);

        let products = fetch_products(&gateway, &configured()).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(gateway.calls(), vec!["products:sk_test_123:100".to_string()]);
    }

    #[tokio::test]
    async fn test_line_items_for_session() {
        let gateway = MockGateway::new()
            .with_line_items("cs_test_1", vec![PurchasedLineItem::new("Deluxe Room")]);

        let items = fetch_line_items(&gateway, &configured(), "cs_test_1")
            .await
            .unwrap();
        assert_eq!(items, vec![PurchasedLineItem::new("Deluxe Room")]);
    }
}
