//! Live Stripe Gateway
//!
//! Uses `async-stripe`; a client is built per call from the key loaded for
//! the current request.

use async_trait::async_trait;
use stripe::{
    CheckoutSession, CheckoutSessionId, Client, ListProducts, Product,
    RetrieveCheckoutSessionLineItems,
};
use tagbridge_core::PurchasedLineItem;

use super::{LINE_ITEM_LIMIT, PaymentGateway, ProductSummary};
use crate::error::{PaymentError, Result};

/// Gateway backed by the Stripe REST API
#[derive(Clone, Debug, Default)]
pub struct StripeGateway;

impl StripeGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn list_products(&self, api_key: &str, limit: u64) -> Result<Vec<ProductSummary>> {
        let client = Client::new(api_key);

        let mut params = ListProducts::new();
        params.limit = Some(limit);

        let products = Product::list(&client, &params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        Ok(products
            .data
            .into_iter()
            .map(|product| {
                let name: Option<String> = product.name.into();
                ProductSummary {
                    id: product.id.to_string(),
                    name: name.unwrap_or_default(),
                }
            })
            .collect())
    }

    async fn list_line_items(
        &self,
        api_key: &str,
        session_id: &str,
    ) -> Result<Vec<PurchasedLineItem>> {
        let id: CheckoutSessionId = session_id
            .parse()
            .map_err(|e| PaymentError::InvalidSessionId(format!("{session_id:?}: {e}")))?;

        let client = Client::new(api_key);
        let params = RetrieveCheckoutSessionLineItems {
            limit: Some(LINE_ITEM_LIMIT),
            ..Default::default()
        };

        let items = CheckoutSession::retrieve_line_items(&client, &id, &params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        tracing::debug!(
            session_id = %id,
            count = items.data.len(),
            has_more = items.has_more,
            "Fetched checkout line items"
        );

        Ok(items
            .data
            .into_iter()
            .map(|item| {
                let description: Option<String> = item.description.into();
                PurchasedLineItem::new(description.unwrap_or_default())
            })
            .collect())
    }
}
