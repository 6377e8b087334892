//! Mock Gateway
//!
//! Scripted Stripe responses for tests and local demos.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tagbridge_core::PurchasedLineItem;

use super::{PaymentGateway, ProductSummary};
use crate::error::{PaymentError, Result};

/// In-memory gateway that records every call
#[derive(Default)]
pub struct MockGateway {
    products: Vec<ProductSummary>,
    products_error: Option<String>,
    line_items: HashMap<String, Vec<PurchasedLineItem>>,
    line_items_error: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(mut self, products: Vec<ProductSummary>) -> Self {
        self.products = products;
        self
    }

    pub fn with_line_items(
        mut self,
        session_id: impl Into<String>,
        items: Vec<PurchasedLineItem>,
    ) -> Self {
        self.line_items.insert(session_id.into(), items);
        self
    }

    /// Make every product listing fail with a Stripe error
    pub fn failing_products(mut self, message: impl Into<String>) -> Self {
        self.products_error = Some(message.into());
        self
    }

    /// Make every line-item listing fail with a Stripe error
    pub fn failing_line_items(mut self, message: impl Into<String>) -> Self {
        self.line_items_error = Some(message.into());
        self
    }

    /// Calls seen so far, formatted as `kind:api_key:arg`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn list_products(&self, api_key: &str, limit: u64) -> Result<Vec<ProductSummary>> {
        self.record(format!("products:{api_key}:{limit}"));

        if let Some(message) = &self.products_error {
            return Err(PaymentError::Stripe(message.clone()));
        }
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self.products.iter().take(limit).cloned().collect())
    }

    async fn list_line_items(
        &self,
        api_key: &str,
        session_id: &str,
    ) -> Result<Vec<PurchasedLineItem>> {
        self.record(format!("line_items:{api_key}:{session_id}"));

        if let Some(message) = &self.line_items_error {
            return Err(PaymentError::Stripe(message.clone()));
        }
        self.line_items
            .get(session_id)
            .cloned()
            .ok_or_else(|| PaymentError::Stripe(format!("No such checkout.session: '{session_id}'")))
    }
}
