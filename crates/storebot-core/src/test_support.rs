//! In-crate fakes for the store and provider seams.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use crate::provider::types::{ChatMessage, LlmResponse, Usage};
use crate::provider::LlmProvider;
use crate::store::{
    BestSeller, CustomerSummary, LowStockItem, OrderSummary, PendingOrder, SaleRecord,
    SalesPeriod, StoreData, StoreError, StorePerformance,
};

/// Store that answers every query with fixed data.
#[derive(Default)]
pub struct CannedStore {
    pub performance: StorePerformance,
    pub best_sellers: Vec<BestSeller>,
    pub low_stock: Vec<LowStockItem>,
    pub orders: Vec<OrderSummary>,
    pub customers: Vec<CustomerSummary>,
    pub pending: Vec<PendingOrder>,
}

#[async_trait]
impl StoreData for CannedStore {
    async fn store_performance(&self, _: &str) -> Result<StorePerformance, StoreError> {
        Ok(self.performance.clone())
    }
    async fn best_selling_products(&self, _: &str) -> Result<Vec<BestSeller>, StoreError> {
        Ok(self.best_sellers.clone())
    }
    async fn low_stock_products(&self, _: &str) -> Result<Vec<LowStockItem>, StoreError> {
        Ok(self.low_stock.clone())
    }
    async fn todays_orders(&self, _: &str) -> Result<Vec<OrderSummary>, StoreError> {
        Ok(self.orders.clone())
    }
    async fn recent_customers(&self, _: &str) -> Result<Vec<CustomerSummary>, StoreError> {
        Ok(self.customers.clone())
    }
    async fn pending_orders(&self, _: &str) -> Result<Vec<PendingOrder>, StoreError> {
        Ok(self.pending.clone())
    }
    async fn sales_data(&self, _: &str, _: SalesPeriod) -> Result<Vec<SaleRecord>, StoreError> {
        Ok(Vec::new())
    }
}

/// Store that rejects every query.
pub struct FailingStore;

fn unavailable<T>() -> Result<T, StoreError> {
    Err(StoreError::Unavailable("permission denied".into()))
}

#[async_trait]
impl StoreData for FailingStore {
    async fn store_performance(&self, _: &str) -> Result<StorePerformance, StoreError> {
        unavailable()
    }
    async fn best_selling_products(&self, _: &str) -> Result<Vec<BestSeller>, StoreError> {
        unavailable()
    }
    async fn low_stock_products(&self, _: &str) -> Result<Vec<LowStockItem>, StoreError> {
        unavailable()
    }
    async fn todays_orders(&self, _: &str) -> Result<Vec<OrderSummary>, StoreError> {
        unavailable()
    }
    async fn recent_customers(&self, _: &str) -> Result<Vec<CustomerSummary>, StoreError> {
        unavailable()
    }
    async fn pending_orders(&self, _: &str) -> Result<Vec<PendingOrder>, StoreError> {
        unavailable()
    }
    async fn sales_data(&self, _: &str, _: SalesPeriod) -> Result<Vec<SaleRecord>, StoreError> {
        unavailable()
    }
}

/// Provider that returns a fixed completion and records each request.
pub struct ScriptedProvider {
    reply: Option<String>,
    delay: Duration,
    pub requests: Mutex<Vec<(Vec<ChatMessage>, u32)>>,
}

impl ScriptedProvider {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A provider that returns no completion text at all.
    pub fn silent() -> Self {
        Self {
            reply: None,
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        _model: Option<&str>,
        max_tokens: u32,
        _temperature: f32,
    ) -> anyhow::Result<LlmResponse> {
        self.requests
            .lock()
            .unwrap()
            .push((messages.to_vec(), max_tokens));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(LlmResponse {
            content: self.reply.clone(),
            finish_reason: "stop".into(),
            usage: Usage::default(),
        })
    }

    fn default_model(&self) -> &str {
        "scripted"
    }
}

/// Provider whose every request fails like a dropped connection.
pub struct FailingProvider;

#[async_trait]
impl LlmProvider for FailingProvider {
    async fn chat(
        &self,
        _messages: &[ChatMessage],
        _model: Option<&str>,
        _max_tokens: u32,
        _temperature: f32,
    ) -> anyhow::Result<LlmResponse> {
        anyhow::bail!("Failed to send request to text API: connection reset")
    }

    fn default_model(&self) -> &str {
        "failing"
    }
}
