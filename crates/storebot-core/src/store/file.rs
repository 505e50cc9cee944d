//! File-backed store collaborator.
//!
//! Each store lives in `<data_dir>/<store_id>.json`:
//!
//! ```json
//! {
//!   "orders":    [{"id": "...", "total": 1500, "status": "completed", "createdAt": "2026-10-15T09:00:00Z"}],
//!   "products":  [{"id": "...", "name": "Widget", "stock": 2, "salesCount": 14}],
//!   "customers": [{"id": "...", "name": "Ada", "orderCount": 3, "firstSeen": "2026-10-12T10:00:00Z"}]
//! }
//! ```
//!
//! The file is re-read on every query. Nothing is cached.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::{
    BestSeller, CustomerSummary, LowStockItem, OrderSummary, PendingOrder, SaleRecord,
    SalesPeriod, StoreData, StoreError, StorePerformance, TimeWindows,
};

type Clock = Arc<dyn Fn() -> DateTime<FixedOffset> + Send + Sync>;

/// Query limits applied by [`FileStore`].
#[derive(Debug, Clone, Copy)]
pub struct QueryLimits {
    pub low_stock_threshold: i64,
    pub best_sellers: usize,
    pub recent_customers: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            low_stock_threshold: 5,
            best_sellers: 5,
            recent_customers: 10,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoreFile {
    orders: Vec<OrderRecord>,
    products: Vec<ProductRecord>,
    customers: Vec<CustomerRecord>,
}

// Records are defaulted field by field so one incomplete document never
// poisons the whole file. Time-windowed queries skip records without a
// timestamp.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderRecord {
    #[serde(default)]
    id: String,
    customer_name: Option<String>,
    #[serde(default)]
    total: Option<f64>,
    status: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    items: Option<Vec<serde_json::Value>>,
}

impl OrderRecord {
    fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("pending")
    }

    fn total(&self) -> f64 {
        self.total.unwrap_or(0.0)
    }

    fn placed_since(&self, since: DateTime<Utc>) -> bool {
        self.created_at.is_some_and(|at| at >= since)
    }

    fn customer_name(&self) -> String {
        self.customer_name
            .clone()
            .unwrap_or_else(|| "Customer".into())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    #[serde(default)]
    id: String,
    name: Option<String>,
    /// Products without a stock figure are never reported as low.
    #[serde(default)]
    stock: Option<i64>,
    /// Products without a sales figure are never ranked.
    #[serde(default)]
    sales_count: Option<u64>,
    #[serde(default)]
    revenue: Option<f64>,
}

impl ProductRecord {
    fn name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| "Unnamed Product".into())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerRecord {
    #[serde(default)]
    id: String,
    name: Option<String>,
    email: Option<String>,
    #[serde(default)]
    order_count: Option<u64>,
    #[serde(default)]
    total_spent: Option<f64>,
    #[serde(default)]
    first_seen: Option<DateTime<Utc>>,
}

/// Store collaborator backed by one JSON document per store.
pub struct FileStore {
    dir: PathBuf,
    limits: QueryLimits,
    clock: Clock,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>, limits: QueryLimits) -> Self {
        Self {
            dir: dir.into(),
            limits,
            clock: Arc::new(|| Local::now().fixed_offset()),
        }
    }

    /// Replace the wall clock used to compute time windows.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<FixedOffset> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the data file for `store_id`.
    pub fn store_path(&self, store_id: &str) -> PathBuf {
        // Store ids become file names; keep them inside the data directory.
        let safe: String = store_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }

    /// Ids of every store with a data file, sorted.
    pub fn list_stores(&self) -> Vec<String> {
        let mut ids: Vec<String> = std::fs::read_dir(&self.dir)
            .into_iter()
            .flatten()
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    path.file_stem().map(|s| s.to_string_lossy().into_owned())
                } else {
                    None
                }
            })
            .collect();
        ids.sort();
        ids
    }

    async fn read(&self, store_id: &str) -> Result<StoreFile, StoreError> {
        let path = self.store_path(store_id);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(store_id.to_string()));
            }
            Err(e) => return Err(StoreError::Io(e)),
        };
        let data: StoreFile = serde_json::from_str(&content)?;
        debug!(
            store_id,
            orders = data.orders.len(),
            products = data.products.len(),
            customers = data.customers.len(),
            "Loaded store data"
        );
        Ok(data)
    }

    fn windows(&self) -> TimeWindows {
        TimeWindows::containing(&(self.clock)())
    }
}

fn completed_since(orders: &[OrderRecord], since: DateTime<Utc>) -> impl Iterator<Item = &OrderRecord> {
    orders
        .iter()
        .filter(move |o| o.placed_since(since) && o.status() == "completed")
}

#[async_trait]
impl StoreData for FileStore {
    async fn store_performance(&self, store_id: &str) -> Result<StorePerformance, StoreError> {
        let data = self.read(store_id).await?;
        let windows = self.windows();

        let (today_orders, today_revenue) = completed_since(&data.orders, windows.start_of_today)
            .fold((0, 0.0), |(n, sum), o| (n + 1, sum + o.total()));
        let (total_orders, week_revenue) = completed_since(&data.orders, windows.start_of_week)
            .fold((0, 0.0), |(n, sum), o| (n + 1, sum + o.total()));

        Ok(StorePerformance {
            today_orders,
            today_revenue,
            week_revenue,
            total_orders,
        })
    }

    async fn best_selling_products(&self, store_id: &str) -> Result<Vec<BestSeller>, StoreError> {
        let mut ranked: Vec<(u64, ProductRecord)> = self
            .read(store_id)
            .await?
            .products
            .into_iter()
            .filter_map(|p| Some((p.sales_count?, p)))
            .collect();
        ranked.sort_by(|(a, _), (b, _)| b.cmp(a));

        Ok(ranked
            .into_iter()
            .take(self.limits.best_sellers)
            .map(|(sales, p)| BestSeller {
                name: p.name(),
                id: p.id,
                sales,
                revenue: p.revenue.unwrap_or(0.0),
            })
            .collect())
    }

    async fn low_stock_products(&self, store_id: &str) -> Result<Vec<LowStockItem>, StoreError> {
        let threshold = self.limits.low_stock_threshold;
        let products = self.read(store_id).await?.products;

        Ok(products
            .into_iter()
            .filter_map(|p| {
                let stock = p.stock.filter(|s| *s <= threshold)?;
                Some(LowStockItem {
                    name: p.name(),
                    id: p.id,
                    stock,
                    threshold,
                })
            })
            .collect())
    }

    async fn todays_orders(&self, store_id: &str) -> Result<Vec<OrderSummary>, StoreError> {
        let since = self.windows().start_of_today;
        let mut orders: Vec<OrderRecord> = self
            .read(store_id)
            .await?
            .orders
            .into_iter()
            .filter(|o| o.placed_since(since))
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(orders
            .into_iter()
            .map(|o| OrderSummary {
                customer_name: o.customer_name(),
                status: o.status().to_string(),
                item_count: o.items.as_ref().map_or(0, Vec::len),
                total: o.total(),
                id: o.id,
            })
            .collect())
    }

    async fn recent_customers(&self, store_id: &str) -> Result<Vec<CustomerSummary>, StoreError> {
        let since = self.windows().start_of_week;
        let mut customers: Vec<CustomerRecord> = self
            .read(store_id)
            .await?
            .customers
            .into_iter()
            .filter(|c| c.first_seen.is_some_and(|at| at >= since))
            .collect();
        customers.sort_by(|a, b| b.first_seen.cmp(&a.first_seen));

        Ok(customers
            .into_iter()
            .take(self.limits.recent_customers)
            .map(|c| CustomerSummary {
                id: c.id,
                name: c.name.unwrap_or_else(|| "Customer".into()),
                email: c.email.unwrap_or_default(),
                orders: c.order_count.unwrap_or(0),
                total_spent: c.total_spent.unwrap_or(0.0),
            })
            .collect())
    }

    async fn pending_orders(&self, store_id: &str) -> Result<Vec<PendingOrder>, StoreError> {
        let mut orders: Vec<OrderRecord> = self
            .read(store_id)
            .await?
            .orders
            .into_iter()
            .filter(|o| o.status() == "pending")
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        // Pending orders are listed by placement time; undated ones are skipped.
        Ok(orders
            .into_iter()
            .filter_map(|o| {
                Some(PendingOrder {
                    customer_name: o.customer_name(),
                    total: o.total(),
                    created_at: o.created_at?,
                    id: o.id,
                })
            })
            .collect())
    }

    async fn sales_data(
        &self,
        store_id: &str,
        period: SalesPeriod,
    ) -> Result<Vec<SaleRecord>, StoreError> {
        let since = self.windows().start_of(period);
        let data = self.read(store_id).await?;

        Ok(completed_since(&data.orders, since)
            .filter_map(|o| {
                Some(SaleRecord {
                    id: o.id.clone(),
                    total: o.total(),
                    created_at: o.created_at?,
                })
            })
            .collect())
    }
}
