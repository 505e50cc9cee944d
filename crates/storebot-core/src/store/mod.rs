//! Read-only store data collaborator.
//!
//! The assistant never owns store data. Every question is answered from a
//! fresh query through [`StoreData`], scoped to one store and to a time
//! window computed at query time by [`TimeWindows`].

pub mod file;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc};
use serde::Serialize;

pub use file::FileStore;

/// Errors raised by a store collaborator.
///
/// The assistant never surfaces these to the user; the command handler
/// downgrades them to empty results.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store data I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store data is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("store not found: {0}")]
    NotFound(String),

    #[error("store data unavailable: {0}")]
    Unavailable(String),
}

/// Aggregates for the performance summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePerformance {
    pub today_orders: usize,
    pub today_revenue: f64,
    pub week_revenue: f64,
    /// Completed orders since the start of the week.
    pub total_orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestSeller {
    pub id: String,
    pub name: String,
    pub sales: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockItem {
    pub id: String,
    pub name: String,
    pub stock: i64,
    pub threshold: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: String,
    pub customer_name: String,
    pub total: f64,
    pub status: String,
    pub item_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub orders: u64,
    pub total_spent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrder {
    pub id: String,
    pub customer_name: String,
    pub total: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub id: String,
    pub total: f64,
    pub created_at: DateTime<Utc>,
}

/// Reporting period for [`StoreData::sales_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SalesPeriod {
    #[default]
    Week,
    Month,
}

/// Query interface over one store's orders, products and customers.
#[async_trait]
pub trait StoreData: Send + Sync {
    async fn store_performance(&self, store_id: &str) -> Result<StorePerformance, StoreError>;

    /// Top products by units sold, best first.
    async fn best_selling_products(&self, store_id: &str) -> Result<Vec<BestSeller>, StoreError>;

    async fn low_stock_products(&self, store_id: &str) -> Result<Vec<LowStockItem>, StoreError>;

    /// Orders placed since local midnight, newest first.
    async fn todays_orders(&self, store_id: &str) -> Result<Vec<OrderSummary>, StoreError>;

    /// Customers first seen this week, newest first.
    async fn recent_customers(&self, store_id: &str) -> Result<Vec<CustomerSummary>, StoreError>;

    async fn pending_orders(&self, store_id: &str) -> Result<Vec<PendingOrder>, StoreError>;

    /// Completed sales since the start of `period`.
    async fn sales_data(
        &self,
        store_id: &str,
        period: SalesPeriod,
    ) -> Result<Vec<SaleRecord>, StoreError>;
}

/// Window boundaries used to scope store queries.
///
/// All three boundaries are local midnights converted to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindows {
    pub start_of_today: DateTime<Utc>,
    /// Midnight of the most recent Sunday (today, if today is Sunday).
    pub start_of_week: DateTime<Utc>,
    pub start_of_month: DateTime<Utc>,
}

impl TimeWindows {
    /// Compute the windows that contain `now`, in `now`'s own time zone.
    pub fn containing<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let week = today
            .checked_sub_days(Days::new(u64::from(today.weekday().num_days_from_sunday())))
            .unwrap_or(today);
        let month = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);

        // A midnight skipped by a DST jump falls back to `now` itself.
        let midnight = |date: NaiveDate| {
            date.and_hms_opt(0, 0, 0)
                .and_then(|naive| tz.from_local_datetime(&naive).earliest())
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| now.with_timezone(&Utc))
        };

        Self {
            start_of_today: midnight(today),
            start_of_week: midnight(week),
            start_of_month: midnight(month),
        }
    }

    pub fn start_of(&self, period: SalesPeriod) -> DateTime<Utc> {
        match period {
            SalesPeriod::Week => self.start_of_week,
            SalesPeriod::Month => self.start_of_month,
        }
    }
}
