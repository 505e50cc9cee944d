//! Predefined store-command responses.
//!
//! Each data intent runs one live query against the store collaborator and
//! formats a canned summary. Query failures degrade to the query's empty
//! result; the handler always returns a reply.

use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::intent::{Intent, IntentDetector};
use super::reply::Reply;
use crate::store::{StoreData, StoreError};

const PRODUCTS_PAGE: &str = "/dashboard/products";
const ORDERS_PAGE: &str = "/dashboard/orders";

/// Answers store commands from live store data.
pub struct StoreCommandHandler {
    store: Arc<dyn StoreData>,
}

impl StoreCommandHandler {
    pub fn new(store: Arc<dyn StoreData>) -> Self {
        Self { store }
    }

    /// Answer a store command.
    ///
    /// Without an explicit `intent` the input is classified again; inputs
    /// that still have no data intent fall through to substring matching.
    pub async fn handle(
        &self,
        input: &str,
        first_name: &str,
        store_id: &str,
        intent: Option<Intent>,
    ) -> Reply {
        let intent = intent.unwrap_or_else(|| IntentDetector::detect(input));
        debug!(intent = intent.as_str(), store_id, "Handling store command");

        let reply = match intent {
            Intent::Performance => self.performance(store_id).await,
            Intent::BestSellers => self.best_sellers(store_id).await,
            Intent::Inventory => self.low_stock(store_id).await,
            Intent::Orders => self.todays_orders(store_id).await,
            Intent::Customers => self.recent_customers(store_id).await,
            _ => self.fallback(&input.to_lowercase(), first_name, store_id).await,
        };

        info!(intent = intent.as_str(), store_id, "Store command answered");
        reply
    }

    async fn performance(&self, store_id: &str) -> Reply {
        let perf = soft(self.store.store_performance(store_id).await, "store_performance");
        Reply::message(
            format!(
                "📊 Your store performance:\n\n\
                 • Today's Orders: {}\n\
                 • Today's Revenue: {}\n\
                 • Weekly Revenue: {}",
                perf.today_orders,
                naira(perf.today_revenue),
                naira(perf.week_revenue),
            ),
            &["Best sellers", "Today orders", "Low stock", "Help"],
        )
    }

    async fn best_sellers(&self, store_id: &str) -> Reply {
        let products = soft(self.store.best_selling_products(store_id).await, "best_selling_products");
        if products.is_empty() {
            return Reply::message(
                "No sales data yet. Start adding products and making sales!",
                &["Add product", "Store performance", "Today orders"],
            );
        }

        let list = bullets(products.iter().map(|p| format!("{}: {} sold", p.name, p.sales)));
        Reply::message(
            format!("🏆 Your best-selling products:\n\n{list}"),
            &["Add product", "View inventory", "Store analytics"],
        )
    }

    async fn low_stock(&self, store_id: &str) -> Reply {
        let products = soft(self.store.low_stock_products(store_id).await, "low_stock_products");
        if products.is_empty() {
            return Reply::message(
                "✅ All products are well stocked!",
                &["Add product", "Best sellers", "Store analytics"],
            );
        }

        let list = bullets(products.iter().map(|p| format!("{}: {} left", p.name, p.stock)));
        Reply::message(
            format!("⚠️ Low stock alerts:\n\n{list}"),
            &["Add product", "View inventory", "Store analytics"],
        )
    }

    async fn todays_orders(&self, store_id: &str) -> Reply {
        let orders = soft(self.store.todays_orders(store_id).await, "todays_orders");
        if orders.is_empty() {
            return Reply::message(
                "No orders today yet. Let's promote your store!",
                &["Add product", "Store performance", "Best sellers"],
            );
        }

        let list = bullets(
            orders
                .iter()
                .map(|o| format!("Order #{}: {}", short_id(&o.id), naira(o.total))),
        );
        Reply::message(
            format!("📦 Today's orders ({}):\n\n{list}", orders.len()),
            &["Store performance", "Best sellers", "Low stock"],
        )
    }

    async fn recent_customers(&self, store_id: &str) -> Reply {
        let customers = soft(self.store.recent_customers(store_id).await, "recent_customers");
        if customers.is_empty() {
            return Reply::message(
                "No recent customers yet. Your first customer is on the way!",
                &["Add product", "Store performance", "Best sellers"],
            );
        }

        let list = bullets(customers.iter().map(|c| format!("{}: {} orders", c.name, c.orders)));
        Reply::message(
            format!("👥 Recent customers:\n\n{list}"),
            &["Store performance", "Best sellers", "Today orders"],
        )
    }

    async fn pending_orders(&self, store_id: &str) -> Reply {
        let orders = soft(self.store.pending_orders(store_id).await, "pending_orders");
        if orders.is_empty() {
            return Reply::message(
                "No pending orders. Everything has been handled!",
                &["Add product", "Today orders", "Store performance"],
            );
        }

        let list = bullets(orders.iter().map(|o| {
            format!("Order #{} from {}: {}", short_id(&o.id), o.customer_name, naira(o.total))
        }));
        Reply::message(
            format!("⏳ Pending orders ({}):\n\n{list}", orders.len()),
            &["Today orders", "Recent customers", "Help"],
        )
    }

    /// Substring matching for commands without a data intent.
    async fn fallback(&self, command: &str, first_name: &str, store_id: &str) -> Reply {
        debug!(user = first_name, "Using substring fallback");

        if command.contains("add product") {
            return Reply::navigate(
                "I'll help you add a new product! Let me take you to the products page.",
                PRODUCTS_PAGE,
                &["Best sellers", "Low stock", "Store analytics", "Back to main"],
            );
        }

        if command.contains("show products") || command.contains("view products") {
            return Reply::navigate(
                "Here are your current products. Taking you to the products page.",
                PRODUCTS_PAGE,
                &["Add product", "Best sellers", "Low stock", "Back to main"],
            );
        }

        if command.contains("pending orders") || command.contains("orders pending") {
            return self.pending_orders(store_id).await;
        }

        if command.contains("view orders") || command.contains("see orders") {
            return Reply::navigate(
                "Taking you to your orders page.",
                ORDERS_PAGE,
                &["Today orders", "Pending orders", "Recent customers", "Back to main"],
            );
        }

        Reply::message(
            "I can help you with store analytics, products, orders, and customers. \
             Try \"How's business today?\" or \"What's selling well?\"",
            &["Store performance", "Best sellers", "Today orders", "Low stock"],
        )
    }
}

/// Downgrade a failed query to its empty result.
fn soft<T: Default>(result: Result<T, StoreError>, query: &str) -> T {
    result.unwrap_or_else(|e| {
        warn!(query, error = %e, "Store query failed, using empty result");
        T::default()
    })
}

fn bullets(lines: impl Iterator<Item = String>) -> String {
    lines.map(|line| format!("• {line}")).collect::<Vec<_>>().join("\n")
}

/// Render an amount in naira, e.g. `₦15000` or `₦1250.5`.
pub fn naira(amount: impl Display) -> String {
    format!("₦{amount}")
}

/// Last four characters of an order id.
fn short_id(id: &str) -> &str {
    let start = id
        .char_indices()
        .rev()
        .nth(3)
        .map_or(0, |(i, _)| i);
    &id[start..]
}
