//! Intent detection over a static table of compiled patterns.
//!
//! Classifies a store owner's message into one [`Intent`] without calling a
//! text-generation backend. Every intent owns a list of case-insensitive
//! phrase patterns; intents are tried in ascending [`Intent::priority`] and
//! the first intent with any matching pattern wins.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

/// The classified purpose of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    Performance,
    BestSellers,
    Inventory,
    Orders,
    Customers,
    ContentHelp,
    Navigation,
    Help,
    Settings,
    OrderManagement,
    Pricing,
    Marketing,
    CustomerComms,
    Financial,
    Unknown,
}

impl Intent {
    /// Every intent that has patterns, in table order.
    pub const CLASSIFIED: [Intent; 14] = [
        Intent::Performance,
        Intent::BestSellers,
        Intent::Inventory,
        Intent::Orders,
        Intent::Customers,
        Intent::ContentHelp,
        Intent::Navigation,
        Intent::Help,
        Intent::Settings,
        Intent::OrderManagement,
        Intent::Pricing,
        Intent::Marketing,
        Intent::CustomerComms,
        Intent::Financial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Performance => "PERFORMANCE",
            Self::BestSellers => "BEST_SELLERS",
            Self::Inventory => "INVENTORY",
            Self::Orders => "ORDERS",
            Self::Customers => "CUSTOMERS",
            Self::ContentHelp => "CONTENT_HELP",
            Self::Navigation => "NAVIGATION",
            Self::Help => "HELP",
            Self::Settings => "SETTINGS",
            Self::OrderManagement => "ORDER_MANAGEMENT",
            Self::Pricing => "PRICING",
            Self::Marketing => "MARKETING",
            Self::CustomerComms => "CUSTOMER_COMMS",
            Self::Financial => "FINANCIAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Match precedence. Lower ranks are tested first.
    ///
    /// Store-data questions outrank the broad keyword intents so that e.g.
    /// "how are sales today" reports performance instead of marketing.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Performance => 10,
            Self::BestSellers => 20,
            Self::Inventory => 30,
            Self::Orders => 40,
            Self::Customers => 50,
            Self::ContentHelp => 60,
            Self::Navigation => 70,
            Self::Help => 80,
            Self::Settings => 90,
            Self::OrderManagement => 100,
            Self::Pricing => 110,
            Self::Marketing => 120,
            Self::CustomerComms => 130,
            Self::Financial => 140,
            Self::Unknown => u8::MAX,
        }
    }

    fn patterns(&self) -> &'static [&'static str] {
        match self {
            Self::Performance => &[
                r"how.*(store|business|sales|performance)",
                r"(store|business).*(doing|performance|analytics)",
                r"how.*we.*doing|how.*things.*going",
                r"what.*(happening|going on).*store",
                r"(check|see|look).*store",
                r"how.*today.*(sales|business)",
                r"business.*update|sales.*update",
            ],
            Self::BestSellers => &[
                r"what.*selling|best.*selling|top.*product",
                r"(selling|sales).*(well|good|best)",
                r"popular.*products|what.*hot",
                r"which.*products.*popular",
                r"our.*best.*products",
                r"best.*sellers?\b",
            ],
            Self::Inventory => &[
                r"low.*stock|running.*out|running.*low|need.*restock",
                r"stock.*alert|inventory.*low",
                r"what.*need.*restock|almost.*out",
                r"which.*out.*of.*stock",
                r"what.*need.*attention",
                r"which.*product.*attention",
                r"what.*should.*restock",
                r"need.*attention",
                r"product.*attention",
                r"view.*inventory",
            ],
            Self::Orders => &[
                r"today.*orders|orders.*today",
                r"recent.*orders|new.*orders",
                r"any.*orders.*today",
                r"pending.*orders|unfulfilled",
                r"what.*needs.*shipping",
            ],
            Self::Customers => &[
                r"recent.*customers|new.*customers",
                r"who.*shopping|customer.*activity",
                r"who.*bought.*recently",
            ],
            Self::ContentHelp => &[
                r"write.*description|generate.*description",
                r"help.*description|product.*description",
                r"describe.*product|create.*description",
                r"need.*description.*for",
            ],
            Self::Navigation => &[
                r"go.*to.*(products|orders|customers|analytics)",
                r"show.*me.*(products|orders|customers)",
                r"take.*me.*to.*(products|orders)",
                r"open.*(products|orders|customers)",
                r"where.*(products|orders|customers)",
            ],
            Self::Help => &[
                r"what.*can.*you.*do",
                r"how.*can.*you.*help",
                r"what.*commands",
                r"show.*commands",
                r"help.*menu",
            ],
            Self::Settings => &[
                r"change.*(store|whatsapp|number|name)",
                r"update.*(store|whatsapp|profile)",
                r"edit.*(store|settings)",
                r"my.*settings",
                r"store.*settings",
            ],
            Self::OrderManagement => &[
                r"mark.*shipped|ship.*order",
                r"update.*order.*status",
                r"order.*shipped|shipped.*order",
                r"fulfill.*order",
                r"complete.*order",
            ],
            Self::Pricing => &[
                r"update.*price|change.*price",
                r"set.*price|price.*to",
                r"how.*much.*charge",
                r"pricing.*suggest",
                r"adjust.*price",
            ],
            Self::Marketing => &[
                r"create.*sale|run.*promotion",
                r"discount|promotion|sale",
                r"marketing|campaign",
                r"boost.*sales",
                r"flash.*sale",
            ],
            Self::CustomerComms => &[
                r"message.*customer|contact.*customer",
                r"send.*message.*to",
                r"notify.*customer",
                r"email.*customer",
                r"whatsapp.*customer",
            ],
            Self::Financial => &[
                r"revenue|profit|earnings",
                r"how.*much.*made|how.*much.*earned",
                r"total.*sales|income",
                r"money.*made",
                r"financial.*report",
            ],
            Self::Unknown => &[],
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the classification table.
pub struct IntentRule {
    pub intent: Intent,
    pub patterns: Vec<Regex>,
}

impl IntentRule {
    fn matches(&self, input: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(input))
    }
}

/// Compiled table, ordered by `(priority, declaration index)`.
static RULES: LazyLock<Vec<IntentRule>> = LazyLock::new(|| {
    let mut rules: Vec<(usize, IntentRule)> = Intent::CLASSIFIED
        .iter()
        .enumerate()
        .map(|(index, intent)| {
            let patterns = intent
                .patterns()
                .iter()
                .map(|p| compile(p))
                .collect();
            (
                index,
                IntentRule {
                    intent: *intent,
                    patterns,
                },
            )
        })
        .collect();
    rules.sort_by_key(|(index, rule)| (rule.intent.priority(), *index));
    rules.into_iter().map(|(_, rule)| rule).collect()
});

/// Compile a case-insensitive pattern from one of the static tables.
pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("static intent pattern must compile")
}

/// Stateless intent classifier.
pub struct IntentDetector;

impl IntentDetector {
    /// Classify a message. Never fails: unmatched input is [`Intent::Unknown`].
    pub fn detect(input: &str) -> Intent {
        let normalized = input.trim().to_lowercase();

        let intent = RULES
            .iter()
            .find(|rule| rule.matches(&normalized))
            .map_or(Intent::Unknown, |rule| rule.intent);

        debug!(intent = intent.as_str(), "Intent detector classified message");
        intent
    }

    /// The compiled table in the order it is evaluated.
    pub fn rules() -> &'static [IntentRule] {
        &RULES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_data_intents() {
        assert_eq!(IntentDetector::detect("How's my store doing?"), Intent::Performance);
        assert_eq!(IntentDetector::detect("What's selling well?"), Intent::BestSellers);
        assert_eq!(IntentDetector::detect("what's low on stock"), Intent::Inventory);
        assert_eq!(IntentDetector::detect("Any orders today?"), Intent::Orders);
        assert_eq!(IntentDetector::detect("Who bought recently?"), Intent::Customers);
    }

    #[test]
    fn test_action_intents() {
        assert_eq!(
            IntentDetector::detect("Write a description for my sneakers"),
            Intent::ContentHelp
        );
        assert_eq!(IntentDetector::detect("take me to orders"), Intent::Navigation);
        assert_eq!(IntentDetector::detect("What can you do?"), Intent::Help);
        assert_eq!(IntentDetector::detect("change my whatsapp number"), Intent::Settings);
        assert_eq!(IntentDetector::detect("mark order 12 as shipped"), Intent::OrderManagement);
        assert_eq!(IntentDetector::detect("adjust the price of rice"), Intent::Pricing);
        assert_eq!(IntentDetector::detect("start a flash campaign"), Intent::Marketing);
        assert_eq!(IntentDetector::detect("email customer about delay"), Intent::CustomerComms);
        assert_eq!(IntentDetector::detect("what's our total revenue"), Intent::Financial);
    }

    #[test]
    fn test_unmatched_is_unknown() {
        assert_eq!(IntentDetector::detect("hello"), Intent::Unknown);
        assert_eq!(IntentDetector::detect("tell me a joke"), Intent::Unknown);
        assert_eq!(IntentDetector::detect("   "), Intent::Unknown);
    }

    #[test]
    fn test_normalizes_case_and_whitespace() {
        assert_eq!(IntentDetector::detect("   LOW STOCK   "), Intent::Inventory);
    }

    #[test]
    fn test_quick_reply_chips_classify() {
        assert_eq!(IntentDetector::detect("Best sellers"), Intent::BestSellers);
        assert_eq!(IntentDetector::detect("View inventory"), Intent::Inventory);
        assert_eq!(IntentDetector::detect("Low stock"), Intent::Inventory);
        assert_eq!(IntentDetector::detect("Today orders"), Intent::Orders);
        assert_eq!(IntentDetector::detect("Store performance"), Intent::Performance);
        assert_eq!(IntentDetector::detect("Recent customers"), Intent::Customers);
    }

    #[test]
    fn test_overlapping_patterns_resolve_by_priority() {
        // Matches PERFORMANCE ("how ... sales") and BEST_SELLERS ("selling best").
        assert_eq!(
            IntentDetector::detect("how are sales, what's selling best"),
            Intent::Performance
        );
        // Matches MARKETING ("sale") and FINANCIAL ("total sales").
        assert_eq!(IntentDetector::detect("total sales this week"), Intent::Marketing);
        // Matches INVENTORY ("need attention") and ORDERS ("pending orders").
        assert_eq!(
            IntentDetector::detect("pending orders need attention"),
            Intent::Inventory
        );
    }

    #[test]
    fn test_table_order_is_priority_order() {
        let order: Vec<Intent> = IntentDetector::rules().iter().map(|r| r.intent).collect();
        assert_eq!(order, Intent::CLASSIFIED);

        let priorities: Vec<u8> = order.iter().map(Intent::priority).collect();
        assert!(priorities.windows(2).all(|w| w[0] < w[1]));
        assert!(!order.contains(&Intent::Unknown));
    }

    #[test]
    fn test_every_rule_has_patterns() {
        for rule in IntentDetector::rules() {
            assert!(!rule.patterns.is_empty(), "{} has no patterns", rule.intent);
        }
    }
}
