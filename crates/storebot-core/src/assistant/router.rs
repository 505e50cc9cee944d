//! Request router: decides who answers a message.
//!
//! Order of checks:
//! 1. A detected [`Intent`] goes to the predefined store-command handler.
//! 2. Small talk goes to the generative backend.
//! 3. Older store-command phrasings still go to the predefined handler,
//!    without an intent, so its substring fallback can answer them.
//! 4. Everything else goes to the generative backend.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

use super::intent::{compile, Intent, IntentDetector};

/// Coarse kind of message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteCategory {
    Command,
    Casual,
    General,
}

/// Which responder produces the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Handler {
    Predefined,
    Groq,
}

/// Routing outcome for one message.
///
/// The handler is derived from the variant, so a predefined handler can
/// only ever be paired with a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// A store command. `intent` is `None` for legacy phrasings.
    Command { intent: Option<Intent> },
    Casual,
    General,
}

impl RouteDecision {
    pub fn category(&self) -> RouteCategory {
        match self {
            Self::Command { .. } => RouteCategory::Command,
            Self::Casual => RouteCategory::Casual,
            Self::General => RouteCategory::General,
        }
    }

    pub fn handler(&self) -> Handler {
        match self {
            Self::Command { .. } => Handler::Predefined,
            Self::Casual | Self::General => Handler::Groq,
        }
    }

    pub fn intent(&self) -> Option<Intent> {
        match self {
            Self::Command { intent } => *intent,
            Self::Casual | Self::General => None,
        }
    }
}

/// Who is asking.
#[derive(Debug, Clone, Default)]
pub struct RouteContext {
    pub first_name: String,
}

impl RouteContext {
    pub fn new(first_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
        }
    }
}

const CASUAL_PATTERNS: &[&str] = &[
    r"^(hi|hello|hey|howdy|sup|yo)",
    r"how are you|hows it going|whats up|how do you do",
    r"good morning|good afternoon|good evening|good night",
    r"thank you|thanks|thx|ty",
    r"you're welcome|no problem|anytime",
    r"how was your day|how's your day",
    r"^(yes|no|yup|nope|maybe)$",
    r"how are things|what's new",
    r"nice to see you|good to see you",
    r"what's happening|whats going on",
    r"how's life|how have you been",
];

/// Phrasings recognised before intent detection existed.
const LEGACY_COMMAND_PATTERNS: &[&str] = &[
    r"how.*store.*doing|store.*performance|store.*analytics|how.*sales|business.*performance",
    r"how are we doing|how's business|sales report|revenue.*today",
    r"best.*selling|top.*products|what.*selling|popular.*products|what's hot",
    r"which products.*popular|our best products|most sold",
    r"low.*stock|running.*out|need.*restock|almost.*out|stock.*alert",
    r"what.*need.*restock|inventory.*low|which.*out of stock",
    r"today.*orders|orders.*today|recent.*orders|new.*orders",
    r"any.*orders.*today|how many.*orders.*today|what.*orders.*today",
    r"recent.*customers|new.*customers|who.*shopping|customer.*activity",
    r"any.*new.*customers|who.*bought.*recently",
    r"pending.*orders|orders.*pending|need.*shipping|unfulfilled",
    r"what.*needs.*shipping|orders.*waiting",
    r"add.*product|create.*product|new.*product",
    r"show.*products|view.*products|see.*products|my products",
    r"orders$|^orders$|view.*orders|see.*orders",
    r"write.*description|generate.*description|help.*description",
    r"product.*description|describe.*product",
    r"help|what can you do|what.*help|how.*you.*help",
];

static CASUAL: LazyLock<Vec<Regex>> =
    LazyLock::new(|| CASUAL_PATTERNS.iter().map(|p| compile(p)).collect());

static LEGACY_COMMANDS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| LEGACY_COMMAND_PATTERNS.iter().map(|p| compile(p)).collect());

/// Stateless router. Pure classification: no I/O, no retries.
pub struct AiRouter;

impl AiRouter {
    pub fn route(input: &str, context: &RouteContext) -> RouteDecision {
        let normalized = input.trim().to_lowercase();

        let intent = IntentDetector::detect(&normalized);
        let decision = if intent != Intent::Unknown {
            RouteDecision::Command {
                intent: Some(intent),
            }
        } else if Self::is_casual(&normalized) {
            RouteDecision::Casual
        } else if Self::is_legacy_command(&normalized) {
            RouteDecision::Command { intent: None }
        } else {
            RouteDecision::General
        };

        debug!(
            user = %context.first_name,
            intent = intent.as_str(),
            category = ?decision.category(),
            handler = ?decision.handler(),
            "Routed message"
        );

        decision
    }

    /// Greetings, thanks and other small talk.
    pub fn is_casual(input: &str) -> bool {
        let input = input.trim();
        CASUAL.iter().any(|p| p.is_match(input))
    }

    pub fn is_legacy_command(input: &str) -> bool {
        LEGACY_COMMANDS.iter().any(|p| p.is_match(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(input: &str) -> RouteDecision {
        AiRouter::route(input, &RouteContext::new("Tunde"))
    }

    #[test]
    fn test_detected_intent_is_predefined_command() {
        let decision = route("How's my store doing?");
        assert_eq!(
            decision,
            RouteDecision::Command {
                intent: Some(Intent::Performance)
            }
        );
        assert_eq!(decision.handler(), Handler::Predefined);
        assert_eq!(decision.category(), RouteCategory::Command);
    }

    #[test]
    fn test_greeting_is_casual() {
        let decision = route("hello");
        assert_eq!(decision, RouteDecision::Casual);
        assert_eq!(decision.category(), RouteCategory::Casual);
        assert_eq!(decision.handler(), Handler::Groq);
    }

    #[test]
    fn test_casual_variants() {
        for input in ["Good morning!", "thanks a lot", "How have you been?", "nope"] {
            assert_eq!(route(input), RouteDecision::Casual, "{input}");
        }
    }

    #[test]
    fn test_legacy_phrasing_has_no_intent() {
        let decision = route("add product");
        assert_eq!(decision, RouteDecision::Command { intent: None });
        assert_eq!(decision.handler(), Handler::Predefined);
        assert_eq!(decision.intent(), None);

        assert_eq!(route("Help"), RouteDecision::Command { intent: None });
        assert_eq!(route("orders"), RouteDecision::Command { intent: None });
    }

    #[test]
    fn test_everything_else_is_general() {
        let decision = route("what is the capital of france");
        assert_eq!(decision, RouteDecision::General);
        assert_eq!(decision.handler(), Handler::Groq);
    }

    #[test]
    fn test_general_never_predefined() {
        let inputs = [
            "hello",
            "low stock",
            "add product",
            "tell me a joke",
            "Back to main",
            "what is the weather",
            "",
            "thanks",
            "show products",
        ];
        for input in inputs {
            let decision = route(input);
            if decision.category() == RouteCategory::General {
                assert_eq!(decision.handler(), Handler::Groq, "{input}");
            }
            if decision.handler() == Handler::Predefined {
                assert_eq!(decision.category(), RouteCategory::Command, "{input}");
            }
        }
    }
}
