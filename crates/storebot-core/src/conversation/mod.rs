//! Conversation history with single-flight turns.
//!
//! A conversation holds at most one turn in flight. Submitting a new message
//! cancels the pending one, so a slow backend reply can never land after a
//! newer message.

use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::assistant::{Assistant, AssistantMessage, Reply};

const NEW_STORE_CHIPS: &[&str] = &["Store performance", "Add products", "Today orders", "Help"];
const RETURNING_CHIPS: &[&str] = &["Store performance", "Best sellers", "Today orders", "Low stock"];

struct InFlight {
    turn: u64,
    cancel: CancellationToken,
}

#[derive(Default)]
struct Slot {
    next_turn: u64,
    current: Option<InFlight>,
}

/// One user's chat with the assistant.
pub struct Conversation {
    assistant: Arc<Assistant>,
    messages: Mutex<Vec<AssistantMessage>>,
    slot: Mutex<Slot>,
}

impl Conversation {
    pub fn new(assistant: Arc<Assistant>) -> Self {
        Self {
            assistant,
            messages: Mutex::new(Vec::new()),
            slot: Mutex::new(Slot::default()),
        }
    }

    /// Start a conversation that opens with an assistant welcome.
    ///
    /// A store that just went live is pointed at adding products; otherwise
    /// the chips lead straight to the daily numbers.
    pub fn with_greeting(assistant: Arc<Assistant>, first_name: &str, new_store: bool) -> Self {
        let greeting = if new_store {
            Reply::message(
                format!("Hi {first_name}! 🎉 Your store is live now. I'm your AI assistant to help you grow."),
                NEW_STORE_CHIPS,
            )
        } else {
            Reply::message(
                format!("Hey {first_name}! 👋 Ready to grow your store today?"),
                RETURNING_CHIPS,
            )
        };

        let conversation = Self::new(assistant);
        lock(&conversation.messages).push(AssistantMessage::ai(greeting));
        conversation
    }

    /// Record `input` and answer it.
    ///
    /// Returns `None` when a later submission superseded this one; in that
    /// case no reply is appended.
    pub async fn submit(
        &self,
        input: &str,
        first_name: &str,
        store_id: &str,
    ) -> Option<AssistantMessage> {
        let (turn, cancel) = {
            let mut slot = lock(&self.slot);
            if let Some(previous) = slot.current.take() {
                debug!(turn = previous.turn, "Cancelling superseded turn");
                previous.cancel.cancel();
            }
            slot.next_turn += 1;
            let turn = slot.next_turn;
            let cancel = CancellationToken::new();
            slot.current = Some(InFlight {
                turn,
                cancel: cancel.clone(),
            });
            lock(&self.messages).push(AssistantMessage::user(input));
            (turn, cancel)
        };

        let reply = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            reply = self.assistant.process(input, first_name, store_id) => Some(reply),
        };

        let mut slot = lock(&self.slot);
        let Some(reply) = reply.filter(|_| !cancel.is_cancelled()) else {
            info!(turn, "Turn superseded, reply dropped");
            return None;
        };

        if slot.current.as_ref().is_some_and(|c| c.turn == turn) {
            slot.current = None;
        }
        lock(&self.messages).push(reply.clone());
        Some(reply)
    }

    /// Cancel the in-flight turn, if any.
    pub fn cancel(&self) {
        if let Some(current) = lock(&self.slot).current.take() {
            current.cancel.cancel();
        }
    }

    /// Snapshot of the history, oldest first.
    pub fn messages(&self) -> Vec<AssistantMessage> {
        lock(&self.messages).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.messages).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop the history and any in-flight turn.
    pub fn clear(&self) {
        self.cancel();
        lock(&self.messages).clear();
    }
}

// A poisoned lock only means another turn panicked mid-push; the history is
// still a valid Vec.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
