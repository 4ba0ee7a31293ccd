use super::message::{ChatId, DeleteOutcome, MessageId, OutboundMessage, UserId};
use super::usage::UsageState;
use crate::error::{ExplainError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Per-user trial accounting.
#[async_trait]
pub trait UsageLedger: Send + Sync {
    /// Returns the stored state, creating `{0, false}` on first sight.
    async fn get_or_init(&self, user: UserId) -> Result<UsageState>;
    async fn is_blocked(&self, user: UserId) -> Result<bool>;
    /// Atomically counts one delivered question and returns the new state.
    async fn record_question_served(&self, user: UserId) -> Result<UsageState>;
    async fn set_paid(&self, user: UserId, paid: bool) -> Result<UsageState>;
    async fn snapshot(&self) -> Result<Vec<(UserId, UsageState)>>;
}

/// Produces a natural-language explanation of an exam question.
#[async_trait]
pub trait Explainer: Send + Sync {
    async fn explain(&self, question: &str) -> std::result::Result<String, ExplainError>;
}

/// Outbound side of the chat platform.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, chat: ChatId, message: OutboundMessage) -> Result<()>;
    async fn delete(&self, chat: ChatId, message: MessageId) -> Result<DeleteOutcome>;
}

pub type UsageLedgerBox = Box<dyn UsageLedger>;
pub type ExplainerBox = Box<dyn Explainer>;
pub type ChatTransportRef = Arc<dyn ChatTransport>;
