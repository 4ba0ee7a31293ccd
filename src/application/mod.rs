//! Application layer containing the conversation flow.
//!
//! `ConversationRouter` is the entry point for every inbound message. It owns
//! the question dataset and reaches the ledger, the completion service and the
//! chat platform through the ports in `domain::ports`.

pub mod question_store;
pub mod replies;
pub mod router;
pub mod user_locks;
