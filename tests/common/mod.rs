#![allow(dead_code)]

use async_trait::async_trait;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use upsc_mentor::application::question_store::QuestionStore;
use upsc_mentor::application::replies::PaymentDetails;
use upsc_mentor::application::router::{ConversationRouter, RouterSettings};
use upsc_mentor::domain::message::{
    ChatId, ChatKind, DeleteOutcome, InboundMessage, MessageId, OutboundMessage, UserId,
};
use upsc_mentor::domain::ports::{ChatTransport, Explainer};
use upsc_mentor::error::{ExplainError, MentorError, Result};
use upsc_mentor::infrastructure::in_memory::InMemoryUsageLedger;

pub const ADMIN: UserId = UserId(1000);

/// Records everything the router sends.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<(ChatId, OutboundMessage)>>,
    pub deleted: Mutex<Vec<(ChatId, MessageId)>>,
    pub delete_result: Mutex<Option<DeleteOutcome>>,
    /// When set, the n-th `send` call (0-based) fails.
    pub fail_send_at: Mutex<Option<usize>>,
    send_calls: AtomicUsize,
}

impl RecordingTransport {
    pub fn texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, msg)| msg.text.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send(&self, chat: ChatId, message: OutboundMessage) -> Result<()> {
        let call = self.send_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_send_at.lock().unwrap() == Some(call) {
            return Err(MentorError::TransportError("send failed".into()));
        }
        self.sent.lock().unwrap().push((chat, message));
        Ok(())
    }

    async fn delete(&self, chat: ChatId, message: MessageId) -> Result<DeleteOutcome> {
        self.deleted.lock().unwrap().push((chat, message));
        match *self.delete_result.lock().unwrap() {
            Some(outcome) => Ok(outcome),
            None => Err(MentorError::TransportError("network down".into())),
        }
    }
}

/// How the scripted explainer answers.
#[derive(Clone)]
pub enum Script {
    Answer(&'static str),
    Fail,
    Hang,
}

pub struct ScriptedExplainer {
    pub script: Script,
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Explainer for ScriptedExplainer {
    async fn explain(&self, question: &str) -> std::result::Result<String, ExplainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Answer(prefix) => Ok(format!("{prefix} {question}")),
            Script::Fail => Err(ExplainError::RateLimit),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok("too late".to_string())
            }
        }
    }
}

pub struct Harness {
    pub router: ConversationRouter,
    pub transport: Arc<RecordingTransport>,
    pub ledger: InMemoryUsageLedger,
    pub explain_calls: Arc<AtomicUsize>,
}

pub fn fixture_store() -> QuestionStore {
    QuestionStore::from_csv("tests/fixtures/questions.csv").expect("fixture dataset loads")
}

pub fn harness(script: Script) -> Harness {
    let transport = Arc::new(RecordingTransport::default());
    *transport.delete_result.lock().unwrap() = Some(DeleteOutcome::Deleted);
    let ledger = InMemoryUsageLedger::new();
    let explain_calls = Arc::new(AtomicUsize::new(0));

    let router = ConversationRouter::new(
        Arc::new(fixture_store()),
        Box::new(ledger.clone()),
        Box::new(ScriptedExplainer {
            script,
            calls: Arc::clone(&explain_calls),
        }),
        transport.clone(),
        RouterSettings {
            explain_timeout: Duration::from_millis(200),
            payment: PaymentDetails {
                payee_id: "mentor@upi".into(),
                amount: dec!(49),
            },
            admins: vec![ADMIN],
        },
    );

    Harness {
        router,
        transport,
        ledger,
        explain_calls,
    }
}

pub fn private(user: u64, text: &str) -> InboundMessage {
    InboundMessage {
        sender: UserId(user),
        chat: ChatId(user as i64),
        message_id: MessageId(1),
        chat_kind: ChatKind::Private,
        text: text.to_string(),
    }
}

pub fn group(user: u64, text: &str) -> InboundMessage {
    InboundMessage {
        sender: UserId(user),
        chat: ChatId(-100),
        message_id: MessageId(42),
        chat_kind: ChatKind::Group,
        text: text.to_string(),
    }
}
