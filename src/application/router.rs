use super::question_store::QuestionStore;
use super::replies::{self, PaymentDetails};
use super::user_locks::UserLocks;
use crate::domain::message::{
    ChatId, ChatKind, DeleteOutcome, InboundMessage, MessageId, UserId,
};
use crate::domain::ports::{ChatTransportRef, ExplainerBox, UsageLedger, UsageLedgerBox};
use crate::error::{ExplainError, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// What an inbound message asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent<'a> {
    OpenMenu,
    Category(&'a str),
    SetPaid { user: UserId, paid: bool },
    GroupNoise,
    Unhandled,
}

/// Splits `/cmd@bot arg` into `("cmd", Some("arg"))`.
fn parse_command(text: &str) -> Option<(&str, Option<&str>)> {
    let rest = text.strip_prefix('/')?;
    let mut parts = rest.split_whitespace();
    let head = parts.next()?;
    let name = head.split('@').next().unwrap_or(head);
    Some((name, parts.next()))
}

/// Classifies a message. Commands and category picks are only honored in
/// private chats; in groups the sole recognized input is the `start` noise.
pub fn resolve_intent<'a>(msg: &'a InboundMessage, admins: &[UserId]) -> Intent<'a> {
    match msg.chat_kind {
        ChatKind::Private => match parse_command(&msg.text) {
            Some(("start", _)) => Intent::OpenMenu,
            Some((name @ ("grant" | "revoke"), Some(arg))) if admins.contains(&msg.sender) => {
                match arg.parse::<u64>() {
                    Ok(id) => Intent::SetPaid {
                        user: UserId(id),
                        paid: name == "grant",
                    },
                    Err(_) => Intent::Unhandled,
                }
            }
            Some(_) => Intent::Unhandled,
            None => Intent::Category(msg.text.as_str()),
        },
        ChatKind::Group if msg.text.eq_ignore_ascii_case("start") => Intent::GroupNoise,
        ChatKind::Group | ChatKind::Channel => Intent::Unhandled,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Explanation {
    Delivered,
    /// The completion call failed or timed out; a fallback notice was sent.
    Fallback,
}

/// Result of handling one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    MenuShown,
    PaymentRequired,
    UnknownCategory,
    QuestionServed {
        asked_count: u32,
        explanation: Explanation,
    },
    NoiseDeleted,
    NoiseKept,
    PaidStatusChanged {
        user: UserId,
        paid: bool,
    },
    Ignored,
}

#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub explain_timeout: Duration,
    pub payment: PaymentDetails,
    /// Users allowed to run `/grant` and `/revoke`.
    pub admins: Vec<UserId>,
}

/// Turns inbound chat messages into replies.
///
/// Holds no conversational state of its own; per-user state lives in the
/// [`UsageLedger`]. The gate check, question delivery and counter increment
/// for one user run under that user's lock, so concurrent messages from the
/// same user cannot both slip past the limit.
pub struct ConversationRouter {
    questions: Arc<QuestionStore>,
    ledger: UsageLedgerBox,
    explainer: ExplainerBox,
    transport: ChatTransportRef,
    locks: UserLocks,
    settings: RouterSettings,
}

impl ConversationRouter {
    pub fn new(
        questions: Arc<QuestionStore>,
        ledger: UsageLedgerBox,
        explainer: ExplainerBox,
        transport: ChatTransportRef,
        settings: RouterSettings,
    ) -> Self {
        Self {
            questions,
            ledger,
            explainer,
            transport,
            locks: UserLocks::new(),
            settings,
        }
    }

    pub fn ledger(&self) -> &dyn UsageLedger {
        self.ledger.as_ref()
    }

    #[instrument(skip_all, fields(user = %msg.sender, chat = %msg.chat))]
    pub async fn handle(&self, msg: InboundMessage) -> Result<Outcome> {
        let outcome = match resolve_intent(&msg, &self.settings.admins) {
            Intent::OpenMenu => {
                self.transport.send(msg.chat, replies::welcome()).await?;
                Outcome::MenuShown
            }
            Intent::Category(category) => self.serve(msg.sender, msg.chat, category).await?,
            Intent::SetPaid { user, paid } => {
                let state = self.ledger.set_paid(user, paid).await?;
                info!(target_user = %user, paid, asked = state.asked_count, "paid status changed");
                self.transport
                    .send(msg.chat, replies::paid_status_changed(user.0, paid))
                    .await?;
                Outcome::PaidStatusChanged { user, paid }
            }
            Intent::GroupNoise => self.sweep(msg.chat, msg.message_id).await,
            Intent::Unhandled => Outcome::Ignored,
        };
        debug!(?outcome, "message handled");
        Ok(outcome)
    }

    async fn serve(&self, user: UserId, chat: ChatId, category: &str) -> Result<Outcome> {
        let (record, asked_count) = {
            let _guard = self.locks.acquire(user).await;

            self.ledger.get_or_init(user).await?;
            if self.ledger.is_blocked(user).await? {
                info!("free limit reached");
                self.transport
                    .send(chat, replies::payment_prompt(&self.settings.payment))
                    .await?;
                return Ok(Outcome::PaymentRequired);
            }

            let Some(record) = self.questions.lookup(category) else {
                self.transport.send(chat, replies::pick_from_menu()).await?;
                return Ok(Outcome::UnknownCategory);
            };

            // Only a delivered question is counted.
            self.transport.send(chat, replies::question(record)).await?;
            let state = self.ledger.record_question_served(user).await?;
            (record, state.asked_count)
        };
        info!(subject = %record.subject, year = record.year, asked = asked_count, "question served");

        let explanation = self.deliver_explanation(chat, &record.text).await;

        Ok(Outcome::QuestionServed {
            asked_count,
            explanation,
        })
    }

    /// Sends the explanation, or the plain fallback notice when the call or
    /// the send fails. The question is already counted, so nothing here raises.
    async fn deliver_explanation(&self, chat: ChatId, question: &str) -> Explanation {
        match self.explain(question).await {
            Ok(text) => match self.transport.send(chat, replies::explanation(&text)).await {
                Ok(()) => return Explanation::Delivered,
                Err(e) => warn!(error = %e, "explanation could not be sent"),
            },
            Err(e) => warn!(error = %e, "explanation unavailable"),
        }

        if let Err(e) = self
            .transport
            .send(chat, replies::explanation_unavailable())
            .await
        {
            warn!(error = %e, "fallback notice could not be sent");
        }
        Explanation::Fallback
    }

    async fn explain(&self, question: &str) -> std::result::Result<String, ExplainError> {
        let limit = self.settings.explain_timeout;
        tokio::time::timeout(limit, self.explainer.explain(question))
            .await
            .unwrap_or(Err(ExplainError::Timeout(limit)))
    }

    /// Best-effort removal of group noise. Never fails.
    async fn sweep(&self, chat: ChatId, message: MessageId) -> Outcome {
        match self.transport.delete(chat, message).await {
            Ok(DeleteOutcome::Deleted) => Outcome::NoiseDeleted,
            Ok(DeleteOutcome::PermissionDenied) => Outcome::NoiseKept,
            Err(e) => {
                warn!(error = %e, "could not delete group message");
                Outcome::NoiseKept
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(kind: ChatKind, sender: u64, text: &str) -> InboundMessage {
        InboundMessage {
            sender: UserId(sender),
            chat: ChatId(sender as i64),
            message_id: MessageId(1),
            chat_kind: kind,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_private_intents() {
        let admins = [UserId(99)];
        let cases = [
            ("/start", Intent::OpenMenu),
            ("/start@upsc_mentor_bot", Intent::OpenMenu),
            ("/start ref123", Intent::OpenMenu),
            ("Polity", Intent::Category("Polity")),
            ("Astrology", Intent::Category("Astrology")),
            ("/help", Intent::Unhandled),
            ("/grant 5", Intent::Unhandled),
        ];
        for (text, expected) in cases {
            let msg = message(ChatKind::Private, 1, text);
            assert_eq!(resolve_intent(&msg, &admins), expected, "text: {text}");
        }
    }

    #[test]
    fn test_admin_intents() {
        let admins = [UserId(99)];
        let grant = message(ChatKind::Private, 99, "/grant 5");
        assert_eq!(
            resolve_intent(&grant, &admins),
            Intent::SetPaid {
                user: UserId(5),
                paid: true
            }
        );
        let revoke = message(ChatKind::Private, 99, "/revoke 5");
        assert_eq!(
            resolve_intent(&revoke, &admins),
            Intent::SetPaid {
                user: UserId(5),
                paid: false
            }
        );
        let bad = message(ChatKind::Private, 99, "/grant someone");
        assert_eq!(resolve_intent(&bad, &admins), Intent::Unhandled);
        let missing = message(ChatKind::Private, 99, "/grant");
        assert_eq!(resolve_intent(&missing, &admins), Intent::Unhandled);
    }

    #[test]
    fn test_group_intents() {
        for text in ["start", "START", "Start"] {
            let msg = message(ChatKind::Group, 1, text);
            assert_eq!(resolve_intent(&msg, &[]), Intent::GroupNoise);
        }
        for text in ["Polity", "/start", "start now", " start"] {
            let msg = message(ChatKind::Group, 1, text);
            assert_eq!(resolve_intent(&msg, &[]), Intent::Unhandled, "text: {text}");
        }
        let channel = message(ChatKind::Channel, 1, "start");
        assert_eq!(resolve_intent(&channel, &[]), Intent::Unhandled);
    }
}
