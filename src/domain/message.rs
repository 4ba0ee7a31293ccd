use std::fmt;

/// Platform-assigned identity of the person sending a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub u64);

/// Conversation a message belongs to. Negative for groups on Telegram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    /// Groups and supergroups.
    Group,
    Channel,
}

/// A text message received from the chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub sender: UserId,
    pub chat: ChatId,
    pub message_id: MessageId,
    pub chat_kind: ChatKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    /// Reply keyboard, one inner vec per row.
    Menu(Vec<Vec<String>>),
}

/// A message to be delivered by the chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
    pub markup: Option<Markup>,
    /// Render `text` as Telegram HTML instead of plain text.
    pub rich: bool,
}

impl OutboundMessage {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: None,
            rich: false,
        }
    }

    pub fn rich(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: None,
            rich: true,
        }
    }

    pub fn with_markup(mut self, markup: Markup) -> Self {
        self.markup = Some(markup);
        self
    }
}

/// Result of a delete request that reached the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The bot lacks the rights to remove the message.
    PermissionDenied,
}
