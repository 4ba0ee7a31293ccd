//! Telegram adapter: outbound transport plus the long-polling receive loop.

use crate::application::router::ConversationRouter;
use crate::domain::message::{
    ChatId, ChatKind, DeleteOutcome, InboundMessage, Markup, MessageId, OutboundMessage, UserId,
};
use crate::domain::ports::ChatTransport;
use crate::error::{MentorError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{self as tg, KeyboardButton, KeyboardMarkup, ParseMode};
use teloxide::{ApiError, RequestError};

/// Sends and deletes messages through the Bot API.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn keyboard(rows: &[Vec<String>]) -> KeyboardMarkup {
    KeyboardMarkup::new(
        rows.iter()
            .map(|row| row.iter().map(KeyboardButton::new).collect::<Vec<_>>()),
    )
    .resize_keyboard()
}

fn is_permission_error(err: &RequestError) -> bool {
    match err {
        RequestError::Api(ApiError::MessageCantBeDeleted) => true,
        RequestError::Api(ApiError::Unknown(text)) => {
            text.contains("not enough rights") || text.contains("can't be deleted")
        }
        _ => false,
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send(&self, chat: ChatId, message: OutboundMessage) -> Result<()> {
        let mut request = self.bot.send_message(tg::ChatId(chat.0), message.text);
        if message.rich {
            request = request.parse_mode(ParseMode::Html);
        }
        if let Some(Markup::Menu(rows)) = &message.markup {
            request = request.reply_markup(keyboard(rows));
        }
        request
            .await
            .map_err(|e| MentorError::TransportError(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, chat: ChatId, message: MessageId) -> Result<DeleteOutcome> {
        match self
            .bot
            .delete_message(tg::ChatId(chat.0), tg::MessageId(message.0))
            .await
        {
            Ok(_) => Ok(DeleteOutcome::Deleted),
            Err(e) if is_permission_error(&e) => Ok(DeleteOutcome::PermissionDenied),
            Err(e) => Err(MentorError::TransportError(e.to_string())),
        }
    }
}

/// Maps a Telegram message to the router's input. Non-text messages and
/// messages without a sender are dropped.
pub fn inbound_from(msg: &Message) -> Option<InboundMessage> {
    let text = msg.text()?;
    let sender = msg.from.as_ref()?;
    let chat_kind = if msg.chat.is_private() {
        ChatKind::Private
    } else if msg.chat.is_group() || msg.chat.is_supergroup() {
        ChatKind::Group
    } else {
        ChatKind::Channel
    };

    Some(InboundMessage {
        sender: UserId(sender.id.0),
        chat: ChatId(msg.chat.id.0),
        message_id: MessageId(msg.id.0),
        chat_kind,
        text: text.to_owned(),
    })
}

async fn on_message(msg: Message, router: Arc<ConversationRouter>) -> Result<()> {
    let Some(inbound) = inbound_from(&msg) else {
        return Ok(());
    };
    router.handle(inbound).await.map(drop)
}

/// Polls for updates until interrupted with Ctrl-C.
///
/// Updates from one chat are handled in order; different chats run
/// concurrently.
pub async fn run_polling(bot: Bot, router: Arc<ConversationRouter>) {
    let handler = Update::filter_message().endpoint(on_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![router])
        .default_handler(|_| async {})
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error from the message handler",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
