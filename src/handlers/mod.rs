//! Bot handlers module
//!
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for bot commands
//! - Callback handlers for inline keyboard interactions
//! - Message handlers for free text
//!
//! Every handler turns its update into an [`Event`] and passes it to
//! [`dispatch_event`], which runs the conversation machine and sends the
//! single reply.

pub mod commands;
pub mod callbacks;
pub mod messages;

use teloxide::{
    Bot,
    prelude::*,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, ParseMode},
};
use tracing::Instrument;
use crate::middleware::EventTracker;
use crate::state::{ConversationMachine, Event, Reply, error_reply};
use crate::utils::errors::Result;

// Re-export commonly used handler functions
pub use commands::{BotCommand, handle_command};
pub use callbacks::handle_callback_query;
pub use messages::handle_message;

/// Run one event through the conversation machine and send its reply
pub async fn dispatch_event(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    event: Event,
    machine: &ConversationMachine,
) -> Result<()> {
    let tracker = EventTracker::start(user_id, event.kind());

    let reply = match machine
        .handle(user_id, event)
        .instrument(tracker.span().clone())
        .await
    {
        Ok(reply) => {
            tracker.succeeded();
            reply
        }
        Err(e) => {
            tracker.failed(&e);
            error_reply(&e)
        }
    };

    send_reply(bot, chat_id, &reply).await
}

/// Send a reply with HTML formatting and its inline keyboard, if any
pub async fn send_reply(bot: &Bot, chat_id: ChatId, reply: &Reply) -> Result<()> {
    let mut request = bot
        .send_message(chat_id, reply.text.clone())
        .parse_mode(ParseMode::Html);

    if let Some(keyboard) = render_keyboard(reply) {
        request = request.reply_markup(keyboard);
    }

    request.await?;
    Ok(())
}

/// Build the Telegram inline keyboard for a reply
pub fn render_keyboard(reply: &Reply) -> Option<InlineKeyboardMarkup> {
    if reply.keyboard.is_empty() {
        return None;
    }

    let rows = reply
        .keyboard
        .iter()
        .map(|row| {
            row.iter()
                .map(|button| InlineKeyboardButton::callback(button.label.clone(), button.token.encode()))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    Some(InlineKeyboardMarkup::new(rows))
}
