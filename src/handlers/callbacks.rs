//! Callback query handlers module
//!
//! Decodes the button payload into an [`ActionToken`]; payloads that do not
//! decode are routed to the machine's "unknown action" reply.

use teloxide::{Bot, types::{CallbackQuery, ChatId}, prelude::*};
use tracing::warn;
use crate::state::{ActionToken, ConversationMachine, Event};
use crate::utils::errors::Result;
use super::dispatch_event;

/// Turn raw callback data into an event, failing closed
pub fn callback_event(data: Option<&str>) -> Event {
    let Some(data) = data else {
        warn!("Callback query without data");
        return Event::UnknownCallback(String::new());
    };

    match ActionToken::decode(data) {
        Ok(token) => Event::Callback(token),
        Err(e) => {
            warn!(error = %e, "Undecodable callback data");
            Event::UnknownCallback(data.to_string())
        }
    }
}

/// Main callback query dispatcher
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    machine: &ConversationMachine,
) -> Result<()> {
    let user_id = query.from.id.0 as i64;
    let chat_id = query
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or(ChatId(user_id));

    // Answer first to remove the loading state on the button
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, callback_id = ?query.id, "Failed to answer callback query");
    }

    let event = callback_event(query.data.as_deref());
    dispatch_event(&bot, chat_id, user_id, event, machine).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_event_decodes_tokens() {
        assert_eq!(
            callback_event(Some("check_word\n9")),
            Event::Callback(ActionToken::CheckWord { id: 9 })
        );
    }

    #[test]
    fn test_callback_event_fails_closed() {
        assert_eq!(
            callback_event(Some("drop table")),
            Event::UnknownCallback("drop table".to_string())
        );
    }

    #[test]
    fn test_callback_without_data_is_unknown() {
        assert_eq!(callback_event(None), Event::UnknownCallback(String::new()));
    }
}
