//! Message handlers module
//!
//! Free text is either a new word to translate or the translation the user
//! was asked for after pressing "Change translation".

use teloxide::{Bot, types::Message};
use tracing::debug;
use crate::state::{ConversationMachine, Event};
use crate::utils::errors::{VocabError, Result};
use super::dispatch_event;

/// Handle incoming text messages
pub async fn handle_message(bot: Bot, msg: Message, machine: &ConversationMachine) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        VocabError::InvalidInput("No user in message".to_string())
    })?;
    let user_id = user.id.0 as i64;

    let Some(text) = msg.text() else {
        debug!(user_id = user_id, "Ignoring non-text message");
        return Ok(());
    };

    dispatch_event(&bot, msg.chat.id, user_id, Event::Text(text.to_string()), machine).await
}
