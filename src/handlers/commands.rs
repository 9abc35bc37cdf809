//! Command handlers
//!
//! `/start` and `/help` greet the user, `/stat` reports word counts, `/quiz`
//! starts the quiz loop and `/cancel` drops a pending translation change.

use teloxide::{Bot, types::Message, utils::command::BotCommands};
use tracing::debug;
use crate::state::{Command, ConversationMachine, Event};
use crate::utils::errors::{VocabError, Result};
use super::dispatch_event;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum BotCommand {
    #[command(description = "Start the bot and show the greeting")]
    Start,
    #[command(description = "Show help information")]
    Help,
    #[command(description = "Show statistics")]
    Stat,
    #[command(description = "Start quiz")]
    Quiz,
    #[command(description = "Cancel a translation change")]
    Cancel,
}

impl From<BotCommand> for Command {
    fn from(command: BotCommand) -> Self {
        match command {
            BotCommand::Start | BotCommand::Help => Command::Help,
            BotCommand::Stat => Command::Stats,
            BotCommand::Quiz => Command::Quiz,
            BotCommand::Cancel => Command::Cancel,
        }
    }
}

/// Main command dispatcher
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: BotCommand,
    machine: &ConversationMachine,
) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        VocabError::InvalidInput("No user in message".to_string())
    })?;
    let user_id = user.id.0 as i64;

    debug!(user_id = user_id, command = ?cmd, "Processing command");
    dispatch_event(&bot, msg.chat.id, user_id, Event::Command(cmd.into()), machine).await
}
