//! Conversation state machine
//!
//! Interprets every inbound event of a user and decides the single reply to
//! send back. Per user the conversation moves through
//!
//! ```text
//! Idle -> AwaitingTranslation -> Idle                      (change translation)
//! Idle -> AwaitingCheck -> AwaitingGrade -> AwaitingCheck  (quiz loop)
//!                                       \-> OfferingRetire -> AwaitingCheck
//! ```
//!
//! Only `AwaitingTranslation` is stored (in a [`PendingStore`]). Every other
//! state is carried by the [`ActionToken`] of the button the user presses.

use std::sync::Arc;
use tracing::{debug, info, warn};
use crate::database::WordStore;
use crate::models::{Word, WordId};
use crate::services::Translator;
use crate::state::pending::PendingStore;
use crate::state::token::ActionToken;
use crate::utils::errors::{LookupError, VocabError, Result};
use crate::utils::helpers::{bold, escape_html, normalize_word};
use crate::utils::logging::log_user_action;

/// Commands a user can send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Stats,
    Quiz,
    Cancel,
}

/// Inbound event, already separated by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Command(Command),
    Text(String),
    Callback(ActionToken),
    /// Callback data that does not decode into an [`ActionToken`]
    UnknownCallback(String),
}

impl Event {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Command(Command::Help) => "command:help",
            Event::Command(Command::Stats) => "command:stat",
            Event::Command(Command::Quiz) => "command:quiz",
            Event::Command(Command::Cancel) => "command:cancel",
            Event::Text(_) => "text",
            Event::Callback(token) => token.tag(),
            Event::UnknownCallback(_) => "unknown_callback",
        }
    }
}

/// Inline keyboard button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub token: ActionToken,
}

impl Button {
    pub fn new(label: impl Into<String>, token: ActionToken) -> Self {
        Self { label: label.into(), token }
    }
}

/// Outbound message: HTML text plus optional rows of buttons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Vec<Vec<Button>>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), keyboard: Vec::new() }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Vec<Vec<Button>>) -> Self {
        Self { text: text.into(), keyboard }
    }

    /// All tokens in the reply, row by row
    pub fn tokens(&self) -> impl Iterator<Item = &ActionToken> {
        self.keyboard.iter().flatten().map(|button| &button.token)
    }
}

pub const HELP_TEXT: &str = "Hello! This is a bot for learning English words.🤯\n\
    Write any word to translate it and add to your dictionary.📝\n\n\
    /quiz - Start quiz\n\
    /stat - Show statistics\n\
    /cancel - Cancel a translation change";
pub const NO_WORDS_TEXT: &str = "You have no words😭";
pub const UNKNOWN_ACTION_TEXT: &str = "Unknown command 😔";
pub const GENERIC_ERROR_TEXT: &str = "Something went wrong 😔 Please try again.";
pub const LOOKUP_FAILED_TEXT: &str = "Couldn't translate this word right now 😔 Please try again later.";

/// The per-user conversation logic
pub struct ConversationMachine {
    words: Arc<dyn WordStore>,
    translator: Arc<dyn Translator>,
    pending: Arc<dyn PendingStore>,
}

impl ConversationMachine {
    pub fn new(
        words: Arc<dyn WordStore>,
        translator: Arc<dyn Translator>,
        pending: Arc<dyn PendingStore>,
    ) -> Self {
        Self { words, translator, pending }
    }

    /// Handle an event and produce the reply, or the error that ended the flow
    pub async fn handle(&self, user_id: i64, event: Event) -> Result<Reply> {
        match event {
            Event::Command(command) => self.handle_command(user_id, command).await,
            Event::Text(text) => self.handle_text(user_id, &text).await,
            Event::Callback(token) => self.handle_callback(user_id, token).await,
            Event::UnknownCallback(data) => Err(VocabError::MalformedToken(data)),
        }
    }

    /// Like [`handle`](Self::handle), but turns failures into their reply
    pub async fn respond(&self, user_id: i64, event: Event) -> Reply {
        match self.handle(user_id, event).await {
            Ok(reply) => reply,
            Err(e) => error_reply(&e),
        }
    }

    async fn handle_command(&self, user_id: i64, command: Command) -> Result<Reply> {
        match command {
            Command::Help => Ok(Reply::text(HELP_TEXT)),
            Command::Stats => {
                let counts = self.words.count_words(user_id).await?;
                Ok(Reply::text(format!(
                    "Total words📚: {}\nLearning words🧠: {}",
                    counts.total, counts.visible
                )))
            }
            Command::Quiz => self.start_quiz(user_id).await,
            Command::Cancel => {
                if self.pending.clear(user_id).await? {
                    Ok(Reply::text("Translation change cancelled."))
                } else {
                    Ok(Reply::text("Nothing to cancel."))
                }
            }
        }
    }

    /// Free text is either the answer to a pending translation change or a
    /// new word to translate
    async fn handle_text(&self, user_id: i64, text: &str) -> Result<Reply> {
        // Taken before validating the text: any message consumes the slot
        if let Some(source) = self.pending.take(user_id).await? {
            debug!(user_id = user_id, source = %source, "Consumed pending translation");
            let target = normalize_word(text).ok_or_else(|| {
                VocabError::InvalidInput("Please send the translation as a single line of text.".to_string())
            })?;
            return confirm_new_word(source, target, false);
        }

        let source = normalize_word(text).ok_or_else(|| {
            VocabError::InvalidInput("Please send a single word or phrase on one line.".to_string())
        })?;
        // Reject before spending a lookup on a word that cannot be stored
        ensure_fits(&ActionToken::ChangeTranslation { source: source.clone() })?;

        let translation = self.translator.translate(&source).await?;
        let target = single_line(&translation).ok_or(LookupError::EmptyTranslation)?;
        confirm_new_word(source, target, true)
    }

    async fn handle_callback(&self, user_id: i64, token: ActionToken) -> Result<Reply> {
        match token {
            ActionToken::AddWord { source, target } => {
                let id = self.words.add_word(user_id, &source, &target).await?;
                log_user_action(user_id, "add_word", Some(&format!("id={}", id)));
                Ok(Reply::text(format!(
                    "Word added🎉\n\nWord: {}\nTranslation: {}",
                    bold(&source),
                    bold(&target)
                )))
            }
            ActionToken::ChangeTranslation { source } => {
                let text = format!("Choose translation for {}:", bold(&source));
                self.pending.put(user_id, source).await?;
                Ok(Reply::text(text))
            }
            ActionToken::CheckWord { id } => {
                let word = self.owned_word(user_id, id).await?;
                Ok(Reply::with_keyboard(
                    format!(
                        "Answer📝:\n\nWord: {}\nTranslation: {}",
                        bold(&word.word_source),
                        bold(&word.word_target)
                    ),
                    vec![vec![
                        Button::new("✅", ActionToken::MarkCorrect { id }),
                        Button::new("❌", ActionToken::MarkWrong { id }),
                    ]],
                ))
            }
            ActionToken::MarkCorrect { id } => {
                let word = self.grade(user_id, id, true).await?;
                if word.offers_retirement() {
                    info!(user_id = user_id, word_id = id, correct = word.correct, "Offering to retire word");
                    return Ok(Reply::with_keyboard(
                        format!(
                            "You guessed this word: <b>{} out of {} times</b>",
                            word.correct, word.attempts
                        ),
                        vec![
                            vec![Button::new("Delete it 🗑️", ActionToken::RetireWord { id })],
                            vec![Button::new("Leave it ✏️", ActionToken::KeepWord { id })],
                        ],
                    ));
                }
                self.start_quiz(user_id).await
            }
            ActionToken::MarkWrong { id } => {
                self.grade(user_id, id, false).await?;
                self.start_quiz(user_id).await
            }
            ActionToken::RetireWord { id } => {
                let mut word = self.owned_word(user_id, id).await?;
                word.retire();
                self.persist(&word).await?;
                log_user_action(user_id, "retire_word", Some(&format!("id={}", id)));
                self.start_quiz(user_id).await
            }
            ActionToken::KeepWord { .. } => self.start_quiz(user_id).await,
        }
    }

    /// Ask the user about one of their visible words
    pub async fn start_quiz(&self, user_id: i64) -> Result<Reply> {
        let Some(word) = self.words.random_visible_word(user_id).await? else {
            return Ok(Reply::text(NO_WORDS_TEXT));
        };

        let prompt = if rand::random::<bool>() {
            &word.word_source
        } else {
            &word.word_target
        };

        Ok(Reply::with_keyboard(
            format!("Word: {}\n\nTranslate it please🥺", bold(prompt)),
            vec![vec![Button::new("Check", ActionToken::CheckWord { id: word.id })]],
        ))
    }

    async fn grade(&self, user_id: i64, id: WordId, was_correct: bool) -> Result<Word> {
        let mut word = self.owned_word(user_id, id).await?;
        word.record_answer(was_correct);
        self.persist(&word).await?;
        debug!(
            user_id = user_id,
            word_id = id,
            attempts = word.attempts,
            correct = word.correct,
            "Answer recorded"
        );
        Ok(word)
    }

    async fn persist(&self, word: &Word) -> Result<()> {
        self.words
            .update_counters(word.id, word.visible, word.attempts, word.correct)
            .await
    }

    /// Fetch a word referenced by a callback, hiding other users' words
    async fn owned_word(&self, user_id: i64, id: WordId) -> Result<Word> {
        let word = self.words.get_word(id).await?;
        if word.owner_id != user_id {
            warn!(user_id = user_id, word_id = id, owner_id = word.owner_id, "Callback references a foreign word");
            return Err(VocabError::WordNotFound { word_id: id });
        }
        Ok(word)
    }
}

/// Confirmation prompt for a word pair that is not stored yet
fn confirm_new_word(source: String, target: String, offer_change: bool) -> Result<Reply> {
    let text = format!(
        "Add new word❓\n\nWord: {}\nTranslation: {}",
        bold(&source),
        bold(&target)
    );
    let add_label = format!("Add {}", target);

    let mut keyboard = vec![vec![Button::new(
        add_label,
        ActionToken::AddWord { source: source.clone(), target },
    )]];
    if offer_change {
        keyboard.push(vec![Button::new(
            "Change translation",
            ActionToken::ChangeTranslation { source },
        )]);
    }

    for token in keyboard.iter().flatten().map(|button| &button.token) {
        ensure_fits(token)?;
    }
    Ok(Reply::with_keyboard(text, keyboard))
}

/// Join the non-blank lines of a translation with spaces
fn single_line(text: &str) -> Option<String> {
    let joined = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    normalize_word(&joined)
}

fn ensure_fits(token: &ActionToken) -> Result<()> {
    if token.fits_callback_data() {
        Ok(())
    } else {
        Err(VocabError::InvalidInput(
            "This word is too long to save, please send a shorter one.".to_string(),
        ))
    }
}

/// The one reply a user gets when a flow ends with an error
pub fn error_reply(error: &VocabError) -> Reply {
    match error {
        VocabError::WordAlreadyExists { source_text, .. } => Reply::text(format!(
            "Word {} is already in your dictionary",
            bold(source_text)
        )),
        VocabError::Lookup(_) => Reply::text(LOOKUP_FAILED_TEXT),
        VocabError::MalformedToken(_) => Reply::text(UNKNOWN_ACTION_TEXT),
        VocabError::InvalidInput(message) => Reply::text(escape_html(message)),
        _ => Reply::text(GENERIC_ERROR_TEXT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_replies() {
        let reply = error_reply(&VocabError::WordAlreadyExists {
            owner_id: 1,
            source_text: "cat".to_string(),
        });
        assert_eq!(reply.text, "Word <b>cat</b> is already in your dictionary");
        assert!(reply.keyboard.is_empty());

        let reply = error_reply(&VocabError::MalformedToken("bogus".to_string()));
        assert_eq!(reply.text, UNKNOWN_ACTION_TEXT);

        let reply = error_reply(&VocabError::WordNotFound { word_id: 3 });
        assert_eq!(reply.text, GENERIC_ERROR_TEXT);
    }

    #[test]
    fn test_confirm_prompt_buttons() {
        let reply = confirm_new_word("cat".to_string(), "кот".to_string(), true).unwrap();
        assert_eq!(reply.keyboard.len(), 2);
        assert_eq!(reply.keyboard[0][0].label, "Add кот");
        let tokens: Vec<&ActionToken> = reply.tokens().collect();
        assert_eq!(
            tokens,
            vec![
                &ActionToken::AddWord { source: "cat".to_string(), target: "кот".to_string() },
                &ActionToken::ChangeTranslation { source: "cat".to_string() },
            ]
        );
    }

    #[test]
    fn test_confirm_prompt_rejects_oversized_tokens() {
        let result = confirm_new_word("cat".to_string(), "к".repeat(40), false);
        assert!(matches!(result, Err(VocabError::InvalidInput(_))));
    }

    #[test]
    fn test_multi_line_translation_is_flattened() {
        assert_eq!(single_line("бежать\nбег").as_deref(), Some("бежать бег"));
        assert_eq!(single_line("  кот \r\n\n").as_deref(), Some("кот"));
        assert_eq!(single_line("\n \n"), None);
    }

    #[test]
    fn test_event_kinds() {
        assert_eq!(Event::Command(Command::Quiz).kind(), "command:quiz");
        assert_eq!(Event::Callback(ActionToken::KeepWord { id: 1 }).kind(), "leave_word");
        assert_eq!(Event::UnknownCallback("x".to_string()).kind(), "unknown_callback");
    }
}
