//! Action tokens carried in inline keyboard buttons
//!
//! A token fully describes what a button press means, so no session needs to
//! be kept on the server for the quiz flow. Tokens are encoded as
//! newline-joined fields, the first field being the kind tag:
//!
//! ```text
//! add_word\ncat\nкот
//! check_word\n42
//! ```

use std::fmt;
use crate::models::WordId;
use crate::utils::errors::{VocabError, Result};

/// Telegram rejects buttons whose callback data is longer than this
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

const SEPARATOR: char = '\n';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionToken {
    AddWord { source: String, target: String },
    ChangeTranslation { source: String },
    CheckWord { id: WordId },
    MarkCorrect { id: WordId },
    MarkWrong { id: WordId },
    RetireWord { id: WordId },
    KeepWord { id: WordId },
}

impl ActionToken {
    pub fn tag(&self) -> &'static str {
        match self {
            ActionToken::AddWord { .. } => "add_word",
            ActionToken::ChangeTranslation { .. } => "change_translation",
            ActionToken::CheckWord { .. } => "check_word",
            ActionToken::MarkCorrect { .. } => "corr_word",
            ActionToken::MarkWrong { .. } => "wrong_word",
            ActionToken::RetireWord { .. } => "del_word",
            ActionToken::KeepWord { .. } => "leave_word",
        }
    }

    /// Serialize into callback data
    pub fn encode(&self) -> String {
        let tag = self.tag();
        match self {
            ActionToken::AddWord { source, target } => {
                format!("{tag}{SEPARATOR}{source}{SEPARATOR}{target}")
            }
            ActionToken::ChangeTranslation { source } => format!("{tag}{SEPARATOR}{source}"),
            ActionToken::CheckWord { id }
            | ActionToken::MarkCorrect { id }
            | ActionToken::MarkWrong { id }
            | ActionToken::RetireWord { id }
            | ActionToken::KeepWord { id } => format!("{tag}{SEPARATOR}{id}"),
        }
    }

    /// Parse callback data produced by [`ActionToken::encode`]
    ///
    /// Anything else, including unknown tags, wrong field counts, empty
    /// words and non-numeric ids, is a `MalformedToken`.
    pub fn decode(data: &str) -> Result<Self> {
        let fields: Vec<&str> = data.split(SEPARATOR).collect();

        match fields.as_slice() {
            ["add_word", source, target] => Ok(ActionToken::AddWord {
                source: word_field(data, source)?,
                target: word_field(data, target)?,
            }),
            ["change_translation", source] => Ok(ActionToken::ChangeTranslation {
                source: word_field(data, source)?,
            }),
            ["check_word", raw] => Ok(ActionToken::CheckWord { id: id_field(data, raw)? }),
            ["corr_word", raw] => Ok(ActionToken::MarkCorrect { id: id_field(data, raw)? }),
            ["wrong_word", raw] => Ok(ActionToken::MarkWrong { id: id_field(data, raw)? }),
            ["del_word", raw] => Ok(ActionToken::RetireWord { id: id_field(data, raw)? }),
            ["leave_word", raw] => Ok(ActionToken::KeepWord { id: id_field(data, raw)? }),
            _ => Err(VocabError::MalformedToken(data.to_string())),
        }
    }

    /// Whether the encoded token fits into Telegram callback data and
    /// decodes back into itself
    pub fn fits_callback_data(&self) -> bool {
        let encoded = self.encode();
        encoded.len() <= MAX_CALLBACK_DATA_LEN
            && Self::decode(&encoded).is_ok_and(|decoded| &decoded == self)
    }
}

fn word_field(data: &str, field: &str) -> Result<String> {
    if field.is_empty() {
        return Err(VocabError::MalformedToken(data.to_string()));
    }
    Ok(field.to_string())
}

fn id_field(data: &str, field: &str) -> Result<WordId> {
    match field.parse::<WordId>() {
        // "+5" and "007" parse but would not encode back to the same text
        Ok(id) if id.to_string() == field => Ok(id),
        _ => Err(VocabError::MalformedToken(data.to_string())),
    }
}

impl fmt::Display for ActionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
