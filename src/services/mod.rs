//! Services module
//!
//! This module contains the external services the bot depends on

pub mod translator;

// Re-export commonly used services
pub use translator::{Translator, GoogleTranslator};
