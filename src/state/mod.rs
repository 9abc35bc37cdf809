//! State management module
//!
//! This module holds the conversation state machine, the action tokens that
//! carry quiz state inside buttons, and the pending translation stores

pub mod machine;
pub mod pending;
pub mod token;

// Re-export commonly used state components
pub use machine::{ConversationMachine, Event, Command, Reply, Button, error_reply};
pub use pending::{PendingStore, PendingAction, MemoryPendingStore, RedisPendingStore};
pub use token::ActionToken;
