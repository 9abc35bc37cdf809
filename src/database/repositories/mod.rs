//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod word;

// Re-export repositories
pub use word::WordRepository;
