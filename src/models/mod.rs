//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod word;

pub use word::{Word, WordId, WordCounts};
