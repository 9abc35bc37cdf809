//! Middleware module
//!
//! Cross-cutting concerns applied around every handled event

pub mod logging;

pub use logging::EventTracker;
