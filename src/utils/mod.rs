//! Shared utilities
//!
//! Error types and helpers used across the engine.

pub mod error;

pub use error::{BridgeError, Result};
