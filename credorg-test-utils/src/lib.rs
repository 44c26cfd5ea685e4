//! Test utilities shared across the git-credential-org workspace
//!
//! This crate provides common testing infrastructure including:
//! - An in-memory credential store that records calls ([`MemoryStore`])
//! - A prompter that answers from a script ([`ScriptedPrompter`])
//! - Temporary configuration files ([`ConfigFileGuard`])
//! - Environment variable isolation ([`EnvVarGuard`])
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod config;
pub mod env;
pub mod prompt;
pub mod store;

// Re-export commonly used items
pub use config::ConfigFileGuard;
pub use env::EnvVarGuard;
pub use prompt::ScriptedPrompter;
pub use store::{MemoryStore, StoreCall};
