//! # git-credential-org Core Library
//!
//! Building blocks of a git credential helper that stores one credential per
//! organization rather than per repository: the helper protocol codec,
//! namespace resolution, host providers, credential stores and the handler
//! tying them together.

pub mod config;
pub mod consts;
pub mod error;
pub mod handler;
pub mod namespace;
pub mod prompt;
pub mod protocol;
pub mod provider;
pub mod store;

// Re-export the types most callers need
pub use config::{BackendSettings, Config, default_config_path};
pub use error::{Error, Result};
pub use handler::{CredentialHandler, Operation};
pub use protocol::Credential;
pub use store::{BackendRegistry, CredentialStore, StoredCredential};
