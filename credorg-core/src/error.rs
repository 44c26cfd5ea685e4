//! # Error Types
//!
//! Every failure a credential operation can surface. Only [`Error::NotFound`]
//! is recoverable; the handler turns it into an interactive prompt during
//! `get`. Everything else is fatal and propagates to the entry point.

use std::io;

use thiserror::Error;

/// Boxed underlying cause carried by backend failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the core library
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by the protocol codec, stores, prompting and handler
#[derive(Debug, Error)]
pub enum Error {
  /// The protocol stream could not be read.
  #[error("failed to read credential input")]
  ProtocolRead(#[source] io::Error),

  /// The protocol response could not be written.
  #[error("failed to write credential output")]
  ProtocolWrite(#[source] io::Error),

  /// A field value cannot be represented in the line-oriented protocol.
  #[error("credential field `{field}` contains a line break or NUL character and cannot be encoded")]
  UnencodableValue { field: &'static str },

  /// No credential is stored under the namespace.
  #[error("credentials not found")]
  NotFound,

  /// A backend operation failed for a reason other than absence.
  #[error("{backend} {operation} {namespace:?}: {source}")]
  Backend {
    backend: &'static str,
    operation: &'static str,
    namespace: String,
    #[source]
    source: BoxError,
  },

  /// The configuration names a backend nothing is registered for.
  #[error("unknown backend: {0}")]
  UnknownBackend(String),

  /// The controlling terminal could not be opened or read.
  #[error("cannot prompt for credentials: {context}")]
  Prompt {
    context: &'static str,
    #[source]
    source: io::Error,
  },
}

impl Error {
  /// Wrap a backend failure with the backend, operation and namespace it hit
  pub fn backend(
    backend: &'static str,
    operation: &'static str,
    namespace: &str,
    source: impl Into<BoxError>,
  ) -> Self {
    Self::Backend {
      backend,
      operation,
      namespace: namespace.to_string(),
      source: source.into(),
    }
  }

  /// Wrap a terminal failure
  pub const fn prompt(context: &'static str, source: io::Error) -> Self {
    Self::Prompt { context, source }
  }

  /// Whether this error only signals an absent credential
  pub const fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound)
  }
}
