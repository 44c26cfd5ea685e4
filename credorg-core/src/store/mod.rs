//! # Credential Stores
//!
//! Uniform get/store/erase contract over the places a credential can be
//! persisted, plus the registry that builds a store from its configured name.
//!
//! Two backends are built in: the OS keychain ([`KeychainStore`]) and the
//! 1Password CLI ([`OnePasswordStore`]). Further backends are added with
//! [`BackendRegistry::register`] without touching the handler.

mod command;
mod keychain;
mod onepassword;

use std::fmt;

pub use command::{CommandOutput, CommandRunner, OpCommand, ProcessRunner};
pub use keychain::KeychainStore;
pub use onepassword::OnePasswordStore;
use serde::{Deserialize, Serialize};

use crate::config::BackendSettings;
use crate::error::{Error, Result};

/// The persisted secret, keyed externally by namespace
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredential {
  pub username: String,
  pub password: String,
}

impl StoredCredential {
  pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
    Self {
      username: username.into(),
      password: password.into(),
    }
  }
}

impl fmt::Debug for StoredCredential {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StoredCredential")
      .field("username", &self.username)
      .field("password", &"<redacted>")
      .finish()
  }
}

/// Persistent storage for credentials addressed by namespace
pub trait CredentialStore {
  /// Name the backend is registered under
  fn name(&self) -> &'static str;

  /// Fetch the credential for `namespace`, [`Error::NotFound`] when absent
  fn get(&self, namespace: &str) -> Result<StoredCredential>;

  /// Create or overwrite the credential for `namespace`
  fn store(&self, namespace: &str, credential: &StoredCredential) -> Result<()>;

  /// Remove the credential for `namespace`; absent entries are not an error
  fn erase(&self, namespace: &str) -> Result<()>;
}

/// Builds a store from the settings of its configuration table
pub type BackendFactory = Box<dyn Fn(&BackendSettings) -> Box<dyn CredentialStore>>;

/// Maps backend names (and aliases) to store factories
pub struct BackendRegistry {
  factories: Vec<(&'static str, BackendFactory)>,
}

impl Default for BackendRegistry {
  fn default() -> Self {
    Self::builtin()
  }
}

impl BackendRegistry {
  /// Registry without any backends
  pub fn empty() -> Self {
    Self { factories: Vec::new() }
  }

  /// `keychain`, `onepassword` and its alias `1password`
  pub fn builtin() -> Self {
    Self::empty()
      .register("keychain", |_| Box::new(KeychainStore::new()))
      .register("onepassword", |settings| Box::new(OnePasswordStore::from_settings(settings)))
      .register("1password", |settings| Box::new(OnePasswordStore::from_settings(settings)))
  }

  /// Register `factory` under `name`, replacing any earlier registration
  pub fn register<F>(mut self, name: &'static str, factory: F) -> Self
  where
    F: Fn(&BackendSettings) -> Box<dyn CredentialStore> + 'static,
  {
    self.factories.retain(|(existing, _)| *existing != name);
    self.factories.push((name, Box::new(factory)));
    self
  }

  /// Whether a backend is registered under `name`
  pub fn contains(&self, name: &str) -> bool {
    self.factories.iter().any(|(existing, _)| *existing == name)
  }

  /// Construct the backend called `name`
  ///
  /// Fails with [`Error::UnknownBackend`] without constructing anything
  /// when no backend is registered under that name.
  pub fn create(&self, name: &str, settings: &BackendSettings) -> Result<Box<dyn CredentialStore>> {
    self
      .factories
      .iter()
      .find(|(existing, _)| *existing == name)
      .map(|(_, factory)| factory(settings))
      .ok_or_else(|| Error::UnknownBackend(name.to_string()))
  }
}

/// Identifier shared by every backend: `<prefix><separator><namespace>`
pub(crate) fn storage_key(separator: &str, namespace: &str) -> String {
  format!("{}{separator}{namespace}", crate::consts::STORAGE_PREFIX)
}
