//! OS-native secure store (macOS Keychain, Windows Credential Manager,
//! Secret Service on Linux) via the `keyring` crate.
//!
//! Each namespace gets its own service, `git-credential-org:<namespace>`, so
//! entries are distinguishable in the platform's keychain UI. The account is
//! always `credentials` and the secret is the credential as compact JSON.

use keyring::Entry;

use super::{CredentialStore, StoredCredential, storage_key};
use crate::consts::KEYCHAIN_ACCOUNT;
use crate::error::{Error, Result};

const NAME: &str = "keychain";

/// Credential store backed by the platform keychain
#[derive(Debug, Clone, Copy, Default)]
pub struct KeychainStore;

impl KeychainStore {
  pub const fn new() -> Self {
    Self
  }

  fn service_name(namespace: &str) -> String {
    storage_key(":", namespace)
  }

  fn entry(operation: &'static str, namespace: &str) -> Result<Entry> {
    Entry::new(&Self::service_name(namespace), KEYCHAIN_ACCOUNT)
      .map_err(|e| Error::backend(NAME, operation, namespace, e))
  }
}

impl CredentialStore for KeychainStore {
  fn name(&self) -> &'static str {
    NAME
  }

  fn get(&self, namespace: &str) -> Result<StoredCredential> {
    let secret = Self::entry("get", namespace)?
      .get_password()
      .map_err(|e| map_keyring_error("get", namespace, e))?;

    decode(&secret).map_err(|e| Error::backend(NAME, "get", namespace, e))
  }

  fn store(&self, namespace: &str, credential: &StoredCredential) -> Result<()> {
    let secret = encode(credential).map_err(|e| Error::backend(NAME, "store", namespace, e))?;

    Self::entry("store", namespace)?
      .set_password(&secret)
      .map_err(|e| Error::backend(NAME, "store", namespace, e))
  }

  fn erase(&self, namespace: &str) -> Result<()> {
    match Self::entry("erase", namespace)?.delete_credential() {
      Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
      Err(e) => Err(Error::backend(NAME, "erase", namespace, e)),
    }
  }
}

fn map_keyring_error(operation: &'static str, namespace: &str, error: keyring::Error) -> Error {
  match error {
    keyring::Error::NoEntry => Error::NotFound,
    other => Error::backend(NAME, operation, namespace, other),
  }
}

fn encode(credential: &StoredCredential) -> serde_json::Result<String> {
  serde_json::to_string(credential)
}

fn decode(secret: &str) -> serde_json::Result<StoredCredential> {
  serde_json::from_str(secret)
}
