//! In-memory credential store
//!
//! Clones share their entries and call log, so a test can keep one handle
//! while the handler owns the boxed store produced by the registry.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use credorg_core::error::{Error, Result};
use credorg_core::store::{BackendRegistry, CredentialStore, StoredCredential};

/// One call made against a [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
  Get(String),
  Store(String, StoredCredential),
  Erase(String),
}

#[derive(Default)]
struct State {
  entries: HashMap<String, StoredCredential>,
  calls: Vec<StoreCall>,
  constructed: usize,
  failure: Option<String>,
}

/// Credential store keeping entries in a shared map
#[derive(Clone, Default)]
pub struct MemoryStore {
  state: Rc<RefCell<State>>,
}

impl MemoryStore {
  /// Empty store
  pub fn new() -> Self {
    Self::default()
  }

  /// Seed an entry without recording a call
  pub fn with_entry(self, namespace: &str, username: &str, password: &str) -> Self {
    self
      .state
      .borrow_mut()
      .entries
      .insert(namespace.to_string(), StoredCredential::new(username, password));
    self
  }

  /// Make every operation fail with a backend error carrying `message`
  pub fn failing(self, message: &str) -> Self {
    self.state.borrow_mut().failure = Some(message.to_string());
    self
  }

  /// Registry exposing this store under `name`
  pub fn registry(&self, name: &'static str) -> BackendRegistry {
    let store = self.clone();
    BackendRegistry::empty().register(name, move |_| {
      store.state.borrow_mut().constructed += 1;
      Box::new(store.clone())
    })
  }

  /// Current entries
  pub fn entries(&self) -> HashMap<String, StoredCredential> {
    self.state.borrow().entries.clone()
  }

  /// Entry for `namespace`, if any
  pub fn entry(&self, namespace: &str) -> Option<StoredCredential> {
    self.state.borrow().entries.get(namespace).cloned()
  }

  /// Every call in order
  pub fn calls(&self) -> Vec<StoreCall> {
    self.state.borrow().calls.clone()
  }

  /// Number of `store` calls
  pub fn store_calls(&self) -> usize {
    self
      .calls()
      .iter()
      .filter(|call| matches!(call, StoreCall::Store(..)))
      .count()
  }

  /// How many times the registry built this store
  pub fn constructed(&self) -> usize {
    self.state.borrow().constructed
  }

  fn record(&self, call: StoreCall, operation: &'static str, namespace: &str) -> Result<()> {
    let mut state = self.state.borrow_mut();
    state.calls.push(call);
    match &state.failure {
      Some(message) => Err(Error::backend("memory", operation, namespace, message.clone())),
      None => Ok(()),
    }
  }
}

impl CredentialStore for MemoryStore {
  fn name(&self) -> &'static str {
    "memory"
  }

  fn get(&self, namespace: &str) -> Result<StoredCredential> {
    self.record(StoreCall::Get(namespace.to_string()), "get", namespace)?;
    self.entry(namespace).ok_or(Error::NotFound)
  }

  fn store(&self, namespace: &str, credential: &StoredCredential) -> Result<()> {
    self.record(
      StoreCall::Store(namespace.to_string(), credential.clone()),
      "store",
      namespace,
    )?;
    self
      .state
      .borrow_mut()
      .entries
      .insert(namespace.to_string(), credential.clone());
    Ok(())
  }

  fn erase(&self, namespace: &str) -> Result<()> {
    self.record(StoreCall::Erase(namespace.to_string()), "erase", namespace)?;
    self.state.borrow_mut().entries.remove(namespace);
    Ok(())
  }
}
