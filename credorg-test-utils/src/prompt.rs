//! Prompter answering from a script instead of a terminal

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use credorg_core::error::{Error, Result};
use credorg_core::prompt::Prompter;
use credorg_core::provider::Provider;
use credorg_core::store::StoredCredential;

/// Records each prompt as `(provider name, namespace)` and answers with a
/// fixed credential
#[derive(Clone)]
pub struct ScriptedPrompter {
  answer: Option<StoredCredential>,
  prompts: Rc<RefCell<Vec<(String, String)>>>,
}

impl ScriptedPrompter {
  /// Answer every prompt with `username`/`password`
  pub fn answering(username: &str, password: &str) -> Self {
    Self {
      answer: Some(StoredCredential::new(username, password)),
      prompts: Rc::default(),
    }
  }

  /// Answer every prompt with the provider's default identity and `token`
  pub fn token(token: &str) -> Self {
    Self {
      answer: Some(StoredCredential::new("", token)),
      prompts: Rc::default(),
    }
  }

  /// Fail every prompt as if no terminal were attached
  pub fn without_terminal() -> Self {
    Self {
      answer: None,
      prompts: Rc::default(),
    }
  }

  /// Prompts shown so far
  pub fn prompts(&self) -> Vec<(String, String)> {
    self.prompts.borrow().clone()
  }
}

impl Prompter for ScriptedPrompter {
  fn prompt(&self, provider: &dyn Provider, namespace: &str) -> Result<StoredCredential> {
    self
      .prompts
      .borrow_mut()
      .push((provider.name().to_string(), namespace.to_string()));

    let mut answer = self.answer.clone().ok_or_else(|| {
      Error::prompt(
        "cannot open terminal",
        io::Error::new(io::ErrorKind::NotFound, "no controlling terminal"),
      )
    })?;

    if answer.username.is_empty() {
      answer.username = provider.default_username().unwrap_or_default().to_string();
    }
    Ok(answer)
  }
}
