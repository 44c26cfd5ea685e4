//! 1Password backend driven through the `op` command-line tool.
//!
//! Each namespace is one Login item titled `git-credential-org: <namespace>`
//! in the configured vault. Every operation is a single `op` invocation,
//! except `store`, which looks the item up first to choose between editing
//! and creating it.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::command::{CommandOutput, CommandRunner, OpCommand, ProcessRunner};
use super::{CredentialStore, StoredCredential, storage_key};
use crate::config::BackendSettings;
use crate::error::{Error, Result};

const NAME: &str = "onepassword";

/// Fragments of `op` diagnostics meaning the item does not exist
const NOT_FOUND_SIGNALS: [&str; 2] = ["isn't an item", "not found"];

/// `op` exited unsuccessfully or could not be started
#[derive(Debug, Error)]
enum OpError {
  #[error("failed to run {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },
  #[error("{program} exited with an error: {stderr}")]
  Failed { program: String, stderr: String },
}

#[derive(Debug, Deserialize)]
struct OpItem {
  #[serde(default)]
  fields: Vec<OpField>,
}

#[derive(Debug, Deserialize)]
struct OpField {
  #[serde(default)]
  id: String,
  #[serde(default)]
  value: String,
}

/// Credential store backed by a 1Password vault
pub struct OnePasswordStore {
  vault: String,
  account: Option<String>,
  program: String,
  runner: Box<dyn CommandRunner>,
}

impl OnePasswordStore {
  /// Store using the real `op` process
  pub fn from_settings(settings: &BackendSettings) -> Self {
    Self::with_runner(settings, ProcessRunner)
  }

  /// Store that executes `op` through `runner`
  pub fn with_runner(settings: &BackendSettings, runner: impl CommandRunner + 'static) -> Self {
    Self {
      vault: settings.vault().to_string(),
      account: settings.account().map(str::to_string),
      program: settings.command().to_string(),
      runner: Box::new(runner),
    }
  }

  fn item_title(namespace: &str) -> String {
    storage_key(": ", namespace)
  }

  /// Add the vault and account scope shared by every invocation
  fn scoped(&self, command: OpCommand) -> OpCommand {
    command
      .flag("vault", &self.vault)
      .optional_flag("account", self.account.as_deref())
  }

  fn execute(&self, command: &OpCommand) -> std::result::Result<Vec<u8>, OpError> {
    let CommandOutput {
      stdout,
      stderr,
      success,
    } = command
      .run(self.runner.as_ref(), &self.program)
      .map_err(|source| OpError::Spawn {
        program: self.program.clone(),
        source,
      })?;

    if success {
      Ok(stdout)
    } else {
      Err(OpError::Failed {
        program: self.program.clone(),
        stderr,
      })
    }
  }

  fn edit_item(&self, namespace: &str, credential: &StoredCredential) -> Result<()> {
    let command = self
      .scoped(OpCommand::item("edit").target(Self::item_title(namespace)))
      .assign("username", &credential.username)
      .assign("password", &credential.password);

    self
      .execute(&command)
      .map(drop)
      .map_err(|e| Error::backend(NAME, "edit", namespace, e))
  }

  fn create_item(&self, namespace: &str, credential: &StoredCredential) -> Result<()> {
    let command = self
      .scoped(
        OpCommand::item("create")
          .flag("category", "login")
          .flag("title", Self::item_title(namespace)),
      )
      .assign("username", &credential.username)
      .assign("password", &credential.password);

    self
      .execute(&command)
      .map(drop)
      .map_err(|e| Error::backend(NAME, "create", namespace, e))
  }
}

impl CredentialStore for OnePasswordStore {
  fn name(&self) -> &'static str {
    NAME
  }

  fn get(&self, namespace: &str) -> Result<StoredCredential> {
    let command = self.scoped(
      OpCommand::item("get")
        .target(Self::item_title(namespace))
        .flag("format", "json"),
    );

    match self.execute(&command) {
      Ok(stdout) => parse_item(&stdout).map_err(|e| match e {
        ParseError::Empty => Error::NotFound,
        ParseError::Json(e) => Error::backend(NAME, "get", namespace, e),
      }),
      Err(e) if is_not_found(&e) => Err(Error::NotFound),
      Err(e) => Err(Error::backend(NAME, "get", namespace, e)),
    }
  }

  fn store(&self, namespace: &str, credential: &StoredCredential) -> Result<()> {
    match self.get(namespace) {
      Ok(_) => {
        debug!("Updating existing 1Password item for {namespace}");
        self.edit_item(namespace, credential)
      }
      Err(Error::NotFound) => {
        debug!("Creating 1Password item for {namespace}");
        self.create_item(namespace, credential)
      }
      Err(e) => Err(e),
    }
  }

  fn erase(&self, namespace: &str) -> Result<()> {
    let command = self.scoped(OpCommand::item("delete").target(Self::item_title(namespace)));

    match self.execute(&command) {
      Ok(_) => Ok(()),
      Err(e) if is_not_found(&e) => Ok(()),
      Err(e) => Err(Error::backend(NAME, "erase", namespace, e)),
    }
  }
}

fn is_not_found(error: &OpError) -> bool {
  match error {
    OpError::Failed { stderr, .. } => NOT_FOUND_SIGNALS.iter().any(|signal| stderr.contains(signal)),
    OpError::Spawn { .. } => false,
  }
}

enum ParseError {
  Empty,
  Json(serde_json::Error),
}

/// Extract username and password from `op item get --format json` output
fn parse_item(json: &[u8]) -> std::result::Result<StoredCredential, ParseError> {
  let item: OpItem = serde_json::from_slice(json).map_err(ParseError::Json)?;

  let mut credential = StoredCredential::default();
  for field in item.fields {
    match field.id.as_str() {
      "username" => credential.username = field.value,
      "password" => credential.password = field.value,
      _ => {}
    }
  }

  if credential.username.is_empty() && credential.password.is_empty() {
    return Err(ParseError::Empty);
  }

  Ok(credential)
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;
  use std::collections::VecDeque;
  use std::io;
  use std::rc::Rc;

  use super::*;

  /// Replays canned outputs and records every argument list
  #[derive(Clone, Default)]
  struct Script {
    calls: Rc<RefCell<Vec<Vec<String>>>>,
    outputs: Rc<RefCell<VecDeque<io::Result<CommandOutput>>>>,
  }

  impl Script {
    fn then(self, output: io::Result<CommandOutput>) -> Self {
      self.outputs.borrow_mut().push_back(output);
      self
    }

    fn calls(&self) -> Vec<Vec<String>> {
      self.calls.borrow().clone()
    }
  }

  impl CommandRunner for Script {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
      assert_eq!(program, "op");
      self.calls.borrow_mut().push(args.to_vec());
      self
        .outputs
        .borrow_mut()
        .pop_front()
        .unwrap_or_else(|| Ok(CommandOutput::ok("")))
    }
  }

  const ITEM_JSON: &str = r#"{
    "id": "abc",
    "title": "git-credential-org: gitlab.com/org1",
    "fields": [
      {"id": "username", "label": "username", "value": "oauth2", "type": "STRING"},
      {"id": "password", "label": "password", "value": "glpat-123", "type": "CONCEALED"},
      {"id": "notesPlain", "label": "notesPlain", "value": ""}
    ]
  }"#;

  fn settings(account: Option<&str>) -> BackendSettings {
    BackendSettings {
      vault: Some("DevVault".into()),
      account: account.map(str::to_string),
      command: None,
    }
  }

  #[test]
  fn get_reads_fields_by_id() {
    let script = Script::default().then(Ok(CommandOutput::ok(ITEM_JSON)));
    let store = OnePasswordStore::with_runner(&settings(None), script.clone());

    let credential = store.get("gitlab.com/org1").unwrap();

    assert_eq!(credential, StoredCredential::new("oauth2", "glpat-123"));
    assert_eq!(
      script.calls(),
      vec![vec![
        "item",
        "get",
        "git-credential-org: gitlab.com/org1",
        "--format",
        "json",
        "--vault",
        "DevVault",
      ]]
    );
  }

  #[test]
  fn get_passes_the_account_when_configured() {
    let script = Script::default().then(Ok(CommandOutput::ok(ITEM_JSON)));
    let store = OnePasswordStore::with_runner(&settings(Some("team.1password.com")), script.clone());

    store.get("gitlab.com/org1").unwrap();

    let args = &script.calls()[0];
    assert_eq!(&args[args.len() - 2..], ["--account", "team.1password.com"]);
  }

  #[test]
  fn get_without_credential_fields_is_not_found() {
    let script = Script::default().then(Ok(CommandOutput::ok(r#"{"fields": [{"id": "notesPlain", "value": "x"}]}"#)));
    let store = OnePasswordStore::with_runner(&settings(None), script);

    assert!(store.get("gitlab.com/org1").unwrap_err().is_not_found());
  }

  #[test]
  fn get_maps_missing_item_diagnostics_to_not_found() {
    let script = Script::default().then(Ok(CommandOutput::failed(
      "[ERROR] 2024/01/01 \"git-credential-org: gitlab.com/org1\" isn't an item in the \"DevVault\" vault",
    )));
    let store = OnePasswordStore::with_runner(&settings(None), script);

    assert!(store.get("gitlab.com/org1").unwrap_err().is_not_found());
  }

  #[test]
  fn get_surfaces_other_failures_with_diagnostics() {
    let script = Script::default().then(Ok(CommandOutput::failed("[ERROR] you are not currently signed in")));
    let store = OnePasswordStore::with_runner(&settings(None), script);

    let err = store.get("gitlab.com/org1").unwrap_err();

    assert!(matches!(err, Error::Backend { operation: "get", .. }));
    assert!(err.to_string().contains("not currently signed in"));
  }

  #[test]
  fn get_surfaces_malformed_json() {
    let script = Script::default().then(Ok(CommandOutput::ok("not json")));
    let store = OnePasswordStore::with_runner(&settings(None), script);

    assert!(matches!(
      store.get("gitlab.com/org1").unwrap_err(),
      Error::Backend { backend: "onepassword", .. }
    ));
  }

  #[test]
  fn missing_binary_is_a_backend_error() {
    let script = Script::default().then(Err(io::Error::new(io::ErrorKind::NotFound, "No such file")));
    let store = OnePasswordStore::with_runner(&settings(None), script);

    let err = store.get("gitlab.com/org1").unwrap_err();
    assert!(!err.is_not_found());
  }

  #[test]
  fn store_edits_an_existing_item() {
    let script = Script::default()
      .then(Ok(CommandOutput::ok(ITEM_JSON)))
      .then(Ok(CommandOutput::ok("")));
    let store = OnePasswordStore::with_runner(&settings(Some("team")), script.clone());

    store
      .store("gitlab.com/org1", &StoredCredential::new("oauth2", "glpat-new"))
      .unwrap();

    let calls = script.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
      calls[1],
      vec![
        "item",
        "edit",
        "git-credential-org: gitlab.com/org1",
        "--vault",
        "DevVault",
        "--account",
        "team",
        "--",
        "username=oauth2",
        "password=glpat-new",
      ]
    );
  }

  #[test]
  fn store_creates_a_missing_item() {
    let script = Script::default()
      .then(Ok(CommandOutput::failed("\"x\" isn't an item")))
      .then(Ok(CommandOutput::ok("")));
    let store = OnePasswordStore::with_runner(&settings(Some("team")), script.clone());

    store
      .store("github.com/acme", &StoredCredential::new("x-access-token", "ghp_1"))
      .unwrap();

    assert_eq!(
      script.calls()[1],
      vec![
        "item",
        "create",
        "--category",
        "login",
        "--title",
        "git-credential-org: github.com/acme",
        "--vault",
        "DevVault",
        "--account",
        "team",
        "--",
        "username=x-access-token",
        "password=ghp_1",
      ]
    );
  }

  #[test]
  fn store_stops_when_lookup_fails() {
    let script = Script::default().then(Ok(CommandOutput::failed("network unreachable")));
    let store = OnePasswordStore::with_runner(&settings(None), script.clone());

    assert!(store.store("github.com/acme", &StoredCredential::new("u", "p")).is_err());
    assert_eq!(script.calls().len(), 1);
  }

  #[test]
  fn store_reports_create_failures() {
    let script = Script::default()
      .then(Ok(CommandOutput::failed("not found")))
      .then(Ok(CommandOutput::failed("vault is read-only")));
    let store = OnePasswordStore::with_runner(&settings(None), script);

    let err = store
      .store("github.com/acme", &StoredCredential::new("u", "p"))
      .unwrap_err();
    assert!(matches!(err, Error::Backend { operation: "create", .. }));
  }

  #[test]
  fn erase_deletes_the_item() {
    let script = Script::default().then(Ok(CommandOutput::ok("")));
    let store = OnePasswordStore::with_runner(&settings(None), script.clone());

    store.erase("gitlab.com/org1").unwrap();

    assert_eq!(
      script.calls(),
      vec![vec![
        "item",
        "delete",
        "git-credential-org: gitlab.com/org1",
        "--vault",
        "DevVault"
      ]]
    );
  }

  #[test]
  fn erase_of_a_missing_item_succeeds() {
    let script = Script::default()
      .then(Ok(CommandOutput::failed("item not found")))
      .then(Ok(CommandOutput::failed("\"x\" isn't an item")));
    let store = OnePasswordStore::with_runner(&settings(None), script);

    assert!(store.erase("gitlab.com/org1").is_ok());
    assert!(store.erase("gitlab.com/org1").is_ok());
  }

  #[test]
  fn erase_surfaces_other_failures() {
    let script = Script::default().then(Ok(CommandOutput::failed("authorization prompt dismissed")));
    let store = OnePasswordStore::with_runner(&settings(None), script);

    assert!(matches!(
      store.erase("gitlab.com/org1").unwrap_err(),
      Error::Backend { operation: "erase", .. }
    ));
  }

  #[test]
  fn defaults_to_the_private_vault() {
    let script = Script::default();
    let store = OnePasswordStore::with_runner(&BackendSettings::default(), script.clone());

    store.erase("example.com").unwrap();

    assert_eq!(script.calls()[0][3..], ["--vault", "Private"]);
  }
}
