//! # Credential Handler
//!
//! Runs one git credential operation end to end: parse the request, resolve
//! its namespace, pick the backend configured for the host, and act.
//!
//! The handler keeps no state between operations. `get` never persists what
//! it prompts for; git calls `store` once the credential has worked, or
//! `erase` when it was rejected.

use std::io::{BufRead, Write};

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::namespace;
use crate::prompt::{Prompter, TtyPrompter};
use crate::protocol::{self, Credential};
use crate::provider::ProviderRegistry;
use crate::store::{BackendRegistry, CredentialStore, StoredCredential};

/// The operations git invokes a credential helper with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  Get,
  Store,
  Erase,
}

impl Operation {
  /// Parse an operation name, `None` for operations this helper ignores
  pub fn from_name(name: &str) -> Option<Self> {
    match name {
      "get" => Some(Self::Get),
      "store" => Some(Self::Store),
      "erase" => Some(Self::Erase),
      _ => None,
    }
  }
}

/// Orchestrates get/store/erase against the configured backends
pub struct CredentialHandler<'a> {
  config: &'a Config,
  backends: BackendRegistry,
  providers: ProviderRegistry,
  prompter: Box<dyn Prompter>,
}

impl<'a> CredentialHandler<'a> {
  /// Handler with the built-in backends, providers and terminal prompting
  pub fn new(config: &'a Config) -> Self {
    Self {
      config,
      backends: BackendRegistry::builtin(),
      providers: ProviderRegistry::builtin(),
      prompter: Box::new(TtyPrompter),
    }
  }

  /// Replace the backend registry
  pub fn with_backends(mut self, backends: BackendRegistry) -> Self {
    self.backends = backends;
    self
  }

  /// Replace the provider registry
  pub fn with_providers(mut self, providers: ProviderRegistry) -> Self {
    self.providers = providers;
    self
  }

  /// Replace how credentials are prompted for
  pub fn with_prompter(mut self, prompter: impl Prompter + 'static) -> Self {
    self.prompter = Box::new(prompter);
    self
  }

  /// Dispatch `operation`; only `get` writes to `output`
  pub fn run<R: BufRead, W: Write>(&self, operation: Operation, input: R, output: W) -> Result<()> {
    match operation {
      Operation::Get => self.get(input, output),
      Operation::Store => self.store(input),
      Operation::Erase => self.erase(input),
    }
  }

  /// Answer a credential request, prompting when nothing is stored
  pub fn get<R: BufRead, W: Write>(&self, input: R, output: W) -> Result<()> {
    let request = protocol::parse(input)?;
    let namespace = namespace::resolve(&request.host, &request.path);
    debug!("get: namespace={namespace} (host={}, path={})", request.host, request.path);

    let backend = self.backend_for(&request.host)?;

    let credential = match backend.get(&namespace) {
      Ok(stored) => {
        debug!("get: found credentials in {} for {namespace}", backend.name());
        stored
      }
      Err(Error::NotFound) => {
        let provider = self
          .providers
          .for_host(&request.host, self.config.provider_for_host(&request.host));
        info!(
          "get: no credentials for {namespace} in {}, prompting via {} provider",
          backend.name(),
          provider.name()
        );
        self.prompter.prompt(provider, &namespace)?
      }
      Err(e) => return Err(e),
    };

    protocol::write(output, &response(&request, credential))
  }

  /// Persist a credential git has confirmed works
  pub fn store<R: BufRead>(&self, input: R) -> Result<()> {
    let request = protocol::parse(input)?;
    if request.username.is_empty() || request.password.is_empty() {
      debug!("store: nothing to persist for host={}", request.host);
      return Ok(());
    }

    let namespace = namespace::resolve(&request.host, &request.path);
    let backend = self.backend_for(&request.host)?;
    debug!("store: upsert for namespace={namespace} in {}", backend.name());

    backend.store(&namespace, &StoredCredential::new(request.username, request.password))
  }

  /// Forget the credential for the request's namespace
  pub fn erase<R: BufRead>(&self, input: R) -> Result<()> {
    let request = protocol::parse(input)?;
    let namespace = namespace::resolve(&request.host, &request.path);
    let backend = self.backend_for(&request.host)?;
    debug!("erase: removing namespace={namespace} from {}", backend.name());

    backend.erase(&namespace)
  }

  fn backend_for(&self, host: &str) -> Result<Box<dyn CredentialStore>> {
    let name = self.config.backend_for_host(host);
    self.backends.create(name, &self.config.backend_settings(name))
  }
}

/// Protocol and host echo the request; identity comes from the credential
fn response(request: &Credential, credential: StoredCredential) -> Credential {
  Credential {
    protocol: request.protocol.clone(),
    host: request.host.clone(),
    path: String::new(),
    username: credential.username,
    password: credential.password,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn operation_names() {
    assert_eq!(Operation::from_name("get"), Some(Operation::Get));
    assert_eq!(Operation::from_name("store"), Some(Operation::Store));
    assert_eq!(Operation::from_name("erase"), Some(Operation::Erase));
    assert_eq!(Operation::from_name("capability"), None);
  }

  #[test]
  fn response_takes_protocol_and_host_from_the_request() {
    let request = Credential {
      protocol: "https".into(),
      host: "gitlab.com".into(),
      path: "org1/repo.git".into(),
      username: "someone-else".into(),
      password: String::new(),
    };

    let reply = response(&request, StoredCredential::new("oauth2", "glpat"));

    assert_eq!(
      reply,
      Credential {
        protocol: "https".into(),
        host: "gitlab.com".into(),
        path: String::new(),
        username: "oauth2".into(),
        password: "glpat".into(),
      }
    );
  }
}
