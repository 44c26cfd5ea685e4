//! # Providers
//!
//! Host-specific prompting policy. A provider supplies the identity used for
//! token authentication (if the forge has one) and the text shown when the
//! user is asked for a secret.
//!
//! Providers are registered in a [`ProviderRegistry`] in priority order.
//! Selection prefers an explicitly configured name, then the first provider
//! whose host detection matches, then the fallback.

use tracing::warn;

/// Prompting policy for a family of hosts
pub trait Provider: Send + Sync {
  /// Identifier used in configuration (`provider = "gitlab"`)
  fn name(&self) -> &'static str;

  /// Identity paired with a token, or `None` when the user must supply one
  fn default_username(&self) -> Option<&'static str>;

  /// First prompt shown for `namespace`
  fn token_prompt(&self, namespace: &str) -> String;

  /// Whether this provider handles `host` when nothing is configured
  fn detect_host(&self, host: &str) -> bool;
}

/// GitLab, authenticated with personal access tokens under `oauth2`
#[derive(Debug, Clone, Copy, Default)]
pub struct GitLab;

impl Provider for GitLab {
  fn name(&self) -> &'static str {
    "gitlab"
  }

  fn default_username(&self) -> Option<&'static str> {
    Some("oauth2")
  }

  fn token_prompt(&self, namespace: &str) -> String {
    format!("Enter GitLab Personal Access Token for {namespace}: ")
  }

  fn detect_host(&self, host: &str) -> bool {
    host == "gitlab.com" || host.contains("gitlab")
  }
}

/// GitHub, authenticated with personal access tokens under `x-access-token`
#[derive(Debug, Clone, Copy, Default)]
pub struct GitHub;

impl Provider for GitHub {
  fn name(&self) -> &'static str {
    "github"
  }

  fn default_username(&self) -> Option<&'static str> {
    Some("x-access-token")
  }

  fn token_prompt(&self, namespace: &str) -> String {
    format!("Enter GitHub Personal Access Token for {namespace}: ")
  }

  fn detect_host(&self, host: &str) -> bool {
    host == "github.com" || host.contains("github")
  }
}

/// Any other host: ask for both username and password
#[derive(Debug, Clone, Copy, Default)]
pub struct Generic;

impl Provider for Generic {
  fn name(&self) -> &'static str {
    "generic"
  }

  fn default_username(&self) -> Option<&'static str> {
    None
  }

  fn token_prompt(&self, namespace: &str) -> String {
    format!("Enter credentials for {namespace}.\nUsername: ")
  }

  fn detect_host(&self, _host: &str) -> bool {
    true
  }
}

/// Ordered set of providers plus the fallback used when none match
pub struct ProviderRegistry {
  providers: Vec<Box<dyn Provider>>,
  fallback: Box<dyn Provider>,
}

impl Default for ProviderRegistry {
  fn default() -> Self {
    Self::builtin()
  }
}

impl ProviderRegistry {
  /// Registry with no detecting providers, only `fallback`
  pub fn with_fallback(fallback: impl Provider + 'static) -> Self {
    Self {
      providers: Vec::new(),
      fallback: Box::new(fallback),
    }
  }

  /// GitLab, then GitHub, falling back to Generic
  pub fn builtin() -> Self {
    Self::with_fallback(Generic).register(GitLab).register(GitHub)
  }

  /// Append a provider after the ones already registered
  pub fn register(mut self, provider: impl Provider + 'static) -> Self {
    self.providers.push(Box::new(provider));
    self
  }

  /// Registered provider names in priority order, fallback last
  pub fn names(&self) -> Vec<&'static str> {
    self
      .providers
      .iter()
      .map(|p| p.name())
      .chain(std::iter::once(self.fallback.name()))
      .collect()
  }

  /// Select the provider for `host`
  ///
  /// A non-empty `configured` name that matches a registered provider (the
  /// fallback included) wins regardless of the host. Otherwise the first
  /// provider detecting the host is used, and the fallback after that.
  pub fn for_host(&self, host: &str, configured: &str) -> &dyn Provider {
    if !configured.is_empty() {
      if let Some(provider) = self.by_name(configured) {
        return provider;
      }
      warn!("Unknown provider '{configured}' configured for {host}, detecting from host instead");
    }

    self
      .providers
      .iter()
      .find(|p| p.detect_host(host))
      .map_or(self.fallback.as_ref(), |p| p.as_ref())
  }

  fn by_name(&self, name: &str) -> Option<&dyn Provider> {
    self
      .providers
      .iter()
      .map(|p| p.as_ref())
      .chain(std::iter::once(self.fallback.as_ref()))
      .find(|p| p.name() == name)
  }
}
