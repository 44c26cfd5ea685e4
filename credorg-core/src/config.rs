//! # Configuration
//!
//! Loads the TOML configuration that chooses a backend and provider per host
//! and carries backend-specific settings. A missing file is not an error;
//! the defaults store everything in the OS keychain.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

use crate::consts::{
  APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_BACKEND, DEFAULT_LOG_LEVEL, DEFAULT_OP_COMMAND, DEFAULT_OP_VAULT,
  ENV_CONFIG_PATH, LEGACY_APP_DIR_NAME, LEGACY_ENV_CONFIG_PATH,
};

/// Top-level configuration file
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
  pub defaults: Defaults,
  pub hosts: HashMap<String, HostConfig>,
  pub backends: HashMap<String, BackendSettings>,
}

/// `[defaults]` table
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Defaults {
  /// Backend used for hosts without an override
  pub backend: String,
  /// Log level used when neither `-v` nor the debug variable is given
  pub log_level: String,
}

impl Default for Defaults {
  fn default() -> Self {
    Self {
      backend: DEFAULT_BACKEND.to_string(),
      log_level: DEFAULT_LOG_LEVEL.to_string(),
    }
  }
}

/// `[hosts."<host>"]` table
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HostConfig {
  pub provider: String,
  pub backend: String,
}

/// `[backends.<name>]` table
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BackendSettings {
  pub vault: Option<String>,
  pub account: Option<String>,
  pub command: Option<String>,
}

impl BackendSettings {
  /// Configured vault, or the personal vault
  pub fn vault(&self) -> &str {
    non_empty(self.vault.as_deref()).unwrap_or(DEFAULT_OP_VAULT)
  }

  /// Configured account, if any
  pub fn account(&self) -> Option<&str> {
    non_empty(self.account.as_deref())
  }

  /// Path of the external tool, defaulting to `op` on `PATH`
  pub fn command(&self) -> &str {
    non_empty(self.command.as_deref()).unwrap_or(DEFAULT_OP_COMMAND)
  }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
  value.filter(|v| !v.is_empty())
}

impl Config {
  /// Load the configuration at `path`, falling back to defaults if it is
  /// missing
  pub fn load(path: &Path) -> Result<Self> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
      Err(e) => return Err(e).with_context(|| format!("Failed to read config {}", path.display())),
    };
    Self::parse(&content).with_context(|| format!("Failed to parse config {}", path.display()))
  }

  /// Parse configuration from TOML text
  pub fn parse(content: &str) -> Result<Self> {
    let mut config: Self = toml::from_str(content)?;
    if config.defaults.backend.is_empty() {
      config.defaults.backend = DEFAULT_BACKEND.to_string();
    }
    Ok(config)
  }

  /// Backend name for `host`: the host override, else the default
  pub fn backend_for_host(&self, host: &str) -> &str {
    match self.hosts.get(host) {
      Some(host_config) if !host_config.backend.is_empty() => &host_config.backend,
      _ => &self.defaults.backend,
    }
  }

  /// Provider name configured for `host`, empty when none is
  pub fn provider_for_host(&self, host: &str) -> &str {
    self.hosts.get(host).map_or("", |host_config| &host_config.provider)
  }

  /// Settings for the backend called `name`, empty when not configured
  pub fn backend_settings(&self, name: &str) -> BackendSettings {
    self.backends.get(name).cloned().unwrap_or_default()
  }
}

/// Location of the configuration file
///
/// `$GIT_CREDENTIAL_ORG_CONFIG` wins, then `$GIT_CREDENTIALS_ORG_CONFIG`,
/// then `$XDG_CONFIG_HOME`, then `~/.config` on every platform. Inside the
/// config home, a file under the earlier `git-credentials-org` directory is
/// used only while the current directory has none.
pub fn default_config_path() -> Result<PathBuf> {
  if let Some(path) = [ENV_CONFIG_PATH, LEGACY_ENV_CONFIG_PATH]
    .into_iter()
    .find_map(|name| env::var_os(name).filter(|p| !p.is_empty()))
  {
    return Ok(PathBuf::from(path));
  }

  let config_home = match env::var_os("XDG_CONFIG_HOME").filter(|p| !p.is_empty()) {
    Some(dir) => PathBuf::from(dir),
    None => {
      let base_dirs = BaseDirs::new().context("Could not determine home directory")?;
      base_dirs.home_dir().join(".config")
    }
  };

  let current = config_home.join(APP_DIR_NAME).join(CONFIG_FILE_NAME);
  let legacy = config_home.join(LEGACY_APP_DIR_NAME).join(CONFIG_FILE_NAME);
  if !current.is_file() && legacy.is_file() {
    return Ok(legacy);
  }

  Ok(current)
}
