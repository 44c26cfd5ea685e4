//! Temporary configuration files for testing

use std::fs;
use std::path::{Path, PathBuf};

use credorg_core::Config;
use tempfile::TempDir;

/// A `config.toml` inside a temporary directory, removed on drop
pub struct ConfigFileGuard {
  /// The temporary directory holding the file
  pub temp_dir: TempDir,
  path: PathBuf,
}

impl ConfigFileGuard {
  /// Write `content` to a fresh `config.toml`
  pub fn new(content: &str) -> anyhow::Result<Self> {
    let temp_dir = TempDir::new().map_err(|e| anyhow::anyhow!("Failed to create temporary directory: {e}"))?;
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, content).map_err(|e| anyhow::anyhow!("Failed to write test config: {e}"))?;

    Ok(Self { temp_dir, path })
  }

  /// Path of the configuration file
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Directory containing the configuration file
  pub fn dir(&self) -> &Path {
    self.temp_dir.path()
  }

  /// Load the file through the real loader
  pub fn load(&self) -> anyhow::Result<Config> {
    Config::load(&self.path)
  }
}
