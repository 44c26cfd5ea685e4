//! Environment variable management for testing
//!
//! Tests touching process-wide variables must restore them so they don't
//! interfere with each other.

use std::env;
use std::ffi::{OsStr, OsString};

/// Sets an environment variable for the guard's lifetime, restoring the
/// previous value (or absence) when dropped
pub struct EnvVarGuard {
  name: String,
  original: Option<OsString>,
}

impl EnvVarGuard {
  /// Set `name` to `value`
  pub fn set(name: &str, value: impl AsRef<OsStr>) -> Self {
    let original = env::var_os(name);
    unsafe {
      env::set_var(name, value);
    }
    Self {
      name: name.to_string(),
      original,
    }
  }

  /// Remove `name`
  pub fn remove(name: &str) -> Self {
    let original = env::var_os(name);
    unsafe {
      env::remove_var(name);
    }
    Self {
      name: name.to_string(),
      original,
    }
  }
}

impl Drop for EnvVarGuard {
  fn drop(&mut self) {
    match &self.original {
      Some(val) => unsafe {
        env::set_var(&self.name, val);
      },
      None => unsafe {
        env::remove_var(&self.name);
      },
    }
  }
}
