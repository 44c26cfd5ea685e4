//! # Logging
//!
//! Tracing setup. Logs are written to stderr so they never mix with the
//! protocol records on stdout.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::output::print_warning;

/// Choose the log level
///
/// `-v` flags win, then the debug environment variable, then the configured
/// level. Anything unparsable falls back to warnings.
pub fn log_level(verbose: u8, debug_env: bool, configured: Option<&str>) -> LevelFilter {
  match verbose {
    0 => {}
    1 => return LevelFilter::INFO,  // -v: info, warnings, and errors
    2 => return LevelFilter::DEBUG, // -vv: debug, info, warnings, and errors
    _ => return LevelFilter::TRACE, // -vvv or more: trace and everything else
  }

  if debug_env {
    return LevelFilter::DEBUG;
  }

  match configured.map(str::parse::<LevelFilter>) {
    Some(Ok(level)) => level,
    Some(Err(_)) => {
      print_warning(&format!(
        "ignoring invalid log_level '{}'",
        configured.unwrap_or_default()
      ));
      LevelFilter::WARN
    }
    None => LevelFilter::WARN,
  }
}

/// Install the global subscriber at `level`, still honouring `RUST_LOG`
pub fn init(level: LevelFilter) {
  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
    .with(EnvFilter::from_default_env().add_directive(level.into()))
    .init();
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn verbosity_flags_win() {
    assert_eq!(log_level(1, true, Some("error")), LevelFilter::INFO);
    assert_eq!(log_level(2, false, None), LevelFilter::DEBUG);
    assert_eq!(log_level(5, false, None), LevelFilter::TRACE);
  }

  #[test]
  fn debug_env_beats_config() {
    assert_eq!(log_level(0, true, Some("error")), LevelFilter::DEBUG);
  }

  #[test]
  fn config_level_is_used_otherwise() {
    assert_eq!(log_level(0, false, Some("info")), LevelFilter::INFO);
    assert_eq!(log_level(0, false, Some("off")), LevelFilter::OFF);
    assert_eq!(log_level(0, false, None), LevelFilter::WARN);
  }

  #[test]
  fn invalid_config_level_falls_back_to_warn() {
    assert_eq!(log_level(0, false, Some("loud")), LevelFilter::WARN);
  }
}
