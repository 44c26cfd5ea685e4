//! # Output Formatting
//!
//! Diagnostics for the user. Everything here goes to stderr; stdout belongs
//! to the credential protocol.

use owo_colors::{OwoColorize, Stream};

/// Print an error message
pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    "✗ error:".if_supports_color(Stream::Stderr, |text| text.red().bold().to_string()),
    message
  );
}

/// Print a warning message
pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    "⚠ warning:".if_supports_color(Stream::Stderr, |text| text.yellow().bold().to_string()),
    message
  );
}
