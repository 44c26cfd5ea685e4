//! # Interactive Prompts
//!
//! Asks the user for a credential when the backend has none. Prompts always
//! go through the controlling terminal, never stdin/stdout, because those
//! carry the protocol exchange with git.
//!
//! Providers with a default identity only ask for a token (masked). All
//! others ask for a username (visible) and a password (masked).

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};

use console::style;

use crate::consts::{TTY_INPUT, TTY_OUTPUT};
use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::store::StoredCredential;

/// Line-oriented access to a terminal
pub trait Terminal {
  /// Show `text` without a trailing newline
  fn write_prompt(&mut self, text: &str) -> io::Result<()>;

  /// Read one visible line
  fn read_line(&mut self) -> io::Result<String>;

  /// Read one line with echo disabled
  fn read_secret(&mut self) -> io::Result<String>;
}

/// Obtains a credential interactively for a namespace
pub trait Prompter {
  fn prompt(&self, provider: &dyn Provider, namespace: &str) -> Result<StoredCredential>;
}

/// The process's controlling terminal
pub struct TtyTerminal {
  input: BufReader<File>,
  output: File,
  colors: bool,
}

impl TtyTerminal {
  /// Open the controlling terminal for reading and writing
  pub fn open() -> io::Result<Self> {
    let input = OpenOptions::new().read(true).open(TTY_INPUT)?;
    let output = OpenOptions::new().write(true).open(TTY_OUTPUT)?;

    Ok(Self {
      input: BufReader::new(input),
      output,
      colors: console::colors_enabled_stderr(),
    })
  }
}

impl Terminal for TtyTerminal {
  fn write_prompt(&mut self, text: &str) -> io::Result<()> {
    let styled = style(text).cyan().bold().force_styling(self.colors);
    write!(self.output, "{styled}")?;
    self.output.flush()
  }

  fn read_line(&mut self) -> io::Result<String> {
    let mut line = String::new();
    if self.input.read_line(&mut line)? == 0 {
      return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "terminal closed"));
    }
    Ok(line)
  }

  fn read_secret(&mut self) -> io::Result<String> {
    rpassword::read_password()
  }
}

/// Prompts on the controlling terminal, opened afresh for each prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct TtyPrompter;

impl Prompter for TtyPrompter {
  fn prompt(&self, provider: &dyn Provider, namespace: &str) -> Result<StoredCredential> {
    let mut terminal = TtyTerminal::open().map_err(|e| Error::prompt("cannot open terminal", e))?;
    prompt_for_credentials(&mut terminal, provider, namespace)
  }
}

/// Ask for the credential `provider` needs for `namespace`
pub fn prompt_for_credentials(
  terminal: &mut dyn Terminal,
  provider: &dyn Provider,
  namespace: &str,
) -> Result<StoredCredential> {
  terminal
    .write_prompt(&provider.token_prompt(namespace))
    .map_err(|e| Error::prompt("writing prompt", e))?;

  if let Some(username) = provider.default_username() {
    let token = terminal.read_secret().map_err(|e| Error::prompt("reading token", e))?;
    return Ok(StoredCredential::new(username, token.trim()));
  }

  let username = terminal.read_line().map_err(|e| Error::prompt("reading username", e))?;

  terminal
    .write_prompt("Password: ")
    .map_err(|e| Error::prompt("writing prompt", e))?;
  let password = terminal
    .read_secret()
    .map_err(|e| Error::prompt("reading password", e))?;

  Ok(StoredCredential::new(username.trim(), password.trim()))
}
