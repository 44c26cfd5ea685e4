//! # Command Line Interface
//!
//! Git runs the helper as `git-credential-org <operation>` and exchanges the
//! credential record over stdin/stdout.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand};
use credorg_core::consts::ENV_CONFIG_PATH;
use credorg_core::{Config, CredentialHandler, Operation};
use tracing::debug;

/// Top-level CLI command for the credential helper
#[derive(Parser)]
#[command(name = "git-credential-org")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "A git credential helper that resolves credentials by organization namespace")]
#[command(
  long_about = "A git credential helper that resolves credentials by organization namespace.\n\n\
        Repositories under the same first path segment (e.g. gitlab.com/org1/...) share a\n\
        single credential, kept in the OS keychain or a 1Password vault.\n\n\
        Configure git with:\n  \
        git config --global credential.helper org\n  \
        git config --global credential.useHttpPath true"
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for logging on stderr.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Path to the configuration file
  #[arg(long, global = true, env = ENV_CONFIG_PATH, value_name = "PATH")]
  pub config: Option<PathBuf>,

  /// Credential operation requested by git
  #[command(subcommand)]
  pub command: Commands,
}

/// Operations git sends to credential helpers
#[derive(Subcommand)]
pub enum Commands {
  /// Return a credential for the request on stdin
  #[command(long_about = "Reads a credential request from stdin and writes the matching credential to stdout.\n\n\
            When no credential is stored for the request's namespace, prompts on the terminal.\n\
            The prompted credential is only saved once git reports it worked.")]
  Get,

  /// Save the credential on stdin
  #[command(long_about = "Saves the credential on stdin under its namespace, replacing any existing one.\n\n\
            Requests without both a username and a password are ignored.")]
  Store,

  /// Remove the credential for the request on stdin
  #[command(long_about = "Removes the stored credential for the request's namespace.\n\n\
            Erasing a namespace that has no credential succeeds.")]
  Erase,

  /// Print version information
  Version,

  /// Operations this helper does not implement are ignored
  #[command(external_subcommand)]
  Other(Vec<String>),
}

impl Commands {
  /// The handler operation, or `None` for ignored operations
  pub fn operation(&self) -> Option<Operation> {
    match self {
      Commands::Get => Some(Operation::Get),
      Commands::Store => Some(Operation::Store),
      Commands::Erase => Some(Operation::Erase),
      Commands::Version => None,
      Commands::Other(args) => args.first().and_then(|name| Operation::from_name(name)),
    }
  }
}

/// Print the helper's name and version to stdout
pub fn print_version() -> Result<()> {
  writeln!(io::stdout(), "git-credential-org {}", env!("CARGO_PKG_VERSION"))?;
  Ok(())
}

/// Run the parsed command against `config` using stdin and stdout
pub fn handle_cli(cli: &Cli, config: &Config) -> Result<()> {
  if let Commands::Version = cli.command {
    return print_version();
  }

  let Some(operation) = cli.command.operation() else {
    if let Commands::Other(args) = &cli.command {
      debug!("Ignoring unsupported operation: {}", args.join(" "));
    }
    return Ok(());
  };

  let handler = CredentialHandler::new(config);
  handler.run(operation, io::stdin().lock(), io::stdout().lock())?;

  Ok(())
}
