//! # git-credential-org Entry Point
//!
//! Git credential helper keyed by organization namespace. Git invokes it with
//! `get`, `store` or `erase` and speaks the credential protocol over
//! stdin/stdout; everything else this binary prints goes to stderr.

use std::env;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use credorg_cli::cli::{Cli, Commands, handle_cli, print_version};
use credorg_cli::logging;
use credorg_cli::output::print_error;
use credorg_core::consts::{ENV_DEBUG, LEGACY_ENV_DEBUG};
use credorg_core::{Config, default_config_path};
use tracing::debug;

fn main() -> ExitCode {
  let cli = Cli::parse();

  match run(&cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{e:#}"));
      ExitCode::FAILURE
    }
  }
}

fn run(cli: &Cli) -> Result<()> {
  // Needs no configuration
  if let Commands::Version = cli.command {
    return print_version();
  }

  let config_path = match &cli.config {
    Some(path) => path.clone(),
    None => default_config_path()?,
  };
  let config = Config::load(&config_path)?;

  let debug_env = [ENV_DEBUG, LEGACY_ENV_DEBUG]
    .into_iter()
    .any(|name| env::var(name).is_ok_and(|value| value == "1"));
  let configured_level = Some(config.defaults.log_level.as_str()).filter(|level| !level.is_empty());
  let level = logging::log_level(cli.verbose, debug_env, configured_level);
  logging::init(level);

  debug!("Tracing initialized with level: {level}, config: {}", config_path.display());

  handle_cli(cli, &config)
}
