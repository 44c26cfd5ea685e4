//! # git-credential-org CLI Library
//!
//! Command-line definition, logging setup and dispatch for the
//! `git-credential-org` binary.

pub mod cli;
pub mod logging;
pub mod output;
