//! CLI module for carbon-inspect
//!
//! Provides command-line interface for:
//! - display: Decode a metadata file to JSON
//! - build: Build the CarbonData source tree
//! - example: Run a bundled example program

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{build, display, example, run, run_command, MavenInvocation, EXAMPLES_PACKAGE};
pub use config::{Config, RootSource, ROOT_ENV};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{render_pretty_json, write_line, write_pretty_json};
