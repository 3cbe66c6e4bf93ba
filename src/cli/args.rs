//! CLI argument definitions using clap
//!
//! Commands:
//! - carbon-inspect [--path <root>] display <file>
//! - carbon-inspect [--path <root>] build
//! - carbon-inspect [--path <root>] example <class> [--build] [--debug]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// carbon-inspect - Decode CarbonData metadata files to JSON
#[derive(Parser, Debug)]
#[command(name = "carbon-inspect")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// CarbonData source root (overrides CARBONDATA_PATH)
    #[arg(long, global = true)]
    pub path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a metadata file and print it as JSON
    Display {
        /// Metadata file to decode
        file: PathBuf,
    },

    /// Build the CarbonData source tree with Maven
    Build,

    /// Run one of the bundled CarbonData example programs
    Example {
        /// Example class name under org.carbondata.examples
        class: String,

        /// Build the source tree first
        #[arg(long)]
        build: bool,

        /// Launch with mvnDebug instead of mvn
        #[arg(long)]
        debug: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
