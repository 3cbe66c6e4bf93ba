//! carbon-inspect CLI entry point
//!
//! All logic is delegated to the CLI module. Errors go to stderr and the
//! process exits non-zero.

use carbon_inspect::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
