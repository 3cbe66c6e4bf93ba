//! CLI command implementations
//!
//! `display` decodes one metadata file. `build` and `example` shell out to
//! Maven in the source tree and only report its exit status.

use std::io;
use std::path::{Path, PathBuf};
use std::process;

use crate::inspect::{Inspection, Inspector};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::SchemaCatalog;

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{write_line, write_pretty_json};

/// Package holding the bundled example programs
pub const EXAMPLES_PACKAGE: &str = "org.carbondata.examples";

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let config = Config::resolve(cli.path)?;
    run_command(&config, cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(config: &Config, cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Display { file } => display(config, &file),
        Command::Build => build(config),
        Command::Example { class, build, debug } => example(config, &class, build, debug),
    }
}

/// Decode `file` and print the result as JSON on stdout
///
/// Unrecognized file names are reported on stdout and are not an error.
pub fn display(config: &Config, file: &Path) -> CliResult<()> {
    let mut inspector = Inspector::new(SchemaCatalog::new(config.thrift_dir()));
    let mut stdout = io::stdout();

    match inspector.inspect(file)? {
        Inspection::Records(records) => write_pretty_json(&mut stdout, &records),
        Inspection::Document(document) => write_pretty_json(&mut stdout, &document),
        Inspection::Unrecognized(path) => write_line(&format!("Illegal file {}.", path.display())),
    }
}

/// Build the source tree
pub fn build(config: &Config) -> CliResult<()> {
    run_maven(&MavenInvocation::build(config.root()))
}

/// Run an example program, optionally building first
pub fn example(config: &Config, class: &str, build_first: bool, debug: bool) -> CliResult<()> {
    if build_first {
        build(config)?;
    }
    run_maven(&MavenInvocation::example(&config.examples_dir(), class, debug))
}

/// A Maven process to launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenInvocation {
    pub program: &'static str,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl MavenInvocation {
    /// `mvn -DskipTests clean install` in `root`
    pub fn build(root: &Path) -> Self {
        Self {
            program: "mvn",
            args: vec![
                "-DskipTests".to_string(),
                "clean".to_string(),
                "install".to_string(),
            ],
            cwd: root.to_path_buf(),
        }
    }

    /// `mvn exec:java` (or `mvnDebug`) for one example class in `examples_dir`
    pub fn example(examples_dir: &Path, class: &str, debug: bool) -> Self {
        Self {
            program: if debug { "mvnDebug" } else { "mvn" },
            args: vec![
                "exec:java".to_string(),
                format!("-Dexec.mainClass={}.{}", EXAMPLES_PACKAGE, class),
            ],
            cwd: examples_dir.to_path_buf(),
        }
    }

    /// Command line as it would be typed, for logs and errors
    pub fn command_line(&self) -> String {
        let mut line = self.program.to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Runs Maven with inherited stdio and waits for it.
fn run_maven(invocation: &MavenInvocation) -> CliResult<()> {
    let command_line = invocation.command_line();
    let cwd = invocation.cwd.display().to_string();
    log_event_with_fields(
        Event::MavenInvoked,
        &[("command", &command_line), ("cwd", &cwd)],
    );

    let status = process::Command::new(invocation.program)
        .args(&invocation.args)
        .current_dir(&invocation.cwd)
        .status()
        .map_err(|e| {
            CliError::io_error(format!("Failed to launch '{}': {}", invocation.program, e))
        })?;

    if status.success() {
        return Ok(());
    }

    let status_text = status
        .code()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "signal".to_string());
    log_event_with_fields(
        Event::MavenFailed,
        &[("command", &command_line), ("status", &status_text)],
    );

    Err(CliError::build_failed(format!(
        "'{}' in {} exited with status {}",
        command_line, cwd, status_text
    )))
}
