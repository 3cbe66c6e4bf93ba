//! Source-root resolution
//!
//! The root is the first of:
//! 1. `--path`
//! 2. `CARBONDATA_PATH` (empty counts as unset)
//! 3. the current working directory

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::observability::{log_event_with_fields, Event};
use crate::schema::SchemaCatalog;

use super::errors::{CliError, CliResult};

/// Environment variable naming the CarbonData source root
pub const ROOT_ENV: &str = "CARBONDATA_PATH";

/// Where the root came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootSource {
    Argument,
    Environment,
    WorkingDirectory,
}

impl RootSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RootSource::Argument => "argument",
            RootSource::Environment => "environment",
            RootSource::WorkingDirectory => "working_directory",
        }
    }
}

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub root_source: RootSource,
}

impl Config {
    /// Resolves the root from the argument, the process environment and cwd.
    pub fn resolve(explicit: Option<PathBuf>) -> CliResult<Self> {
        let cwd = env::current_dir().map_err(|e| {
            CliError::config_error(format!("Cannot determine working directory: {}", e))
        })?;
        let config = Self::resolve_with(explicit, env::var_os(ROOT_ENV), cwd);

        log_event_with_fields(
            Event::ConfigResolved,
            &[
                ("root", &config.root.display().to_string()),
                ("source", config.root_source.as_str()),
            ],
        );

        Ok(config)
    }

    /// Pure resolution over already-read inputs.
    pub fn resolve_with(explicit: Option<PathBuf>, env_root: Option<OsString>, cwd: PathBuf) -> Self {
        if let Some(root) = explicit {
            return Self {
                root,
                root_source: RootSource::Argument,
            };
        }

        match env_root.filter(|v| !v.is_empty()) {
            Some(root) => Self {
                root: PathBuf::from(root),
                root_source: RootSource::Environment,
            },
            None => Self {
                root: cwd,
                root_source: RootSource::WorkingDirectory,
            },
        }
    }

    /// Directory holding the `.thrift` IDL files
    pub fn thrift_dir(&self) -> PathBuf {
        SchemaCatalog::for_root(&self.root).thrift_dir().to_path_buf()
    }

    /// Maven module holding the example programs
    pub fn examples_dir(&self) -> PathBuf {
        self.root.join("examples")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
