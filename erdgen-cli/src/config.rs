//! CLI configuration handling.
//!
//! An explicit `--config` path must exist. Otherwise `erdgen.toml` in the
//! working directory is used when present, and built-in defaults when not.
//! Paths inside the config file are relative to the file's directory.

use erdgen_schema::SchemaConfig;
use erdgen_schema::config::CONFIG_FILE_NAME;
use std::path::{Path, PathBuf};

use crate::error::{CliError, CliResult};

/// A loaded configuration and the directory its paths are relative to.
#[derive(Debug, Clone)]
pub struct Project {
    /// Parsed configuration.
    pub config: SchemaConfig,
    /// Directory config-relative paths resolve against.
    pub root: PathBuf,
    /// Config file that was read, if any.
    pub source: Option<PathBuf>,
}

impl Project {
    /// Load the project configuration.
    pub fn load(explicit: Option<&Path>) -> CliResult<Self> {
        let cwd = std::env::current_dir()?;
        Self::load_from(&cwd, explicit)
    }

    /// Load the project configuration relative to `cwd`.
    pub fn load_from(cwd: &Path, explicit: Option<&Path>) -> CliResult<Self> {
        let path = match explicit {
            Some(path) => {
                let path = cwd.join(path);
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Some(path)
            }
            None => Some(cwd.join(CONFIG_FILE_NAME)).filter(|p| p.exists()),
        };

        match path {
            Some(path) => {
                let config = SchemaConfig::from_file(&path)?;
                let root = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| cwd.to_path_buf());
                tracing::debug!(path = %path.display(), "loaded config");
                Ok(Self {
                    config,
                    root,
                    source: Some(path),
                })
            }
            None => Ok(Self {
                config: SchemaConfig::default(),
                root: cwd.to_path_buf(),
                source: None,
            }),
        }
    }

    /// The diagram to read: the command-line path, else `schema.path`.
    pub fn schema_path(&self, arg: Option<PathBuf>) -> CliResult<PathBuf> {
        let path = arg.unwrap_or_else(|| self.root.join(&self.config.schema.path));
        if !path.exists() {
            return Err(CliError::Config(format!(
                "Schema file not found: {}",
                path.display()
            )));
        }
        Ok(path)
    }

    /// The file to write: the command-line path, else `schema.output`.
    pub fn output_path(&self, arg: Option<PathBuf>) -> PathBuf {
        arg.unwrap_or_else(|| self.root.join(&self.config.schema.output))
    }
}
