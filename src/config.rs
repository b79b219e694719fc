//! Settings parsing and validation.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default boxes config file queried for designs.
pub const DEFAULT_CONFIG: &str = "boxes-config";
/// Default boxes executable.
pub const DEFAULT_EXECUTABLE: &str = "boxes.exe";
/// Default output file name template.
pub const DEFAULT_OUTPUT: &str = "designs-vx_y_z.yml";

/// Errors that can occur while loading or validating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("setting must not be empty: {0}")]
    Empty(&'static str),
}

/// Where to find boxes and where to put the generated data file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// boxes config file to query.
    #[serde(default = "default_config")]
    pub config: PathBuf,

    /// boxes executable to run.
    #[serde(default = "default_executable")]
    pub executable: PathBuf,

    /// Output file template; `x_y_z` is replaced by the boxes version.
    #[serde(default = "default_output")]
    pub output: String,
}

fn default_config() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG)
}

fn default_executable() -> PathBuf {
    PathBuf::from(DEFAULT_EXECUTABLE)
}

fn default_output() -> String {
    DEFAULT_OUTPUT.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config: default_config(),
            executable: default_executable(),
            output: default_output(),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Override individual settings, e.g. from command-line flags.
    pub fn with_overrides(
        mut self,
        config: Option<PathBuf>,
        executable: Option<PathBuf>,
        output: Option<String>,
    ) -> Self {
        if let Some(config) = config {
            self.config = config;
        }
        if let Some(executable) = executable {
            self.executable = executable;
        }
        if let Some(output) = output {
            self.output = output;
        }
        self
    }

    /// Validate the settings.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.config.as_os_str().is_empty() {
            return Err(SettingsError::Empty("config"));
        }
        if self.executable.as_os_str().is_empty() {
            return Err(SettingsError::Empty("executable"));
        }
        if self.output.is_empty() {
            return Err(SettingsError::Empty("output"));
        }
        Ok(())
    }
}
