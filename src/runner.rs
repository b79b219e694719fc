//! Invocation of the external boxes executable.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Errors that can occur while running boxes.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} {args} exited with {status}: {stderr}")]
    Failed {
        program: String,
        args: String,
        status: String,
        stderr: String,
    },
}

/// Something that answers boxes invocations with the text boxes prints.
///
/// The pipeline only ever talks to boxes through this trait, so tests can
/// substitute canned output for a real executable.
pub trait Boxes {
    /// Run boxes with `args` and return its standard output.
    fn run(&self, args: &[&str]) -> Result<String, RunError>;
}

/// A boxes executable on disk.
#[derive(Debug, Clone)]
pub struct BoxesExecutable {
    program: PathBuf,
}

impl BoxesExecutable {
    /// Run boxes from the given path.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Path of the boxes executable.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Boxes for BoxesExecutable {
    fn run(&self, args: &[&str]) -> Result<String, RunError> {
        let program = self.program().display().to_string();
        tracing::debug!(%program, ?args, "running boxes");

        let output = Command::new(self.program())
            .args(args)
            .output()
            .map_err(|source| RunError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RunError::Failed {
                program,
                args: args.join(" "),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
