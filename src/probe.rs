//! Detection of the boxes version.

use crate::runner::{Boxes, RunError};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors that can occur while reading the boxes version.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to read boxes version: {0}")]
    Run(#[from] RunError),

    #[error("failed to read boxes version from banner: {banner:?}")]
    Unparseable { banner: String },
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^boxes version ([^ ]+) \(").expect("version pattern is valid")
    })
}

/// Extract the version token from the first line of `boxes -v` output.
pub fn parse_version_banner(output: &str) -> Option<&str> {
    let first_line = output.lines().next()?;
    version_pattern()
        .captures(first_line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Ask boxes for its version.
///
/// The version ends up in the output file name, so a banner that does not
/// match is an error rather than a fallback.
pub fn read_boxes_version(boxes: &dyn Boxes) -> Result<String, ProbeError> {
    let output = boxes.run(&["-v"])?;
    match parse_version_banner(&output) {
        Some(version) => {
            tracing::debug!(version, "detected boxes version");
            Ok(version.to_string())
        }
        None => Err(ProbeError::Unparseable {
            banner: output.lines().next().unwrap_or_default().to_string(),
        }),
    }
}
