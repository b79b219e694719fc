//! Extraction of design details from `boxes -l` output.

use crate::ansi;
use crate::design::Design;
use crate::runner::{Boxes, RunError};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Tag value boxes prints when a design has no tags.
const NO_TAGS: &str = "none";

/// Tag that marks a sample as containing ANSI color codes.
const COLOR_TAG: &str = "color";

/// Line that introduces the sample block.
const SAMPLE_HEADER: &str = "Sample:";

/// Classification of a single line of detail output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetailLine<'a> {
    Designer(&'a str),
    Author(&'a str),
    Tags(&'a str),
    SampleHeader,
    Other,
}

/// Where the scanner is in the detail output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Fields,
    Sample,
}

struct FieldPatterns {
    designer: Regex,
    author: Regex,
    tags: Regex,
    email: Regex,
}

fn patterns() -> &'static FieldPatterns {
    static PATTERNS: OnceLock<FieldPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| FieldPatterns {
        designer: Regex::new(r"^Original Designer:\s+(.*)")
            .expect("designer pattern is valid"),
        author: Regex::new(r"^Author:\s+(.*)").expect("author pattern is valid"),
        tags: Regex::new(r"^Tags:\s+(.*)").expect("tags pattern is valid"),
        email: Regex::new(r" <[^>]+>$").expect("email pattern is valid"),
    })
}

fn capture<'a>(pattern: &Regex, line: &'a str) -> Option<&'a str> {
    pattern
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

impl<'a> DetailLine<'a> {
    fn classify(line: &'a str) -> Self {
        let p = patterns();
        if let Some(value) = capture(&p.designer, line) {
            DetailLine::Designer(value)
        } else if let Some(value) = capture(&p.author, line) {
            DetailLine::Author(value)
        } else if let Some(value) = capture(&p.tags, line) {
            DetailLine::Tags(value)
        } else if line == SAMPLE_HEADER {
            DetailLine::SampleHeader
        } else {
            DetailLine::Other
        }
    }
}

/// Remove a trailing ` <email>` from an attribution.
pub fn strip_email(attribution: &str) -> String {
    patterns().email.replace(attribution, "").into_owned()
}

/// Turn the value of a `Tags:` line into a sorted tag list.
///
/// Returns `None` if no real tag remains after dropping `none`.
pub fn parse_tags(value: &str) -> Option<Vec<String>> {
    let mut tags: Vec<String> = value
        .split(", ")
        .filter(|tag| *tag != NO_TAGS)
        .map(str::to_string)
        .collect();
    tags.sort();
    tags.dedup();
    (!tags.is_empty()).then_some(tags)
}

fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Remove the common indentation from sample lines.
///
/// Leading empty lines are dropped, lines shorter than the common indentation
/// are dropped, and trailing whitespace is trimmed from the result.
pub fn normalize_sample<S: AsRef<str>>(lines: &[S]) -> String {
    let lines: Vec<&str> = lines.iter().map(|line| line.as_ref()).collect();

    let indent = lines
        .iter()
        .filter(|line| !line.is_empty())
        .map(|line| leading_whitespace(line))
        .min()
        .unwrap_or(0);

    let kept: Vec<String> = lines
        .iter()
        .skip_while(|line| line.is_empty())
        .filter(|line| line.chars().count() >= indent)
        .map(|line| line.chars().skip(indent).collect())
        .collect();

    kept.join("\n").trim_end().to_string()
}

/// Fill in `design` from the lines of its detail output.
pub fn apply_details<'a>(design: &mut Design, lines: impl IntoIterator<Item = &'a str>) {
    let mut state = ScanState::Fields;
    let mut sample_lines: Vec<&str> = Vec::new();

    for line in lines {
        if state == ScanState::Sample {
            sample_lines.push(line.trim_end());
            continue;
        }
        match DetailLine::classify(line) {
            DetailLine::Designer(value) => design.designer = Some(strip_email(value)),
            DetailLine::Author(value) => design.coder = Some(strip_email(value)),
            DetailLine::Tags(value) => design.tags = parse_tags(value),
            DetailLine::SampleHeader => state = ScanState::Sample,
            DetailLine::Other => {}
        }
    }

    if !sample_lines.is_empty() {
        let sample = normalize_sample(&sample_lines);
        design.sample = (!sample.is_empty()).then_some(sample);
    }

    if design.has_tag(COLOR_TAG) {
        if let Some(sample) = design.sample.as_mut() {
            *sample = ansi::to_html(sample);
        }
    }
}

/// Ask boxes for the details of `design` and record them.
pub fn add_design_details(
    boxes: &dyn Boxes,
    config: &Path,
    design: &mut Design,
) -> Result<(), RunError> {
    let config = config.to_string_lossy();
    let output = boxes.run(&[
        "-f",
        &*config,
        "-q",
        "(undoc)",
        "-d",
        design.name.as_str(),
        "-l",
    ])?;
    apply_details(design, output.lines());
    tracing::debug!(
        design = %design.name,
        tags = design.tags.as_ref().map_or(0, Vec::len),
        has_sample = design.sample.is_some(),
        "parsed design details"
    );
    Ok(())
}
