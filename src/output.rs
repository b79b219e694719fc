//! YAML generation for the website's design data file.
//!
//! The document is emitted directly rather than through a generic
//! serializer, because the consumer expects a fixed layout: list items
//! indented by four spaces, attributions in single quotes, samples as
//! literal blocks and no keys for missing values.

use crate::design::Design;
use anyhow::{Context, Result};
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::NamedTempFile;

/// Placeholder in the output file name that receives the boxes version.
pub const VERSION_PLACEHOLDER: &str = "x_y_z";

/// Indentation of the keys of a design mapping.
const KEY_INDENT: &str = "  ";
/// Indentation of list items nested under a design key.
const ITEM_INDENT: &str = "    ";
/// Indentation of literal block content.
const BLOCK_INDENT: &str = "    ";
/// Indentation indicator for blocks whose first line starts with a space.
const BLOCK_INDENT_HINT: usize = 2;

/// Scalar presentation styles used in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarStyle {
    Plain,
    SingleQuoted,
    Literal,
}

/// Patterns a YAML 1.1 reader would resolve to something other than a string.
fn implicit_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"^(?:yes|Yes|YES|no|No|NO|true|True|TRUE|false|False|FALSE|on|On|ON|off|Off|OFF)$",
            r"^(?:~|null|Null|NULL)$",
            r"^(?:[-+]?0b[0-1_]+|[-+]?0[0-7_]+|[-+]?(?:0|[1-9][0-9_]*)|[-+]?0x[0-9a-fA-F_]+|[-+]?[1-9][0-9_]*(?::[0-5]?[0-9])+)$",
            r"^(?:[-+]?[0-9][0-9_]*\.[0-9_]*(?:[eE][-+][0-9]+)?|\.[0-9][0-9_]*(?:[eE][-+][0-9]+)?|[-+]?[0-9][0-9_]*(?::[0-5]?[0-9])+\.[0-9_]*|[-+]?\.(?:inf|Inf|INF)|\.(?:nan|NaN|NAN))$",
            r"^(?:[0-9]{4}-[0-9]{2}-[0-9]{2}|[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}(?:[Tt]|[ \t]+)[0-9]{1,2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]*)?(?:[ \t]*(?:Z|[-+][0-9]{1,2}(?::[0-9]{2})?))?)$",
            r"^(?:<<|=)$",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("implicit resolver pattern is valid"))
        .collect()
    })
}

/// Characters that can appear unescaped in the output.
fn is_printable(c: char) -> bool {
    matches!(c,
        '\n'
        | '\x20'..='\x7e'
        | '\u{a0}'..='\u{d7ff}'
        | '\u{e000}'..='\u{fffd}'
        | '\u{10000}'..='\u{10ffff}')
        && c != '\u{feff}'
}

fn has_special_chars(value: &str) -> bool {
    value.chars().any(|c| !is_printable(c))
}

/// Check whether `value` can be written without quotes and read back unchanged.
fn is_plain_safe(value: &str) -> bool {
    let Some(first) = value.chars().next() else {
        return false;
    };
    let followed_by_space = value.chars().nth(1).map_or(true, |c| c == ' ');

    if value.contains('\n') || has_special_chars(value) {
        return false;
    }
    if value.starts_with(' ') || value.ends_with(' ') {
        return false;
    }
    if "#,[]{}&*!|>'\"%@`".contains(first) {
        return false;
    }
    if "-?:".contains(first) && followed_by_space {
        return false;
    }
    if value.starts_with("---") || value.starts_with("...") {
        return false;
    }
    if value.contains(": ") || value.ends_with(':') || value.contains(" #") {
        return false;
    }
    !implicit_patterns().iter().any(|p| p.is_match(value))
}

/// Check whether `value` can be written as a literal block scalar.
fn is_literal_safe(value: &str) -> bool {
    !value.is_empty()
        && !has_special_chars(value)
        && !value.contains(" \n")
        && !value.ends_with(' ')
        && !value.contains(['\u{85}', '\u{2028}', '\u{2029}'])
}

fn single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\0' => out.push_str("\\0"),
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\x0b' => out.push_str("\\v"),
            '\x0c' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\x1b' => out.push_str("\\e"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{85}' => out.push_str("\\N"),
            '\u{2028}' => out.push_str("\\L"),
            '\u{2029}' => out.push_str("\\P"),
            c if is_printable(c) => out.push(c),
            c if (c as u32) <= 0xff => out.push_str(&format!("\\x{:02X}", c as u32)),
            c if (c as u32) <= 0xffff => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push_str(&format!("\\U{:08X}", c as u32)),
        }
    }
    out.push('"');
    out
}

/// Render a literal block scalar, header included, without a trailing newline.
fn literal_block(value: &str) -> String {
    let mut header = String::from("|");
    if value.starts_with(' ') || value.starts_with('\n') {
        header.push_str(&BLOCK_INDENT_HINT.to_string());
    }
    if !value.ends_with('\n') {
        header.push('-');
    } else if value.len() == 1 || value.ends_with("\n\n") {
        header.push('+');
    }

    let body = value.strip_suffix('\n').unwrap_or(value);
    let mut out = header;
    for line in body.split('\n') {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(BLOCK_INDENT);
            out.push_str(line);
        }
    }
    out
}

/// Render `value` in the requested style, falling back to a quoted form when
/// the style cannot represent it faithfully.
fn scalar(value: &str, style: ScalarStyle) -> String {
    match style {
        ScalarStyle::Plain if is_plain_safe(value) => value.to_string(),
        ScalarStyle::Plain | ScalarStyle::SingleQuoted
            if !value.contains('\n') && !has_special_chars(value) =>
        {
            single_quoted(value)
        }
        ScalarStyle::Literal if is_literal_safe(value) => literal_block(value),
        _ => double_quoted(value),
    }
}

fn push_field(out: &mut String, key: &str, value: &str, style: ScalarStyle) {
    out.push_str(KEY_INDENT);
    out.push_str(key);
    out.push_str(": ");
    out.push_str(&scalar(value, style));
    out.push('\n');
}

fn push_list(out: &mut String, key: &str, items: &[String]) {
    out.push_str(KEY_INDENT);
    out.push_str(key);
    out.push_str(":\n");
    for item in items {
        out.push_str(ITEM_INDENT);
        out.push_str("- ");
        out.push_str(&scalar(item, ScalarStyle::Plain));
        out.push('\n');
    }
}

fn push_design(out: &mut String, design: &Design) {
    out.push_str("- name: ");
    out.push_str(&scalar(&design.name, ScalarStyle::Plain));
    out.push('\n');

    if let Some(alias) = &design.alias {
        push_list(out, "alias", alias);
    }
    if let Some(designer) = &design.designer {
        push_field(out, "designer", designer, ScalarStyle::SingleQuoted);
    }
    if let Some(coder) = &design.coder {
        push_field(out, "coder", coder, ScalarStyle::SingleQuoted);
    }
    if let Some(tags) = &design.tags {
        push_list(out, "tags", tags);
    }
    if let Some(sample) = &design.sample {
        push_field(out, "sample", sample, ScalarStyle::Literal);
    }
}

/// Render the designs as a YAML document.
pub fn render_designs(designs: &[Design]) -> String {
    if designs.is_empty() {
        return "[]\n".to_string();
    }

    let mut out = String::new();
    for design in designs {
        push_design(&mut out, design);
    }
    out
}

/// Substitute the boxes version into the output file name template.
///
/// Dots in the version become underscores, so `2.3.0` turns
/// `designs-vx_y_z.yml` into `designs-v2_3_0.yml`.
pub fn resolve_output_path(template: &str, version: &str) -> PathBuf {
    PathBuf::from(template.replace(VERSION_PLACEHOLDER, &version.replace('.', "_")))
}

/// Write the designs to `path`.
///
/// The document goes to a temporary file next to `path` first and replaces
/// the destination only once it is complete.
pub fn write_designs(designs: &[Design], path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
    file.write_all(render_designs(designs).as_bytes())?;
    file.flush()?;
    file.persist(path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Option<Vec<String>> {
        Some(items.iter().map(|s| s.to_string()).collect())
    }

    fn full_design() -> Design {
        Design {
            name: "ansi".to_string(),
            alias: strings(&["ansi-rounded"]),
            designer: Some("Thomas Jensen".to_string()),
            coder: Some("Thomas Jensen".to_string()),
            tags: strings(&["box", "programming"]),
            sample: Some("┌──┐\n│  │\n└──┘".to_string()),
        }
    }

    #[test]
    fn test_full_design_layout() {
        let output = render_designs(&[full_design()]);
        assert_eq!(
            output,
            "- name: ansi\n\
             \x20 alias:\n\
             \x20   - ansi-rounded\n\
             \x20 designer: 'Thomas Jensen'\n\
             \x20 coder: 'Thomas Jensen'\n\
             \x20 tags:\n\
             \x20   - box\n\
             \x20   - programming\n\
             \x20 sample: |-\n\
             \x20   ┌──┐\n\
             \x20   │  │\n\
             \x20   └──┘\n"
        );
    }

    #[test]
    fn test_missing_fields_are_omitted() {
        let design = Design {
            designer: Some("Joan Stark".to_string()),
            coder: Some("Thomas Jensen".to_string()),
            ..Design::new("dog")
        };
        let output = render_designs(&[design]);
        assert_eq!(
            output,
            "- name: dog\n  designer: 'Joan Stark'\n  coder: 'Thomas Jensen'\n"
        );
        assert!(!output.contains("null"));
        assert!(!output.contains("alias"));
        assert!(!output.contains("tags"));
        assert!(!output.contains("sample"));
    }

    #[test]
    fn test_order_is_preserved() {
        let output = render_designs(&[Design::new("zebra"), Design::new("ada-box")]);
        assert_eq!(output, "- name: zebra\n- name: ada-box\n");
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(render_designs(&[]), "[]\n");
    }

    #[test]
    fn test_single_quotes_are_doubled() {
        let design = Design {
            designer: Some("Jim O'Hara".to_string()),
            ..Design::new("x")
        };
        assert!(render_designs(&[design]).contains("  designer: 'Jim O''Hara'\n"));
    }

    #[test]
    fn test_ambiguous_plain_values_are_quoted() {
        let design = Design {
            tags: strings(&["3.14", "no", "null", "plain"]),
            ..Design::new("yes")
        };
        let output = render_designs(&[design]);
        assert!(output.starts_with("- name: 'yes'\n"));
        assert!(output.contains("    - '3.14'\n"));
        assert!(output.contains("    - 'no'\n"));
        assert!(output.contains("    - 'null'\n"));
        assert!(output.contains("    - plain\n"));
    }

    #[test]
    fn test_indicator_characters_are_quoted() {
        assert!(is_plain_safe("c-cmt"));
        assert!(is_plain_safe("-dash"));
        assert!(!is_plain_safe("- item"));
        assert!(!is_plain_safe("*star"));
        assert!(!is_plain_safe("a: b"));
        assert!(!is_plain_safe("a #b"));
        assert!(!is_plain_safe(""));
    }

    #[test]
    fn test_sample_with_leading_space_gets_indent_hint() {
        let output = scalar(" /\\\n/  \\", ScalarStyle::Literal);
        assert_eq!(output, "|2-\n     /\\\n    /  \\");
    }

    #[test]
    fn test_sample_blank_lines_are_not_indented() {
        let output = scalar("a\n\nb", ScalarStyle::Literal);
        assert_eq!(output, "|-\n    a\n\n    b");
    }

    #[test]
    fn test_sample_chomping_indicators() {
        assert_eq!(scalar("a\n", ScalarStyle::Literal), "|\n    a");
        assert_eq!(scalar("a\n\n", ScalarStyle::Literal), "|+\n    a\n");
    }

    #[test]
    fn test_sample_with_control_chars_falls_back() {
        let output = scalar("\x1b[31mred\tx", ScalarStyle::Literal);
        assert_eq!(output, "\"\\e[31mred\\tx\"");
    }

    #[test]
    fn test_html_sample_is_literal() {
        let design = Design {
            sample: Some("<span style=\"color: #cd0000\">red</span>".to_string()),
            ..Design::new("rainbow")
        };
        assert_eq!(
            render_designs(&[design]),
            "- name: rainbow\n  sample: |-\n    <span style=\"color: #cd0000\">red</span>\n"
        );
    }

    #[test]
    fn test_unicode_is_written_raw() {
        assert_eq!(scalar("Jörg Ŝtraße", ScalarStyle::SingleQuoted), "'Jörg Ŝtraße'");
    }

    #[test]
    fn test_resolve_output_path() {
        assert_eq!(
            resolve_output_path("designs-vx_y_z.yml", "9.9"),
            PathBuf::from("designs-v9_9.yml")
        );
        assert_eq!(
            resolve_output_path("out/designs-vx_y_z.yml", "2.3.1"),
            PathBuf::from("out/designs-v2_3_1.yml")
        );
    }

    #[test]
    fn test_resolve_output_path_without_placeholder() {
        assert_eq!(
            resolve_output_path("designs.yml", "2.3.0"),
            PathBuf::from("designs.yml")
        );
    }

    #[test]
    fn test_write_designs_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("designs-v2_3_0.yml");

        write_designs(&[full_design()], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, render_designs(&[full_design()]));
    }

    #[test]
    fn test_write_designs_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("designs.yml");
        std::fs::write(&path, "stale\n").unwrap();

        write_designs(&[Design::new("dog")], &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "- name: dog\n");
    }

    #[test]
    fn test_write_designs_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("designs.yml");
        assert!(write_designs(&[], &path).is_err());
        assert!(!path.exists());
    }
}
