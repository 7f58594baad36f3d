//! Parsing of checker output into raw violations.
//!
//! Two line-oriented inputs are accepted:
//!
//! - text: `path:row:col: CODE message` (the column may be omitted);
//! - JSON lines: one [`RawViolation`] object per line.
//!
//! Blank lines are skipped in both.

use std::sync::OnceLock;

use regex::Regex;

use codesieve_types::RawViolation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("line {line}: not a violation: '{content}'")]
    Malformed { line: usize, content: String },

    #[error("line {line}: invalid JSON violation: {source}")]
    Json {
        line: usize,
        source: serde_json::Error,
    },
}

fn violation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<path>.+?):(?P<row>\d+):(?:(?P<col>\d+):)?\s*(?P<code>[A-Za-z]+[0-9]+)(?:\s+(?P<text>.*))?$",
        )
        .expect("violation regex should compile")
    })
}

/// Parse one `path:row:col: CODE message` line.
///
/// Returns None if the line does not have that shape.
pub fn parse_violation_line(line: &str) -> Option<RawViolation> {
    let caps = violation_regex().captures(line.trim_end())?;

    let line_number = caps["row"].parse().ok()?;
    let column_number = match caps.name("col") {
        Some(col) => col.as_str().parse().ok()?,
        None => 1,
    };

    Some(RawViolation {
        code: caps["code"].to_string(),
        filename: caps["path"].to_string(),
        line_number,
        column_number,
        text: caps
            .name("text")
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
    })
}

pub fn parse_json_line(line: &str) -> Result<RawViolation, serde_json::Error> {
    serde_json::from_str(line)
}

/// Parse a whole input; the first bad line fails the parse.
pub fn parse_input(text: &str, format: InputFormat) -> Result<Vec<RawViolation>, IngestError> {
    let mut out = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }

        let violation = match format {
            InputFormat::Text => {
                parse_violation_line(raw).ok_or_else(|| IngestError::Malformed {
                    line,
                    content: raw.to_string(),
                })?
            }
            InputFormat::Json => {
                parse_json_line(raw).map_err(|source| IngestError::Json { line, source })?
            }
        };
        out.push(violation);
    }

    Ok(out)
}
