//! Inline `# noqa` directive parsing.
//!
//! # Supported Formats
//!
//! - `# noqa` - suppresses every violation reported on the line
//! - `# noqa: E501` - suppresses codes starting with `E501`
//! - `# noqa: E501,W2` - several prefixes, separated by commas or spaces
//!
//! Matching of the directive itself is case-insensitive. A `# noqa:` with
//! nothing recognisable after the colon behaves like a bare `# noqa`.
//!
//! # Example
//!
//! ```rust,ignore
//! x = 1  # noqa: E225
//! ```

use std::sync::OnceLock;

use regex::Regex;

/// A parsed `noqa` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Noqa {
    /// Bare `# noqa`: every code on the line.
    All,
    /// `# noqa: <prefixes>`.
    Codes(Vec<String>),
}

impl Noqa {
    /// Returns true if this directive suppresses `code`.
    pub fn suppresses(&self, code: &str) -> bool {
        match self {
            Noqa::All => true,
            Noqa::Codes(prefixes) => prefixes.iter().any(|p| code.starts_with(p.as_str())),
        }
    }
}

fn noqa_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)#\s*noqa(?::[\s]?(?P<codes>[A-Z]+[0-9]+(?:[,\s]+[A-Z]+[0-9]+)*))?",
        )
        .expect("noqa regex should compile")
    })
}

/// Parse a physical line for a `noqa` directive.
///
/// Returns None if the line carries no directive.
pub fn parse_noqa(line: &str) -> Option<Noqa> {
    let caps = noqa_regex().captures(line)?;

    let Some(codes) = caps.name("codes") else {
        return Some(Noqa::All);
    };

    let prefixes: Vec<String> = codes
        .as_str()
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    Some(Noqa::Codes(prefixes))
}

/// Returns true if `line` carries a directive that suppresses `code`.
pub fn is_inline_suppressed(line: &str, code: &str) -> bool {
    parse_noqa(line).is_some_and(|noqa| noqa.suppresses(code))
}
