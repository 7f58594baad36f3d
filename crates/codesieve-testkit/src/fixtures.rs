//! Common test fixtures for codesieve.
//!
//! This module provides sample configs, checker output and the reference
//! table of select/ignore decisions used across the workspace.

use codesieve_types::{ColorChoice, ConfigFile, Decision, Defaults, OutputFormat};

// =============================================================================
// Decision Table
// =============================================================================

/// One row of the reference select/ignore table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionCase {
    pub select: &'static [&'static str],
    pub ignore: &'static [&'static str],
    pub code: &'static str,
    pub expected: Decision,
}

const fn case(
    select: &'static [&'static str],
    ignore: &'static [&'static str],
    code: &'static str,
    expected: Decision,
) -> DecisionCase {
    DecisionCase {
        select,
        ignore,
        code,
        expected,
    }
}

/// Reference decisions every implementation must reproduce.
pub fn decision_cases() -> &'static [DecisionCase] {
    use Decision::{Ignored, Selected};

    const CASES: &[DecisionCase] = &[
        case(&["E111", "E121"], &[], "E111", Selected),
        case(&["E111", "E121"], &[], "E112", Ignored),
        case(&["E111", "E121"], &[], "E121", Selected),
        case(&["E111", "E121"], &[], "E122", Ignored),
        case(&["E11", "E12"], &[], "E132", Ignored),
        case(&["E2", "E12"], &[], "E321", Ignored),
        case(&["E2", "E12"], &[], "E410", Ignored),
        case(&["E11", "E121"], &["E1"], "E112", Selected),
        case(&["E111", "E121"], &["E2"], "E122", Ignored),
        case(&["E11", "E12"], &["E13"], "E132", Ignored),
        case(&["E1", "E3"], &["E32"], "E321", Ignored),
        case(&[], &["E2", "E12"], "E410", Selected),
        case(&["E4"], &["E2", "E12", "E41"], "E410", Ignored),
        case(&["E41"], &["E2", "E12", "E4"], "E410", Selected),
    ];
    CASES
}

// =============================================================================
// Sample Configs
// =============================================================================

/// Collection of sample configuration files for testing.
pub mod sample_configs {
    use super::*;

    /// An empty configuration with default values.
    pub fn empty() -> ConfigFile {
        ConfigFile::default()
    }

    /// Report errors and warnings, minus the usual continuation-line noise.
    pub fn pep8_style() -> ConfigFile {
        ConfigFile {
            includes: vec![],
            defaults: Defaults {
                select: Some(vec!["E".to_string(), "W".to_string()]),
                ignore: Some(vec![
                    "E121".to_string(),
                    "E123".to_string(),
                    "E126".to_string(),
                    "E226".to_string(),
                    "E24".to_string(),
                    "E704".to_string(),
                ]),
                extend_select: vec![],
                extend_ignore: vec![],
                format: Some(OutputFormat::Default),
                color: Some(ColorChoice::Never),
                show_source: Some(false),
                disable_noqa: Some(false),
            },
        }
    }

    /// Only line-length checks, with source display.
    pub fn line_length_only() -> ConfigFile {
        ConfigFile {
            includes: vec![],
            defaults: Defaults {
                select: Some(vec!["E501".to_string(), "W505".to_string()]),
                show_source: Some(true),
                ..Defaults::default()
            },
        }
    }
}

// =============================================================================
// Sample Checker Output
// =============================================================================

/// Checker output in the text ingestion format.
pub mod sample_output {
    /// Mixed errors and warnings across two files.
    pub fn mixed() -> &'static str {
        "\
src/app.py:1:1: F401 'os' imported but unused
src/app.py:3:80: E501 line too long (88 > 79 characters)
src/app.py:7:5: E225 missing whitespace around operator
src/util.py:2:1: W291 trailing whitespace
src/util.py:4:12: E121 continuation line under-indented for hanging indent
"
    }

    /// One violation read from standard input.
    pub fn stdin_single() -> &'static str {
        "stdin:1:1: E410 msg\n"
    }

    /// Nothing to report.
    pub fn empty() -> &'static str {
        ""
    }
}
