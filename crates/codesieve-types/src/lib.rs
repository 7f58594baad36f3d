//! Data types (violation records, decisions, config) for codesieve.
//!
//! This crate is intentionally "dumb": pure DTOs with serde + schemars.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ── Frozen Vocabulary ──────────────────────────────────────────
pub const DEFAULT_CONFIG_FILE: &str = "codesieve.toml";

/// Origins that name a non-seekable stream rather than a file on disk.
pub const STREAM_ORIGINS: &[&str] = &["stdin", "-"];

// Exit codes
pub const EXIT_CLEAN: i32 = 0;
pub const EXIT_VIOLATIONS: i32 = 1;
pub const EXIT_RUNTIME_ERROR: i32 = 2;

/// One reported problem, as seen by listeners and formatters.
///
/// Built once per violation event by the reporting coordinator and lent
/// by reference; nothing downstream keeps it past the call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Violation {
    pub code: String,
    /// File path or stream name (e.g. `stdin`).
    pub filename: String,
    /// 1-based.
    pub line_number: u32,
    /// 1-based.
    pub column_number: u32,
    pub text: String,
    /// Snapshot of the source line. `None` when it was never requested,
    /// `Some("")` when it was requested but could not be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_line: Option<String>,
}

impl Violation {
    pub fn new(
        code: impl Into<String>,
        filename: impl Into<String>,
        line_number: u32,
        column_number: u32,
        text: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            filename: filename.into(),
            line_number,
            column_number,
            text: text.into(),
            physical_line: None,
        }
    }

    pub fn with_physical_line(mut self, line: impl Into<String>) -> Self {
        self.physical_line = Some(line.into());
        self
    }
}

/// A violation as emitted by a checker, before any decision is made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RawViolation {
    pub code: String,
    pub filename: String,
    pub line_number: u32,
    #[serde(default = "default_column")]
    pub column_number: u32,
    #[serde(default)]
    pub text: String,
}

fn default_column() -> u32 {
    1
}

/// Per-list outcome of matching a code against one prefix list.
///
/// Explicit variants carry the length of the longest matching prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "prefix_len", rename_all = "snake_case")]
pub enum Verdict {
    SelectedExplicitly(usize),
    SelectedImplicitly,
    IgnoredExplicitly(usize),
    IgnoredImplicitly,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::SelectedExplicitly(_) => "selected_explicitly",
            Verdict::SelectedImplicitly => "selected_implicitly",
            Verdict::IgnoredExplicitly(_) => "ignored_explicitly",
            Verdict::IgnoredImplicitly => "ignored_implicitly",
        }
    }

    /// Matched prefix length; 0 for implicit verdicts.
    pub fn prefix_len(self) -> usize {
        match self {
            Verdict::SelectedExplicitly(len) | Verdict::IgnoredExplicitly(len) => len,
            Verdict::SelectedImplicitly | Verdict::IgnoredImplicitly => 0,
        }
    }

    pub fn is_selected(self) -> bool {
        matches!(
            self,
            Verdict::SelectedExplicitly(_) | Verdict::SelectedImplicitly
        )
    }

    pub fn is_explicit(self) -> bool {
        matches!(
            self,
            Verdict::SelectedExplicitly(_) | Verdict::IgnoredExplicitly(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Selected,
    Ignored,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Selected => "selected",
            Decision::Ignored => "ignored",
        }
    }
}

/// Auditable record of how a decision was reached for one code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DecisionTrace {
    pub code: String,
    pub select: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_prefix: Option<String>,
    pub ignore: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_prefix: Option<String>,
    pub decision: Decision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// `path:row:col: CODE text`
    #[default]
    Default,
    /// `path:row: [CODE] text`
    Pylint,
    /// One JSON object per line.
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Default => "default",
            OutputFormat::Pylint => "pylint",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorChoice::Auto => "auto",
            ColorChoice::Always => "always",
            ColorChoice::Never => "never",
        }
    }
}

/// The on-disk configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ConfigFile {
    /// Include other config files. Paths are relative to this config file's directory.
    /// Later files override earlier ones field by field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,

    #[serde(default)]
    pub defaults: Defaults,
}

/// Run settings. Every field is optional so included files can be layered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Defaults {
    /// Code prefixes to report. Empty means "everything".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<Vec<String>>,

    /// Code prefixes to suppress.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<Vec<String>>,

    /// Prefixes appended to `select`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extend_select: Vec<String>,

    /// Prefixes appended to `ignore`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extend_ignore: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorChoice>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_source: Option<bool>,

    /// Ignore inline `# noqa` comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_noqa: Option<bool>,
}

impl Defaults {
    /// Effective select list: `select` followed by `extend_select`.
    ///
    /// With `select` unset, a non-empty `extend_select` starts from the
    /// empty prefix, so every other code stays selected.
    pub fn effective_select(&self) -> Vec<String> {
        let mut out = match &self.select {
            Some(select) => select.clone(),
            None if !self.extend_select.is_empty() => vec![String::new()],
            None => Vec::new(),
        };
        out.extend(self.extend_select.iter().cloned());
        out
    }

    /// Effective ignore list: `ignore` followed by `extend_ignore`.
    pub fn effective_ignore(&self) -> Vec<String> {
        let mut out = self.ignore.clone().unwrap_or_default();
        out.extend(self.extend_ignore.iter().cloned());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_prefix_len_is_zero_for_implicit() {
        assert_eq!(Verdict::SelectedExplicitly(3).prefix_len(), 3);
        assert_eq!(Verdict::IgnoredExplicitly(2).prefix_len(), 2);
        assert_eq!(Verdict::SelectedImplicitly.prefix_len(), 0);
        assert_eq!(Verdict::IgnoredImplicitly.prefix_len(), 0);
    }

    #[test]
    fn enum_as_str() {
        assert_eq!(Decision::Selected.as_str(), "selected");
        assert_eq!(Decision::Ignored.as_str(), "ignored");
        assert_eq!(Verdict::IgnoredImplicitly.as_str(), "ignored_implicitly");
        assert_eq!(OutputFormat::Pylint.as_str(), "pylint");
        assert_eq!(ColorChoice::Never.as_str(), "never");
    }

    #[test]
    fn verdict_serializes_with_kind_tag() {
        let value = serde_json::to_value(Verdict::SelectedExplicitly(4)).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({"kind": "selected_explicitly", "prefix_len": 4})
        );

        let value = serde_json::to_value(Verdict::IgnoredImplicitly).expect("serialize");
        assert_eq!(value, serde_json::json!({"kind": "ignored_implicitly"}));
    }

    #[test]
    fn physical_line_is_omitted_when_not_requested() {
        let v = Violation::new("E501", "src/app.py", 3, 80, "line too long");
        let value = serde_json::to_value(&v).expect("serialize violation");
        let obj = value.as_object().expect("violation should be object");
        assert!(!obj.contains_key("physical_line"));

        let with_line = v.with_physical_line("");
        let value = serde_json::to_value(&with_line).expect("serialize violation");
        assert_eq!(value["physical_line"], "");
    }

    #[test]
    fn defaults_extend_lists_append_in_order() {
        let defaults = Defaults {
            select: Some(vec!["E".to_string()]),
            extend_select: vec!["W6".to_string()],
            ignore: None,
            extend_ignore: vec!["E501".to_string()],
            ..Defaults::default()
        };
        assert_eq!(defaults.effective_select(), vec!["E", "W6"]);
        assert_eq!(defaults.effective_ignore(), vec!["E501"]);
    }

    #[test]
    fn extend_select_without_select_keeps_everything_selected() {
        let defaults = Defaults {
            extend_select: vec!["W6".to_string()],
            ..Defaults::default()
        };
        assert_eq!(defaults.effective_select(), vec!["", "W6"]);
        assert!(Defaults::default().effective_select().is_empty());
    }

    #[test]
    fn config_parses_from_toml() {
        let cfg: ConfigFile = toml::from_str(
            r#"
includes = ["base.toml"]

[defaults]
select = ["E", "W"]
ignore = ["E501"]
format = "pylint"
color = "never"
show_source = true
"#,
        )
        .expect("parse config");

        assert_eq!(cfg.includes, vec!["base.toml"]);
        assert_eq!(cfg.defaults.format, Some(OutputFormat::Pylint));
        assert_eq!(cfg.defaults.color, Some(ColorChoice::Never));
        assert_eq!(cfg.defaults.show_source, Some(true));
        assert_eq!(cfg.defaults.effective_ignore(), vec!["E501"]);
    }
}
