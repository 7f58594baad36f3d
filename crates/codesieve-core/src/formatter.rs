use std::io::Write;
use std::sync::Mutex;

use codesieve_types::{OutputFormat, Violation};

use crate::listeners::Statistics;

const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[m";

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialize violation: {0}")]
    Json(#[from] serde_json::Error),

    #[error("output writer lock poisoned")]
    Poisoned,
}

/// Sink for reported violations.
///
/// `handle` is called exactly once per reported violation, possibly from
/// several threads; implementations serialize their own output.
pub trait Formatter: Send + Sync {
    fn start(&self) -> Result<(), FormatError> {
        Ok(())
    }

    fn handle(&self, violation: &Violation) -> Result<(), FormatError>;

    fn show_statistics(&self, _statistics: &Statistics) -> Result<(), FormatError> {
        Ok(())
    }

    fn stop(&self) -> Result<(), FormatError> {
        Ok(())
    }
}

/// Line layout for [`TextFormatter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineTemplate {
    /// `path:row:col: CODE text`
    #[default]
    Default,
    /// `path:row: [CODE] text`
    Pylint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextOptions {
    pub template: LineTemplate,
    pub show_source: bool,
    pub color: bool,
}

struct Output(Mutex<Box<dyn Write + Send>>);

impl Output {
    fn new(writer: Box<dyn Write + Send>) -> Self {
        Self(Mutex::new(writer))
    }

    fn write_lines(&self, text: &str) -> Result<(), FormatError> {
        let mut out = self.0.lock().map_err(|_| FormatError::Poisoned)?;
        out.write_all(text.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<(), FormatError> {
        let mut out = self.0.lock().map_err(|_| FormatError::Poisoned)?;
        out.flush()?;
        Ok(())
    }
}

/// Human-readable, one violation per line.
pub struct TextFormatter {
    options: TextOptions,
    out: Output,
}

impl TextFormatter {
    pub fn new(options: TextOptions, writer: Box<dyn Write + Send>) -> Self {
        Self {
            options,
            out: Output::new(writer),
        }
    }

    /// Render one violation, including the trailing newline and, when
    /// enabled, the source line with a caret under the column.
    pub fn format(&self, v: &Violation) -> String {
        let mut out = match (self.options.template, self.options.color) {
            (LineTemplate::Default, false) => format!(
                "{}:{}:{}: {} {}",
                v.filename, v.line_number, v.column_number, v.code, v.text
            ),
            (LineTemplate::Default, true) => format!(
                "{BOLD}{}{RESET}{CYAN}:{RESET}{}{CYAN}:{RESET}{}{CYAN}:{RESET} {BOLD}{RED}{}{RESET} {}",
                v.filename, v.line_number, v.column_number, v.code, v.text
            ),
            (LineTemplate::Pylint, false) => {
                format!("{}:{}: [{}] {}", v.filename, v.line_number, v.code, v.text)
            }
            (LineTemplate::Pylint, true) => format!(
                "{BOLD}{}{RESET}{CYAN}:{RESET}{}{CYAN}:{RESET} [{BOLD}{RED}{}{RESET}] {}",
                v.filename, v.line_number, v.code, v.text
            ),
        };
        out.push('\n');

        if self.options.show_source {
            if let Some(source) = render_source(v) {
                out.push_str(&source);
            }
        }
        out
    }
}

/// Source line plus a caret line. Whitespace before the column is kept so
/// tabs line up.
fn render_source(v: &Violation) -> Option<String> {
    let line = v.physical_line.as_deref()?;
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return None;
    }

    let indent: String = line
        .chars()
        .take(v.column_number.saturating_sub(1) as usize)
        .map(|c| if c.is_whitespace() { c } else { ' ' })
        .collect();

    Some(format!("{line}\n{indent}^\n"))
}

impl Formatter for TextFormatter {
    fn handle(&self, violation: &Violation) -> Result<(), FormatError> {
        self.out.write_lines(&self.format(violation))
    }

    fn show_statistics(&self, statistics: &Statistics) -> Result<(), FormatError> {
        let mut text = String::new();
        for (code, stats) in statistics.snapshot() {
            text.push_str(&format!("{:<5} {} {}\n", stats.count, code, stats.first_message));
        }
        self.out.write_lines(&text)
    }

    fn stop(&self) -> Result<(), FormatError> {
        self.out.flush()
    }
}

/// One JSON object per reported violation.
pub struct JsonFormatter {
    out: Output,
}

impl JsonFormatter {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            out: Output::new(writer),
        }
    }
}

impl Formatter for JsonFormatter {
    fn handle(&self, violation: &Violation) -> Result<(), FormatError> {
        let mut line = serde_json::to_string(violation)?;
        line.push('\n');
        self.out.write_lines(&line)
    }

    fn show_statistics(&self, statistics: &Statistics) -> Result<(), FormatError> {
        let mut text = String::new();
        for (code, stats) in statistics.snapshot() {
            let value = serde_json::json!({
                "statistic": code,
                "count": stats.count,
                "message": stats.first_message,
            });
            text.push_str(&value.to_string());
            text.push('\n');
        }
        self.out.write_lines(&text)
    }

    fn stop(&self) -> Result<(), FormatError> {
        self.out.flush()
    }
}

/// Pick the built-in formatter for `format`.
pub fn build_formatter(
    format: OutputFormat,
    show_source: bool,
    color: bool,
    writer: Box<dyn Write + Send>,
) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Default => Box::new(TextFormatter::new(
            TextOptions {
                template: LineTemplate::Default,
                show_source,
                color,
            },
            writer,
        )),
        OutputFormat::Pylint => Box::new(TextFormatter::new(
            TextOptions {
                template: LineTemplate::Pylint,
                show_source,
                color,
            },
            writer,
        )),
        OutputFormat::Json => Box::new(JsonFormatter::new(writer)),
    }
}
