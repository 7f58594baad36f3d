use tracing::debug;

use codesieve_domain::{DecisionEngine, Notifier, NotifyError, is_inline_suppressed};
use codesieve_types::{Decision, Violation};

use crate::formatter::{FormatError, Formatter};
use crate::lines::{LineProvider, NoLines};

/// Per-run switches for the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuideOptions {
    /// Attach the physical line so formatters can print it.
    pub show_source: bool,
    /// Report violations even on lines carrying `# noqa`.
    pub disable_noqa: bool,
}

impl GuideOptions {
    fn needs_physical_line(&self) -> bool {
        self.show_source || !self.disable_noqa
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Listener(#[from] NotifyError),

    #[error("formatter failed on {code} at {filename}:{line}: {source}")]
    Format {
        code: String,
        filename: String,
        line: u32,
        source: FormatError,
    },

    #[error(transparent)]
    Output(#[from] FormatError),
}

/// Coordinates one run: decision, notification, formatting.
///
/// The select/ignore lists and listener registrations are fixed at
/// construction. `handle_violation` takes `&self`, so one guide can serve
/// several checking workers at once.
pub struct StyleGuide {
    engine: DecisionEngine,
    notifier: Notifier,
    formatter: Box<dyn Formatter>,
    lines: Box<dyn LineProvider>,
    options: GuideOptions,
}

impl StyleGuide {
    pub fn new(engine: DecisionEngine, notifier: Notifier, formatter: Box<dyn Formatter>) -> Self {
        Self {
            engine,
            notifier,
            formatter,
            lines: Box::new(NoLines),
            options: GuideOptions::default(),
        }
    }

    pub fn with_line_provider(mut self, lines: Box<dyn LineProvider>) -> Self {
        self.lines = lines;
        self
    }

    pub fn with_options(mut self, options: GuideOptions) -> Self {
        self.options = options;
        self
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    pub fn options(&self) -> GuideOptions {
        self.options
    }

    pub fn decide(&self, code: &str) -> Decision {
        self.engine.decide(code)
    }

    /// Process one checker-reported violation.
    ///
    /// Returns `Ok(true)` when the violation was reported (listeners
    /// notified, formatter called) and `Ok(false)` when it was dropped.
    /// A dropped violation has no side effects.
    pub fn handle_violation(
        &self,
        code: &str,
        filename: &str,
        line_number: u32,
        column_number: u32,
        text: &str,
    ) -> Result<bool, ReportError> {
        let mut violation = Violation::new(code, filename, line_number, column_number, text);
        if self.options.needs_physical_line() {
            violation.physical_line = Some(self.lines.get_line(filename, line_number));
        }

        let decision = self.engine.decide(code);
        debug!(
            code,
            filename,
            line_number,
            decision = decision.as_str(),
            "resolved violation"
        );
        if decision == Decision::Ignored {
            return Ok(false);
        }

        if self.is_inline_suppressed(&violation) {
            debug!(code, filename, line_number, "suppressed by noqa");
            return Ok(false);
        }

        self.notifier.notify(code, &violation)?;
        self.formatter
            .handle(&violation)
            .map_err(|source| ReportError::Format {
                code: code.to_string(),
                filename: filename.to_string(),
                line: line_number,
                source,
            })?;

        Ok(true)
    }

    fn is_inline_suppressed(&self, violation: &Violation) -> bool {
        if self.options.disable_noqa {
            return false;
        }
        violation
            .physical_line
            .as_deref()
            .is_some_and(|line| is_inline_suppressed(line, &violation.code))
    }
}

impl std::fmt::Debug for StyleGuide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleGuide")
            .field("engine", &self.engine)
            .field("notifier", &self.notifier)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
