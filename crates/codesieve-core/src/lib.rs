//! Core engine: turns checker output into reported violations.
//!
//! The [`StyleGuide`] is the single ingestion point. It asks the decision
//! engine whether a code is reported and, only if so, notifies listeners
//! and hands the violation to the formatter.

mod check;
pub mod color;
mod formatter;
mod ingest;
mod lines;
mod listeners;
mod style_guide;

pub use check::{CheckRun, run_check, run_check_parallel};
pub use formatter::{
    FormatError, Formatter, JsonFormatter, LineTemplate, TextFormatter, TextOptions,
    build_formatter,
};
pub use ingest::{InputFormat, IngestError, parse_input, parse_json_line, parse_violation_line};
pub use lines::{FileLines, LineProvider, NoLines};
pub use listeners::{CodeStats, Statistics};
pub use style_guide::{GuideOptions, ReportError, StyleGuide};
