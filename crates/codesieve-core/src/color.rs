//! Terminal colour capability.
//!
//! Probed once per process on first use and read-only afterwards.

use std::io::IsTerminal;
use std::sync::OnceLock;

use codesieve_types::ColorChoice;

/// Whether stdout is a terminal that should receive ANSI colours.
pub fn terminal_supports_color() -> bool {
    static SUPPORTED: OnceLock<bool> = OnceLock::new();
    *SUPPORTED.get_or_init(|| {
        detect(
            std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()),
            std::env::var("TERM").ok().as_deref(),
            std::io::stdout().is_terminal(),
        )
    })
}

fn detect(no_color: bool, term: Option<&str>, is_terminal: bool) -> bool {
    if no_color || term == Some("dumb") {
        return false;
    }
    is_terminal
}

pub fn should_colorize(choice: ColorChoice) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => terminal_supports_color(),
    }
}
