//! Domain logic: select/ignore resolution + listener notification.
//!
//! This crate is designed to be I/O-free and highly testable.

pub mod decision;
pub mod noqa;
pub mod notifier;

pub use decision::{
    DecisionEngine, PrefixList, PrefixMatch, combine, decide, explain, resolve_ignore,
    resolve_select, select_outranks_ignore,
};
pub use noqa::{Noqa, is_inline_suppressed, parse_noqa};
pub use notifier::{FnListener, Listener, ListenerError, NotifyError, Notifier};
