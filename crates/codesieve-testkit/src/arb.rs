//! Proptest strategies for generating valid test inputs.
//!
//! Codes and prefixes share a small alphabet (`E`, `W`, `F`, `C` followed
//! by digits) so generated prefixes actually hit generated codes often
//! enough to exercise the explicit branches.
//!
//! # Bounds
//!
//! - Max digits per code: 3
//! - Max prefixes per list: 6
//! - Max line/column: 10_000

use codesieve_types::{ColorChoice, ConfigFile, Defaults, OutputFormat, RawViolation, Violation};
use proptest::prelude::*;

// =============================================================================
// Constants for bounding generated data
// =============================================================================

/// Maximum number of prefixes in a generated list
pub const MAX_PREFIXES: usize = 6;

/// Maximum line or column number
pub const MAX_POSITION: u32 = 10_000;

// =============================================================================
// Code Strategies
// =============================================================================

/// Strategy for violation codes such as `E501`.
pub fn arb_code() -> impl Strategy<Value = String> {
    prop::string::string_regex("[EWFC][0-9]{1,3}").expect("valid regex for code")
}

/// Strategy for code prefixes; includes the empty prefix.
pub fn arb_prefix() -> impl Strategy<Value = String> {
    prop::string::string_regex("([EWFC][0-9]{0,3})?").expect("valid regex for prefix")
}

/// Strategy for prefix lists (possibly empty).
pub fn arb_prefix_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_prefix(), 0..MAX_PREFIXES)
}

/// Strategy for non-empty prefix lists.
pub fn arb_non_empty_prefix_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_prefix(), 1..MAX_PREFIXES)
}

// =============================================================================
// Violation Strategies
// =============================================================================

fn arb_filename() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("stdin".to_string()),
        prop::string::string_regex("[a-z][a-z0-9_]{0,8}(/[a-z][a-z0-9_]{0,8}){0,2}\\.py")
            .expect("valid regex for filename"),
    ]
}

fn arb_message() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9 ]{0,40}").expect("valid regex for message")
}

/// Strategy for checker-emitted violations.
pub fn arb_raw_violation() -> impl Strategy<Value = RawViolation> {
    (
        arb_code(),
        arb_filename(),
        1..=MAX_POSITION,
        1..=MAX_POSITION,
        arb_message(),
    )
        .prop_map(
            |(code, filename, line_number, column_number, text)| RawViolation {
                code,
                filename,
                line_number,
                column_number,
                text,
            },
        )
}

/// Strategy for violation records without a physical line.
pub fn arb_violation() -> impl Strategy<Value = Violation> {
    arb_raw_violation().prop_map(|raw| {
        Violation::new(
            raw.code,
            raw.filename,
            raw.line_number,
            raw.column_number,
            raw.text,
        )
    })
}

// =============================================================================
// Config Strategies
// =============================================================================

pub fn arb_output_format() -> impl Strategy<Value = OutputFormat> {
    prop_oneof![
        Just(OutputFormat::Default),
        Just(OutputFormat::Pylint),
        Just(OutputFormat::Json),
    ]
}

pub fn arb_color_choice() -> impl Strategy<Value = ColorChoice> {
    prop_oneof![
        Just(ColorChoice::Auto),
        Just(ColorChoice::Always),
        Just(ColorChoice::Never),
    ]
}

/// Strategy for config files without includes.
pub fn arb_config_file() -> impl Strategy<Value = ConfigFile> {
    (
        prop::option::of(arb_prefix_list()),
        prop::option::of(arb_prefix_list()),
        arb_prefix_list(),
        arb_prefix_list(),
        prop::option::of(arb_output_format()),
        prop::option::of(arb_color_choice()),
        prop::option::of(any::<bool>()),
        prop::option::of(any::<bool>()),
    )
        .prop_map(
            |(
                select,
                ignore,
                extend_select,
                extend_ignore,
                format,
                color,
                show_source,
                disable_noqa,
            )| ConfigFile {
                includes: vec![],
                defaults: Defaults {
                    select,
                    ignore,
                    extend_select,
                    extend_ignore,
                    format,
                    color,
                    show_source,
                    disable_noqa,
                },
            },
        )
}
