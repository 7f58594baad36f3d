//! Property-based tests for codesieve-core
//!
//! Feature: reporting pipeline
//!
//! These tests verify that the run drivers account for every violation,
//! that parallel runs agree with sequential ones, and that the text
//! formatter writes lines the ingestion parser reads back.

use std::sync::Arc;

use proptest::prelude::*;

use codesieve_core::{
    Formatter, LineTemplate, Statistics, StyleGuide, TextFormatter, TextOptions, build_formatter,
    parse_violation_line, run_check, run_check_parallel,
};
use codesieve_domain::{DecisionEngine, Notifier, PrefixList};
use codesieve_testkit::arb::{
    arb_non_empty_prefix_list, arb_output_format, arb_prefix_list, arb_raw_violation,
    arb_violation,
};
use codesieve_testkit::{RecordingFormatter, SharedBuffer};
use codesieve_types::{Decision, OutputFormat};

fn guide_with_stats(
    select: &[String],
    ignore: &[String],
    formatter: Box<dyn Formatter>,
) -> (StyleGuide, Arc<Statistics>) {
    let stats = Arc::new(Statistics::new());
    let mut notifier = Notifier::new();
    notifier.register("", stats.clone());
    let engine = DecisionEngine::new(
        PrefixList::new(select.iter().cloned()),
        PrefixList::new(ignore.iter().cloned()),
    );
    (StyleGuide::new(engine, notifier, formatter), stats)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Every violation is either reported or dropped, and reported ones are
    // exactly the Selected ones.
    #[test]
    fn property_run_accounts_for_every_violation(
        violations in prop::collection::vec(arb_raw_violation(), 0..40),
        select in arb_non_empty_prefix_list(),
        ignore in arb_prefix_list(),
    ) {
        let formatter = RecordingFormatter::new();
        let (guide, stats) = guide_with_stats(&select, &ignore, formatter.boxed());

        let run = run_check(&guide, &violations).expect("run");

        let expected = violations
            .iter()
            .filter(|v| guide.decide(&v.code) == Decision::Selected)
            .count();
        prop_assert_eq!(run.processed as usize, violations.len());
        prop_assert_eq!(run.reported + run.dropped, run.processed);
        prop_assert_eq!(run.reported as usize, expected);
        prop_assert_eq!(stats.total() as usize, expected);
        prop_assert_eq!(formatter.handle_count(), expected);
        prop_assert_eq!(formatter.start_count(), 1);
        prop_assert_eq!(formatter.stop_count(), 1);
    }

    // Spreading files over workers changes nothing but output order.
    #[test]
    fn property_parallel_run_matches_sequential(
        violations in prop::collection::vec(arb_raw_violation(), 0..40),
        select in arb_prefix_list(),
        ignore in arb_prefix_list(),
        jobs in 2usize..5,
    ) {
        let sequential = RecordingFormatter::new();
        let (guide, seq_stats) = guide_with_stats(&select, &ignore, sequential.boxed());
        let seq_run = run_check(&guide, &violations).expect("sequential run");

        let parallel = RecordingFormatter::new();
        let (guide, par_stats) = guide_with_stats(&select, &ignore, parallel.boxed());
        let par_run = run_check_parallel(&guide, &violations, jobs).expect("parallel run");

        prop_assert_eq!(seq_run, par_run);
        // First messages may differ across files; counts may not.
        let counts = |stats: &Statistics| -> Vec<(String, u64)> {
            stats.snapshot().into_iter().map(|(code, s)| (code, s.count)).collect()
        };
        prop_assert_eq!(counts(&seq_stats), counts(&par_stats));

        let mut seq_handled = sequential.handled();
        let mut par_handled = parallel.handled();
        seq_handled.sort_by(|a, b| a.filename.cmp(&b.filename));
        par_handled.sort_by(|a, b| a.filename.cmp(&b.filename));
        prop_assert_eq!(seq_handled, par_handled);
    }

    // Plain default-template output is valid checker input.
    #[test]
    fn property_default_text_output_is_ingestible(v in arb_violation()) {
        let formatter = TextFormatter::new(
            TextOptions {
                template: LineTemplate::Default,
                show_source: false,
                color: false,
            },
            SharedBuffer::new().boxed(),
        );
        let line = formatter.format(&v);
        let parsed = parse_violation_line(&line).expect("formatted line should parse");

        prop_assert_eq!(parsed.code, v.code);
        prop_assert_eq!(parsed.filename, v.filename);
        prop_assert_eq!(parsed.line_number, v.line_number);
        prop_assert_eq!(parsed.column_number, v.column_number);
        prop_assert_eq!(parsed.text, v.text.trim_end());
    }

    // Every built-in formatter writes exactly one line per violation.
    #[test]
    fn property_formatters_write_one_line_per_violation(
        violations in prop::collection::vec(arb_violation(), 0..20),
        format in arb_output_format(),
    ) {
        let buffer = SharedBuffer::new();
        let formatter = build_formatter(format, false, false, buffer.boxed());
        for v in &violations {
            formatter.handle(v).expect("handle");
        }
        formatter.stop().expect("stop");

        let contents = buffer.contents();
        prop_assert_eq!(contents.lines().count(), violations.len());
        if format == OutputFormat::Json {
            for line in contents.lines() {
                let value: serde_json::Value = serde_json::from_str(line).expect("json line");
                prop_assert!(value["code"].is_string());
            }
        }
    }
}
