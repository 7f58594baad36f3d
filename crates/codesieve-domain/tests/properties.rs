//! Property-based tests for codesieve-domain
//!
//! These tests pin down the select/ignore precedence rules and the
//! prefix registry's completeness over generated codes and prefix lists.

use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use codesieve_domain::{
    DecisionEngine, FnListener, Listener, Notifier, PrefixList, decide, explain, resolve_ignore,
    resolve_select,
};
use codesieve_types::{Decision, Verdict, Violation};

/// Strategy for violation codes such as `E501` or `W6`.
fn code_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[EWFC][0-9]{1,3}").expect("valid regex")
}

/// Strategy for prefixes drawn from the same alphabet (may be empty).
fn prefix_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("([EWFC][0-9]{0,3})?").expect("valid regex")
}

fn prefix_list_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prefix_strategy(), 0..6)
}

fn non_empty_prefix_list_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prefix_strategy(), 1..6)
}

fn violation(code: &str) -> Violation {
    Violation::new(code, "stdin", 1, 1, "msg")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    // With nothing configured every code is reported.
    #[test]
    fn property_empty_lists_select_everything(code in code_strategy()) {
        prop_assert_eq!(
            decide(&code, &PrefixList::default(), &PrefixList::default()),
            Decision::Selected
        );
    }

    // A non-empty select list that names none of the code's prefixes is
    // an allow-list: the ignore list cannot bring the code back.
    #[test]
    fn property_unmatched_select_list_always_ignores(
        code in prop::string::string_regex("[EW][0-9]{1,3}").expect("valid regex"),
        select in prop::collection::vec(
            prop::string::string_regex("[FC][0-9]{0,3}").expect("valid regex"),
            1..6,
        ),
        ignore in prefix_list_strategy(),
    ) {
        let select = PrefixList::from(select);
        let ignore = PrefixList::from(ignore);
        prop_assert_eq!(resolve_select(&code, &select), Verdict::IgnoredImplicitly);
        prop_assert_eq!(decide(&code, &select, &ignore), Decision::Ignored);
    }

    // The reported match length is the longest matching prefix.
    #[test]
    fn property_longest_match_feeds_the_verdict(
        code in code_strategy(),
        select in non_empty_prefix_list_strategy(),
    ) {
        let longest = select
            .iter()
            .filter(|p| code.starts_with(p.as_str()))
            .map(|p| p.len())
            .max();

        let verdict = resolve_select(&code, &PrefixList::from(select));
        match longest {
            Some(len) => {
                prop_assert_eq!(verdict, Verdict::SelectedExplicitly(len));
            }
            None => {
                prop_assert_eq!(verdict, Verdict::IgnoredImplicitly);
            }
        }
    }

    // Same for the ignore side.
    #[test]
    fn property_ignore_verdict_tracks_longest_match(
        code in code_strategy(),
        ignore in prefix_list_strategy(),
    ) {
        let longest = ignore
            .iter()
            .filter(|p| code.starts_with(p.as_str()))
            .map(|p| p.len())
            .max();

        let verdict = resolve_ignore(&code, &PrefixList::from(ignore));
        match longest {
            Some(len) => {
                prop_assert_eq!(verdict, Verdict::IgnoredExplicitly(len));
            }
            None => {
                prop_assert_eq!(verdict, Verdict::SelectedImplicitly);
            }
        }
    }

    // Lengthening the matched select prefix never flips Selected to Ignored.
    #[test]
    fn property_tie_break_is_monotonic(
        code in code_strategy(),
        shorter in 0usize..5,
        extra in 0usize..5,
        ignore_len in 0usize..5,
    ) {
        let cut = |n: usize| code[..n.min(code.len())].to_string();
        let ignore = PrefixList::new([cut(ignore_len)]);

        let short = decide(&code, &PrefixList::new([cut(shorter)]), &ignore);
        let long = decide(&code, &PrefixList::new([cut(shorter + extra)]), &ignore);

        if short == Decision::Selected {
            prop_assert_eq!(long, Decision::Selected);
        }
    }

    // Prefix order within a list does not matter.
    #[test]
    fn property_decision_ignores_list_order(
        code in code_strategy(),
        select in prefix_list_strategy(),
        ignore in prefix_list_strategy(),
    ) {
        let forward = decide(
            &code,
            &PrefixList::from(select.clone()),
            &PrefixList::from(ignore.clone()),
        );

        let mut select_rev = select;
        select_rev.reverse();
        let mut ignore_rev = ignore;
        ignore_rev.reverse();
        let backward = decide(
            &code,
            &PrefixList::from(select_rev),
            &PrefixList::from(ignore_rev),
        );

        prop_assert_eq!(forward, backward);
    }

    // The trace agrees with the plain decision.
    #[test]
    fn property_explain_agrees_with_decide(
        code in code_strategy(),
        select in prefix_list_strategy(),
        ignore in prefix_list_strategy(),
    ) {
        let engine = DecisionEngine::new(PrefixList::from(select), PrefixList::from(ignore));
        let trace = explain(&code, engine.select(), engine.ignore());

        prop_assert_eq!(trace.decision, engine.decide(&code));
        prop_assert_eq!(trace.select_prefix.is_some(), trace.select.is_explicit());
        prop_assert_eq!(trace.ignore_prefix.is_some(), trace.ignore.is_explicit());
    }

    // A listener on prefix `p` fires for `c` exactly when `p` prefixes `c`.
    #[test]
    fn property_registry_completeness(
        prefix in prefix_strategy(),
        code in code_strategy(),
    ) {
        let hits = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&hits);
        let listener: Arc<dyn Listener> = Arc::new(FnListener::new(
            "counter",
            move |_: &str, _: &Violation| {
                *counter.lock().expect("lock") += 1;
                Ok(())
            },
        ));

        let mut notifier = Notifier::new();
        notifier.register(&prefix, listener);
        notifier.notify(&code, &violation(&code)).expect("notify");

        let expected = usize::from(code.starts_with(prefix.as_str()));
        prop_assert_eq!(*hits.lock().expect("lock"), expected);
    }

    // Listeners fire outer to inner regardless of registration order.
    #[test]
    fn property_notify_order_is_by_prefix_length(
        prefixes in prop::collection::vec(prefix_strategy(), 1..8),
        code in code_strategy(),
    ) {
        let log = Arc::new(Mutex::new(Vec::<usize>::new()));
        let mut notifier = Notifier::new();
        for prefix in &prefixes {
            let log = Arc::clone(&log);
            let len = prefix.len();
            notifier.register_fn(prefix, prefix.clone(), move |_: &str, _: &Violation| {
                log.lock().expect("lock").push(len);
                Ok(())
            });
        }

        notifier.notify(&code, &violation(&code)).expect("notify");

        let seen = log.lock().expect("lock").clone();
        let expected = prefixes.iter().filter(|p| code.starts_with(p.as_str())).count();
        prop_assert_eq!(seen.len(), expected);
        prop_assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }
}
