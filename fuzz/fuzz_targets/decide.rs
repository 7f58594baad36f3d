//! Fuzz target for select/ignore resolution.
//!
//! Checks that `decide` never panics and always agrees with the
//! longest-match rules:
//! - an empty select list never ignores on its own
//! - a code no select prefix matches is ignored
//! - `explain` reaches the same decision as `decide`

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use codesieve_domain::{DecisionEngine, PrefixList};
use codesieve_types::{Decision, Verdict};

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    select: Vec<String>,
    ignore: Vec<String>,
    code: String,
}

fuzz_target!(|input: FuzzInput| {
    if input.select.len() > 64 || input.ignore.len() > 64 || input.code.len() > 256 {
        return;
    }

    let engine = DecisionEngine::new(
        PrefixList::from(input.select.clone()),
        PrefixList::from(input.ignore.clone()),
    );

    let select = engine.resolve_select(&input.code);
    let ignore = engine.resolve_ignore(&input.code);
    let decision = engine.decide(&input.code);

    if select == Verdict::IgnoredImplicitly {
        assert_eq!(decision, Decision::Ignored);
    }
    if input.select.is_empty() && input.ignore.is_empty() {
        assert_eq!(decision, Decision::Selected);
    }
    if let (Verdict::SelectedExplicitly(ls), Verdict::IgnoredExplicitly(li)) = (select, ignore) {
        assert_eq!(decision == Decision::Selected, ls > li);
    }

    let trace = engine.explain(&input.code);
    assert_eq!(trace.decision, decision);
    assert_eq!(trace.select, select);
    assert_eq!(trace.ignore, ignore);
});
