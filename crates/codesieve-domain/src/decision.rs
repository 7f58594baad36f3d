//! Select/ignore resolution.
//!
//! A code is matched against the `select` and `ignore` prefix lists
//! independently, each producing a [`Verdict`]. The two verdicts are then
//! combined into a [`Decision`]:
//!
//! 1. a non-empty select list that names none of the code's prefixes
//!    excludes the code, whatever the ignore list says;
//! 2. otherwise, with no applicable ignore prefix, the code is selected;
//! 3. otherwise the longer matched prefix wins, and ties go to ignore.
//!
//! Prefixes are plain, case-sensitive string prefixes. The empty prefix
//! matches every code with length 0.

use codesieve_types::{Decision, DecisionTrace, Verdict};

/// An ordered list of code prefixes, fixed for the lifetime of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixList {
    prefixes: Vec<String>,
}

/// The longest prefix in a [`PrefixList`] that prefixes a given code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixMatch<'a> {
    pub prefix: &'a str,
    pub len: usize,
}

impl PrefixList {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.prefixes
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(String::as_str)
    }

    /// Longest prefix in the list that `code` starts with.
    ///
    /// Two matching prefixes of equal length are the same string, so the
    /// result does not depend on list order.
    pub fn longest_match(&self, code: &str) -> Option<PrefixMatch<'_>> {
        self.iter()
            .filter(|prefix| code.starts_with(prefix))
            .max_by_key(|prefix| prefix.len())
            .map(|prefix| PrefixMatch {
                prefix,
                len: prefix.len(),
            })
    }
}

impl From<Vec<String>> for PrefixList {
    fn from(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }
}

impl<S: Into<String>> FromIterator<S> for PrefixList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Resolve `code` against the select list.
pub fn resolve_select(code: &str, select: &PrefixList) -> Verdict {
    if select.is_empty() {
        return Verdict::SelectedImplicitly;
    }
    match select.longest_match(code) {
        Some(m) => Verdict::SelectedExplicitly(m.len),
        None => Verdict::IgnoredImplicitly,
    }
}

/// Resolve `code` against the ignore list.
pub fn resolve_ignore(code: &str, ignore: &PrefixList) -> Verdict {
    match ignore.longest_match(code) {
        Some(m) => Verdict::IgnoredExplicitly(m.len),
        None => Verdict::SelectedImplicitly,
    }
}

/// Tie-break between a select match and an ignore match on the same code.
///
/// Equal lengths favour ignore.
pub const fn select_outranks_ignore(select_len: usize, ignore_len: usize) -> bool {
    select_len > ignore_len
}

/// Combine a select-list verdict and an ignore-list verdict.
///
/// Expects the outputs of [`resolve_select`] and [`resolve_ignore`].
pub fn combine(select: Verdict, ignore: Verdict) -> Decision {
    match (select, ignore) {
        (Verdict::IgnoredImplicitly, _) => Decision::Ignored,
        (_, Verdict::SelectedImplicitly) => Decision::Selected,
        (select, ignore) => {
            if select_outranks_ignore(select.prefix_len(), ignore.prefix_len()) {
                Decision::Selected
            } else {
                Decision::Ignored
            }
        }
    }
}

pub fn decide(code: &str, select: &PrefixList, ignore: &PrefixList) -> Decision {
    combine(resolve_select(code, select), resolve_ignore(code, ignore))
}

/// Like [`decide`], but keeps both verdicts and the matched prefixes.
pub fn explain(code: &str, select: &PrefixList, ignore: &PrefixList) -> DecisionTrace {
    let select_verdict = resolve_select(code, select);
    let ignore_verdict = resolve_ignore(code, ignore);

    DecisionTrace {
        code: code.to_string(),
        select: select_verdict,
        select_prefix: select.longest_match(code).map(|m| m.prefix.to_string()),
        ignore: ignore_verdict,
        ignore_prefix: ignore.longest_match(code).map(|m| m.prefix.to_string()),
        decision: combine(select_verdict, ignore_verdict),
    }
}

/// The select and ignore lists of one run.
///
/// Holds no other state, so a single engine can be shared by every
/// checking worker without synchronization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecisionEngine {
    select: PrefixList,
    ignore: PrefixList,
}

impl DecisionEngine {
    pub fn new(select: impl Into<PrefixList>, ignore: impl Into<PrefixList>) -> Self {
        Self {
            select: select.into(),
            ignore: ignore.into(),
        }
    }

    pub fn select(&self) -> &PrefixList {
        &self.select
    }

    pub fn ignore(&self) -> &PrefixList {
        &self.ignore
    }

    pub fn resolve_select(&self, code: &str) -> Verdict {
        resolve_select(code, &self.select)
    }

    pub fn resolve_ignore(&self, code: &str) -> Verdict {
        resolve_ignore(code, &self.ignore)
    }

    pub fn decide(&self, code: &str) -> Decision {
        decide(code, &self.select, &self.ignore)
    }

    pub fn explain(&self, code: &str) -> DecisionTrace {
        explain(code, &self.select, &self.ignore)
    }
}
