use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use codesieve_types::{EXIT_CLEAN, EXIT_VIOLATIONS, RawViolation};

use crate::style_guide::{ReportError, StyleGuide};

/// Outcome of feeding a batch of violations through a [`StyleGuide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckRun {
    /// Violations handed to the guide.
    pub processed: u32,
    /// Violations that reached the formatter.
    pub reported: u32,
    /// Violations dropped by select/ignore or `noqa`.
    pub dropped: u32,
}

impl CheckRun {
    pub fn exit_code(&self, exit_zero: bool) -> i32 {
        if self.reported > 0 && !exit_zero {
            EXIT_VIOLATIONS
        } else {
            EXIT_CLEAN
        }
    }

    fn merge(self, other: CheckRun) -> CheckRun {
        CheckRun {
            processed: self.processed.saturating_add(other.processed),
            reported: self.reported.saturating_add(other.reported),
            dropped: self.dropped.saturating_add(other.dropped),
        }
    }
}

fn handle_all<'a>(
    guide: &StyleGuide,
    violations: impl IntoIterator<Item = &'a RawViolation>,
    abort: &AtomicBool,
) -> Result<CheckRun, ReportError> {
    let mut run = CheckRun::default();
    for v in violations {
        if abort.load(Ordering::Acquire) {
            break;
        }
        run.processed = run.processed.saturating_add(1);
        let reported = guide
            .handle_violation(
                &v.code,
                &v.filename,
                v.line_number,
                v.column_number,
                &v.text,
            )
            .inspect_err(|_| abort.store(true, Ordering::Release))?;
        if reported {
            run.reported = run.reported.saturating_add(1);
        } else {
            run.dropped = run.dropped.saturating_add(1);
        }
    }
    Ok(run)
}

/// Feed violations through `guide` in order, stopping at the first error.
pub fn run_check(guide: &StyleGuide, violations: &[RawViolation]) -> Result<CheckRun, ReportError> {
    info!("Processing {} violation(s)", violations.len());

    guide.formatter().start()?;
    let run = handle_all(guide, violations, &AtomicBool::new(false))?;
    guide.formatter().stop()?;

    info!(
        "Reported {} of {} violation(s)",
        run.reported, run.processed
    );
    Ok(run)
}

/// Like [`run_check`], but spreads files across `jobs` worker threads.
///
/// Violations of one file stay on one worker and keep their order.
/// Output order across files is not deterministic. A failing worker raises
/// a shared abort flag and every other worker stops before its next
/// violation. When several workers fail, the error of the lowest-numbered
/// worker is returned.
pub fn run_check_parallel(
    guide: &StyleGuide,
    violations: &[RawViolation],
    jobs: usize,
) -> Result<CheckRun, ReportError> {
    let jobs = jobs.max(1);
    if jobs == 1 {
        return run_check(guide, violations);
    }

    let mut by_file: BTreeMap<&str, Vec<&RawViolation>> = BTreeMap::new();
    for v in violations {
        by_file.entry(v.filename.as_str()).or_default().push(v);
    }

    let mut buckets: Vec<Vec<&RawViolation>> = vec![Vec::new(); jobs];
    for (idx, (_, file_violations)) in by_file.into_iter().enumerate() {
        buckets[idx % jobs].extend(file_violations);
    }
    debug!("Spreading {} violation(s) over {} worker(s)", violations.len(), jobs);

    guide.formatter().start()?;

    let abort = AtomicBool::new(false);
    let results: Vec<Result<CheckRun, ReportError>> = std::thread::scope(|scope| {
        let abort = &abort;
        let handles: Vec<_> = buckets
            .iter()
            .map(|bucket| scope.spawn(move || handle_all(guide, bucket.iter().copied(), abort)))
            .collect();
        handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    let mut run = CheckRun::default();
    for result in results {
        run = run.merge(result?);
    }

    guide.formatter().stop()?;

    info!(
        "Reported {} of {} violation(s)",
        run.reported, run.processed
    );
    Ok(run)
}
