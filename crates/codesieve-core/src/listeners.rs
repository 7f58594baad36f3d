use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use codesieve_domain::{Listener, ListenerError};
use codesieve_types::Violation;

/// Count and first message seen for one code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeStats {
    pub count: u64,
    pub first_message: String,
}

/// Aggregates reported violations per code.
///
/// Safe to notify from several workers: the total is atomic and the
/// per-code table sits behind a mutex.
#[derive(Debug, Default)]
pub struct Statistics {
    total: AtomicU64,
    by_code: Mutex<BTreeMap<String, CodeStats>>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn count(&self, code: &str) -> u64 {
        self.by_code
            .lock()
            .map(|table| table.get(code).map_or(0, |s| s.count))
            .unwrap_or(0)
    }

    /// Per-code statistics, sorted by code.
    pub fn snapshot(&self) -> Vec<(String, CodeStats)> {
        self.by_code
            .lock()
            .map(|table| {
                table
                    .iter()
                    .map(|(code, stats)| (code.clone(), stats.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Listener for Statistics {
    fn name(&self) -> &str {
        "statistics"
    }

    fn notify(&self, code: &str, violation: &Violation) -> Result<(), ListenerError> {
        self.total.fetch_add(1, Ordering::Relaxed);

        let mut table = self
            .by_code
            .lock()
            .map_err(|_| ListenerError::new("statistics table lock poisoned"))?;
        table
            .entry(code.to_string())
            .or_insert_with(|| CodeStats {
                count: 0,
                first_message: violation.text.clone(),
            })
            .count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use codesieve_domain::Notifier;

    fn violation(code: &str, text: &str) -> Violation {
        Violation::new(code, "a.py", 1, 1, text)
    }

    #[test]
    fn counts_per_code_and_keeps_first_message() {
        let stats = Statistics::new();
        stats.notify("E501", &violation("E501", "line too long (81)")).expect("notify");
        stats.notify("E501", &violation("E501", "line too long (95)")).expect("notify");
        stats.notify("W291", &violation("W291", "trailing whitespace")).expect("notify");

        assert_eq!(stats.total(), 3);
        assert_eq!(stats.count("E501"), 2);
        assert_eq!(stats.count("E999"), 0);
        assert_eq!(
            stats.snapshot(),
            vec![
                (
                    "E501".to_string(),
                    CodeStats {
                        count: 2,
                        first_message: "line too long (81)".to_string(),
                    }
                ),
                (
                    "W291".to_string(),
                    CodeStats {
                        count: 1,
                        first_message: "trailing whitespace".to_string(),
                    }
                ),
            ]
        );
    }

    #[test]
    fn concurrent_notifications_are_all_counted() {
        let stats = Arc::new(Statistics::new());
        let mut notifier = Notifier::new();
        notifier.register("", stats.clone());

        std::thread::scope(|scope| {
            for worker in 0..4 {
                let notifier = &notifier;
                scope.spawn(move || {
                    for i in 0..50 {
                        let code = if (worker + i) % 2 == 0 { "E501" } else { "W291" };
                        notifier.notify(code, &violation(code, "msg")).expect("notify");
                    }
                });
            }
        });

        assert_eq!(stats.total(), 200);
        assert_eq!(stats.count("E501") + stats.count("W291"), 200);
    }
}
