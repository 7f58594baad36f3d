use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::debug;

use codesieve_types::STREAM_ORIGINS;

/// Source of physical lines for violation records.
///
/// Never fails: any lookup problem yields an empty string.
pub trait LineProvider: Send + Sync {
    fn get_line(&self, filename: &str, line_number: u32) -> String;
}

/// Provider that never has a line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLines;

impl LineProvider for NoLines {
    fn get_line(&self, _filename: &str, _line_number: u32) -> String {
        String::new()
    }
}

/// Reads files on first use and caches their lines for the run.
///
/// Stream origins (`stdin`, `-`) and unreadable files produce `""`.
#[derive(Debug, Default)]
pub struct FileLines {
    cache: Mutex<HashMap<String, Option<Arc<Vec<String>>>>>,
}

impl FileLines {
    pub fn new() -> Self {
        Self::default()
    }

    fn lines_of(&self, filename: &str) -> Option<Arc<Vec<String>>> {
        if let Some(cached) = self.cache.lock().ok()?.get(filename) {
            return cached.clone();
        }
        // Read without holding the lock; the first insert wins.
        let read = read_lines(Path::new(filename));
        self.cache
            .lock()
            .ok()?
            .entry(filename.to_string())
            .or_insert(read)
            .clone()
    }
}

fn read_lines(path: &Path) -> Option<Arc<Vec<String>>> {
    match std::fs::read(path) {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            Some(Arc::new(text.lines().map(str::to_string).collect()))
        }
        Err(err) => {
            debug!("cannot read source '{}': {}", path.display(), err);
            None
        }
    }
}

impl LineProvider for FileLines {
    fn get_line(&self, filename: &str, line_number: u32) -> String {
        if STREAM_ORIGINS.contains(&filename) || line_number == 0 {
            return String::new();
        }
        self.lines_of(filename)
            .and_then(|lines| lines.get(line_number as usize - 1).cloned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reads_one_based_lines() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("mod.py");
        std::fs::write(&path, "import os\nx = 1\r\n").expect("write");
        let name = path.to_string_lossy().to_string();

        let lines = FileLines::new();
        assert_eq!(lines.get_line(&name, 1), "import os");
        assert_eq!(lines.get_line(&name, 2), "x = 1");
        assert_eq!(lines.get_line(&name, 3), "");
        assert_eq!(lines.get_line(&name, 0), "");
    }

    #[test]
    fn streams_and_missing_files_yield_empty() {
        let lines = FileLines::new();
        assert_eq!(lines.get_line("stdin", 1), "");
        assert_eq!(lines.get_line("-", 1), "");
        assert_eq!(lines.get_line("/definitely/not/here.py", 1), "");
        assert_eq!(NoLines.get_line("a.py", 1), "");
    }

    #[test]
    fn caches_file_contents() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("mod.py");
        std::fs::write(&path, "first\n").expect("write");
        let name = path.to_string_lossy().to_string();

        let lines = FileLines::new();
        assert_eq!(lines.get_line(&name, 1), "first");

        std::fs::write(&path, "second\n").expect("rewrite");
        assert_eq!(lines.get_line(&name, 1), "first");
    }

    #[test]
    fn concurrent_lookups_see_their_own_files() {
        let temp = TempDir::new().expect("temp dir");
        let names: Vec<String> = (0..4)
            .map(|i| {
                let path = temp.path().join(format!("m{i}.py"));
                std::fs::write(&path, format!("line {i}\n")).expect("write");
                path.to_string_lossy().to_string()
            })
            .collect();

        let lines = FileLines::new();
        std::thread::scope(|scope| {
            for worker in 0..8 {
                let lines = &lines;
                let names = &names;
                scope.spawn(move || {
                    for round in 0..50 {
                        let i = (worker + round) % names.len();
                        assert_eq!(lines.get_line(&names[i], 1), format!("line {i}"));
                    }
                });
            }
        });
    }
}
