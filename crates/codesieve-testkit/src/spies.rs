//! Recording test doubles for listeners, formatters and output writers.
//!
//! Every spy is cheap to clone; clones share the same record, so a test
//! keeps one handle and gives the other to the code under test.

use std::io::Write;
use std::sync::{Arc, Mutex};

use codesieve_core::{FormatError, Formatter};
use codesieve_domain::{Listener, ListenerError};
use codesieve_types::Violation;

/// Listener that records every `(code, violation)` it receives.
#[derive(Clone, Default)]
pub struct RecordingListener {
    name: String,
    calls: Arc<Mutex<Vec<(String, Violation)>>>,
}

impl RecordingListener {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<(String, Violation)> {
        self.calls.lock().expect("listener lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("listener lock").len()
    }

    /// Shareable handle for `Notifier::register`.
    pub fn handle(&self) -> Arc<dyn Listener> {
        Arc::new(self.clone())
    }
}

impl Listener for RecordingListener {
    fn name(&self) -> &str {
        &self.name
    }

    fn notify(&self, code: &str, violation: &Violation) -> Result<(), ListenerError> {
        self.calls
            .lock()
            .expect("listener lock")
            .push((code.to_string(), violation.clone()));
        Ok(())
    }
}

/// Listener that always fails with a fixed message.
#[derive(Debug, Clone)]
pub struct FailingListener {
    name: String,
    message: String,
}

impl FailingListener {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn handle(&self) -> Arc<dyn Listener> {
        Arc::new(self.clone())
    }
}

impl Listener for FailingListener {
    fn name(&self) -> &str {
        &self.name
    }

    fn notify(&self, _code: &str, _violation: &Violation) -> Result<(), ListenerError> {
        Err(ListenerError::new(self.message.clone()))
    }
}

/// Formatter that records every violation it is asked to handle.
#[derive(Clone, Default)]
pub struct RecordingFormatter {
    handled: Arc<Mutex<Vec<Violation>>>,
    started: Arc<Mutex<u32>>,
    stopped: Arc<Mutex<u32>>,
}

impl RecordingFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handled(&self) -> Vec<Violation> {
        self.handled.lock().expect("formatter lock").clone()
    }

    pub fn handle_count(&self) -> usize {
        self.handled.lock().expect("formatter lock").len()
    }

    pub fn start_count(&self) -> u32 {
        *self.started.lock().expect("formatter lock")
    }

    pub fn stop_count(&self) -> u32 {
        *self.stopped.lock().expect("formatter lock")
    }

    pub fn boxed(&self) -> Box<dyn Formatter> {
        Box::new(self.clone())
    }
}

impl Formatter for RecordingFormatter {
    fn start(&self) -> Result<(), FormatError> {
        *self.started.lock().expect("formatter lock") += 1;
        Ok(())
    }

    fn handle(&self, violation: &Violation) -> Result<(), FormatError> {
        self.handled
            .lock()
            .expect("formatter lock")
            .push(violation.clone());
        Ok(())
    }

    fn stop(&self) -> Result<(), FormatError> {
        *self.stopped.lock().expect("formatter lock") += 1;
        Ok(())
    }
}

/// In-memory writer for formatter output.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("buffer lock")).into_owned()
    }

    pub fn boxed(&self) -> Box<dyn Write + Send> {
        Box::new(self.clone())
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("buffer lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
