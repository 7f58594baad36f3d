//! Prefix-indexed listener registry.
//!
//! Listeners subscribe to a code prefix. Notifying a code walks a
//! character trie along the code, so only the registered ancestors of the
//! code are visited. Listeners fire outer to inner (shorter prefixes
//! first), and in registration order within one prefix.
//!
//! Registration needs `&mut Notifier`; notification needs only `&self`.
//! Once setup is done the registry can be shared by any number of
//! workers. Listener state is the listener's own business: anything it
//! mutates must be synchronized by the listener itself.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use codesieve_types::Violation;

/// An observer of accepted violations.
pub trait Listener: Send + Sync {
    /// Name used in diagnostics when the listener fails.
    fn name(&self) -> &str;

    fn notify(&self, code: &str, violation: &Violation) -> Result<(), ListenerError>;
}

/// Failure raised by a listener.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ListenerError {
    message: String,
}

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A listener failure, annotated with who failed and on which code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("listener '{listener}' failed while handling {code}: {source}")]
pub struct NotifyError {
    pub listener: String,
    pub code: String,
    #[source]
    pub source: ListenerError,
}

/// Adapts a closure into a [`Listener`].
pub struct FnListener<F> {
    name: String,
    f: F,
}

impl<F> FnListener<F>
where
    F: Fn(&str, &Violation) -> Result<(), ListenerError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Listener for FnListener<F>
where
    F: Fn(&str, &Violation) -> Result<(), ListenerError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn notify(&self, code: &str, violation: &Violation) -> Result<(), ListenerError> {
        (self.f)(code, violation)
    }
}

#[derive(Default)]
struct Node {
    children: BTreeMap<char, Node>,
    listeners: Vec<Arc<dyn Listener>>,
}

/// Registry of listeners keyed by code prefix.
#[derive(Default)]
pub struct Notifier {
    root: Node,
    registrations: usize,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `listener` to every code starting with `prefix`.
    ///
    /// Registering the same listener twice on the same prefix makes it
    /// fire twice.
    pub fn register(&mut self, prefix: &str, listener: Arc<dyn Listener>) {
        let mut node = &mut self.root;
        for ch in prefix.chars() {
            node = node.children.entry(ch).or_default();
        }
        node.listeners.push(listener);
        self.registrations += 1;
    }

    /// Convenience wrapper around [`FnListener`].
    pub fn register_fn<F>(&mut self, prefix: &str, name: impl Into<String>, f: F)
    where
        F: Fn(&str, &Violation) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        self.register(prefix, Arc::new(FnListener::new(name, f)));
    }

    /// Invoke every listener registered on a prefix of `code`.
    ///
    /// Stops at the first failing listener; later listeners are not called.
    pub fn notify(&self, code: &str, violation: &Violation) -> Result<(), NotifyError> {
        for node in self.path(code) {
            for listener in &node.listeners {
                listener
                    .notify(code, violation)
                    .map_err(|source| NotifyError {
                        listener: listener.name().to_string(),
                        code: code.to_string(),
                        source,
                    })?;
            }
        }
        Ok(())
    }

    /// Listeners `notify(code, ..)` would call, in call order.
    pub fn listeners_for<'a>(&'a self, code: &'a str) -> Vec<&'a dyn Listener> {
        self.path(code)
            .flat_map(|node| node.listeners.iter().map(|l| l.as_ref()))
            .collect()
    }

    /// Number of registrations (duplicates included).
    pub fn len(&self) -> usize {
        self.registrations
    }

    pub fn is_empty(&self) -> bool {
        self.registrations == 0
    }

    /// Prefixes with at least one listener, in lexicographic order.
    pub fn prefixes(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![(String::new(), &self.root)];
        while let Some((prefix, node)) = stack.pop() {
            if !node.listeners.is_empty() {
                out.push(prefix.clone());
            }
            for (ch, child) in node.children.iter().rev() {
                let mut next = prefix.clone();
                next.push(*ch);
                stack.push((next, child));
            }
        }
        out
    }

    /// Trie nodes along `code`, root first, ending where the trie does.
    fn path<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        let mut chars = code.chars();
        std::iter::successors(Some(&self.root), move |node| {
            chars.next().and_then(|ch| node.children.get(&ch))
        })
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("prefixes", &self.prefixes())
            .field("registrations", &self.registrations)
            .finish()
    }
}
