//! Environment sink capability and its non-registry implementations.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Destination for mirrored properties.
///
/// `set` is infallible from the loader's point of view: a sink that cannot
/// store an entry logs and skips it.
pub trait EnvironmentSink: Send + Sync {
    /// Publish `name = value`.
    fn set(&self, name: &str, value: &str);

    /// Short name used in log output.
    fn name(&self) -> &'static str;
}

/// Mirrors properties into the real process environment.
///
/// Only use this from the single-threaded bootstrap phase: writing the
/// process environment while other threads read it is undefined behaviour on
/// most platforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvSink;

impl ProcessEnvSink {
    fn is_valid(name: &str, value: &str) -> bool {
        !name.is_empty() && !name.contains(['=', '\0']) && !value.contains('\0')
    }
}

impl EnvironmentSink for ProcessEnvSink {
    #[allow(unsafe_code)]
    fn set(&self, name: &str, value: &str) {
        if !Self::is_valid(name, value) {
            tracing::warn!(name, "Skipping property that cannot be an environment variable");
            return;
        }
        // SAFETY: the loader runs during bootstrap, before worker threads
        // exist, and the name/value were checked for '=' and NUL above.
        unsafe {
            std::env::set_var(name, value);
        }
    }

    fn name(&self) -> &'static str {
        "process-env"
    }
}

/// In-memory sink, mostly for tests and embedding.
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value last set for `name`.
    pub fn get(&self, name: &str) -> Option<String> {
        self.entries.lock().get(name).cloned()
    }

    /// Number of distinct names set.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing has been set.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Copy of every entry.
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.entries.lock().clone()
    }
}

impl EnvironmentSink for MemorySink {
    fn set(&self, name: &str, value: &str) {
        self.entries.lock().insert(name.to_string(), value.to_string());
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
