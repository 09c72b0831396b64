//! Process-wide environment state the loaded properties are mirrored into.
//!
//! The loader never writes to global state directly. It depends on an
//! [`EnvironmentSink`], so tests can substitute a [`MemorySink`] while the
//! server uses [`SystemProperties`] (the default) or [`ProcessEnvSink`].

mod sink;
mod system;

pub use sink::{EnvironmentSink, MemorySink, ProcessEnvSink};
pub use system::SystemProperties;

/// Read an external setting: the system-properties registry first, then the
/// process environment variable with the same name.
pub fn lookup(name: &str) -> Option<String> {
    SystemProperties::get_property(name).or_else(|| std::env::var(name).ok())
}
