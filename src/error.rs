//! Error types for catalina-properties.

use std::fmt;
use std::io;

/// Result type alias for catalina-properties operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while resolving and loading bootstrap properties.
///
/// Only [`ConfigError::Fatal`] ever escapes [`crate::initialize`]. Every other
/// variant is absorbed by the loader, which either moves on to the next
/// candidate source or settles on an empty property map.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A candidate location does not exist, is unreachable, or is unreadable.
    #[error("Source '{source_name}' unavailable: {reason}")]
    SourceUnavailable {
        /// Human-readable name of the candidate
        source_name: String,
        /// Why it could not be opened
        reason: String,
    },

    /// The opened stream is not valid properties syntax.
    #[error("Malformed properties at line {line}: {message}")]
    Parse {
        /// 1-based physical line where the problem starts
        line: usize,
        /// Description of the problem
        message: String,
    },

    /// The opened stream could not be decoded with the requested encoding.
    #[error("Failed to decode properties stream: {0}")]
    Decode(String),

    /// Reading from an already opened stream failed.
    #[error("Failed to read properties stream: {0}")]
    Read(#[source] io::Error),

    /// Closing the stream failed.
    #[error("Failed to close properties stream '{source_name}': {error}")]
    Release {
        /// Human-readable name of the source whose stream failed to close
        source_name: String,
        /// Underlying error
        #[source]
        error: io::Error,
    },

    /// An unrecoverable condition. Never absorbed by the loader.
    #[error("Fatal error while loading properties: {0}")]
    Fatal(FatalKind),
}

/// Conditions that must terminate the load instead of falling through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalKind {
    /// The system ran out of memory or another non-renewable resource.
    ResourceExhausted,
    /// The current thread is being torn down by its runtime.
    ThreadTeardown,
}

impl fmt::Display for FatalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceExhausted => write!(f, "resource exhausted"),
            Self::ThreadTeardown => write!(f, "thread teardown"),
        }
    }
}

impl ConfigError {
    /// Create a source-unavailable error.
    pub fn unavailable(source_name: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::SourceUnavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// Classify an I/O error raised while opening a candidate.
    ///
    /// Out-of-memory is fatal; everything else means the candidate is unavailable.
    pub fn from_open_error(source_name: impl Into<String>, error: io::Error) -> Self {
        match fatal_kind(&error) {
            Some(kind) => Self::Fatal(kind),
            None => Self::unavailable(source_name, error),
        }
    }

    /// Classify an I/O error raised while reading an already opened stream.
    pub fn from_read_error(error: io::Error) -> Self {
        match fatal_kind(&error) {
            Some(kind) => Self::Fatal(kind),
            None => Self::Read(error),
        }
    }

    /// Whether this error must propagate instead of being absorbed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

fn fatal_kind(error: &io::Error) -> Option<FatalKind> {
    match error.kind() {
        io::ErrorKind::OutOfMemory => Some(FatalKind::ResourceExhausted),
        _ => None,
    }
}
