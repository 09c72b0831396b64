//! Candidate source trait and the streams it opens.

use crate::error::Result;
use std::fs::File;
use std::io::{self, Cursor, Read};

/// A byte stream opened from a candidate source.
///
/// The loader reads the stream to the end and then calls [`close`] exactly
/// once, on every exit path.
///
/// [`close`]: SourceStream::close
pub trait SourceStream: Read + Send {
    /// Release the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying resource reports a failure on
    /// release. The loader logs it and carries on.
    fn close(self: Box<Self>) -> io::Result<()> {
        Ok(())
    }
}

impl SourceStream for File {}

impl SourceStream for Cursor<&'static [u8]> {}

impl SourceStream for Cursor<Vec<u8>> {}

/// One candidate location for the bootstrap properties.
///
/// Implement this trait to plug a custom bundled default or override into
/// [`ConfigLoader`](crate::core::ConfigLoader).
pub trait PropertySource: Send + Sync {
    /// Open a byte stream for this candidate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SourceUnavailable`] when the candidate cannot be
    /// opened, and [`ConfigError::Fatal`] when the failure must not be
    /// absorbed.
    ///
    /// [`ConfigError::SourceUnavailable`]: crate::error::ConfigError::SourceUnavailable
    /// [`ConfigError::Fatal`]: crate::error::ConfigError::Fatal
    fn open(&self) -> Result<Box<dyn SourceStream>>;

    /// Get a human-readable name for this source (for logging/debugging).
    fn name(&self) -> String;
}
