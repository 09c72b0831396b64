//! Local file source.

use super::{PropertySource, SourceStream};
use crate::error::{ConfigError, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Name of the subdirectory of the base directory holding configuration files.
pub const CONF_DIR: &str = "conf";

/// Local file source.
///
/// # Examples
///
/// ```rust
/// use catalina_properties::sources::FileSource;
///
/// let source = FileSource::conventional("/opt/tomcat", "catalina.properties");
/// assert!(source.path().ends_with("conf/catalina.properties"));
/// ```
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source for an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a source for `<base_dir>/conf/<file_name>`.
    pub fn conventional(base_dir: impl AsRef<Path>, file_name: &str) -> Self {
        Self::new(base_dir.as_ref().join(CONF_DIR).join(file_name))
    }

    /// The path this source opens.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PropertySource for FileSource {
    fn open(&self) -> Result<Box<dyn SourceStream>> {
        if self.path.is_dir() {
            return Err(ConfigError::unavailable(self.name(), "is a directory"));
        }

        let file = File::open(&self.path).map_err(|e| ConfigError::from_open_error(self.name(), e))?;
        Ok(Box::new(file))
    }

    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }
}
