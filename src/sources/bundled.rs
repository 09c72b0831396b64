//! Default properties compiled into the crate.

use super::{PropertySource, SourceStream};
use crate::error::Result;
use std::io::Cursor;

/// Logical path of the bundled default resource.
pub const BUNDLED_RESOURCE: &str = "resources/catalina.properties";

static DEFAULT_PROPERTIES: &[u8] = include_bytes!("../../resources/catalina.properties");

/// Read-only properties resource shipped inside the binary.
///
/// Used only when neither the override nor the conventional file can be
/// opened.
pub struct BundledSource {
    name: String,
    content: &'static [u8],
}

impl BundledSource {
    /// Wrap a static resource under a logical name.
    pub fn from_static(name: impl Into<String>, content: &'static [u8]) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }

    /// The raw bytes of the resource.
    pub fn content(&self) -> &'static [u8] {
        self.content
    }
}

impl Default for BundledSource {
    fn default() -> Self {
        Self::from_static(BUNDLED_RESOURCE, DEFAULT_PROPERTIES)
    }
}

impl PropertySource for BundledSource {
    fn open(&self) -> Result<Box<dyn SourceStream>> {
        Ok(Box::new(Cursor::new(self.content)))
    }

    fn name(&self) -> String {
        format!("bundled:{}", self.name)
    }
}
