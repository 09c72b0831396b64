//! Candidate sources for the bootstrap properties.

mod bundled;
mod config_source;
mod file;
mod remote;

pub use bundled::{BUNDLED_RESOURCE, BundledSource};
pub use config_source::{PropertySource, SourceStream};
pub use file::{CONF_DIR, FileSource};
pub use remote::{DEFAULT_TIMEOUT, UrlSource};
