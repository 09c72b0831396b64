//! # catalina-properties
//!
//! Bootstrap properties loader for a servlet container runtime.
//!
//! ## Overview
//!
//! At startup the server needs one flat set of `name=value` settings. They
//! come from the first of these candidates that can be opened:
//!
//! 1. the `catalina.config` override, when it is a URL (contains a `/`);
//! 2. `<catalina.base>/conf/catalina.properties`, where a `/`-free
//!    `catalina.config` value replaces the file name;
//! 3. a default resource compiled into the crate.
//!
//! The chosen stream is parsed as properties text. Every entry is then
//! mirrored into the process-wide [`SystemProperties`](env::SystemProperties)
//! registry (or any other [`EnvironmentSink`](env::EnvironmentSink)).
//! Configuration problems never stop the server: the worst case is an empty
//! map and one warning in the log.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! // Explicit bootstrap step, before worker threads start
//! catalina_properties::initialize()?;
//!
//! if let Some(loader) = catalina_properties::get_property("common.loader") {
//!     println!("common.loader = {}", loader);
//! }
//! # Ok::<(), catalina_properties::error::ConfigError>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `remote` (default): fetch `http://` and `https://` override URLs
//! - `metrics`: OpenTelemetry counters for load outcomes

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod env;
pub mod error;
pub mod properties;
pub mod sources;

#[cfg(feature = "metrics")]
pub mod metrics;

pub use crate::core::{get_property, initialize, initialize_with};

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{
        ConfigLoader, ConfigLoaderBuilder, LoadOrigin, LoadedProperties, get_property,
        initialize, initialize_with,
    };
    pub use crate::env::{EnvironmentSink, MemorySink, SystemProperties};
    pub use crate::error::{ConfigError, Result};
    pub use crate::properties::{Encoding, PropertyMap};
}
