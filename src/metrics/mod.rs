//! Built-in metrics for bootstrap property loading.
//!
//! Provides OpenTelemetry metrics tracking:
//! - Load attempts
//! - Which candidate supplied the properties
//! - Candidates that failed to open
//! - Number of properties loaded
//!
//! # Examples
//!
//! ```rust,no_run
//! use catalina_properties::core::ConfigLoader;
//! use opentelemetry::global;
//!
//! let loader = ConfigLoader::builder()
//!     .with_metrics(global::meter("my-server"))
//!     .build();
//! ```

mod config_metrics;

pub use config_metrics::LoadMetrics;
