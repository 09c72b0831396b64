//! Builder for constructing ConfigLoader instances.

use super::loader::{ConfigLoader, DEFAULT_FILE_NAME, OverrideSetting};
use crate::env::{self, EnvironmentSink, SystemProperties};
use crate::properties::Encoding;
use crate::sources::{BundledSource, DEFAULT_TIMEOUT, PropertySource};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "metrics")]
use crate::metrics::LoadMetrics;

/// System property naming the instance base directory.
pub const BASE_PROPERTY: &str = "catalina.base";

/// System property naming the installation directory.
pub const HOME_PROPERTY: &str = "catalina.home";

/// Resolve the base directory the way the server bootstrap does.
///
/// Tries, in order: the `catalina.base` setting, `CATALINA_BASE`, the
/// `catalina.home` setting, `CATALINA_HOME`, and finally the current working
/// directory. Empty values are ignored.
pub fn discover_base_dir() -> PathBuf {
    let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

    non_empty(env::lookup(BASE_PROPERTY))
        .or_else(|| non_empty(std::env::var("CATALINA_BASE").ok()))
        .or_else(|| non_empty(env::lookup(HOME_PROPERTY)))
        .or_else(|| non_empty(std::env::var("CATALINA_HOME").ok()))
        .map(PathBuf::from)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Builder for constructing a [`ConfigLoader`].
///
/// Anything left unset falls back to the process: the base directory is
/// discovered with [`discover_base_dir`], the override is read from
/// `catalina.config` at load time, and entries are mirrored into
/// [`SystemProperties`].
///
/// # Examples
///
/// ```rust
/// use catalina_properties::core::ConfigLoader;
/// use catalina_properties::env::MemorySink;
///
/// let loader = ConfigLoader::builder()
///     .with_base_dir("/opt/tomcat")
///     .with_config_override(Some("server-a.properties"))
///     .with_sink(MemorySink::new())
///     .build();
///
/// assert_eq!(loader.base_dir(), std::path::Path::new("/opt/tomcat"));
/// ```
pub struct ConfigLoaderBuilder {
    base_dir: Option<PathBuf>,
    file_name: String,
    config_override: OverrideSetting,
    bundled: Option<Box<dyn PropertySource>>,
    sink: Option<Arc<dyn EnvironmentSink>>,
    encoding: Encoding,
    url_timeout: Duration,
    #[cfg(feature = "metrics")]
    metrics: Option<LoadMetrics>,
}

impl ConfigLoaderBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_dir: None,
            file_name: DEFAULT_FILE_NAME.to_string(),
            config_override: OverrideSetting::Lookup,
            bundled: Some(Box::new(BundledSource::default())),
            sink: None,
            encoding: Encoding::default(),
            url_timeout: DEFAULT_TIMEOUT,
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }

    /// Set the base directory instead of discovering it.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// Set the default file name looked up under `<base>/conf`.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Fix the override value instead of reading `catalina.config`.
    ///
    /// `None` means "no override", regardless of the process settings.
    pub fn with_config_override<S: Into<String>>(mut self, value: Option<S>) -> Self {
        self.config_override = OverrideSetting::Fixed(value.map(Into::into));
        self
    }

    /// Replace the bundled default with static bytes.
    pub fn with_bundled_default(self, bundled: BundledSource) -> Self {
        self.with_bundled_source(bundled)
    }

    /// Replace the bundled default with any source.
    pub fn with_bundled_source<S: PropertySource + 'static>(mut self, source: S) -> Self {
        self.bundled = Some(Box::new(source));
        self
    }

    /// Drop the bundled default candidate entirely.
    pub fn without_bundled_default(mut self) -> Self {
        self.bundled = None;
        self
    }

    /// Set where loaded entries are mirrored.
    pub fn with_sink<S: EnvironmentSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Set the text encoding of the properties stream.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the timeout for `http(s)` override URLs.
    pub fn with_url_timeout(mut self, timeout: Duration) -> Self {
        self.url_timeout = timeout;
        self
    }

    /// Record load outcomes with the provided meter.
    #[cfg(feature = "metrics")]
    pub fn with_metrics(mut self, meter: opentelemetry::metrics::Meter) -> Self {
        self.metrics = Some(LoadMetrics::new(meter));
        self
    }

    /// Build the loader. Nothing is read until [`ConfigLoader::load`].
    pub fn build(self) -> ConfigLoader {
        ConfigLoader {
            base_dir: self.base_dir.unwrap_or_else(discover_base_dir),
            file_name: self.file_name,
            config_override: self.config_override,
            bundled: self.bundled,
            sink: self.sink.unwrap_or_else(|| Arc::new(SystemProperties)),
            encoding: self.encoding,
            url_timeout: self.url_timeout,
            #[cfg(feature = "metrics")]
            metrics: self.metrics,
        }
    }
}

impl Default for ConfigLoaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new builder for constructing a loader.
    pub fn builder() -> ConfigLoaderBuilder {
        ConfigLoaderBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_builder_defaults() {
        let builder = ConfigLoaderBuilder::new();
        assert_eq!(builder.file_name, "catalina.properties");
        assert!(matches!(builder.config_override, OverrideSetting::Lookup));
        assert!(builder.bundled.is_some());
        assert_eq!(builder.encoding, Encoding::Utf8OrLatin1);
    }

    #[test]
    fn test_builder_overrides() {
        let builder = ConfigLoaderBuilder::new()
            .with_file_name("server.properties")
            .with_config_override(Some("other.properties"))
            .without_bundled_default()
            .with_encoding(Encoding::Latin1)
            .with_url_timeout(Duration::from_secs(1));

        assert_eq!(builder.file_name, "server.properties");
        assert!(matches!(
            builder.config_override,
            OverrideSetting::Fixed(Some(ref v)) if v == "other.properties"
        ));
        assert!(builder.bundled.is_none());
        assert_eq!(builder.encoding, Encoding::Latin1);
        assert_eq!(builder.url_timeout, Duration::from_secs(1));
    }

    #[test]
    #[serial]
    fn test_discover_base_dir_from_system_property() {
        SystemProperties::set_property(BASE_PROPERTY, "/srv/catalina-base");
        assert_eq!(discover_base_dir(), PathBuf::from("/srv/catalina-base"));
        SystemProperties::clear_property(BASE_PROPERTY);
    }

    #[test]
    #[serial]
    fn test_discover_base_dir_falls_back_to_home() {
        SystemProperties::set_property(BASE_PROPERTY, "");
        SystemProperties::set_property(HOME_PROPERTY, "/srv/catalina-home");

        if std::env::var("CATALINA_BASE").is_err() {
            assert_eq!(discover_base_dir(), PathBuf::from("/srv/catalina-home"));
        }

        SystemProperties::clear_property(BASE_PROPERTY);
        SystemProperties::clear_property(HOME_PROPERTY);
    }

    #[test]
    fn test_explicit_base_dir() {
        let loader = ConfigLoader::builder().with_base_dir("/tmp/base").build();
        assert_eq!(loader.base_dir(), std::path::Path::new("/tmp/base"));
    }
}
