//! Resolution of the bootstrap properties from the ordered candidate chain.

use crate::env::{self, EnvironmentSink};
use crate::error::{ConfigError, Result};
use crate::properties::{Encoding, PropertyMap};
use crate::sources::{FileSource, PropertySource, SourceStream, UrlSource};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "metrics")]
use crate::metrics::LoadMetrics;

/// External setting naming an override file name or URL.
pub const CONFIG_PROPERTY: &str = "catalina.config";

/// File name looked up under `<base>/conf` when no override renames it.
pub const DEFAULT_FILE_NAME: &str = "catalina.properties";

/// A parsed `catalina.config` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverride {
    /// No `/` in the value: replaces the conventional file name.
    FileName(String),
    /// Contains `/`: opened directly as a URL.
    Url(String),
}

impl ConfigOverride {
    /// Classify an override value.
    ///
    /// ```rust
    /// use catalina_properties::core::ConfigOverride;
    ///
    /// assert_eq!(
    ///     ConfigOverride::parse("myfile.properties"),
    ///     ConfigOverride::FileName("myfile.properties".to_string())
    /// );
    /// assert!(matches!(
    ///     ConfigOverride::parse("http://example/conf.properties"),
    ///     ConfigOverride::Url(_)
    /// ));
    /// ```
    pub fn parse(value: &str) -> Self {
        if value.contains('/') {
            Self::Url(value.to_string())
        } else {
            Self::FileName(value.to_string())
        }
    }
}

/// Which candidate the properties came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    /// The `catalina.config` URL.
    Override(String),
    /// `<base>/conf/<file name>`.
    ConventionalFile(PathBuf),
    /// The bundled default resource.
    Bundled,
    /// Nothing could be opened, or the opened stream did not parse.
    Empty,
}

impl LoadOrigin {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Override(_) => "override",
            Self::ConventionalFile(_) => "conventional",
            Self::Bundled => "bundled",
            Self::Empty => "empty",
        }
    }
}

impl fmt::Display for LoadOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Override(url) => write!(f, "override {}", url),
            Self::ConventionalFile(path) => write!(f, "file {}", path.display()),
            Self::Bundled => write!(f, "bundled default"),
            Self::Empty => write!(f, "empty configuration"),
        }
    }
}

/// Result of one run of the resolution chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedProperties {
    /// The parsed properties, empty on total failure.
    pub properties: PropertyMap,
    /// Where they came from.
    pub origin: LoadOrigin,
}

#[derive(Debug, Clone)]
pub(crate) enum OverrideSetting {
    /// Read [`CONFIG_PROPERTY`] when `load` runs.
    Lookup,
    Fixed(Option<String>),
}

/// An opened candidate stream, closed exactly once when released or dropped.
struct StreamGuard {
    stream: Option<Box<dyn SourceStream>>,
    source_name: String,
    origin: LoadOrigin,
}

impl StreamGuard {
    fn read_properties(&mut self, encoding: Encoding) -> Result<PropertyMap> {
        match self.stream.as_mut() {
            Some(stream) => PropertyMap::load(stream, encoding),
            None => Ok(PropertyMap::new()),
        }
    }

    fn release(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(error) = stream.close() {
                let err = ConfigError::Release {
                    source_name: self.source_name.clone(),
                    error,
                };
                tracing::warn!(error = %err, "Could not close bootstrap properties stream");
            }
        }
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.release();
    }
}

/// Loads the bootstrap properties from the first candidate that opens.
///
/// Candidates, in order:
/// 1. the `catalina.config` URL, when the override contains a `/`;
/// 2. `<base>/conf/<file name>`, where a `/`-free override replaces the file name;
/// 3. the bundled default resource.
///
/// Every loaded entry is mirrored into the configured [`EnvironmentSink`].
///
/// # Examples
///
/// ```rust,no_run
/// use catalina_properties::core::ConfigLoader;
/// use catalina_properties::env::MemorySink;
///
/// let sink = MemorySink::new();
/// let loader = ConfigLoader::builder()
///     .with_base_dir("/opt/tomcat")
///     .with_sink(sink.clone())
///     .build();
///
/// let loaded = loader.load().expect("only fatal errors escape");
/// println!("loaded {} properties from {}", loaded.properties.len(), loaded.origin);
/// ```
pub struct ConfigLoader {
    pub(crate) base_dir: PathBuf,
    pub(crate) file_name: String,
    pub(crate) config_override: OverrideSetting,
    pub(crate) bundled: Option<Box<dyn PropertySource>>,
    pub(crate) sink: Arc<dyn EnvironmentSink>,
    pub(crate) encoding: Encoding,
    pub(crate) url_timeout: Duration,
    #[cfg(feature = "metrics")]
    pub(crate) metrics: Option<LoadMetrics>,
}

impl ConfigLoader {
    /// Loader configured from the process: base directory discovered from
    /// `catalina.base`/`catalina.home`, override read from `catalina.config`,
    /// mirrored into [`SystemProperties`](crate::env::SystemProperties).
    pub fn from_environment() -> Self {
        Self::builder().build()
    }

    /// The base directory the conventional file is resolved under.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Run the resolution chain once.
    ///
    /// # Errors
    ///
    /// Only [`ConfigError::Fatal`] is returned. Unavailable sources fall
    /// through to the next candidate; a stream that fails to parse yields an
    /// empty map.
    pub fn load(&self) -> Result<LoadedProperties> {
        #[cfg(feature = "metrics")]
        if let Some(metrics) = &self.metrics {
            metrics.record_attempt();
        }

        let mut file_name = self.file_name.clone();
        let mut opened = None;

        match self.resolve_override() {
            Some(ConfigOverride::FileName(name)) => {
                tracing::debug!(file_name = %name, "Using overridden bootstrap properties file name");
                file_name = name;
            }
            Some(ConfigOverride::Url(url)) => {
                let source = UrlSource::new(url.clone()).with_timeout(self.url_timeout);
                opened = self.try_open(&source, LoadOrigin::Override(url))?;
            }
            None => {}
        }

        if opened.is_none() {
            let source = FileSource::conventional(&self.base_dir, &file_name);
            let origin = LoadOrigin::ConventionalFile(source.path().to_path_buf());
            opened = self.try_open(&source, origin)?;
        }

        if opened.is_none() {
            if let Some(bundled) = &self.bundled {
                opened = self.try_open(bundled.as_ref(), LoadOrigin::Bundled)?;
            }
        }

        let loaded = match opened {
            Some(guard) => self.read(guard)?,
            None => {
                tracing::warn!("Failed to load bootstrap properties file, using empty configuration");
                LoadedProperties {
                    properties: PropertyMap::new(),
                    origin: LoadOrigin::Empty,
                }
            }
        };

        self.mirror(&loaded.properties);

        #[cfg(feature = "metrics")]
        if let Some(metrics) = &self.metrics {
            metrics.record_outcome(&loaded.origin, loaded.properties.len());
        }

        Ok(loaded)
    }

    fn resolve_override(&self) -> Option<ConfigOverride> {
        let value = match &self.config_override {
            OverrideSetting::Lookup => env::lookup(CONFIG_PROPERTY),
            OverrideSetting::Fixed(value) => value.clone(),
        };
        value.as_deref().map(ConfigOverride::parse)
    }

    /// Open one candidate. `Ok(None)` means "try the next one".
    fn try_open(&self, source: &dyn PropertySource, origin: LoadOrigin) -> Result<Option<StreamGuard>> {
        match source.open() {
            Ok(stream) => Ok(Some(StreamGuard {
                stream: Some(stream),
                source_name: source.name(),
                origin,
            })),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                tracing::debug!(source = %source.name(), error = %e, "Bootstrap properties candidate unavailable");

                #[cfg(feature = "metrics")]
                if let Some(metrics) = &self.metrics {
                    metrics.record_candidate_failure(origin.label());
                }

                Ok(None)
            }
        }
    }

    fn read(&self, mut guard: StreamGuard) -> Result<LoadedProperties> {
        let result = guard.read_properties(self.encoding);
        guard.release();

        match result {
            Ok(properties) => {
                tracing::info!(
                    source = %guard.source_name,
                    count = properties.len(),
                    "Loaded bootstrap properties"
                );
                Ok(LoadedProperties {
                    properties,
                    origin: guard.origin.clone(),
                })
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                tracing::warn!(
                    source = %guard.source_name,
                    error = %e,
                    "Failed to parse bootstrap properties, using empty configuration"
                );
                Ok(LoadedProperties {
                    properties: PropertyMap::new(),
                    origin: LoadOrigin::Empty,
                })
            }
        }
    }

    fn mirror(&self, properties: &PropertyMap) {
        for (name, value) in properties {
            self.sink.set(name, value);
        }
        tracing::debug!(
            sink = self.sink.name(),
            count = properties.len(),
            "Mirrored bootstrap properties"
        );
    }
}
