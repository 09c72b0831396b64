//! URL configuration source for the `catalina.config` override.

use super::{PropertySource, SourceStream};
use crate::error::{ConfigError, Result};
use std::fs::File;
#[cfg(feature = "remote")]
use std::io::{self, Cursor, Read};
use std::time::Duration;
use url::Url;

/// Default timeout applied to `http(s)` fetches.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Opens a properties stream from a URL.
///
/// `file:` URLs are opened as local files. `http:` and `https:` URLs are
/// fetched with a blocking client when the `remote` feature is enabled. Every
/// other scheme, and any string that does not parse as a URL, is unavailable.
///
/// # Examples
///
/// ```rust
/// use catalina_properties::sources::UrlSource;
/// use std::time::Duration;
///
/// let source = UrlSource::new("file:///opt/tomcat/conf/custom.properties")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(source.url(), "file:///opt/tomcat/conf/custom.properties");
/// ```
pub struct UrlSource {
    url: String,
    timeout: Duration,
}

impl UrlSource {
    /// Create a source for the given URL string.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the connect and read timeout for remote fetches.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The URL string as configured.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn open_file_url(&self, url: &Url) -> Result<Box<dyn SourceStream>> {
        let path = url
            .to_file_path()
            .map_err(|()| ConfigError::unavailable(self.name(), "not a local file URL"))?;
        if path.is_dir() {
            return Err(ConfigError::unavailable(self.name(), "is a directory"));
        }
        let file = File::open(&path).map_err(|e| ConfigError::from_open_error(self.name(), e))?;
        Ok(Box::new(file))
    }

    /// Fetch an `http(s)` URL.
    ///
    /// The blocking client refuses to run on a thread that is driving an
    /// async runtime, so the whole exchange happens on a scoped thread of its
    /// own and the body is buffered there before the client is dropped.
    #[cfg(feature = "remote")]
    fn fetch(&self, url: &Url) -> Result<Box<dyn SourceStream>> {
        let body = std::thread::scope(|scope| scope.spawn(|| self.fetch_blocking(url)).join())
            .map_err(|_| ConfigError::unavailable(self.name(), "HTTP fetch thread panicked"))??;
        Ok(Box::new(body))
    }

    #[cfg(feature = "remote")]
    fn fetch_blocking(&self, url: &Url) -> Result<FetchedBody> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ConfigError::unavailable(self.name(), format!("HTTP client: {}", e)))?;

        let mut response = client
            .get(url.clone())
            .send()
            .map_err(|e| ConfigError::unavailable(self.name(), format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConfigError::unavailable(
                self.name(),
                format!(
                    "HTTP request failed with status {}: {}",
                    status,
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            ));
        }

        // A body that breaks off mid-transfer is a read failure, not an open failure.
        let mut data = Vec::new();
        let error = response.read_to_end(&mut data).err();
        Ok(FetchedBody {
            data: Cursor::new(data),
            error,
        })
    }

    #[cfg(not(feature = "remote"))]
    fn fetch(&self, url: &Url) -> Result<Box<dyn SourceStream>> {
        Err(ConfigError::unavailable(
            self.name(),
            format!("'{}' URLs require the 'remote' feature", url.scheme()),
        ))
    }
}

/// A response body received in full, or up to the error that cut it short.
#[cfg(feature = "remote")]
struct FetchedBody {
    data: Cursor<Vec<u8>>,
    error: Option<io::Error>,
}

#[cfg(feature = "remote")]
impl Read for FetchedBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.data.read(buf)?;
        if n == 0 && !buf.is_empty() {
            if let Some(error) = self.error.take() {
                return Err(error);
            }
        }
        Ok(n)
    }
}

#[cfg(feature = "remote")]
impl SourceStream for FetchedBody {}

impl PropertySource for UrlSource {
    fn open(&self) -> Result<Box<dyn SourceStream>> {
        let url = Url::parse(&self.url)
            .map_err(|e| ConfigError::unavailable(self.name(), format!("malformed URL: {}", e)))?;

        match url.scheme() {
            "file" => self.open_file_url(&url),
            "http" | "https" => self.fetch(&url),
            other => Err(ConfigError::unavailable(
                self.name(),
                format!("unsupported URL scheme '{}'", other),
            )),
        }
    }

    fn name(&self) -> String {
        format!("url:{}", self.url)
    }
}
