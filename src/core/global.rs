//! Process-wide bootstrap properties, loaded at most once.

use super::ConfigLoader;
use super::loader::LoadedProperties;
use crate::error::Result;
use crate::properties::PropertyMap;
use parking_lot::{Mutex, const_mutex};
use std::sync::OnceLock;

static PROPERTIES: OnceLock<PropertyMap> = OnceLock::new();

// Serializes the load itself; OnceLock alone cannot carry a fallible init.
static INIT_LOCK: Mutex<()> = const_mutex(());

fn init_with<F>(load: F) -> Result<&'static PropertyMap>
where
    F: FnOnce() -> Result<LoadedProperties>,
{
    if let Some(properties) = PROPERTIES.get() {
        return Ok(properties);
    }

    let _guard = INIT_LOCK.lock();
    if let Some(properties) = PROPERTIES.get() {
        return Ok(properties);
    }

    let loaded = load()?;
    Ok(PROPERTIES.get_or_init(|| loaded.properties))
}

/// Load the bootstrap properties with a loader configured from the process.
///
/// Runs the resolution chain at most once per process; later calls return
/// the map loaded the first time.
///
/// # Errors
///
/// Only fatal errors are returned. A missing or malformed configuration
/// results in an empty map.
///
/// # Examples
///
/// ```rust,no_run
/// let properties = catalina_properties::initialize()?;
/// println!("{} bootstrap properties", properties.len());
/// # Ok::<(), catalina_properties::error::ConfigError>(())
/// ```
pub fn initialize() -> Result<&'static PropertyMap> {
    init_with(|| ConfigLoader::from_environment().load())
}

/// Load the bootstrap properties with an explicitly configured loader.
///
/// If the properties were already loaded, `loader` is not run and the
/// existing map is returned.
///
/// # Errors
///
/// Only fatal errors are returned.
pub fn initialize_with(loader: &ConfigLoader) -> Result<&'static PropertyMap> {
    let mut ran = false;
    let result = init_with(|| {
        ran = true;
        loader.load()
    });
    if !ran {
        tracing::debug!("Bootstrap properties already initialized, ignoring loader");
    }
    result
}

/// Whether the process-wide properties have been loaded.
pub fn is_initialized() -> bool {
    PROPERTIES.get().is_some()
}

/// The process-wide properties, if already loaded.
pub fn properties() -> Option<&'static PropertyMap> {
    PROPERTIES.get()
}

/// Look up a bootstrap property.
///
/// Loads the properties with [`initialize`] on first use if no explicit
/// bootstrap step ran before.
///
/// # Panics
///
/// Panics if that first load hits a fatal error, which must not be absorbed.
pub fn get_property(name: &str) -> Option<&'static str> {
    let properties = match PROPERTIES.get() {
        Some(properties) => properties,
        None => match initialize() {
            Ok(properties) => properties,
            Err(e) => panic!("{}", e),
        },
    };
    properties.get(name)
}
