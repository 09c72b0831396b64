//! In-process system-properties registry.

use super::EnvironmentSink;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::LazyLock;

static REGISTRY: LazyLock<RwLock<HashMap<String, String>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Process-wide name/value registry shared by every component of the server.
///
/// This is the default mirror target of the loader. Unlike the process
/// environment it is safe to write from any thread.
///
/// # Examples
///
/// ```rust
/// use catalina_properties::env::SystemProperties;
///
/// SystemProperties::set_property("catalina.base", "/opt/tomcat");
/// assert_eq!(
///     SystemProperties::get_property("catalina.base").as_deref(),
///     Some("/opt/tomcat")
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProperties;

impl SystemProperties {
    /// Get a property value.
    pub fn get_property(name: &str) -> Option<String> {
        REGISTRY.read().get(name).cloned()
    }

    /// Set a property value, returning the previous one.
    pub fn set_property(name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        REGISTRY.write().insert(name.into(), value.into())
    }

    /// Remove a property, returning its value.
    pub fn clear_property(name: &str) -> Option<String> {
        REGISTRY.write().remove(name)
    }

    /// Copy of every property currently registered.
    pub fn snapshot() -> HashMap<String, String> {
        REGISTRY.read().clone()
    }
}

impl EnvironmentSink for SystemProperties {
    fn set(&self, name: &str, value: &str) {
        Self::set_property(name, value);
    }

    fn name(&self) -> &'static str {
        "system-properties"
    }
}
