//! Flat string-to-string property map.

use super::parser::{Encoding, parse_bytes, parse_str};
use crate::error::{ConfigError, Result};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::io::Read;
use std::str::FromStr;

/// An immutable-by-convention mapping from property name to property value.
///
/// Names are non-empty; values are opaque strings and may be empty. Iteration
/// is sorted by name so that logging and environment mirroring are
/// deterministic.
///
/// # Examples
///
/// ```rust
/// use catalina_properties::properties::PropertyMap;
///
/// let map: PropertyMap = "foo=bar\n#comment\nbaz=1".parse().unwrap();
/// assert_eq!(map.get("foo"), Some("bar"));
/// assert_eq!(map.get("baz"), Some("1"));
/// assert_eq!(map.get("comment"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
    entries: BTreeMap<String, String>,
}

impl PropertyMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a whole stream and parse it as properties text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the stream fails mid-way (or
    /// [`ConfigError::Fatal`] for out-of-memory), and a parse or decode error
    /// if the content is malformed.
    pub fn load<R: Read + ?Sized>(reader: &mut R, encoding: Encoding) -> Result<Self> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(ConfigError::from_read_error)?;
        parse_bytes(&bytes, encoding)
    }

    /// Look up a property value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Whether the map contains a property with this name.
    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no properties.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Property names in name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Insert a property, returning the previous value. Later entries win.
    pub(crate) fn insert(&mut self, name: String, value: String) -> Option<String> {
        self.entries.insert(name, value)
    }
}

/// Iterator over the entries of a [`PropertyMap`].
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a PropertyMap {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            let name = name.into();
            if !name.is_empty() {
                map.insert(name, value.into());
            }
        }
        map
    }
}

impl FromStr for PropertyMap {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        parse_str(s)
    }
}
