//! Case-insensitive header storage.

use crate::error::{MockError, MockResult};
use http::{HeaderMap, HeaderName, HeaderValue};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A header mapping with case-insensitive names.
///
/// Names are folded to lower case when stored, so a header written as
/// `Content-Type` can be read back as `content-type` or `CONTENT-TYPE`.
/// Insertion order is preserved.
///
/// # Example
///
/// ```
/// use mockhttp::Headers;
///
/// let mut headers = Headers::new();
/// headers.insert("Content-Type", "application/json");
///
/// assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: IndexMap<String, String>,
}

impl Headers {
    /// Creates an empty header mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under the lower-cased `name`, returning the value it
    /// replaced.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(fold(name.as_ref()), value.into())
    }

    /// Gets a header value by name, ignoring case.
    #[must_use]
    pub fn get(&self, name: impl AsRef<str>) -> Option<&str> {
        self.entries.get(&fold(name.as_ref())).map(String::as_str)
    }

    /// Returns true if a header with this name is present.
    #[must_use]
    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.entries.contains_key(&fold(name.as_ref()))
    }

    /// Removes a header, returning its value.
    pub fn remove(&mut self, name: impl AsRef<str>) -> Option<String> {
        self.entries.shift_remove(&fold(name.as_ref()))
    }

    /// Number of stored headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no headers are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(lower-cased name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Converts into an [`http::HeaderMap`].
    ///
    /// # Errors
    ///
    /// Returns [`MockError::InvalidHeader`] if a name or value is not legal
    /// HTTP.
    pub fn to_header_map(&self) -> MockResult<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        for (name, value) in &self.entries {
            let header_name = HeaderName::try_from(name.as_str())
                .map_err(|e| MockError::invalid_header(format!("{name}: {e}")))?;
            let header_value = HeaderValue::try_from(value.as_str())
                .map_err(|e| MockError::invalid_header(format!("{name}: {e}")))?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        headers.extend(iter);
        headers
    }
}

impl<K: AsRef<str>, V: Into<String>> Extend<(K, V)> for Headers {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, String>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "text/html");

        assert_eq!(headers.get("content-type"), Some("text/html"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("text/html"));
        assert!(headers.contains("cOnTeNt-TyPe"));
    }

    #[test]
    fn test_insert_overwrites_any_casing() {
        let mut headers = Headers::new();
        headers.insert("X-Token", "a");
        let previous = headers.insert("x-token", "b");

        assert_eq!(previous.as_deref(), Some("a"));
        assert_eq!(headers.get("X-TOKEN"), Some("b"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut headers: Headers = [("Accept", "*/*"), ("Host", "localhost")]
            .into_iter()
            .collect();

        assert_eq!(headers.remove("ACCEPT").as_deref(), Some("*/*"));
        assert_eq!(headers.len(), 1);
        assert!(!headers.contains("accept"));
    }

    #[test]
    fn test_iter_preserves_order() {
        let headers: Headers = [("B", "2"), ("A", "1")].into_iter().collect();
        let names: Vec<_> = headers.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn test_deserialize_folds_names() {
        let headers: Headers = serde_json::from_str(r#"{"Content-Type":"text/plain"}"#).unwrap();
        assert_eq!(headers.iter().next(), Some(("content-type", "text/plain")));
    }

    #[test]
    fn test_to_header_map() {
        let headers: Headers = [("X-Request-ID", "123")].into_iter().collect();
        let map = headers.to_header_map().unwrap();
        assert_eq!(map.get("x-request-id").unwrap(), "123");
    }

    #[test]
    fn test_to_header_map_rejects_bad_name() {
        let headers: Headers = [("bad header", "value")].into_iter().collect();
        let err = headers.to_header_map().unwrap_err();
        assert!(matches!(err, MockError::InvalidHeader(_)));
    }
}
