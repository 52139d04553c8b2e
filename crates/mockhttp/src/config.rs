//! Configuration for mock requests.

use crate::error::{MockError, MockResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default HTTP version of a mock request.
pub const DEFAULT_HTTP_VERSION: &str = "1.0";

/// Default method of a mock request.
pub const DEFAULT_METHOD: &str = "GET";

/// Request headers, kept in insertion order with names exactly as supplied.
pub type RequestHeaders = IndexMap<String, String>;

/// Options for [`MockIncomingRequest::new`](crate::MockIncomingRequest::new).
///
/// Every field is optional. Missing fields, and fields given as an empty
/// string, fall back to the defaults: no headers, HTTP version `"1.0"`,
/// method `"GET"` and an empty URL.
///
/// The serialized form uses the same keys as a Node `IncomingMessage`
/// (`headers`, `httpVersion`, `method`, `url`). Unknown keys are rejected.
///
/// # Example
///
/// ```
/// use mockhttp::RequestConfig;
///
/// let config = RequestConfig::new()
///     .method("POST")
///     .url("/customers")
///     .header("Content-Type", "application/json");
///
/// let parsed = RequestConfig::from_json_str(
///     r#"{"method":"POST","url":"/customers","headers":{"Content-Type":"application/json"}}"#,
/// )
/// .unwrap();
///
/// assert_eq!(config, parsed);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct RequestConfig {
    /// Request headers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<RequestHeaders>,
    /// HTTP protocol version, such as `"1.1"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_version: Option<String>,
    /// HTTP method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Request URL (path and query).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl RequestConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets the URL.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the HTTP version.
    #[must_use]
    pub fn http_version(mut self, version: impl Into<String>) -> Self {
        self.http_version = Some(version.into());
        self
    }

    /// Adds a header. The name is stored as given.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(RequestHeaders::new)
            .insert(name.into(), value.into());
        self
    }

    /// Replaces all headers.
    #[must_use]
    pub fn headers(mut self, headers: RequestHeaders) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MockError::Json`] on malformed JSON or unknown keys.
    pub fn from_json_str(input: &str) -> MockResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Parses a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`MockError::Toml`] on malformed TOML or unknown keys.
    pub fn from_toml_str(input: &str) -> MockResult<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Loads a configuration file.
    ///
    /// The format is chosen by extension: `.json` or `.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`MockError::Config`] for a missing file or unsupported
    /// extension, [`MockError::Io`] if the file cannot be read, and the
    /// parse errors of [`from_json_str`](Self::from_json_str) and
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> MockResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MockError::config(format!(
                "request config not found: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&contents)?,
            Some("toml") => Self::from_toml_str(&contents)?,
            other => {
                return Err(MockError::config(format!(
                    "unsupported request config format: {}",
                    other.unwrap_or("<none>")
                )))
            }
        };

        tracing::debug!(path = %path.display(), "loaded request config");
        Ok(config)
    }

    pub(crate) fn resolved_method(&self) -> String {
        non_empty(self.method.as_deref()).unwrap_or(DEFAULT_METHOD).to_string()
    }

    pub(crate) fn resolved_http_version(&self) -> String {
        non_empty(self.http_version.as_deref())
            .unwrap_or(DEFAULT_HTTP_VERSION)
            .to_string()
    }

    pub(crate) fn resolved_url(&self) -> String {
        self.url.clone().unwrap_or_default()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
