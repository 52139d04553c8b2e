//! Mock outbound response.

use crate::error::{MockError, MockResult};
use crate::headers::Headers;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Encoding recorded when a write does not name one.
pub const DEFAULT_ENCODING: &str = "utf8";

/// The status code a handler assigned to a response.
///
/// Stored verbatim: no check is made that a code is a legal HTTP status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResponseStatus {
    /// No status has been set yet.
    #[default]
    Unset,
    /// A numeric status code.
    Code(u16),
    /// A status given as text.
    Text(String),
}

impl ResponseStatus {
    /// Returns the numeric value of the status, parsing text if needed.
    #[must_use]
    pub fn as_u16(&self) -> Option<u16> {
        match self {
            Self::Unset => None,
            Self::Code(code) => Some(*code),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }

    /// Returns true if no status has been set.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => Ok(()),
            Self::Code(code) => write!(f, "{code}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<u16> for ResponseStatus {
    fn from(code: u16) -> Self {
        Self::Code(code)
    }
}

impl From<http::StatusCode> for ResponseStatus {
    fn from(status: http::StatusCode) -> Self {
        Self::Code(status.as_u16())
    }
}

impl From<&str> for ResponseStatus {
    fn from(text: &str) -> Self {
        Self::from(text.to_string())
    }
}

impl From<String> for ResponseStatus {
    /// An empty string is the unset status.
    fn from(text: String) -> Self {
        if text.is_empty() {
            Self::Unset
        } else {
            Self::Text(text)
        }
    }
}

impl PartialEq<u16> for ResponseStatus {
    fn eq(&self, other: &u16) -> bool {
        matches!(self, Self::Code(code) if code == other)
    }
}

impl PartialEq<&str> for ResponseStatus {
    fn eq(&self, other: &&str) -> bool {
        match self {
            Self::Unset => other.is_empty(),
            Self::Code(_) => false,
            Self::Text(text) => text == other,
        }
    }
}

#[derive(Debug, Default)]
struct ResponseState {
    status: ResponseStatus,
    headers: Headers,
    body: String,
    encoding: Option<String>,
    ended: bool,
}

impl ResponseState {
    fn append(&mut self, chunk: &str, encoding: Option<&str>) {
        self.body.push_str(chunk);
        let encoding = encoding.filter(|e| !e.is_empty()).unwrap_or(DEFAULT_ENCODING);
        self.encoding = Some(encoding.to_string());
    }
}

/// A stand-in for an outbound HTTP response.
///
/// Records the status, headers and body a handler sends, and exposes them
/// for assertions. Cloning gives another handle onto the same response, so
/// a handler can move a clone into a request listener and finish the
/// response from there.
///
/// The response starts open. [`end`](Self::end) marks it ended; only then
/// is the body readable through [`body`](Self::body). Writes after `end`
/// are still accepted and appended.
///
/// # Example
///
/// ```
/// use mockhttp::MockServerResponse;
///
/// let response = MockServerResponse::new();
/// response.write_head(200, &[("Content-Type", "text/plain")]);
/// response.write("Hello, ");
/// response.end_with("World!");
///
/// assert_eq!(response.status(), 200);
/// assert_eq!(response.header("content-type").as_deref(), Some("text/plain"));
/// assert_eq!(response.body().unwrap(), "Hello, World!");
/// ```
#[derive(Clone, Default)]
pub struct MockServerResponse {
    state: Rc<RefCell<ResponseState>>,
}

impl MockServerResponse {
    /// Creates an open response with no status, headers or body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status code and stores `headers`.
    ///
    /// Each header overwrites any value stored under the same name in any
    /// casing. Headers not named here are left untouched.
    pub fn write_head(&self, status: impl Into<ResponseStatus>, headers: &[(&str, &str)]) {
        let mut state = self.state.borrow_mut();
        state.status = status.into();
        for (name, value) in headers {
            state.headers.insert(name, *value);
        }
        tracing::debug!(status = %state.status, headers = headers.len(), "wrote response head");
    }

    /// Sets the status code without touching headers.
    pub fn set_status(&self, status: impl Into<ResponseStatus>) {
        self.state.borrow_mut().status = status.into();
    }

    /// Stores a single header.
    pub fn set_header(&self, name: impl AsRef<str>, value: impl Into<String>) {
        self.state.borrow_mut().headers.insert(name, value);
    }

    /// Appends `chunk` to the body, recording the `utf8` encoding.
    ///
    /// Always returns `true`.
    pub fn write(&self, chunk: impl fmt::Display) -> bool {
        self.state.borrow_mut().append(&chunk.to_string(), None);
        true
    }

    /// Appends `chunk` to the body, recording `encoding`.
    ///
    /// Always returns `true`.
    pub fn write_with_encoding(&self, chunk: impl fmt::Display, encoding: &str) -> bool {
        self.state
            .borrow_mut()
            .append(&chunk.to_string(), Some(encoding));
        true
    }

    /// Ends the response.
    pub fn end(&self) {
        self.finish(None, None);
    }

    /// Appends a final chunk and ends the response.
    ///
    /// An empty chunk is not appended and leaves the recorded encoding as
    /// it was.
    pub fn end_with(&self, chunk: impl fmt::Display) {
        self.finish(Some(chunk.to_string()), None);
    }

    /// Appends a final chunk with `encoding` and ends the response.
    pub fn end_with_encoding(&self, chunk: impl fmt::Display, encoding: &str) {
        self.finish(Some(chunk.to_string()), Some(encoding));
    }

    fn finish(&self, chunk: Option<String>, encoding: Option<&str>) {
        let mut state = self.state.borrow_mut();
        let first = !state.ended;
        state.ended = true;
        if let Some(chunk) = chunk.filter(|c| !c.is_empty()) {
            state.append(&chunk, encoding);
        }
        if first {
            tracing::debug!(
                status = %state.status,
                body_len = state.body.len(),
                "mock response ended"
            );
        }
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> ResponseStatus {
        self.state.borrow().status.clone()
    }

    /// Gets a header value by name, ignoring case.
    #[must_use]
    pub fn header(&self, name: impl AsRef<str>) -> Option<String> {
        self.state.borrow().headers.get(name).map(str::to_string)
    }

    /// Returns a copy of all stored headers.
    #[must_use]
    pub fn headers(&self) -> Headers {
        self.state.borrow().headers.clone()
    }

    /// Returns the encoding recorded by the most recent write.
    #[must_use]
    pub fn encoding(&self) -> Option<String> {
        self.state.borrow().encoding.clone()
    }

    /// Returns true once `end` has been called.
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.state.borrow().ended
    }

    /// Returns the accumulated body.
    ///
    /// # Errors
    ///
    /// Returns [`MockError::EndNotCalled`] if the response has not been
    /// ended. A partial body is never returned.
    pub fn body(&self) -> MockResult<String> {
        let state = self.state.borrow();
        if state.ended {
            Ok(state.body.clone())
        } else {
            tracing::warn!(body_len = state.body.len(), "response body read before end");
            Err(MockError::EndNotCalled)
        }
    }

    /// Deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MockError::EndNotCalled`] if the response is still open and
    /// [`MockError::Json`] if the body does not parse.
    pub fn json<T: DeserializeOwned>(&self) -> MockResult<T> {
        Ok(serde_json::from_str(&self.body()?)?)
    }

    /// Deserializes the body as a JSON value.
    pub fn json_value(&self) -> MockResult<serde_json::Value> {
        self.json()
    }

    // Assertion methods

    /// Asserts that the status equals `expected`.
    ///
    /// # Panics
    ///
    /// Panics if the status doesn't match.
    pub fn assert_status(&self, expected: impl Into<ResponseStatus>) -> &Self {
        let expected = expected.into();
        let actual = self.status();
        assert_eq!(actual, expected, "Expected status {expected}, got {actual}");
        self
    }

    /// Asserts that the response has been ended.
    ///
    /// # Panics
    ///
    /// Panics if `end` was never called.
    pub fn assert_ended(&self) -> &Self {
        assert!(self.is_ended(), "Expected response to be ended");
        self
    }

    /// Asserts that a header exists with the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the header doesn't exist or doesn't match.
    pub fn assert_header(&self, name: impl AsRef<str>, expected: impl AsRef<str>) -> &Self {
        let name = name.as_ref();
        let expected = expected.as_ref();
        let actual = self
            .header(name)
            .unwrap_or_else(|| panic!("Header '{}' not found", name));
        assert_eq!(
            actual, expected,
            "Header '{}': expected '{}', got '{}'",
            name, expected, actual
        );
        self
    }

    /// Asserts that the body equals the expected string.
    ///
    /// # Panics
    ///
    /// Panics if the response is still open or the body doesn't match.
    pub fn assert_body_eq(&self, expected: impl AsRef<str>) -> &Self {
        let body = self.ended_body();
        assert_eq!(body, expected.as_ref(), "Body mismatch");
        self
    }

    /// Asserts that the body contains the expected substring.
    ///
    /// # Panics
    ///
    /// Panics if the response is still open or the substring is missing.
    pub fn assert_body_contains(&self, expected: impl AsRef<str>) -> &Self {
        let expected = expected.as_ref();
        let body = self.ended_body();
        assert!(
            body.contains(expected),
            "Body should contain '{}', got: {}",
            expected,
            body
        );
        self
    }

    /// Asserts that the JSON body matches the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the body is unavailable, not JSON, or doesn't match.
    pub fn assert_json_eq(&self, expected: &serde_json::Value) -> &Self {
        let actual = self.ended_json();
        assert_eq!(&actual, expected, "JSON body mismatch");
        self
    }

    /// Asserts that a JSON field exists and equals the expected value.
    ///
    /// `path` is dot separated; numeric segments index arrays, so
    /// `"items.0.name"` reads the name of the first item.
    ///
    /// # Panics
    ///
    /// Panics if the field doesn't exist or doesn't match.
    pub fn assert_json_field(&self, path: impl AsRef<str>, expected: &serde_json::Value) -> &Self {
        let path = path.as_ref();
        let json = self.ended_json();
        let actual = json_path(&json, path).unwrap_or_else(|| {
            panic!("JSON path '{}' not found in: {:?}", path, json);
        });
        assert_eq!(
            actual, expected,
            "JSON field '{}': expected {:?}, got {:?}",
            path, expected, actual
        );
        self
    }

    fn ended_body(&self) -> String {
        self.body()
            .unwrap_or_else(|e| panic!("Body unavailable: {e}"))
    }

    fn ended_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.ended_body())
            .unwrap_or_else(|e| panic!("Body should be valid JSON: {e}"))
    }
}

impl fmt::Debug for MockServerResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MockServerResponse")
            .field("status", &state.status)
            .field("headers", &state.headers)
            .field("body_len", &state.body.len())
            .field("ended", &state.ended)
            .finish()
    }
}

fn json_path<'a>(value: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    let mut current = value;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        current = match segment.parse::<usize>() {
            Ok(index) => current.get(index)?,
            Err(_) => current.get(segment)?,
        };
    }
    Some(current)
}
