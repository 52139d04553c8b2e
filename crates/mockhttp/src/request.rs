//! Mock inbound request.

use crate::config::{RequestConfig, RequestHeaders};
use crate::event::{Listeners, RequestEvent};
use bytes::Bytes;

/// A stand-in for an inbound HTTP request.
///
/// Exposes the request line and headers as public fields and lets the test
/// driver simulate body delivery with [`data`](Self::data) and
/// [`end`](Self::end). The handler under test subscribes with
/// [`on_data`](Self::on_data) and [`on_end`](Self::on_end) exactly as it
/// would on a real request.
///
/// # Example
///
/// ```
/// use mockhttp::{MockIncomingRequest, RequestConfig};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let mut request = MockIncomingRequest::new(RequestConfig::new().method("POST"));
/// let received = Rc::new(RefCell::new(String::new()));
///
/// let sink = Rc::clone(&received);
/// request.on_data(move |chunk| sink.borrow_mut().push_str(&String::from_utf8_lossy(chunk)));
///
/// request.data("Hi there");
/// request.end();
///
/// assert_eq!(*received.borrow(), "Hi there");
/// ```
#[derive(Debug)]
pub struct MockIncomingRequest {
    /// Request headers, with names as supplied.
    pub headers: RequestHeaders,
    /// HTTP protocol version.
    pub http_version: String,
    /// HTTP method.
    pub method: String,
    /// Request URL (path and query).
    pub url: String,
    listeners: Listeners,
}

impl MockIncomingRequest {
    /// Creates a request from a configuration, applying defaults for every
    /// option that is not set.
    pub fn new(config: RequestConfig) -> Self {
        let request = Self {
            http_version: config.resolved_http_version(),
            method: config.resolved_method(),
            url: config.resolved_url(),
            headers: config.headers.unwrap_or_default(),
            listeners: Listeners::new(),
        };

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            http_version = %request.http_version,
            headers = request.headers.len(),
            "created mock request"
        );
        request
    }

    /// Creates a GET request for `url`.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(RequestConfig::new().method("GET").url(url))
    }

    /// Creates a POST request for `url`.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(RequestConfig::new().method("POST").url(url))
    }

    /// Gets a request header, ignoring the case of `name`.
    #[must_use]
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        let name = name.as_ref();
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the URL without its query string.
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.split_once('?').map_or(self.url.as_str(), |(path, _)| path)
    }

    /// Subscribes to `data` events.
    pub fn on_data(&mut self, listener: impl FnMut(&Bytes) + 'static) -> &mut Self {
        self.listeners.add_data(listener);
        self
    }

    /// Subscribes to `end` events.
    pub fn on_end(&mut self, listener: impl FnMut() + 'static) -> &mut Self {
        self.listeners.add_end(listener);
        self
    }

    /// Number of listeners subscribed to `event`.
    #[must_use]
    pub fn listener_count(&self, event: RequestEvent) -> usize {
        self.listeners.count(event)
    }

    /// Emits a `data` event carrying `payload`.
    ///
    /// Every `data` listener runs before this returns. The request itself
    /// keeps no copy of the payload.
    pub fn data(&mut self, payload: impl Into<Bytes>) {
        let payload = payload.into();
        let delivered = self.listeners.emit_data(&payload);
        tracing::trace!(
            event = %RequestEvent::Data,
            bytes = payload.len(),
            listeners = delivered,
            "emitted request event"
        );
    }

    /// Emits an `end` event.
    ///
    /// May be called more than once; each call notifies the `end` listeners
    /// again.
    pub fn end(&mut self) {
        let delivered = self.listeners.emit_end();
        tracing::trace!(
            event = %RequestEvent::End,
            listeners = delivered,
            "emitted request event"
        );
    }
}

impl Default for MockIncomingRequest {
    fn default() -> Self {
        Self::new(RequestConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_defaults() {
        let request = MockIncomingRequest::default();
        assert_eq!(request.method, "GET");
        assert_eq!(request.http_version, "1.0");
        assert_eq!(request.url, "");
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_config_overrides() {
        let request = MockIncomingRequest::new(
            RequestConfig::new()
                .method("PATCH")
                .url("/a/b")
                .http_version("1.1")
                .header("Accept", "text/plain"),
        );

        assert_eq!(request.method, "PATCH");
        assert_eq!(request.url, "/a/b");
        assert_eq!(request.http_version, "1.1");
        assert_eq!(request.header("ACCEPT"), Some("text/plain"));
    }

    #[test]
    fn test_headers_keep_supplied_names() {
        let supplied: RequestHeaders = [("Content-Type", "text/plain"), ("X-Request-ID", "42")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let request = MockIncomingRequest::new(RequestConfig::new().headers(supplied.clone()));

        assert_eq!(request.headers, supplied);
        let names: Vec<_> = request.headers.keys().map(String::as_str).collect();
        assert_eq!(names, ["Content-Type", "X-Request-ID"]);
        assert_eq!(request.header("content-type"), Some("text/plain"));
    }

    #[test]
    fn test_shortcuts() {
        assert_eq!(MockIncomingRequest::get("/x").method, "GET");
        let post = MockIncomingRequest::post("/y");
        assert_eq!(post.method, "POST");
        assert_eq!(post.url, "/y");
    }

    #[test]
    fn test_path_strips_query() {
        let request = MockIncomingRequest::get("/search?q=rust");
        assert_eq!(request.path(), "/search");
        assert_eq!(MockIncomingRequest::get("/plain").path(), "/plain");
    }

    #[test]
    fn test_url_is_mutable() {
        let mut request = MockIncomingRequest::default();
        request.url = "/customer/details/31".to_string();
        assert_eq!(request.path(), "/customer/details/31");
    }

    #[test]
    fn test_data_then_end() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut request = MockIncomingRequest::post("/upload");

        let data_log = Rc::clone(&log);
        let end_log = Rc::clone(&log);
        request
            .on_data(move |chunk| {
                data_log
                    .borrow_mut()
                    .push(String::from_utf8_lossy(chunk).into_owned());
            })
            .on_end(move || end_log.borrow_mut().push("<end>".to_string()));

        assert_eq!(request.listener_count(RequestEvent::Data), 1);
        assert_eq!(request.listener_count(RequestEvent::End), 1);

        request.data("one");
        request.data(Bytes::from_static(b"two"));
        request.end();

        assert_eq!(*log.borrow(), ["one", "two", "<end>"]);
    }

    #[test]
    fn test_repeated_end_renotifies() {
        let count = Rc::new(RefCell::new(0));
        let mut request = MockIncomingRequest::default();
        let counter = Rc::clone(&count);
        request.on_end(move || *counter.borrow_mut() += 1);

        request.end();
        request.end();
        assert_eq!(*count.borrow(), 2);
    }
}
