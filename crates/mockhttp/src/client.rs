//! Driver that runs a handler through a full mock exchange.

use crate::config::RequestConfig;
use crate::handler::MockHandler;
use crate::request::MockIncomingRequest;
use crate::response::MockServerResponse;
use bytes::Bytes;
use serde::Serialize;

/// Runs a handler against freshly created mock requests.
///
/// Each call builds a [`MockIncomingRequest`] and a [`MockServerResponse`],
/// hands both to the handler, delivers the queued body chunks as `data`
/// events, emits `end` once, and returns the response for inspection.
///
/// # Example
///
/// ```
/// use mockhttp::{MockClient, MockIncomingRequest, MockServerResponse};
///
/// let client = MockClient::new(|req: &mut MockIncomingRequest, res: &MockServerResponse| {
///     res.write_head(200, &[("Content-Type", "text/plain")]);
///     res.end_with(format!("{} {}", req.method, req.url));
/// });
///
/// let response = client.get("/users").send();
/// assert_eq!(response.status(), 200);
/// assert_eq!(response.body().unwrap(), "GET /users");
/// ```
#[must_use]
pub struct MockClient {
    /// The handler under test.
    handler: MockHandler,
    /// Headers added to every request.
    default_headers: Vec<(String, String)>,
}

impl MockClient {
    /// Creates a client for `handler`.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&mut MockIncomingRequest, &MockServerResponse) + 'static,
    {
        Self {
            handler: Box::new(handler),
            default_headers: Vec::new(),
        }
    }

    /// Adds a header included in every request.
    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Starts a GET call.
    pub fn get(&self, url: impl Into<String>) -> MockCall<'_> {
        self.request("GET", url)
    }

    /// Starts a POST call.
    pub fn post(&self, url: impl Into<String>) -> MockCall<'_> {
        self.request("POST", url)
    }

    /// Starts a PUT call.
    pub fn put(&self, url: impl Into<String>) -> MockCall<'_> {
        self.request("PUT", url)
    }

    /// Starts a PATCH call.
    pub fn patch(&self, url: impl Into<String>) -> MockCall<'_> {
        self.request("PATCH", url)
    }

    /// Starts a DELETE call.
    pub fn delete(&self, url: impl Into<String>) -> MockCall<'_> {
        self.request("DELETE", url)
    }

    /// Starts a call with any method.
    pub fn request(&self, method: impl Into<String>, url: impl Into<String>) -> MockCall<'_> {
        MockCall::new(self, RequestConfig::new().method(method).url(url))
    }

    /// Starts a call from a prepared configuration.
    pub fn call(&self, config: RequestConfig) -> MockCall<'_> {
        MockCall::new(self, config)
    }

    fn dispatch(&self, config: RequestConfig, chunks: Vec<Bytes>) -> MockServerResponse {
        let mut request = MockIncomingRequest::new(config);
        let response = MockServerResponse::new();

        (self.handler)(&mut request, &response);

        for chunk in chunks {
            request.data(chunk);
        }
        request.end();

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status = %response.status(),
            ended = response.is_ended(),
            "mock exchange finished"
        );
        response
    }
}

/// A pending call bound to a [`MockClient`].
#[must_use]
pub struct MockCall<'a> {
    client: &'a MockClient,
    config: RequestConfig,
    chunks: Vec<Bytes>,
}

impl<'a> MockCall<'a> {
    fn new(client: &'a MockClient, mut config: RequestConfig) -> Self {
        for (name, value) in &client.default_headers {
            config = config.header(name.clone(), value.clone());
        }
        Self {
            client,
            config,
            chunks: Vec::new(),
        }
    }

    /// Sets a request header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config = self.config.header(name, value);
        self
    }

    /// Sets the HTTP version.
    pub fn http_version(mut self, version: impl Into<String>) -> Self {
        self.config = self.config.http_version(version);
        self
    }

    /// Queues a body chunk, delivered as one `data` event.
    pub fn chunk(mut self, payload: impl Into<Bytes>) -> Self {
        self.chunks.push(payload.into());
        self
    }

    /// Queues `value` as a JSON chunk and sets `Content-Type`.
    ///
    /// # Panics
    ///
    /// Panics if `value` cannot be serialized.
    pub fn json<T: Serialize>(self, value: &T) -> Self {
        let bytes = serde_json::to_vec(value).expect("JSON serialization should succeed");
        self.header("Content-Type", "application/json").chunk(bytes)
    }

    /// Runs the exchange and returns the response.
    pub fn send(self) -> MockServerResponse {
        self.client.dispatch(self.config, self.chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn collect_body(req: &mut MockIncomingRequest, res: &MockServerResponse) {
        let buffer = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&buffer);
        req.on_data(move |chunk| sink.borrow_mut().push_str(&String::from_utf8_lossy(chunk)));

        let res = res.clone();
        req.on_end(move || {
            res.write_head(200, &[]);
            res.end_with(buffer.borrow().as_str());
        });
    }

    #[test]
    fn test_chunks_are_delivered_in_order() {
        let client = MockClient::new(collect_body);
        let response = client.post("/echo").chunk("ab").chunk("cd").send();

        assert_eq!(response.status(), 200);
        assert_eq!(response.body().unwrap(), "abcd");
    }

    #[test]
    fn test_json_chunk_sets_content_type() {
        let client = MockClient::new(|req, res| {
            let content_type = req.header("content-type").unwrap_or("none").to_string();
            res.end_with(content_type);
        });

        let response = client.post("/users").json(&json!({"name": "Alice"})).send();
        assert_eq!(response.body().unwrap(), "application/json");
    }

    #[test]
    fn test_default_headers() {
        let client = MockClient::new(|req, res| {
            res.end_with(req.header("X-Custom").unwrap_or("none"));
        })
        .with_default_header("X-Custom", "default-value");

        let response = client.get("/test").send();
        assert_eq!(response.body().unwrap(), "default-value");
    }

    #[test]
    fn test_all_methods() {
        let client = MockClient::new(|req, res| res.end_with(&req.method));

        assert_eq!(client.get("/").send().body().unwrap(), "GET");
        assert_eq!(client.post("/").send().body().unwrap(), "POST");
        assert_eq!(client.put("/").send().body().unwrap(), "PUT");
        assert_eq!(client.patch("/").send().body().unwrap(), "PATCH");
        assert_eq!(client.delete("/").send().body().unwrap(), "DELETE");
        assert_eq!(client.request("OPTIONS", "/").send().body().unwrap(), "OPTIONS");
    }

    #[test]
    fn test_call_with_config() {
        let client = MockClient::new(|req, res| res.end_with(&req.http_version));
        let response = client
            .call(RequestConfig::from_json_str(r#"{"httpVersion":"2.0"}"#).unwrap())
            .send();
        assert_eq!(response.body().unwrap(), "2.0");
    }

    #[test]
    fn test_handler_that_never_ends() {
        let client = MockClient::new(|_req, res| res.write_head(404, &[]));
        let response = client.get("/missing").send();

        assert_eq!(response.status(), 404);
        assert!(response.body().unwrap_err().is_end_not_called());
    }
}
