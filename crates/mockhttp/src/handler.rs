//! Request and response traits that handlers are written against.
//!
//! A handler generic over [`IncomingRequest`] and [`ServerResponse`] runs
//! unchanged against the mocks in tests and against any other type that
//! implements the same traits.

use crate::request::MockIncomingRequest;
use crate::response::{MockServerResponse, ResponseStatus};
use bytes::Bytes;
use std::fmt;

/// Handler function type accepted by [`MockClient`](crate::MockClient).
pub type MockHandler = Box<dyn Fn(&mut MockIncomingRequest, &MockServerResponse)>;

/// The inbound side of an exchange.
pub trait IncomingRequest {
    /// HTTP method.
    fn method(&self) -> &str;

    /// Request URL (path and query).
    fn url(&self) -> &str;

    /// HTTP protocol version.
    fn http_version(&self) -> &str;

    /// Gets a request header, ignoring case.
    fn header(&self, name: &str) -> Option<&str>;

    /// Subscribes to body chunks.
    fn on_data<F>(&mut self, listener: F)
    where
        F: FnMut(&Bytes) + 'static;

    /// Subscribes to the end of the body.
    fn on_end<F>(&mut self, listener: F)
    where
        F: FnMut() + 'static;
}

/// The outbound side of an exchange.
pub trait ServerResponse {
    /// Sets the status and stores headers.
    fn write_head(&self, status: impl Into<ResponseStatus>, headers: &[(&str, &str)]);

    /// Sets the status without touching headers.
    fn set_status(&self, status: impl Into<ResponseStatus>);

    /// Stores a single header.
    fn set_header(&self, name: &str, value: &str);

    /// Appends a body chunk.
    fn write(&self, chunk: impl fmt::Display) -> bool;

    /// Appends a body chunk written in `encoding`.
    fn write_with_encoding(&self, chunk: impl fmt::Display, encoding: &str) -> bool;

    /// Ends the response.
    fn end(&self);

    /// Appends a final chunk and ends the response.
    fn end_with(&self, chunk: impl fmt::Display);

    /// Appends a final chunk written in `encoding` and ends the response.
    fn end_with_encoding(&self, chunk: impl fmt::Display, encoding: &str);
}

impl IncomingRequest for MockIncomingRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn http_version(&self) -> &str {
        &self.http_version
    }

    fn header(&self, name: &str) -> Option<&str> {
        MockIncomingRequest::header(self, name)
    }

    fn on_data<F>(&mut self, listener: F)
    where
        F: FnMut(&Bytes) + 'static,
    {
        MockIncomingRequest::on_data(self, listener);
    }

    fn on_end<F>(&mut self, listener: F)
    where
        F: FnMut() + 'static,
    {
        MockIncomingRequest::on_end(self, listener);
    }
}

impl ServerResponse for MockServerResponse {
    fn write_head(&self, status: impl Into<ResponseStatus>, headers: &[(&str, &str)]) {
        MockServerResponse::write_head(self, status, headers);
    }

    fn set_status(&self, status: impl Into<ResponseStatus>) {
        MockServerResponse::set_status(self, status);
    }

    fn set_header(&self, name: &str, value: &str) {
        MockServerResponse::set_header(self, name, value);
    }

    fn write(&self, chunk: impl fmt::Display) -> bool {
        MockServerResponse::write(self, chunk)
    }

    fn write_with_encoding(&self, chunk: impl fmt::Display, encoding: &str) -> bool {
        MockServerResponse::write_with_encoding(self, chunk, encoding)
    }

    fn end(&self) {
        MockServerResponse::end(self);
    }

    fn end_with(&self, chunk: impl fmt::Display) {
        MockServerResponse::end_with(self, chunk);
    }

    fn end_with_encoding(&self, chunk: impl fmt::Display, encoding: &str) {
        MockServerResponse::end_with_encoding(self, chunk, encoding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequestConfig;

    fn echo_method<Req: IncomingRequest, Res: ServerResponse>(req: &mut Req, res: &Res) {
        let body = format!("{} {} HTTP/{}", req.method(), req.url(), req.http_version());
        res.write_head(200, &[("Content-Type", "text/plain")]);
        res.end_with(body);
    }

    #[test]
    fn test_generic_handler_runs_on_mocks() {
        let mut request = MockIncomingRequest::new(
            RequestConfig::new().method("PUT").url("/things/1").http_version("1.1"),
        );
        let response = MockServerResponse::new();

        echo_method(&mut request, &response);

        assert_eq!(response.body().unwrap(), "PUT /things/1 HTTP/1.1");
        assert_eq!(response.header("content-type").as_deref(), Some("text/plain"));
    }

    fn send_latin1<Res: ServerResponse>(res: &Res) {
        res.set_status(201);
        res.set_header("Content-Language", "de");
        res.write_with_encoding("Gr", "latin1");
        res.end_with_encoding("\u{fc}\u{df}e", "latin1");
    }

    #[test]
    fn test_generic_handler_sets_encoding() {
        let response = MockServerResponse::new();
        send_latin1(&response);

        assert_eq!(response.status(), 201);
        assert_eq!(response.header("content-language").as_deref(), Some("de"));
        assert_eq!(response.encoding().as_deref(), Some("latin1"));
        assert_eq!(response.body().unwrap(), "Gr\u{fc}\u{df}e");
    }

    #[test]
    fn test_trait_header_lookup() {
        let request = MockIncomingRequest::new(RequestConfig::new().header("X-Api-Key", "k"));
        assert_eq!(IncomingRequest::header(&request, "x-api-key"), Some("k"));
    }
}
