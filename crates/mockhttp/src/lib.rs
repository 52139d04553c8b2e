//! # mockhttp
//!
//! Mock HTTP request and response objects for unit-testing request
//! handlers without a network stack.
//!
//! A test creates a request and a response, passes both to the handler
//! under test exactly as a server would, drives the request body with
//! `data`/`end` events, and then inspects what the handler sent.
//!
//! ## Key Features
//!
//! - **Mock request**: method, URL, HTTP version and headers with defaults,
//!   plus synchronous `data`/`end` event delivery
//! - **Mock response**: status, case-insensitive headers and an append-only
//!   body that is readable only after `end()`
//! - **Handler traits**: write handlers once against [`IncomingRequest`] and
//!   [`ServerResponse`]
//! - **Driver**: [`MockClient`] runs a whole exchange in one call
//!
//! ## Example
//!
//! ```
//! use mockhttp::{create_request, create_response, RequestConfig};
//! use mockhttp::{IncomingRequest, ServerResponse};
//!
//! fn fetch_customer<Req: IncomingRequest, Res: ServerResponse>(req: &mut Req, res: &Res) {
//!     let id = req.url().rsplit('/').next().and_then(|s| s.parse::<u32>().ok());
//!     if id == Some(31) {
//!         res.write_head(200, &[("Content-Type", "application/json")]);
//!         res.end_with(r#"{"No":31}"#);
//!     } else {
//!         res.write_head(404, &[]);
//!     }
//! }
//!
//! let mut req = create_request(Some(RequestConfig::new().url("/customer/details/31")));
//! let res = create_response();
//!
//! fetch_customer(&mut req, &res);
//!
//! assert_eq!(res.status(), 200);
//! assert_eq!(res.header("CONTENT-TYPE").as_deref(), Some("application/json"));
//! assert_eq!(res.body().unwrap(), r#"{"No":31}"#);
//! ```
//!
//! ## Reading the body
//!
//! [`MockServerResponse::body`] returns [`MockError::EndNotCalled`] until the
//! handler ends the response. A handler that forgets to call `end` is a bug,
//! and reading a partial body would hide it.

#![doc(html_root_url = "https://docs.rs/mockhttp/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod config;
mod error;
mod event;
mod handler;
mod headers;
pub mod logging;
mod request;
mod response;

pub use client::{MockCall, MockClient};
pub use config::{RequestConfig, RequestHeaders, DEFAULT_HTTP_VERSION, DEFAULT_METHOD};
pub use error::{MockError, MockResult};
pub use event::{DataListener, EndListener, Listeners, RequestEvent};
pub use handler::{IncomingRequest, MockHandler, ServerResponse};
pub use headers::Headers;
pub use request::MockIncomingRequest;
pub use response::{MockServerResponse, ResponseStatus, DEFAULT_ENCODING};

/// Creates a mock request.
///
/// `None` gives a `GET` request for an empty URL with HTTP version `1.0`
/// and no headers.
pub fn create_request(config: Option<RequestConfig>) -> MockIncomingRequest {
    MockIncomingRequest::new(config.unwrap_or_default())
}

/// Creates an open mock response.
pub fn create_response() -> MockServerResponse {
    MockServerResponse::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let request = create_request(None);
        assert_eq!(request.method, DEFAULT_METHOD);
        assert_eq!(request.http_version, DEFAULT_HTTP_VERSION);
        assert!(request.url.is_empty());
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_create_response_is_open() {
        let response = create_response();
        assert!(!response.is_ended());
        assert!(response.body().is_err());
    }
}
