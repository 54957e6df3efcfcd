//! Captured failures handed to the classifier
//!
//! A reqwest response body can only be read once and only asynchronously,
//! so error responses are captured into an [`HttpFailure`] before
//! classification.

use reqwest::{StatusCode, header::HeaderMap};
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

/// Error response captured from the banking provider
#[derive(Debug, Clone)]
pub struct HttpFailure {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl HttpFailure {
    /// Create a captured failure from its parts
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Create a failure with the given status and no headers or body
    pub fn with_status(status: StatusCode) -> Self {
        Self::new(status, HeaderMap::new(), Vec::new())
    }

    /// Add a header, replacing any previous value
    ///
    /// Invalid header names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            reqwest::header::HeaderName::from_bytes(name.as_bytes()),
            reqwest::header::HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Replace the body
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Set a JSON body together with a matching content type
    pub fn with_json(self, body: &serde_json::Value) -> Self {
        self.with_header("Content-Type", "application/json")
            .with_body(body.to_string())
    }

    /// Capture status, headers and body of a response
    pub async fn from_response(response: reqwest::Response) -> Result<Self, reqwest::Error> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(Self::new(status, headers, body))
    }

    /// Pass successful responses through and capture failing ones
    pub async fn error_for_status(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, Failure> {
        if !(response.status().is_client_error() || response.status().is_server_error()) {
            return Ok(response);
        }

        match Self::from_response(response).await {
            Ok(failure) => Err(Failure::Http(failure)),
            Err(e) => Err(Failure::from(e)),
        }
    }

    /// Response status
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body bytes
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, lossily decoded
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Content-Type header, or `""` when missing or not valid text
    pub fn content_type(&self) -> &str {
        self.headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
    }

    /// Whether the response declares a JSON body
    pub fn is_json(&self) -> bool {
        self.content_type().contains("application/json")
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)
    }
}

impl StdError for HttpFailure {}

/// Failure caught around a call to the banking provider
#[derive(Debug)]
pub enum Failure {
    /// The provider answered with an error response
    Http(HttpFailure),
    /// No response: network error, timeout or anything unexpected
    Other(Box<dyn StdError + Send + Sync>),
}

impl Failure {
    /// Wrap any error that did not produce a response
    pub fn other(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Other(error.into())
    }
}

impl From<HttpFailure> for Failure {
    fn from(failure: HttpFailure) -> Self {
        Self::Http(failure)
    }
}

/// reqwest errors never carry a body, so they count as failures without a
/// response even when they hold a status code.
impl From<reqwest::Error> for Failure {
    fn from(error: reqwest::Error) -> Self {
        Self::Other(Box::new(error))
    }
}

impl From<Failure> for crate::Error {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Http(failure) => crate::Error::Upstream(failure),
            Failure::Other(error) => crate::Error::Unhandled(error),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Http(failure) => fmt::Display::fmt(failure, f),
            Failure::Other(error) => fmt::Display::fmt(error, f),
        }
    }
}
