//! Captured HTTP responses and the verification/extraction handles built on them.
//!
//! A [`Response`] is buffered once when dispatch completes and never changes
//! afterwards; [`VerifiableResponse`] and [`ExtractableResponse`] only read it.

mod cookie;
mod extract;
mod spec;
mod verify;

use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{StatusCode, Version};

pub use cookie::ResponseCookie;
pub use extract::ExtractableResponse;
pub use spec::ResponseSpecification;
pub use verify::VerifiableResponse;

/// Immutable capture of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    version: Version,
    url: String,
    headers: HeaderMap,
    body: Bytes,
    text: String,
    elapsed: Duration,
    cookies: Vec<ResponseCookie>,
}

impl Response {
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::new()
    }

    /// Buffer a transport response. `started` is when the request was sent.
    pub(crate) async fn capture(
        response: reqwest::Response,
        started: Instant,
    ) -> Result<Self, reqwest::Error> {
        let status = response.status();
        let version = response.version();
        let url = response.url().to_string();
        let headers = response.headers().clone();
        let cookies = response.cookies().map(ResponseCookie::from).collect();
        let body = response.bytes().await?;
        let elapsed = started.elapsed();

        Ok(Self::assemble(status, version, url, headers, body, elapsed, cookies))
    }

    fn assemble(
        status: StatusCode,
        version: Version,
        url: String,
        headers: HeaderMap,
        body: Bytes,
        elapsed: Duration,
        cookies: Vec<ResponseCookie>,
    ) -> Self {
        let text = String::from_utf8_lossy(&body).into_owned();
        Self {
            status,
            version,
            url,
            headers,
            body,
            text,
            elapsed,
            cookies,
        }
    }

    pub fn status(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    /// 4xx or 5xx
    pub fn is_error(&self) -> bool {
        self.status.is_client_error() || self.status.is_server_error()
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, looked up case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// All values of a header in the order received.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body decoded as UTF-8 (invalid sequences replaced).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn cookies(&self) -> &[ResponseCookie] {
        &self.cookies
    }

    /// Cookie by name, matched case-insensitively.
    pub fn cookie(&self, name: &str) -> Option<&ResponseCookie> {
        self.cookies
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

/// Builds a [`Response`] without a transport, for stubs and tests.
pub struct ResponseBuilder {
    status: StatusCode,
    version: Version,
    url: String,
    headers: HeaderMap,
    body: Bytes,
    elapsed: Duration,
    cookies: Vec<ResponseCookie>,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        ResponseBuilder {
            status: StatusCode::OK,
            version: Version::HTTP_11,
            url: String::new(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            elapsed: Duration::ZERO,
            cookies: Vec::new(),
        }
    }

    /// Invalid codes are ignored.
    pub fn status(mut self, status: u16) -> Self {
        if let Ok(status) = StatusCode::from_u16(status) {
            self.status = status;
        }
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Appends a header value; invalid names or values are ignored.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn cookie(mut self, cookie: ResponseCookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    pub fn build(self) -> Response {
        Response::assemble(
            self.status,
            self.version,
            self.url,
            self.headers,
            self.body,
            self.elapsed,
            self.cookies,
        )
    }
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
