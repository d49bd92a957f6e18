use std::time::Instant;

use reqwest::Method;
use tracing::debug;

use super::{transport_error, RequestSpecification};
use crate::error::Error;
use crate::logging;
use crate::response::{Response, VerifiableResponse};

/// Chooses the HTTP method and sends the request. Returned by
/// [`RequestSpecification::when`].
#[derive(Debug, Clone)]
pub struct When {
    spec: RequestSpecification,
}

impl When {
    pub(crate) fn new(spec: RequestSpecification) -> Self {
        When { spec }
    }

    pub async fn get(&self, url: &str) -> Result<VerifiableResponse, Error> {
        self.invoke(url, Method::GET).await
    }

    pub async fn post(&self, url: &str) -> Result<VerifiableResponse, Error> {
        self.invoke(url, Method::POST).await
    }

    pub async fn put(&self, url: &str) -> Result<VerifiableResponse, Error> {
        self.invoke(url, Method::PUT).await
    }

    pub async fn patch(&self, url: &str) -> Result<VerifiableResponse, Error> {
        self.invoke(url, Method::PATCH).await
    }

    pub async fn delete(&self, url: &str) -> Result<VerifiableResponse, Error> {
        self.invoke(url, Method::DELETE).await
    }

    pub async fn head(&self, url: &str) -> Result<VerifiableResponse, Error> {
        self.invoke(url, Method::HEAD).await
    }

    pub async fn options(&self, url: &str) -> Result<VerifiableResponse, Error> {
        self.invoke(url, Method::OPTIONS).await
    }

    /// Send the request with an arbitrary method. One attempt, no retries.
    pub async fn invoke(&self, url: &str, method: Method) -> Result<VerifiableResponse, Error> {
        let (client, request) = self.spec.prepare(method, url).await?;
        let log = &self.spec.log;
        logging::log_request(log.request, &request, log);

        let timeout = self.spec.effective_timeout();
        let start = Instant::now();
        let response = client
            .execute(request)
            .await
            .map_err(|e| transport_error(e, timeout))?;
        let response = Response::capture(response, start)
            .await
            .map_err(|e| transport_error(e, timeout))?;
        debug!(
            "Received HTTP {} from {} in {:?}",
            response.status(),
            response.url(),
            response.elapsed()
        );

        logging::log_response(log.response, &response, log);
        Ok(VerifiableResponse::with_log_config(response, log.clone()))
    }
}
