//! Reusable bundles of response expectations.

use super::VerifiableResponse;
use crate::error::VerificationError;
use crate::matcher::Expected;

/// Expected status code, content type and headers applied together with
/// [`VerifiableResponse::spec`]. Checks run in that order; the first failure wins.
#[derive(Debug, Default)]
pub struct ResponseSpecification {
    status_code: Option<Expected<u16>>,
    content_type: Option<Expected<String>>,
    headers: Vec<(String, Expected<String>)>,
}

impl ResponseSpecification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_code(mut self, expected: impl Into<Expected<u16>>) -> Self {
        self.status_code = Some(expected.into());
        self
    }

    pub fn content_type(mut self, expected: impl Into<Expected<String>>) -> Self {
        self.content_type = Some(expected.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, expected: impl Into<Expected<String>>) -> Self {
        self.headers.push((name.into(), expected.into()));
        self
    }

    pub(crate) fn verify<'r>(
        &self,
        response: &'r VerifiableResponse,
    ) -> Result<&'r VerifiableResponse, VerificationError> {
        if let Some(expected) = &self.status_code {
            response.check_status(expected)?;
        }
        if let Some(expected) = &self.content_type {
            response.check_content_type(expected)?;
        }
        for (name, expected) in &self.headers {
            response.check_header(name, expected)?;
        }
        Ok(response)
    }
}
