//! Assertions over a captured response.

use std::cell::Cell;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{ExtractableResponse, Response, ResponseSpecification};
use crate::config::{LogConfig, ResponseLogLevel};
use crate::content_type::{resolve, ContentTypeOverride, VerifyAs};
use crate::deserialize::deserialize;
use crate::error::{DeserializationError, VerificationError};
use crate::logging;
use crate::matcher::{Expected, Matcher};
use crate::path::{self, display_list, Cardinality, Extracted};
use crate::schema::{self, JsonSchemaSource, XmlSchemaSource};

type Verified<'a> = Result<&'a VerifiableResponse, VerificationError>;

/// Fluent verification handle returned by dispatch.
///
/// Every check borrows the same captured [`Response`] and returns `Ok(&self)` so
/// checks chain with `?`:
///
/// ```ignore
/// response
///     .then()
///     .status_code(200)?
///     .header("Content-Type", contains_string("json"))?
///     .body_path("$.Places[0].Name", equal_to("Sun City"))?;
/// ```
#[derive(Debug)]
pub struct VerifiableResponse {
    response: Response,
    log: LogConfig,
    log_on_failure: Cell<bool>,
}

impl VerifiableResponse {
    pub fn new(response: Response) -> Self {
        Self::with_log_config(response, LogConfig::default())
    }

    pub fn with_log_config(response: Response, log: LogConfig) -> Self {
        let log_on_failure = log.response == ResponseLogLevel::OnVerificationFailure;
        VerifiableResponse {
            response,
            log,
            log_on_failure: Cell::new(log_on_failure),
        }
    }

    pub fn then(&self) -> &Self {
        self
    }

    pub fn and(&self) -> &Self {
        self
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Log the response now, or on the first failing check for
    /// [`ResponseLogLevel::OnVerificationFailure`].
    pub fn log(&self, level: ResponseLogLevel) -> &Self {
        if level == ResponseLogLevel::OnVerificationFailure {
            self.log_on_failure.set(true);
        } else {
            logging::log_response(level, &self.response, &self.log);
        }
        self
    }

    fn fail(&self, message: impl Into<String>) -> VerificationError {
        let error = VerificationError::new(message);
        if self.log_on_failure.get() {
            logging::log_verification_failure(error.message(), &self.response, &self.log);
        }
        error
    }

    pub fn status_code(&self, expected: impl Into<Expected<u16>>) -> Verified<'_> {
        self.check_status(&expected.into())
    }

    pub(crate) fn check_status(&self, expected: &Expected<u16>) -> Verified<'_> {
        let actual = self.response.status();
        if expected.is_satisfied_by(&actual) {
            return Ok(self);
        }
        Err(match expected {
            Expected::Value(value) => {
                self.fail(format!("Expected status code to be {value}, but was {actual}"))
            }
            Expected::Matcher(matcher) => self.fail(format!(
                "Expected response status code to match '{}', but was {}",
                matcher.describe(),
                actual
            )),
        })
    }

    /// Compare the first value of header `name` (looked up case-insensitively).
    pub fn header(&self, name: &str, expected: impl Into<Expected<String>>) -> Verified<'_> {
        self.check_header(name, &expected.into())
    }

    pub(crate) fn check_header(&self, name: &str, expected: &Expected<String>) -> Verified<'_> {
        let Some(actual) = self.response.header(name) else {
            return Err(self.fail(format!(
                "Expected header with name '{name}' to be in the response, but it could not be found."
            )));
        };
        let actual = actual.to_string();
        if expected.is_satisfied_by(&actual) {
            return Ok(self);
        }
        Err(match expected {
            Expected::Value(value) => self.fail(format!(
                "Expected value for response header with name '{name}' to be '{value}', but was '{actual}'."
            )),
            Expected::Matcher(matcher) => self.fail(format!(
                "Expected value for response header with name '{}' to match '{}', but was '{}'.",
                name,
                matcher.describe(),
                actual
            )),
        })
    }

    pub fn content_type(&self, expected: impl Into<Expected<String>>) -> Verified<'_> {
        self.check_content_type(&expected.into())
    }

    pub(crate) fn check_content_type(&self, expected: &Expected<String>) -> Verified<'_> {
        let Some(actual) = self.response.content_type() else {
            return Err(self.fail("Response Content-Type header could not be found."));
        };
        let actual = actual.to_string();
        if expected.is_satisfied_by(&actual) {
            return Ok(self);
        }
        Err(match expected {
            Expected::Value(value) => self.fail(format!(
                "Expected response Content-Type header to be '{value}', but was '{actual}'"
            )),
            Expected::Matcher(matcher) => self.fail(format!(
                "Expected response Content-Type header to match '{}', but was '{}'",
                matcher.describe(),
                actual
            )),
        })
    }

    /// Whole-body check against a literal string or a string matcher.
    pub fn body(&self, expected: impl Into<Expected<String>>) -> Verified<'_> {
        let expected = expected.into();
        let actual = self.response.text().to_string();
        if expected.is_satisfied_by(&actual) {
            return Ok(self);
        }
        Err(match expected {
            Expected::Value(value) => self.fail(format!(
                "Expected response body to be '{value}', but was '{actual}'."
            )),
            Expected::Matcher(matcher) => self.fail(format!(
                "Expected response body to match '{}', but was '{}'.",
                matcher.describe(),
                actual
            )),
        })
    }

    pub fn body_path<M: Matcher<Value>>(&self, path: &str, matcher: M) -> Verified<'_> {
        self.body_path_as(path, matcher, VerifyAs::UseResponseContentTypeHeaderValue)
    }

    /// Select `path` and apply `matcher` to the match. Several matches are passed
    /// on as one JSON array.
    pub fn body_path_as<M: Matcher<Value>>(
        &self,
        path: &str,
        matcher: M,
        verify_as: VerifyAs,
    ) -> Verified<'_> {
        let extracted = self.select(path, verify_as, Cardinality::Singular)?;
        let shown = extracted.to_string();
        let actual = extracted.into_value();
        if matcher.matches(&actual) {
            return Ok(self);
        }
        Err(self.fail(format!(
            "Expected element selected by '{}' to match '{}' but was {}",
            path,
            matcher.describe(),
            shown
        )))
    }

    pub fn body_path_list<M: Matcher<[Value]>>(&self, path: &str, matcher: M) -> Verified<'_> {
        self.body_path_list_as(path, matcher, VerifyAs::UseResponseContentTypeHeaderValue)
    }

    /// Select `path` as a list, even for a single match, and apply a collection matcher.
    pub fn body_path_list_as<M: Matcher<[Value]>>(
        &self,
        path: &str,
        matcher: M,
        verify_as: VerifyAs,
    ) -> Verified<'_> {
        let actual = self.select(path, verify_as, Cardinality::List)?.into_list();
        if matcher.matches(&actual) {
            return Ok(self);
        }
        Err(self.fail(format!(
            "Expected elements selected by '{}' to match '{}', but was {}",
            path,
            matcher.describe(),
            display_list(&actual)
        )))
    }

    fn select(
        &self,
        path: &str,
        verify_as: ContentTypeOverride,
        cardinality: Cardinality,
    ) -> Result<Extracted, VerificationError> {
        let format = resolve(self.response.content_type(), verify_as)
            .map_err(|e| self.fail(e.to_string()))?;
        debug!("Verifying '{}' against {} body", path, format);
        path::extract(self.response.text(), format, path, cardinality)
            .map_err(|e| self.fail(e.to_string()))
    }

    /// Compare the value of cookie `name` (looked up case-insensitively).
    pub fn cookie(&self, name: &str, expected: impl Into<Expected<String>>) -> Verified<'_> {
        let expected = expected.into();
        let Some(cookie) = self.response.cookie(name) else {
            return Err(self.fail(format!(
                "Expected cookie with name '{name}' to be in the response, but it could not be found."
            )));
        };
        let actual = cookie.value().to_string();
        if expected.is_satisfied_by(&actual) {
            return Ok(self);
        }
        Err(match expected {
            Expected::Value(value) => self.fail(format!(
                "Expected value for cookie with name '{name}' to be '{value}', but was '{actual}'."
            )),
            Expected::Matcher(matcher) => self.fail(format!(
                "Expected value for cookie with name '{}' to match '{}', but was '{}'.",
                name,
                matcher.describe(),
                actual
            )),
        })
    }

    /// Validate the body against a JSON schema. The Content-Type must contain `json`.
    pub fn matches_json_schema(&self, schema: impl Into<JsonSchemaSource>) -> Verified<'_> {
        schema::verify_json_schema(
            self.response.content_type(),
            self.response.text(),
            &schema.into(),
        )
        .map_err(|message| self.fail(message))?;
        Ok(self)
    }

    /// Validate the body against an XML schema. The Content-Type must contain `xml`.
    pub fn matches_xsd(&self, schema: impl Into<XmlSchemaSource>) -> Verified<'_> {
        schema::verify_xsd(
            self.response.content_type(),
            self.response.text(),
            &schema.into(),
        )
        .map_err(|message| self.fail(message))?;
        Ok(self)
    }

    /// Validate the body against the DTD declared in its own DOCTYPE.
    pub fn matches_inline_dtd(&self) -> Verified<'_> {
        schema::verify_inline_dtd(self.response.content_type(), self.response.text())
            .map_err(|message| self.fail(message))?;
        Ok(self)
    }

    /// Body length in characters.
    pub fn response_body_length<M: Matcher<usize>>(&self, matcher: M) -> Verified<'_> {
        let actual = self.response.text().chars().count();
        if matcher.matches(&actual) {
            return Ok(self);
        }
        Err(self.fail(format!(
            "Expected response body length to match '{}' but was {}",
            matcher.describe(),
            actual
        )))
    }

    pub fn response_time<M: Matcher<Duration>>(&self, matcher: M) -> Verified<'_> {
        let actual = self.response.elapsed();
        if matcher.matches(&actual) {
            return Ok(self);
        }
        Err(self.fail(format!(
            "Expected response time to match '{}' but was {:?}",
            matcher.describe(),
            actual
        )))
    }

    /// Apply every check of a reusable [`ResponseSpecification`].
    pub fn spec(&self, spec: &ResponseSpecification) -> Verified<'_> {
        spec.verify(self)
    }

    pub fn deserialize_to<T: DeserializeOwned>(&self) -> Result<T, DeserializationError> {
        self.deserialize_as(VerifyAs::UseResponseContentTypeHeaderValue)
    }

    pub fn deserialize_as<T: DeserializeOwned>(
        &self,
        verify_as: VerifyAs,
    ) -> Result<T, DeserializationError> {
        deserialize(self.response.content_type(), self.response.text(), verify_as)
    }

    pub fn extract(&self) -> ExtractableResponse<'_> {
        ExtractableResponse::new(&self.response)
    }
}
