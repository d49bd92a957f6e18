//! Error types raised while building, sending, verifying and extracting.
//!
//! Verification and extraction failures are message-carrying structs: the
//! message text is part of the public contract and test authors match on it.

use std::time::Duration;

use thiserror::Error;

/// An assertion about the response did not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct VerificationError {
    message: String,
}

impl VerificationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A requested value could not be located in the response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExtractionError {
    message: String,
}

impl ExtractionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The response body could not be deserialized into the requested shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeserializationError {
    #[error("Unable to deserialize response with Content-Type '{0}'")]
    UnsupportedContentType(String),
    #[error("Unable to deserialize response body: {0}")]
    Body(String),
}

/// The request could not be assembled before dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestCreationError {
    #[error("Could not determine how to serialize request based on specified content type '{0}'")]
    UnsupportedContentType(String),
    #[error("File with path '{0}' could not be found.")]
    FileNotFound(String),
    #[error("Could not serialize request body: {0}")]
    Serialization(String),
    #[error("Invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("No value was supplied for path parameter '{0}'")]
    MissingPathParameter(String),
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },
}

/// The transport failed to produce a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Request timeout of {0:?} exceeded.")]
    Timeout(Duration),
    #[error("Unhandled exception while sending request: {0}")]
    Network(String),
}

/// Any failure the fluent chain can raise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Verification(#[from] VerificationError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    RequestCreation(#[from] RequestCreationError),
    #[error(transparent)]
    Deserialization(#[from] DeserializationError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
