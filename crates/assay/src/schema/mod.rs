//! Schema validation of response bodies: JSON Schema, XSD and inline DTD.

mod document;
mod dtd;
mod json;
mod xsd;

use thiserror::Error;

pub use json::{JsonSchema, JsonSchemaSource};
pub use xsd::XmlSchemaSet;

use crate::content_type::require_schema_content_type;

/// Why a schema could not be compiled or why a document does not conform to it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SchemaError(String);

impl SchemaError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        SchemaError(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// An XML schema given either as text or as an already compiled set.
#[derive(Debug, Clone)]
pub enum XmlSchemaSource {
    Text(String),
    Set(XmlSchemaSet),
}

impl From<&str> for XmlSchemaSource {
    fn from(text: &str) -> Self {
        XmlSchemaSource::Text(text.to_string())
    }
}

impl From<String> for XmlSchemaSource {
    fn from(text: String) -> Self {
        XmlSchemaSource::Text(text)
    }
}

impl From<XmlSchemaSet> for XmlSchemaSource {
    fn from(set: XmlSchemaSet) -> Self {
        XmlSchemaSource::Set(set)
    }
}

impl From<&XmlSchemaSet> for XmlSchemaSource {
    fn from(set: &XmlSchemaSet) -> Self {
        XmlSchemaSource::Set(set.clone())
    }
}

pub(crate) fn verify_json_schema(
    content_type: Option<&str>,
    body: &str,
    source: &JsonSchemaSource,
) -> Result<(), String> {
    require_schema_content_type(content_type, "json")?;
    let schema = source
        .compile()
        .map_err(|e| format!("Could not parse supplied JSON schema: {e}"))?;
    let instance: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| format!("Response body did not match JSON schema supplied: {e}"))?;
    schema
        .validate(&instance)
        .map_err(|e| format!("Response body did not match JSON schema supplied: {e}"))
}

pub(crate) fn verify_xsd(
    content_type: Option<&str>,
    body: &str,
    source: &XmlSchemaSource,
) -> Result<(), String> {
    require_schema_content_type(content_type, "xml")?;
    let compiled;
    let set = match source {
        XmlSchemaSource::Set(set) => set,
        XmlSchemaSource::Text(text) => {
            compiled = XmlSchemaSet::parse(text)
                .map_err(|e| format!("Could not parse supplied XML schema. Error: {e}"))?;
            &compiled
        }
    };
    set.validate(body)
        .map_err(|e| format!("Response body did not match XML schema supplied. Error: {e}"))
}

pub(crate) fn verify_inline_dtd(content_type: Option<&str>, body: &str) -> Result<(), String> {
    require_schema_content_type(content_type, "xml")?;
    dtd::validate(body).map_err(|e| format!("Response body did not match inline DTD. Error: {e}"))
}
