//! Content-Type resolution for body verification and extraction.
//!
//! Resolution is an ordered rule list:
//!
//! 1. an explicit override always wins,
//! 2. an empty or missing header defaults to JSON,
//! 3. a case-insensitive substring match on `json`, `xml`, `html`,
//! 4. anything else is an error naming the declared value.
//!
//! Schema validation uses a narrower gate (`require_schema_content_type`) that only
//! checks for the one substring the schema kind needs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Body formats the path extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedType {
    Json,
    Xml,
    Html,
}

impl SupportedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportedType::Json => "json",
            SupportedType::Xml => "xml",
            SupportedType::Html => "html",
        }
    }
}

impl fmt::Display for SupportedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call override of the response Content-Type header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentTypeOverride {
    #[default]
    UseResponseContentTypeHeaderValue,
    Json,
    Xml,
    Html,
}

/// Override used by verification call sites.
pub type VerifyAs = ContentTypeOverride;

/// Override used by extraction call sites.
pub type ExtractAs = ContentTypeOverride;

impl ContentTypeOverride {
    fn forced(&self) -> Option<SupportedType> {
        match self {
            ContentTypeOverride::UseResponseContentTypeHeaderValue => None,
            ContentTypeOverride::Json => Some(SupportedType::Json),
            ContentTypeOverride::Xml => Some(SupportedType::Xml),
            ContentTypeOverride::Html => Some(SupportedType::Html),
        }
    }
}

/// The declared Content-Type could not be mapped to a supported format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedContentType(pub String);

impl fmt::Display for UnsupportedContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unable to extract elements from response with Content-Type '{}'",
            self.0
        )
    }
}

/// Decide how a body should be interpreted.
pub fn resolve(
    declared: Option<&str>,
    override_with: ContentTypeOverride,
) -> Result<SupportedType, UnsupportedContentType> {
    if let Some(forced) = override_with.forced() {
        return Ok(forced);
    }

    let declared = declared.map(str::trim).unwrap_or_default();
    if declared.is_empty() {
        return Ok(SupportedType::Json);
    }

    sniff(declared).ok_or_else(|| UnsupportedContentType(declared.to_string()))
}

/// Substring match on the declared media type, without any defaulting.
pub fn sniff(declared: &str) -> Option<SupportedType> {
    let lower = declared.to_lowercase();
    if lower.contains("json") {
        Some(SupportedType::Json)
    } else if lower.contains("xml") {
        Some(SupportedType::Xml)
    } else if lower.contains("html") {
        Some(SupportedType::Html)
    } else {
        None
    }
}

/// Gate used before schema validation: the header must contain `required`.
///
/// Returns the failure message on mismatch. A missing header is reported as an
/// empty value.
pub fn require_schema_content_type(declared: Option<&str>, required: &str) -> Result<(), String> {
    let declared = declared.unwrap_or_default();
    if declared.to_lowercase().contains(required) {
        Ok(())
    } else {
        Err(format!(
            "Expected response Content-Type header to contain '{required}', but was '{declared}'"
        ))
    }
}
