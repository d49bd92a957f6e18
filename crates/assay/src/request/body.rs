//! Request bodies and their serialization.

use serde::Serialize;
use serde_json::Value;
use sxd_document::dom::{Document, Element};
use sxd_document::{writer, Package};

use crate::error::RequestCreationError;

pub(crate) const JSON: &str = "application/json";
pub(crate) const XML: &str = "application/xml";

/// How a structured body is written on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BodyFormat {
    /// Decided from the request Content-Type: `xml` writes XML, `json` or no
    /// Content-Type writes JSON, anything else is an error.
    #[default]
    Auto,
    Json,
    Xml { root: String },
}

/// A request payload, resolved to text once when the request is built.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Raw(String),
    Structured { value: Value, format: BodyFormat },
}

impl RequestBody {
    pub fn structured<T: Serialize>(
        value: &T,
        format: BodyFormat,
    ) -> Result<Self, RequestCreationError> {
        let value = serde_json::to_value(value)
            .map_err(|e| RequestCreationError::Serialization(e.to_string()))?;
        Ok(RequestBody::Structured { value, format })
    }

    pub fn json<T: Serialize>(value: &T) -> Result<Self, RequestCreationError> {
        Self::structured(value, BodyFormat::Json)
    }

    pub fn xml<T: Serialize>(root: impl Into<String>, value: &T) -> Result<Self, RequestCreationError> {
        Self::structured(value, BodyFormat::Xml { root: root.into() })
    }

    /// Serialize for a request whose Content-Type is `content_type`.
    ///
    /// Returns the body text and the Content-Type to send when none was set.
    pub(crate) fn render(
        &self,
        content_type: Option<&str>,
    ) -> Result<(String, Option<&'static str>), RequestCreationError> {
        let (value, format) = match self {
            RequestBody::Raw(text) => return Ok((text.clone(), None)),
            RequestBody::Structured { value, format } => (value, format),
        };

        match format {
            BodyFormat::Json => Ok((to_json(value)?, Some(JSON))),
            BodyFormat::Xml { root } => Ok((to_xml(root, value)?, Some(XML))),
            BodyFormat::Auto => {
                let declared = content_type.unwrap_or_default();
                let lower = declared.to_lowercase();
                if lower.contains("xml") {
                    Ok((to_xml("root", value)?, None))
                } else if lower.is_empty() || lower.contains("json") {
                    Ok((to_json(value)?, Some(JSON)))
                } else {
                    Err(RequestCreationError::UnsupportedContentType(declared.to_string()))
                }
            }
        }
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Raw(text.to_string())
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Raw(text)
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        RequestBody::Structured {
            value,
            format: BodyFormat::Auto,
        }
    }
}

fn to_json(value: &Value) -> Result<String, RequestCreationError> {
    serde_json::to_string(value).map_err(|e| RequestCreationError::Serialization(e.to_string()))
}

/// Write a JSON value tree as XML under `root`.
///
/// Object members become child elements, `@name` members become attributes and
/// `#text` becomes text content. Arrays repeat the element they are named by.
pub fn to_xml(root: &str, value: &Value) -> Result<String, RequestCreationError> {
    let package = Package::new();
    let document = package.as_document();
    let element = document.create_element(root);
    document.root().append_child(element);
    fill(document, element, value);

    let mut out = Vec::new();
    writer::format_document(&document, &mut out)
        .map_err(|e| RequestCreationError::Serialization(e.to_string()))?;
    String::from_utf8(out).map_err(|e| RequestCreationError::Serialization(e.to_string()))
}

fn fill<'d>(document: Document<'d>, element: Element<'d>, value: &Value) {
    match value {
        Value::Null => {}
        Value::Object(members) => {
            for (name, member) in members {
                if let Some(attribute) = name.strip_prefix('@') {
                    element.set_attribute_value(attribute, &scalar_text(member));
                } else if name == "#text" {
                    element.append_child(document.create_text(&scalar_text(member)));
                } else {
                    append_named(document, element, name, member);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                append_named(document, element, "item", item);
            }
        }
        scalar => element.append_child(document.create_text(&scalar_text(scalar))),
    }
}

fn append_named<'d>(document: Document<'d>, parent: Element<'d>, name: &str, value: &Value) {
    if let Value::Array(items) = value {
        for item in items {
            append_named(document, parent, name, item);
        }
        return;
    }
    let child = document.create_element(name);
    parent.append_child(child);
    fill(document, child, value);
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
