//! Path evaluation against buffered response bodies.
//!
//! - `json` - RFC 9535 JSONPath queries (`$.Places[0:].Name`)
//! - `xml` - XPath 1.0 over a parsed XML document
//! - `html` - XPath 1.0 over an HTML document parsed with a tolerant parser
//!
//! JSON matches keep their native type; XML and HTML matches are always text.
//! A query that selects nothing is an error, never an empty value.

mod html;
mod json;
mod xml;

use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::content_type::SupportedType;

/// Query language used for a path expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    JsonPath,
    XPath,
}

impl PathKind {
    pub fn for_format(format: SupportedType) -> Self {
        match format {
            SupportedType::Json => PathKind::JsonPath,
            SupportedType::Xml | SupportedType::Html => PathKind::XPath,
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKind::JsonPath => f.write_str("JsonPath"),
            PathKind::XPath => f.write_str("XPath"),
        }
    }
}

/// Whether a single match collapses to a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cardinality {
    #[default]
    Singular,
    List,
}

/// Result of a path extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Single(Value),
    List(Vec<Value>),
}

impl Extracted {
    fn collapse(mut values: Vec<Value>, cardinality: Cardinality) -> Self {
        if cardinality == Cardinality::Singular && values.len() == 1 {
            Extracted::Single(values.remove(0))
        } else {
            Extracted::List(values)
        }
    }

    pub fn as_single(&self) -> Option<&Value> {
        match self {
            Extracted::Single(value) => Some(value),
            Extracted::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Extracted::Single(_) => None,
            Extracted::List(values) => Some(values),
        }
    }

    /// Flatten into a single JSON value; lists become arrays.
    pub fn into_value(self) -> Value {
        match self {
            Extracted::Single(value) => value,
            Extracted::List(values) => Value::Array(values),
        }
    }

    /// Always list-shaped, regardless of how the extraction collapsed.
    pub fn into_list(self) -> Vec<Value> {
        match self {
            Extracted::Single(value) => vec![value],
            Extracted::List(values) => values,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Extracted::Single(_) => 1,
            Extracted::List(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Extracted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extracted::Single(value) => f.write_str(&display_value(value)),
            Extracted::List(values) => f.write_str(&display_list(values)),
        }
    }
}

/// Render a selected value the way failure messages show it: strings bare,
/// everything else as JSON text.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `[a, b, c]`
pub fn display_list(values: &[Value]) -> String {
    let items: Vec<String> = values.iter().map(display_value).collect();
    format!("[{}]", items.join(", "))
}

/// Failure to evaluate a path against a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    NoResults {
        kind: PathKind,
        path: String,
    },
    InvalidExpression {
        kind: PathKind,
        path: String,
        reason: String,
    },
    MalformedBody {
        format: SupportedType,
        reason: String,
    },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::NoResults { kind, path } => {
                write!(f, "{kind} expression '{path}' did not yield any results.")
            }
            PathError::InvalidExpression { kind, path, reason } => {
                write!(f, "Invalid {kind} expression '{path}': {reason}")
            }
            PathError::MalformedBody { format, reason } => write!(
                f,
                "Response body could not be parsed as {}: {reason}",
                format.as_str().to_uppercase()
            ),
        }
    }
}

impl std::error::Error for PathError {}

/// Evaluate `path` and return every match in document order.
pub fn select(body: &str, format: SupportedType, path: &str) -> Result<Vec<Value>, PathError> {
    let values = match format {
        SupportedType::Json => json::select(body, path)?,
        SupportedType::Xml => xml::select(body, path)?,
        SupportedType::Html => html::select(body, path)?,
    };

    debug!(
        "{} '{}' selected {} node(s) from {} body",
        PathKind::for_format(format),
        path,
        values.len(),
        format
    );

    if values.is_empty() {
        return Err(PathError::NoResults {
            kind: PathKind::for_format(format),
            path: path.to_string(),
        });
    }
    Ok(values)
}

/// Evaluate `path` and shape the result according to `cardinality`.
pub fn extract(
    body: &str,
    format: SupportedType,
    path: &str,
    cardinality: Cardinality,
) -> Result<Extracted, PathError> {
    select(body, format, path).map(|values| Extracted::collapse(values, cardinality))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PLACES_JSON: &str = r#"{"Places":[{"Name":"Sun City","Inhabitants":100000,"IsCapital":true},{"Name":"Pleasure Meadow","Inhabitants":50000,"IsCapital":false}]}"#;

    const PLACES_XML: &str = r#"<?xml version="1.0"?>
<Places>
  <Place id="1"><Name>Sun City</Name><Inhabitants>100000</Inhabitants></Place>
  <Place id="2"><Name>Pleasure Meadow</Name><Inhabitants>50000</Inhabitants></Place>
</Places>"#;

    const PLACES_HTML: &str = r#"<!DOCTYPE html>
<html><head><title>Places</title></head>
<body>
  <ul id="places">
    <li class="place">Sun City</li>
    <li class="place">Pleasure Meadow
  </ul>
  <p>unclosed paragraph
</body></html>"#;

    #[test]
    fn test_json_single_match_keeps_native_type() {
        let name = extract(PLACES_JSON, SupportedType::Json, "$.Places[0].Name", Cardinality::Singular);
        assert_eq!(name, Ok(Extracted::Single(json!("Sun City"))));

        let inhabitants = extract(
            PLACES_JSON,
            SupportedType::Json,
            "$.Places[0].Inhabitants",
            Cardinality::Singular,
        );
        assert_eq!(inhabitants, Ok(Extracted::Single(json!(100000))));

        let capital = extract(
            PLACES_JSON,
            SupportedType::Json,
            "$.Places[0].IsCapital",
            Cardinality::Singular,
        );
        assert_eq!(capital, Ok(Extracted::Single(json!(true))));
    }

    #[test]
    fn test_json_object_match_is_returned_whole() {
        let place = extract(PLACES_JSON, SupportedType::Json, "$.Places[1]", Cardinality::Singular)
            .unwrap();
        assert_eq!(
            place.into_value(),
            json!({"Name": "Pleasure Meadow", "Inhabitants": 50000, "IsCapital": false})
        );
    }

    #[test]
    fn test_json_slice_returns_list_in_document_order() {
        let names = extract(PLACES_JSON, SupportedType::Json, "$.Places[0:].Name", Cardinality::Singular);
        assert_eq!(
            names,
            Ok(Extracted::List(vec![json!("Sun City"), json!("Pleasure Meadow")]))
        );
    }

    #[test]
    fn test_list_cardinality_wraps_single_match() {
        let names = extract(PLACES_JSON, SupportedType::Json, "$.Places[0].Name", Cardinality::List);
        assert_eq!(names, Ok(Extracted::List(vec![json!("Sun City")])));
    }

    #[test]
    fn test_json_path_without_root_is_accepted() {
        let name = extract(PLACES_JSON, SupportedType::Json, "Places[0].Name", Cardinality::Singular);
        assert_eq!(name, Ok(Extracted::Single(json!("Sun City"))));
    }

    #[test]
    fn test_json_null_is_a_result() {
        let body = r#"{"value": null}"#;
        let value = extract(body, SupportedType::Json, "$.value", Cardinality::Singular);
        assert_eq!(value, Ok(Extracted::Single(Value::Null)));
    }

    #[test]
    fn test_zero_matches_fail_for_every_format() {
        let err = select(PLACES_JSON, SupportedType::Json, "$.Places[5].Name").unwrap_err();
        assert_eq!(
            err.to_string(),
            "JsonPath expression '$.Places[5].Name' did not yield any results."
        );

        let err = select(PLACES_XML, SupportedType::Xml, "//Country").unwrap_err();
        assert_eq!(
            err.to_string(),
            "XPath expression '//Country' did not yield any results."
        );

        let err = select(PLACES_HTML, SupportedType::Html, "//table").unwrap_err();
        assert_eq!(
            err.to_string(),
            "XPath expression '//table' did not yield any results."
        );
    }

    #[test]
    fn test_xml_single_match_is_text() {
        let name = extract(PLACES_XML, SupportedType::Xml, "//Place[1]/Name", Cardinality::Singular);
        assert_eq!(name, Ok(Extracted::Single(json!("Sun City"))));

        // Numbers stay text in XML
        let inhabitants = extract(
            PLACES_XML,
            SupportedType::Xml,
            "//Place[1]/Inhabitants",
            Cardinality::Singular,
        );
        assert_eq!(inhabitants, Ok(Extracted::Single(json!("100000"))));
    }

    #[test]
    fn test_xml_multiple_matches_and_attributes() {
        let names = select(PLACES_XML, SupportedType::Xml, "//Place/Name").unwrap();
        assert_eq!(names, vec![json!("Sun City"), json!("Pleasure Meadow")]);

        let ids = select(PLACES_XML, SupportedType::Xml, "//Place/@id").unwrap();
        assert_eq!(ids, vec![json!("1"), json!("2")]);
    }

    #[test]
    fn test_xml_scalar_functions() {
        let count = select(PLACES_XML, SupportedType::Xml, "count(//Place)").unwrap();
        assert_eq!(count, vec![json!("2")]);
    }

    #[test]
    fn test_html_tolerates_unclosed_tags() {
        let title = extract(PLACES_HTML, SupportedType::Html, "//title", Cardinality::Singular);
        assert_eq!(title, Ok(Extracted::Single(json!("Places"))));

        let places = select(PLACES_HTML, SupportedType::Html, "//li[@class='place']").unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0], json!("Sun City"));
    }

    #[test]
    fn test_malformed_bodies_are_reported() {
        let err = select("{not json", SupportedType::Json, "$.a").unwrap_err();
        assert!(matches!(err, PathError::MalformedBody { format: SupportedType::Json, .. }));
        assert!(err.to_string().starts_with("Response body could not be parsed as JSON"));

        let err = select("<unclosed>", SupportedType::Xml, "//a").unwrap_err();
        assert!(matches!(err, PathError::MalformedBody { format: SupportedType::Xml, .. }));
    }

    #[test]
    fn test_invalid_expressions_are_reported() {
        let err = select(PLACES_JSON, SupportedType::Json, "$.Places[").unwrap_err();
        assert!(matches!(err, PathError::InvalidExpression { kind: PathKind::JsonPath, .. }));

        let err = select(PLACES_XML, SupportedType::Xml, "//Place[").unwrap_err();
        assert!(matches!(err, PathError::InvalidExpression { kind: PathKind::XPath, .. }));
    }

    #[test]
    fn test_extracted_display() {
        assert_eq!(Extracted::Single(json!("Sun City")).to_string(), "Sun City");
        assert_eq!(Extracted::Single(json!(42)).to_string(), "42");
        assert_eq!(
            Extracted::List(vec![json!("a"), json!(1), json!(true)]).to_string(),
            "[a, 1, true]"
        );
    }
}
