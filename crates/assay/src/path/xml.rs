//! XPath evaluation over XML documents.

use serde_json::Value;
use sxd_document::dom::Document;
use sxd_document::parser;
use sxd_xpath::{Context, Factory, Value as XPathValue};

use super::{PathError, PathKind};
use crate::content_type::SupportedType;

pub(super) fn select(body: &str, path: &str) -> Result<Vec<Value>, PathError> {
    let package = parser::parse(body).map_err(|e| PathError::MalformedBody {
        format: SupportedType::Xml,
        reason: e.to_string(),
    })?;
    let document = package.as_document();
    evaluate(&document, path)
}

/// Evaluate an XPath expression against any sxd document.
///
/// Node-sets yield the string value of each node in document order; scalar
/// results (from `count()`, `string()`, comparisons) yield one text value.
pub(super) fn evaluate(document: &Document<'_>, path: &str) -> Result<Vec<Value>, PathError> {
    let invalid = |reason: String| PathError::InvalidExpression {
        kind: PathKind::XPath,
        path: path.to_string(),
        reason,
    };

    let factory = Factory::new();
    let xpath = factory
        .build(path)
        .map_err(|e| invalid(e.to_string()))?
        .ok_or_else(|| invalid("expression is empty".to_string()))?;

    let context = Context::new();
    let value = xpath
        .evaluate(&context, document.root())
        .map_err(|e| invalid(e.to_string()))?;

    let values = match value {
        XPathValue::Nodeset(nodes) => nodes
            .document_order()
            .into_iter()
            .map(|node| Value::String(node.string_value()))
            .collect(),
        XPathValue::String(s) => vec![Value::String(s)],
        XPathValue::Number(n) => vec![Value::String(format_number(n))],
        XPathValue::Boolean(b) => vec![Value::String(b.to_string())],
    };
    Ok(values)
}

/// Format an XPath number without a trailing `.0` for integral values.
/// XPath `string()` form of a number. `Display` already drops a zero fraction.
fn format_number(n: f64) -> String {
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    n.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_content_concatenates_descendants() {
        let xml = r#"<root><item>a<b>b</b>c</item></root>"#;
        assert_eq!(select(xml, "/root/item").unwrap(), vec![json!("abc")]);
    }

    #[test]
    fn test_text_node_selection() {
        let xml = r#"<root><name>John</name></root>"#;
        assert_eq!(select(xml, "/root/name/text()").unwrap(), vec![json!("John")]);
    }

    #[test]
    fn test_scalar_results() {
        let xml = r#"<root><n>1.5</n><n>2</n></root>"#;
        assert_eq!(select(xml, "sum(//n)").unwrap(), vec![json!("3.5")]);
        assert_eq!(select(xml, "count(//n) = 2").unwrap(), vec![json!("true")]);
        assert_eq!(select(xml, "string(//n[2])").unwrap(), vec![json!("2")]);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-12.0), "-12");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_large_sums_are_not_clamped() {
        let xml = "<r><n>9000000000000000000</n><n>9000000000000000000</n></r>";
        assert_eq!(
            select(xml, "sum(//n)").unwrap(),
            vec![json!("18000000000000000000")]
        );
        assert_eq!(format_number(1e20), "100000000000000000000");
    }
}
