//! JSONPath evaluation.

use std::borrow::Cow;

use serde_json::Value;
use serde_json_path::JsonPath;

use super::{PathError, PathKind};
use crate::content_type::SupportedType;

/// Query `body` with `path`, returning matched nodes in document order.
pub(super) fn select(body: &str, path: &str) -> Result<Vec<Value>, PathError> {
    let document: Value = serde_json::from_str(body).map_err(|e| PathError::MalformedBody {
        format: SupportedType::Json,
        reason: e.to_string(),
    })?;

    let query = JsonPath::parse(&rooted(path)).map_err(|e| PathError::InvalidExpression {
        kind: PathKind::JsonPath,
        path: path.to_string(),
        reason: e.to_string(),
    })?;

    Ok(query.query(&document).all().into_iter().cloned().collect())
}

/// Accept the relaxed `Places[0].Name` form by anchoring it at the root.
fn rooted(path: &str) -> Cow<'_, str> {
    let trimmed = path.trim();
    if trimmed.starts_with('$') {
        Cow::Borrowed(trimmed)
    } else if trimmed.starts_with('[') {
        Cow::Owned(format!("${trimmed}"))
    } else {
        Cow::Owned(format!("$.{trimmed}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rooted() {
        assert_eq!(rooted("$.a.b"), "$.a.b");
        assert_eq!(rooted("a.b"), "$.a.b");
        assert_eq!(rooted("[0].a"), "$[0].a");
        assert_eq!(rooted("  $.a "), "$.a");
    }

    #[test]
    fn test_wildcard_and_filter() {
        let body = r#"{"items":[{"id":1,"tag":"x"},{"id":2,"tag":"y"},{"id":3,"tag":"x"}]}"#;
        assert_eq!(
            select(body, "$.items[*].id").unwrap(),
            vec![json!(1), json!(2), json!(3)]
        );
        assert_eq!(
            select(body, "$.items[?@.tag == 'x'].id").unwrap(),
            vec![json!(1), json!(3)]
        );
    }

    #[test]
    fn test_missing_member_selects_nothing() {
        assert!(select(r#"{"a":1}"#, "$.b").unwrap().is_empty());
    }
}
