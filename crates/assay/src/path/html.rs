//! XPath evaluation over HTML documents.
//!
//! The body is parsed with html5ever (via `scraper`), which repairs unclosed and
//! misnested tags the way browsers do, and the resulting tree is copied into an
//! sxd document so the same XPath engine used for XML can run over it.

use scraper::{ElementRef, Html, Node};
use serde_json::Value;
use sxd_document::dom::{Document, Element};
use sxd_document::Package;

use super::PathError;

pub(super) fn select(body: &str, path: &str) -> Result<Vec<Value>, PathError> {
    let package = to_package(body);
    let document = package.as_document();
    super::xml::evaluate(&document, path)
}

/// Parse `body` as HTML and copy its element tree into a fresh sxd package.
fn to_package(body: &str) -> Package {
    let html = Html::parse_document(body);
    let package = Package::new();
    {
        let document = package.as_document();
        let root = copy_element(document, html.root_element());
        document.root().append_child(root);
    }
    package
}

fn copy_element<'d>(document: Document<'d>, source: ElementRef<'_>) -> Element<'d> {
    let element = document.create_element(source.value().name());
    for (name, value) in source.value().attrs() {
        element.set_attribute_value(name, value);
    }

    for child in source.children() {
        match child.value() {
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    element.append_child(copy_element(document, child_element));
                }
            }
            Node::Text(text) => element.append_child(document.create_text(text)),
            Node::Comment(comment) => element.append_child(document.create_comment(comment)),
            _ => {}
        }
    }
    element
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parser_inserts_implied_elements() {
        // html5ever adds <html>, <head> and <body>
        let values = select("<p>hello</p>", "/html/body/p").unwrap();
        assert_eq!(values, vec![json!("hello")]);
    }

    #[test]
    fn test_attributes_are_queryable() {
        let body = r#"<html><body><a href="/one">One</a><a href="/two">Two</a></body></html>"#;
        assert_eq!(
            select(body, "//a/@href").unwrap(),
            vec![json!("/one"), json!("/two")]
        );
    }

    #[test]
    fn test_entities_are_decoded() {
        let values = select("<p>Fish &amp; Chips</p>", "//p").unwrap();
        assert_eq!(values, vec![json!("Fish & Chips")]);
    }
}
