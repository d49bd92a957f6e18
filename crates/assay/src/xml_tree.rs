//! Small helpers over the sxd DOM shared by deserialization.

use sxd_document::dom::{ChildOfElement, ChildOfRoot, Document, Element};

pub(crate) fn root_element<'d>(document: &Document<'d>) -> Option<Element<'d>> {
    document.root().children().into_iter().find_map(|child| match child {
        ChildOfRoot::Element(element) => Some(element),
        _ => None,
    })
}

pub(crate) fn child_elements<'d>(element: Element<'d>) -> Vec<Element<'d>> {
    element
        .children()
        .into_iter()
        .filter_map(|child| match child {
            ChildOfElement::Element(e) => Some(e),
            _ => None,
        })
        .collect()
}

/// Concatenated text of the element's own text nodes (descendants excluded).
pub(crate) fn direct_text(element: Element<'_>) -> String {
    element
        .children()
        .into_iter()
        .filter_map(|child| match child {
            ChildOfElement::Text(text) => Some(text.text()),
            _ => None,
        })
        .collect()
}
