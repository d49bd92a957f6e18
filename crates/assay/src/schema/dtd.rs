//! Validation of a document against the DTD in its own `<!DOCTYPE [...]>` internal subset.

use libxml::bindings;

use super::document::{last_error_message, parse_document, reset_last_error};
use super::SchemaError;

pub(crate) fn validate(xml: &str) -> Result<(), SchemaError> {
    let document = parse_document(xml, "body")?;
    let doc = document.doc_ptr();

    // SAFETY: `doc` is owned by `document`, which outlives this block. The
    // validation context is allocated and freed here and never escapes.
    let valid = unsafe {
        if bindings::xmlGetIntSubset(doc).is_null() {
            return Err(SchemaError::new(
                "The document does not contain an inline DTD.",
            ));
        }
        let context = bindings::xmlNewValidCtxt();
        if context.is_null() {
            return Err(SchemaError::new("could not allocate a DTD validation context"));
        }
        reset_last_error();
        let valid = bindings::xmlValidateDocument(context, doc);
        bindings::xmlFreeValidCtxt(context);
        valid == 1
    };

    if valid {
        Ok(())
    } else {
        Err(SchemaError::new(
            last_error_message().unwrap_or_else(|| "the document is not valid".to_string()),
        ))
    }
}
