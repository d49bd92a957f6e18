//! libxml2 parsing and error plumbing shared by the XSD and DTD validators.

use std::ffi::CStr;

use libxml::bindings;
use libxml::error::StructuredError;
use libxml::parser::{Parser, ParserOptions};
use libxml::tree::Document;

use super::SchemaError;

/// Parse `xml` strictly. `what` names the input in the error message.
pub(super) fn parse_document(xml: &str, what: &str) -> Result<Document, SchemaError> {
    let options = ParserOptions {
        recover: false,
        ..ParserOptions::default()
    };
    reset_last_error();
    Parser::default()
        .parse_string_with_options(xml, options)
        .map_err(|_| {
            let detail = last_error_message().unwrap_or_else(|| "no root element".to_string());
            SchemaError::new(format!("{what} is not well-formed XML: {detail}"))
        })
}

/// The first message libxml2 reported, or `fallback` when it reported none.
pub(super) fn first_error(errors: &[StructuredError], fallback: &str) -> SchemaError {
    let message = errors
        .iter()
        .filter_map(|error| error.message.as_deref())
        .map(str::trim)
        .find(|message| !message.is_empty())
        .unwrap_or(fallback);
    SchemaError::new(message)
}

pub(super) fn reset_last_error() {
    // SAFETY: resets the calling thread's libxml2 error slot.
    unsafe { bindings::xmlResetLastError() }
}

/// Message of the last error libxml2 raised on this thread.
pub(super) fn last_error_message() -> Option<String> {
    // SAFETY: xmlGetLastError returns null or a pointer into thread-local state owned
    // by libxml2; the message is copied out before any other libxml2 call.
    unsafe {
        let error = bindings::xmlGetLastError();
        if error.is_null() || (*error).message.is_null() {
            return None;
        }
        let message = CStr::from_ptr((*error).message).to_string_lossy();
        Some(message.trim().to_string()).filter(|m| !m.is_empty())
    }
}
