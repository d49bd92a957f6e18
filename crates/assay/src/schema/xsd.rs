//! XML Schema (XSD 1.0) validation backed by libxml2.

use libxml::schemas::{SchemaParserContext, SchemaValidationContext};

use super::document::{first_error, parse_document};
use super::SchemaError;

/// A set of XML schema documents, at most one per target namespace.
///
/// Every document is compiled when it is added, so a set only ever holds schemas
/// libxml2 accepts. A document is validated against the schema whose target
/// namespace equals the namespace of its root element.
#[derive(Debug, Clone, Default)]
pub struct XmlSchemaSet {
    schemas: Vec<SchemaDocument>,
}

#[derive(Debug, Clone)]
struct SchemaDocument {
    target_namespace: Option<String>,
    text: String,
}

impl XmlSchemaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a single schema document.
    pub fn parse(schema: &str) -> Result<Self, SchemaError> {
        let mut set = Self::new();
        set.add(schema)?;
        Ok(set)
    }

    /// Add a schema document for a target namespace not yet in the set.
    pub fn add(&mut self, schema: &str) -> Result<(), SchemaError> {
        let document = parse_document(schema, "schema")?;
        compile(schema)?;

        let target_namespace = document
            .get_root_element()
            .and_then(|root| root.get_attribute("targetNamespace"))
            .filter(|namespace| !namespace.is_empty());
        if self
            .schemas
            .iter()
            .any(|existing| existing.target_namespace == target_namespace)
        {
            return Err(SchemaError::new(format!(
                "the set already holds a schema for {}",
                describe_namespace(target_namespace.as_deref())
            )));
        }
        self.schemas.push(SchemaDocument {
            target_namespace,
            text: schema.to_string(),
        });
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Validate an XML document against the set.
    pub fn validate(&self, xml: &str) -> Result<(), SchemaError> {
        let document = parse_document(xml, "body")?;
        let namespace = document
            .get_root_element()
            .and_then(|root| root.get_namespace())
            .map(|namespace| namespace.get_href())
            .filter(|href| !href.is_empty());
        let schema = self
            .schemas
            .iter()
            .find(|schema| schema.target_namespace == namespace)
            .ok_or_else(|| {
                SchemaError::new(format!(
                    "No schema in the set covers {}.",
                    describe_namespace(namespace.as_deref())
                ))
            })?;

        let mut context = compile(&schema.text)?;
        context
            .validate_document(&document)
            .map_err(|errors| first_error(&errors, "the document is not valid"))
    }
}

fn compile(schema: &str) -> Result<SchemaValidationContext, SchemaError> {
    let mut parser = SchemaParserContext::from_buffer(schema);
    SchemaValidationContext::from_parser(&mut parser)
        .map_err(|errors| first_error(&errors, "the schema could not be compiled"))
}

fn describe_namespace(namespace: Option<&str>) -> String {
    match namespace {
        Some(namespace) => format!("namespace '{namespace}'"),
        None => "elements without a namespace".to_string(),
    }
}
