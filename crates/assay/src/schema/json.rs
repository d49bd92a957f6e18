//! JSON Schema validation backed by the `jsonschema` crate.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::SchemaError;

/// A compiled JSON schema, cheap to clone and reuse across verifications.
#[derive(Clone)]
pub struct JsonSchema {
    validator: Arc<jsonschema::Validator>,
}

impl JsonSchema {
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let schema: Value =
            serde_json::from_str(text).map_err(|e| SchemaError::new(e.to_string()))?;
        Self::from_value(&schema)
    }

    pub fn from_value(schema: &Value) -> Result<Self, SchemaError> {
        let validator =
            jsonschema::validator_for(schema).map_err(|e| SchemaError::new(e.to_string()))?;
        Ok(JsonSchema {
            validator: Arc::new(validator),
        })
    }

    /// Validate `instance`, reporting the first violation.
    pub fn validate(&self, instance: &Value) -> Result<(), SchemaError> {
        self.validator.validate(instance).map_err(|e| {
            let location = e.instance_path().to_string();
            if location.is_empty() {
                SchemaError::new(e.to_string())
            } else {
                SchemaError::new(format!("{e} at '{location}'"))
            }
        })
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }
}

impl fmt::Debug for JsonSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchema").finish_non_exhaustive()
    }
}

/// A JSON schema given as text, as a parsed value or already compiled.
#[derive(Debug, Clone)]
pub enum JsonSchemaSource {
    Text(String),
    Value(Value),
    Compiled(JsonSchema),
}

impl JsonSchemaSource {
    pub(crate) fn compile(&self) -> Result<JsonSchema, SchemaError> {
        match self {
            JsonSchemaSource::Text(text) => JsonSchema::parse(text),
            JsonSchemaSource::Value(value) => JsonSchema::from_value(value),
            JsonSchemaSource::Compiled(schema) => Ok(schema.clone()),
        }
    }
}

impl From<&str> for JsonSchemaSource {
    fn from(text: &str) -> Self {
        JsonSchemaSource::Text(text.to_string())
    }
}

impl From<String> for JsonSchemaSource {
    fn from(text: String) -> Self {
        JsonSchemaSource::Text(text)
    }
}

impl From<Value> for JsonSchemaSource {
    fn from(value: Value) -> Self {
        JsonSchemaSource::Value(value)
    }
}

impl From<JsonSchema> for JsonSchemaSource {
    fn from(schema: JsonSchema) -> Self {
        JsonSchemaSource::Compiled(schema)
    }
}

impl From<&JsonSchema> for JsonSchemaSource {
    fn from(schema: &JsonSchema) -> Self {
        JsonSchemaSource::Compiled(schema.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn place_schema() -> JsonSchema {
        JsonSchema::from_value(&json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "inhabitants": {"type": "integer", "minimum": 0}
            },
            "required": ["name"]
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_instance() {
        let schema = place_schema();
        assert!(schema.validate(&json!({"name": "Sun City", "inhabitants": 100})).is_ok());
        assert!(schema.is_valid(&json!({"name": "Sin City"})));
    }

    #[test]
    fn test_first_error_is_reported_with_location() {
        let schema = place_schema();
        let err = schema
            .validate(&json!({"name": "Sun City", "inhabitants": -1}))
            .unwrap_err();
        assert!(err.message().contains("/inhabitants"));

        let err = schema.validate(&json!({})).unwrap_err();
        assert!(err.message().contains("\"name\" is a required property"));
    }

    #[test]
    fn test_invalid_schema() {
        assert!(JsonSchema::parse("{").is_err());
        assert!(JsonSchema::from_value(&json!({"type": 12})).is_err());
    }

    #[test]
    fn test_sources_compile() {
        let text = JsonSchemaSource::from(r#"{"type": "string"}"#);
        assert!(text.compile().unwrap().is_valid(&json!("x")));
        let compiled = JsonSchemaSource::from(&place_schema());
        assert!(!compiled.compile().unwrap().is_valid(&json!(1)));
    }
}
