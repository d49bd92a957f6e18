//! Whole-body deserialization into caller types.
//!
//! JSON bodies go straight through `serde_json`. XML bodies are first mapped onto
//! a JSON value tree: the root element becomes the top-level value, attributes
//! become `@name` members, repeated child elements collect into arrays, and text
//! next to child elements or attributes is stored under `#text`. Leaf text stays
//! a string and empty leaves become `null`.
//!
//! The XML tree is read through [`XmlValue`], which parses numbers and booleans
//! out of strings only when the target type asks for them, and reads a single
//! element as a one-item sequence.

use serde::de::value::{MapDeserializer, SeqDeserializer};
use serde::de::{self, DeserializeOwned, Deserializer, IntoDeserializer, Unexpected, Visitor};
use serde::forward_to_deserialize_any;
use serde_json::{Map, Value};
use sxd_document::dom::Element;
use sxd_document::parser;

use crate::content_type::{resolve, ContentTypeOverride, SupportedType};
use crate::error::DeserializationError;
use crate::xml_tree::{child_elements, direct_text, root_element};

pub(crate) fn deserialize<T: DeserializeOwned>(
    content_type: Option<&str>,
    body: &str,
    override_with: ContentTypeOverride,
) -> Result<T, DeserializationError> {
    let unsupported =
        || DeserializationError::UnsupportedContentType(content_type.unwrap_or_default().to_string());

    let body_error = |e: serde_json::Error| DeserializationError::Body(e.to_string());
    match resolve(content_type, override_with).map_err(|_| unsupported())? {
        SupportedType::Json => serde_json::from_str(body).map_err(body_error),
        SupportedType::Xml => T::deserialize(XmlValue(xml_to_value(body)?)).map_err(body_error),
        SupportedType::Html => Err(unsupported()),
    }
}

/// Map an XML document onto a JSON value tree with string leaves.
pub fn xml_to_value(xml: &str) -> Result<Value, DeserializationError> {
    let package = parser::parse(xml).map_err(|e| DeserializationError::Body(e.to_string()))?;
    let document = package.as_document();
    let root = root_element(&document)
        .ok_or_else(|| DeserializationError::Body("document has no root element".to_string()))?;
    Ok(element_to_value(root))
}

fn element_to_value(element: Element<'_>) -> Value {
    let children = child_elements(element);
    let attributes = element.attributes();
    let text = direct_text(element);

    if children.is_empty() && attributes.is_empty() {
        return leaf(&text);
    }

    let mut map = Map::new();
    for attribute in attributes {
        map.insert(
            format!("@{}", attribute.name().local_part()),
            leaf(attribute.value()),
        );
    }
    for child in children {
        let name = child.name().local_part().to_string();
        let value = element_to_value(child);
        match map.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(name, value);
            }
        }
    }
    if !text.trim().is_empty() {
        map.insert("#text".to_string(), leaf(&text));
    }
    Value::Object(map)
}

fn leaf(text: &str) -> Value {
    match text.trim() {
        "" => Value::Null,
        trimmed => Value::String(trimmed.to_string()),
    }
}

/// Deserializer over an XML-derived value tree.
///
/// Strings become numbers or booleans only when the visitor asks for one. A
/// value that is not an array reads as a one-item sequence, and `null` reads as
/// an empty sequence or map, since XML cannot tell these shapes apart.
pub struct XmlValue(pub Value);

impl<'de> IntoDeserializer<'de, serde_json::Error> for XmlValue {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident),+ $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
                match self.0 {
                    Value::String(text) => match text.trim().parse() {
                        Ok(parsed) => visitor.$visit(parsed),
                        Err(_) => Err(de::Error::invalid_value(Unexpected::Str(&text), &visitor)),
                    },
                    other => other.$method(visitor),
                }
            }
        )+
    };
}

impl<'de> Deserializer<'de> for XmlValue {
    type Error = serde_json::Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.0 {
            Value::Array(items) => visit_items(items, visitor),
            Value::Object(members) => visit_members(members, visitor),
            other => other.deserialize_any(visitor),
        }
    }

    deserialize_parsed!(
        deserialize_bool => visit_bool,
        deserialize_i8 => visit_i8,
        deserialize_i16 => visit_i16,
        deserialize_i32 => visit_i32,
        deserialize_i64 => visit_i64,
        deserialize_u8 => visit_u8,
        deserialize_u16 => visit_u16,
        deserialize_u32 => visit_u32,
        deserialize_u64 => visit_u64,
        deserialize_f32 => visit_f32,
        deserialize_f64 => visit_f64,
    );

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.0 {
            Value::Null => visitor.visit_none(),
            other => visitor.visit_some(XmlValue(other)),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.0 {
            Value::Array(items) => visit_items(items, visitor),
            Value::Null => visit_items(Vec::new(), visitor),
            single => visit_items(vec![single], visitor),
        }
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.0 {
            Value::Object(members) => visit_members(members, visitor),
            Value::Null => visit_members(Map::new(), visitor),
            other => other.deserialize_map(visitor),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.0.deserialize_enum(name, variants, visitor)
    }

    forward_to_deserialize_any! {
        i128 u128 char str string bytes byte_buf unit unit_struct tuple
        tuple_struct identifier ignored_any
    }
}

fn visit_items<'de, V: Visitor<'de>>(
    items: Vec<Value>,
    visitor: V,
) -> Result<V::Value, serde_json::Error> {
    let mut seq: SeqDeserializer<_, serde_json::Error> =
        SeqDeserializer::new(items.into_iter().map(XmlValue));
    let value = visitor.visit_seq(&mut seq)?;
    seq.end()?;
    Ok(value)
}

fn visit_members<'de, V: Visitor<'de>>(
    members: Map<String, Value>,
    visitor: V,
) -> Result<V::Value, serde_json::Error> {
    let mut map: MapDeserializer<'_, _, serde_json::Error> = MapDeserializer::new(
        members.into_iter().map(|(name, value)| (name, XmlValue(value))),
    );
    let value = visitor.visit_map(&mut map)?;
    map.end()?;
    Ok(value)
}
