//! # Components
//!
//! Reusable schemas and responses registered under pattern-checked keys.
//! References are recognized and kept, never resolved.

use crate::error::{ErrorKind, FieldPath, Reason, ValidationError};
use crate::oas::fields::{list_of, map_of, raw_object, string, try_fields, Fields, Parsed};
use crate::oas::primitives::{json_type_name, ComponentKey};
use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use serde::Serialize;
use serde_json::{Map, Value};

fn component_key(key: &str) -> Result<ComponentKey, Reason> {
    ComponentKey::parse(key).map_err(|reason| reason.retag(ErrorKind::InvalidComponentKey))
}

/// A by-name pointer to another object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceObject {
    #[serde(rename = "$ref")]
    reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl ReferenceObject {
    /// Validates a Reference Object located at `path`.
    pub fn from_value(value: &Value, path: &FieldPath) -> Parsed<Self> {
        let fields = Fields::of(value, path, "reference")?;
        let reference = fields.required("reference", string);
        let summary = fields.optional("summary", string);
        let description = fields.optional("description", string);
        try_fields!(reference, summary, description);
        Ok(Self {
            reference,
            summary,
            description,
        })
    }

    /// The raw `$ref` value.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Summary overriding the target's.
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Description overriding the target's.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Name of the targeted component if this is a local `#/components/{section}/{name}`
    /// pointer.
    pub fn component_name(&self, section: &str) -> Option<String> {
        let pointer = self.reference.strip_prefix("#/")?;
        let mut segments = pointer.split('/');
        if segments.next()? != "components" || segments.next()? != section {
            return None;
        }
        let name = segments.next()?;
        if segments.next().is_some() {
            return None;
        }
        let decoded = name.replace("~1", "/").replace("~0", "~");
        let name = percent_decode_str(&decoded).decode_utf8_lossy().into_owned();
        (!name.is_empty()).then_some(name)
    }
}

/// A JSON Schema: either a boolean schema or a keyword object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemaObject {
    /// `true` accepts every instance, `false` none.
    Boolean(bool),
    /// A keyword object, kept as written.
    Object(Map<String, Value>),
}

impl SchemaObject {
    /// Validates a Schema Object located at `path`.
    pub fn from_value(value: &Value, path: &FieldPath) -> Parsed<Self> {
        match value {
            Value::Bool(accept) => Ok(Self::Boolean(*accept)),
            Value::Object(map) => Ok(Self::Object(map.clone())),
            other => Err(ValidationError::single(
                path,
                ErrorKind::TypeMismatch,
                format!(
                    "schema must be an object or a boolean, found {}",
                    json_type_name(other)
                ),
            )),
        }
    }

    /// The `$ref` keyword of an object schema.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Object(map) => map.get("$ref").and_then(Value::as_str),
            Self::Boolean(_) => None,
        }
    }
}

/// A single response from an API operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseObject {
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    headers: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    links: Option<Map<String, Value>>,
}

impl ResponseObject {
    /// Validates a Response Object located at `path`.
    pub fn from_value(value: &Value, path: &FieldPath) -> Parsed<Self> {
        let fields = Fields::of(value, path, "response")?;
        let description = fields.required("description", string);
        let headers = fields.optional("headers", raw_object);
        let content = fields.optional("content", raw_object);
        let links = fields.optional("links", raw_object);
        try_fields!(description, headers, content, links);
        Ok(Self {
            description,
            headers,
            content,
            links,
        })
    }

    /// A description of the response.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Response headers, unvalidated.
    pub fn headers(&self) -> Option<&Map<String, Value>> {
        self.headers.as_ref()
    }

    /// Media types of the response body, unvalidated.
    pub fn content(&self) -> Option<&Map<String, Value>> {
        self.content.as_ref()
    }

    /// Operation links, unvalidated.
    pub fn links(&self) -> Option<&Map<String, Value>> {
        self.links.as_ref()
    }
}

/// A response given in full or by reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseOrReference {
    /// Pointer to a response registered elsewhere.
    Reference(ReferenceObject),
    /// Inline response.
    Response(ResponseObject),
}

impl ResponseOrReference {
    /// Picks the variant by the presence of `$ref`, then validates it.
    pub fn from_value(value: &Value, path: &FieldPath) -> Parsed<Self> {
        match value {
            Value::Object(map) if map.contains_key("$ref") => {
                ReferenceObject::from_value(value, path).map(Self::Reference)
            }
            _ => ResponseObject::from_value(value, path).map(Self::Response),
        }
    }
}

/// Reusable objects for the rest of the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComponentsObject {
    schemas: IndexMap<ComponentKey, Vec<SchemaObject>>,
    responses: IndexMap<ComponentKey, Vec<ResponseOrReference>>,
}

impl ComponentsObject {
    /// Validates a Components Object located at `path`.
    pub fn from_value(value: &Value, path: &FieldPath) -> Parsed<Self> {
        let fields = Fields::of(value, path, "components")?;
        let schemas = fields.defaulted(
            "schemas",
            IndexMap::new,
            map_of(component_key, list_of(SchemaObject::from_value)),
        );
        let responses = fields.defaulted(
            "responses",
            IndexMap::new,
            map_of(component_key, list_of(ResponseOrReference::from_value)),
        );
        try_fields!(schemas, responses);
        Ok(Self { schemas, responses })
    }

    /// Schemas by component key.
    pub fn schemas(&self) -> &IndexMap<ComponentKey, Vec<SchemaObject>> {
        &self.schemas
    }

    /// Responses by component key.
    pub fn responses(&self) -> &IndexMap<ComponentKey, Vec<ResponseOrReference>> {
        &self.responses
    }

    /// Schema variants registered under `key`.
    pub fn schema(&self, key: &str) -> Option<&[SchemaObject]> {
        self.schemas
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Response variants registered under `key`.
    pub fn response(&self, key: &str) -> Option<&[ResponseOrReference]> {
        self.responses
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_slice())
    }
}
