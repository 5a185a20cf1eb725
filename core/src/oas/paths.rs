//! # Paths
//!
//! Path Item Objects keyed by relative endpoint paths. A Path Item may be empty;
//! its operations are kept as raw mappings under their HTTP method.

use crate::error::{ErrorKind, FieldPath, Reason};
use crate::oas::fields::{
    any_key, list_of, map_of, raw_object, string, try_fields, Collector, Fields, Parsed,
};
use crate::oas::primitives::PathTemplate;
use crate::oas::server::ServerObject;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// Keys of a Path Item that hold operations.
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Path items by endpoint path, in document order.
pub type PathsMapping = IndexMap<PathTemplate, PathItemObject>;

/// Operations available on a single path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathItemObject {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    servers: Option<Vec<ServerObject>>,
    #[serde(flatten)]
    operations: IndexMap<String, Map<String, Value>>,
    #[serde(flatten)]
    extensions: IndexMap<String, Value>,
}

impl PathItemObject {
    /// Validates a Path Item Object located at `path`.
    pub fn from_value(value: &Value, path: &FieldPath) -> Parsed<Self> {
        let fields = Fields::of(value, path, "path item")?;
        let reference = fields.optional("reference", string);
        let summary = fields.optional("summary", string);
        let description = fields.optional("description", string);
        let servers = fields.optional("servers", list_of(ServerObject::from_value));
        let operations = operations(&fields);
        try_fields!(reference, summary, description, servers, operations);
        Ok(Self {
            reference,
            summary,
            description,
            servers,
            operations,
            extensions: fields.extensions(),
        })
    }

    /// The `$ref` to a Path Item defined elsewhere.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// A summary for every operation on this path.
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// A description for every operation on this path.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Servers overriding the document's, with substitution applied.
    pub fn servers(&self) -> Option<&[ServerObject]> {
        self.servers.as_deref()
    }

    /// The operation under `method` (lowercase), unvalidated.
    pub fn operation(&self, method: &str) -> Option<&Map<String, Value>> {
        self.operations.get(method)
    }

    /// Methods with an operation, in [`HTTP_METHODS`] order.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    /// True when no operation is exposed.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Specification extensions.
    pub fn extensions(&self) -> &IndexMap<String, Value> {
        &self.extensions
    }
}

fn operations(fields: &Fields<'_>) -> Parsed<IndexMap<String, Map<String, Value>>> {
    let mut collector = Collector::default();
    let mut operations = IndexMap::new();
    for method in HTTP_METHODS {
        if let Some(Some(operation)) = collector.absorb(fields.optional(method, raw_object)) {
            operations.insert(method.to_string(), operation);
        }
    }
    collector.finish()?;
    Ok(operations)
}

fn path_key(key: &str) -> Result<PathTemplate, Reason> {
    PathTemplate::parse(key).map_err(|reason| reason.retag(ErrorKind::InvalidPathKey))
}

/// Validates a Paths Object located at `path`; every key must start with `/`.
pub fn paths_from_value(value: &Value, path: &FieldPath) -> Parsed<PathsMapping> {
    map_of(path_key, PathItemObject::from_value)(value, path)
}

/// Validates a Webhooks map located at `path`; names are free-form.
pub fn webhooks_from_value(
    value: &Value,
    path: &FieldPath,
) -> Parsed<IndexMap<String, PathItemObject>> {
    map_of(any_key, PathItemObject::from_value)(value, path)
}
