//! # OpenAPI Document
//!
//! The root aggregate and the public entry points. Every top-level field is
//! validated and all violations are reported together; nothing is returned
//! unless the whole tree is valid.

use crate::error::{AppError, AppResult, ErrorKind, FieldPath, ValidationError, Violation};
use crate::oas::components::ComponentsObject;
use crate::oas::fields::{constrained, list_of, try_fields, Fields, Parsed};
use crate::oas::metadata::{
    ExternalDocumentationObject, InfoObject, SecurityRequirementObject, TagObject,
};
use crate::oas::paths::{paths_from_value, webhooks_from_value, PathItemObject, PathsMapping};
use crate::oas::primitives::AnyUrl;
use crate::oas::server::ServerObject;
use indexmap::IndexMap;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// The only OpenAPI version this model accepts.
pub const SUPPORTED_OPENAPI_VERSION: &str = "3.1.1";

/// A validated OpenAPI 3.1.1 description.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenApiDocument {
    openapi: String,
    info: InfoObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    json_schema_dialect: Option<AnyUrl>,
    servers: Vec<ServerObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    paths: Option<PathsMapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    webhooks: Option<IndexMap<String, PathItemObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    components: Option<ComponentsObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    security: Option<Vec<SecurityRequirementObject>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<TagObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_docs: Option<ExternalDocumentationObject>,
    #[serde(flatten)]
    extensions: IndexMap<String, Value>,
}

impl OpenApiDocument {
    /// Validates a decoded document.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        tracing::debug!("validating OpenAPI document");
        let result = Self::parse(value, &FieldPath::root());
        match &result {
            Ok(doc) => tracing::debug!(
                servers = doc.servers.len(),
                paths = doc.paths.as_ref().map_or(0, IndexMap::len),
                tags = doc.tags.len(),
                "OpenAPI document is valid"
            ),
            Err(err) => tracing::debug!(
                violations = err.violations().len(),
                "OpenAPI document rejected"
            ),
        }
        result
    }

    fn parse(value: &Value, path: &FieldPath) -> Parsed<Self> {
        let fields = Fields::of(value, path, "OpenAPI document")?;
        let openapi =
            fields.defaulted("openapi", || SUPPORTED_OPENAPI_VERSION.to_string(), version);
        let info = fields.required("info", InfoObject::from_value);
        let json_schema_dialect =
            fields.optional("json_schema_dialect", constrained(AnyUrl::parse));
        let servers = fields.defaulted(
            "servers",
            || vec![ServerObject::default_server()],
            list_of(ServerObject::from_value),
        );
        let paths = fields.optional("paths", paths_from_value);
        let webhooks = fields.optional("webhooks", webhooks_from_value);
        let components = fields.optional("components", ComponentsObject::from_value);
        let security =
            fields.optional("security", list_of(SecurityRequirementObject::from_value));
        let tags = fields.defaulted("tags", Vec::new, unique_tags);
        let external_docs =
            fields.optional("external_docs", ExternalDocumentationObject::from_value);
        try_fields!(
            openapi,
            info,
            json_schema_dialect,
            servers,
            paths,
            webhooks,
            components,
            security,
            tags,
            external_docs,
        );

        Ok(Self {
            openapi,
            info,
            json_schema_dialect,
            servers,
            paths,
            webhooks,
            components,
            security,
            tags,
            external_docs,
            extensions: fields.extensions(),
        })
    }

    /// Serialized form of the document; re-validating it yields an equal document.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// The OpenAPI version, always [`SUPPORTED_OPENAPI_VERSION`].
    pub fn openapi(&self) -> &str {
        &self.openapi
    }

    /// Metadata about the API.
    pub fn info(&self) -> &InfoObject {
        &self.info
    }

    /// Default `$schema` dialect for Schema Objects.
    pub fn json_schema_dialect(&self) -> Option<&AnyUrl> {
        self.json_schema_dialect.as_ref()
    }

    /// Target servers; `[http://example.com/]` when the field is absent.
    pub fn servers(&self) -> &[ServerObject] {
        &self.servers
    }

    /// Endpoint paths.
    pub fn paths(&self) -> Option<&PathsMapping> {
        self.paths.as_ref()
    }

    /// Incoming webhooks by name.
    pub fn webhooks(&self) -> Option<&IndexMap<String, PathItemObject>> {
        self.webhooks.as_ref()
    }

    /// Reusable components.
    pub fn components(&self) -> Option<&ComponentsObject> {
        self.components.as_ref()
    }

    /// Alternative security requirements for the whole API.
    pub fn security(&self) -> Option<&[SecurityRequirementObject]> {
        self.security.as_deref()
    }

    /// Declared tags, names unique.
    pub fn tags(&self) -> &[TagObject] {
        &self.tags
    }

    /// Additional external documentation.
    pub fn external_docs(&self) -> Option<&ExternalDocumentationObject> {
        self.external_docs.as_ref()
    }

    /// Specification extensions on the root object.
    pub fn extensions(&self) -> &IndexMap<String, Value> {
        &self.extensions
    }
}

impl<'de> Deserialize<'de> for OpenApiDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Self::from_value(&raw).map_err(DeError::custom)
    }
}

fn version(value: &Value, path: &FieldPath) -> Parsed<String> {
    match value {
        Value::String(v) if v == SUPPORTED_OPENAPI_VERSION => Ok(v.clone()),
        other => Err(ValidationError::single(
            path,
            ErrorKind::UnsupportedVersion,
            format!(
                "unsupported OpenAPI version {}, only '{}' is supported",
                other, SUPPORTED_OPENAPI_VERSION
            ),
        )),
    }
}

/// A tag list whose names are unique; every repeat is reported at its own position.
fn unique_tags(value: &Value, path: &FieldPath) -> Parsed<Vec<TagObject>> {
    let tags = list_of(TagObject::from_value)(value, path)?;
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    let mut duplicates = Vec::new();
    for (index, tag) in tags.iter().enumerate() {
        if let Some(first) = first_seen.get(tag.name()) {
            duplicates.push(Violation {
                path: path.index(index).key("name"),
                kind: ErrorKind::DuplicateTagName,
                message: format!(
                    "duplicate tag name '{}' (first declared at index {})",
                    tag.name(),
                    first
                ),
            });
        } else {
            first_seen.insert(tag.name(), index);
        }
    }
    match ValidationError::from_violations(duplicates) {
        Some(err) => Err(err),
        None => Ok(tags),
    }
}

/// Parses an OpenAPI document from YAML (or JSON, a YAML subset) and validates it.
pub fn parse_openapi_document(yaml_content: &str) -> AppResult<OpenApiDocument> {
    let raw: Value = serde_yaml::from_str(yaml_content)
        .map_err(|e| AppError::Parse(format!("Failed to parse OpenAPI YAML: {}", e)))?;
    Ok(OpenApiDocument::from_value(&raw)?)
}

/// Parses an OpenAPI document from JSON and validates it.
pub fn parse_openapi_json(json_content: &str) -> AppResult<OpenApiDocument> {
    let raw: Value = serde_json::from_str(json_content)
        .map_err(|e| AppError::Parse(format!("Failed to parse OpenAPI JSON: {}", e)))?;
    Ok(OpenApiDocument::from_value(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "openapi": "3.1.1",
            "info": {"title": "Pets", "version": "1.0.0"}
        })
    }

    #[test]
    fn test_minimal_document_gets_defaults() {
        let doc = OpenApiDocument::from_value(&minimal()).unwrap();
        assert_eq!(doc.openapi(), "3.1.1");
        assert_eq!(doc.servers(), &[ServerObject::default_server()]);
        assert_eq!(doc.servers()[0].url().as_str(), "http://example.com/");
        assert!(doc.tags().is_empty());
        assert!(doc.paths().is_none());
        assert!(doc.components().is_none());
    }

    #[test]
    fn test_absent_version_defaults_to_supported() {
        let doc = OpenApiDocument::from_value(&json!({
            "info": {"title": "Pets", "version": "1.0.0"}
        }))
        .unwrap();
        assert_eq!(doc.openapi(), SUPPORTED_OPENAPI_VERSION);
    }

    #[test]
    fn test_unsupported_versions() {
        for bad in [json!("3.1.0"), json!("3.1.1 "), json!("3.2.0"), json!(3.1), json!(null)] {
            let mut value = minimal();
            value["openapi"] = bad.clone();
            let err = OpenApiDocument::from_value(&value).unwrap_err();
            assert_eq!(err.kinds(), vec![ErrorKind::UnsupportedVersion], "{bad}");
            assert_eq!(err.first().path.to_string(), "openapi");
        }
    }

    #[test]
    fn test_version_error_is_reported_with_other_errors() {
        let err = OpenApiDocument::from_value(&json!({
            "openapi": "2.0",
            "info": {"title": "Pets"},
            "servers": "nope"
        }))
        .unwrap_err();
        assert_eq!(
            err.kinds(),
            vec![
                ErrorKind::UnsupportedVersion,
                ErrorKind::MissingRequiredField,
                ErrorKind::TypeMismatch
            ]
        );
    }

    #[test]
    fn test_duplicate_tag_names() {
        let mut value = minimal();
        value["tags"] = json!([{"name": "pets"}, {"name": "store"}, {"name": "pets"}]);
        let err = OpenApiDocument::from_value(&value).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::DuplicateTagName]);
        assert_eq!(err.first().path.to_string(), "tags[2].name");
        assert!(err.first().message.contains("'pets'"));
    }

    #[test]
    fn test_root_must_be_object() {
        let err = OpenApiDocument::from_value(&json!("openapi")).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::TypeMismatch]);
        assert!(err.first().path.is_root());
    }

    #[test]
    fn test_deserialize_runs_validation() {
        let doc: OpenApiDocument = serde_json::from_value(minimal()).unwrap();
        assert_eq!(doc.info().title(), "Pets");

        let mut bad = minimal();
        bad["openapi"] = json!("3.0.3");
        let err = serde_json::from_value::<OpenApiDocument>(bad).unwrap_err();
        assert!(err.to_string().contains("UnsupportedVersion"));
    }

    #[test]
    fn test_parse_errors_are_not_validation_errors() {
        let err = parse_openapi_document("openapi: [unclosed").unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));

        let err = parse_openapi_json("{").unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }
}
