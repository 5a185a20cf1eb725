//! # Server Objects
//!
//! A server URL may be a template with `{name}` placeholders. Validation runs in
//! two phases:
//!
//! 1. [`ServerTemplate::from_value`] checks the template shape, with every
//!    placeholder masked as `0` after a `:` and as `x` elsewhere, and validates
//!    each [`ServerVariableObject`].
//! 2. [`ServerTemplate::resolve`] substitutes every placeholder with its
//!    variable's `default`, re-validates the result as an HTTP URL and yields
//!    the final [`ServerObject`]. The template and its variables are consumed.

use crate::error::{ErrorKind, FieldPath, ValidationError, Violation};
use crate::oas::fields::{
    any_key, constrained, map_of, string, string_list, try_fields, Fields, Parsed,
};
use crate::oas::primitives::HttpUrl;
use indexmap::IndexMap;
use regex::{Captures, Regex};
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;

/// URL used when a document declares no servers.
pub const DEFAULT_SERVER_URL: &str = "http://example.com";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").expect("Invalid regex constant"));

/// A substitution variable for a server URL template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerVariableObject {
    default: String,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    enum_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl ServerVariableObject {
    /// Validates a Server Variable Object from field values.
    pub fn new(
        default: &str,
        enum_values: Option<Vec<String>>,
        description: Option<&str>,
    ) -> Parsed<Self> {
        Self::build(
            &FieldPath::root(),
            default.to_string(),
            enum_values,
            description.map(str::to_string),
        )
    }

    /// Validates a Server Variable Object located at `path`.
    pub fn from_value(value: &Value, path: &FieldPath) -> Parsed<Self> {
        let fields = Fields::of(value, path, "server variable")?;
        let default = fields.required("default", string);
        let enum_values = fields.optional("enum_values", string_list);
        let description = fields.optional("description", string);
        try_fields!(default, enum_values, description);
        Self::build(fields.path(), default, enum_values, description)
    }

    fn build(
        path: &FieldPath,
        default: String,
        enum_values: Option<Vec<String>>,
        description: Option<String>,
    ) -> Parsed<Self> {
        if let Some(allowed) = &enum_values {
            if !allowed.contains(&default) {
                return Err(ValidationError::single(
                    &path.key("default"),
                    ErrorKind::EnumMembershipViolation,
                    format!("default '{}' is not one of {:?}", default, allowed),
                ));
            }
        }
        Ok(Self {
            default,
            enum_values,
            description,
        })
    }

    /// Value substituted into the URL template.
    pub fn default_value(&self) -> &str {
        &self.default
    }

    /// Allowed values, when restricted.
    pub fn enum_values(&self) -> Option<&[String]> {
        self.enum_values.as_deref()
    }

    /// A description of the variable.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A validated server whose URL may still contain placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerTemplate {
    path: FieldPath,
    url: String,
    description: Option<String>,
    variables: IndexMap<String, ServerVariableObject>,
}

impl ServerTemplate {
    /// Validates a Server Object located at `path`, without substituting.
    pub fn from_value(value: &Value, path: &FieldPath) -> Parsed<Self> {
        let fields = Fields::of(value, path, "server")?;
        let url = fields.defaulted("url", || DEFAULT_SERVER_URL.to_string(), template_url);
        let description = fields.optional("description", string);
        let variables = fields.optional(
            "variables",
            map_of(any_key, ServerVariableObject::from_value),
        );
        try_fields!(url, description, variables);
        Ok(Self {
            path: fields.path().clone(),
            url,
            description,
            variables: variables.unwrap_or_default(),
        })
    }

    /// Builds a template from field values; `path` locates it for error reports.
    pub fn new(
        path: &FieldPath,
        url: &str,
        description: Option<&str>,
        variables: IndexMap<String, ServerVariableObject>,
    ) -> Parsed<Self> {
        let url = template_url(&Value::String(url.to_string()), &path.key("url"))?;
        Ok(Self {
            path: path.clone(),
            url,
            description: description.map(str::to_string),
            variables,
        })
    }

    /// The raw URL template.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Placeholder names in order of appearance, repeats included.
    pub fn placeholders(&self) -> Vec<&str> {
        PLACEHOLDER_RE
            .captures_iter(&self.url)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
            .collect()
    }

    /// Substitutes every placeholder and yields the concrete server.
    ///
    /// Every missing variable name is reported, once each, in order of first use.
    pub fn resolve(self) -> Parsed<ServerObject> {
        let url_path = self.path.key("url");
        let placeholders = self.placeholders();

        if self.variables.is_empty() && !placeholders.is_empty() {
            return Err(ValidationError::single(
                &url_path,
                ErrorKind::UnresolvedTemplateVariable,
                format!(
                    "server URL '{}' uses variables {:?} but no variables are provided",
                    self.url, placeholders
                ),
            ));
        }

        let mut missing: Vec<&str> = Vec::new();
        for name in &placeholders {
            if !self.variables.contains_key(*name) && !missing.contains(name) {
                missing.push(*name);
            }
        }
        if !missing.is_empty() {
            let violations = missing
                .iter()
                .map(|name| Violation {
                    path: url_path.clone(),
                    kind: ErrorKind::UnresolvedTemplateVariable,
                    message: format!(
                        "server URL '{}' references undefined variable '{}'",
                        self.url, name
                    ),
                })
                .collect();
            return Err(ValidationError::from_parts(violations));
        }

        let substituted = PLACEHOLDER_RE.replace_all(&self.url, |cap: &Captures| {
            self.variables
                .get(&cap[1])
                .map_or_else(String::new, |var| var.default.clone())
        });
        tracing::trace!(template = %self.url, url = %substituted, "substituted server variables");

        let url = HttpUrl::parse(&substituted).map_err(|reason| {
            ValidationError::single(
                &url_path,
                ErrorKind::InvalidUrl,
                format!("substituted server URL {}", reason.message),
            )
        })?;

        Ok(ServerObject {
            url,
            description: self.description,
        })
    }
}

/// Validates the template shape with every placeholder masked.
fn template_url(value: &Value, path: &FieldPath) -> Parsed<String> {
    let raw = string(value, path)?;
    constrained(HttpUrl::parse)(&Value::String(mask_placeholders(&raw)), path)?;
    Ok(raw)
}

/// `0` right after a `:` (a port), `x` anywhere else.
///
/// A numeric last host label would be read as an IPv4 address.
fn mask_placeholders(template: &str) -> String {
    let mut masked = String::with_capacity(template.len());
    let mut last = 0;
    for placeholder in PLACEHOLDER_RE.find_iter(template) {
        masked.push_str(&template[last..placeholder.start()]);
        masked.push_str(if masked.ends_with(':') { "0" } else { "x" });
        last = placeholder.end();
    }
    masked.push_str(&template[last..]);
    masked
}

/// A server with a concrete, substituted URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerObject {
    url: HttpUrl,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl ServerObject {
    /// Validates and resolves a Server Object located at `path`.
    pub fn from_value(value: &Value, path: &FieldPath) -> Parsed<Self> {
        ServerTemplate::from_value(value, path)?.resolve()
    }

    /// Validates and resolves a Server Object from field values.
    pub fn new(
        url: &str,
        description: Option<&str>,
        variables: IndexMap<String, ServerVariableObject>,
    ) -> Parsed<Self> {
        ServerTemplate::new(&FieldPath::root(), url, description, variables)?.resolve()
    }

    /// The server every document falls back to: `http://example.com/`.
    pub fn default_server() -> Self {
        Self {
            url: HttpUrl::parse(DEFAULT_SERVER_URL).expect("default server URL is valid"),
            description: None,
        }
    }

    /// The concrete server URL.
    pub fn url(&self) -> &HttpUrl {
        &self.url
    }

    /// A description of the server.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Default for ServerObject {
    fn default() -> Self {
        Self::default_server()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn variables(pairs: &[(&str, &str)]) -> IndexMap<String, ServerVariableObject> {
        pairs
            .iter()
            .map(|(name, default)| {
                (
                    name.to_string(),
                    ServerVariableObject::new(default, None, None).unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_server_variable_object_default_value_is_in_enum() {
        let err = ServerVariableObject::new("foo", Some(vec!["bar".into(), "baz".into()]), None)
            .unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::EnumMembershipViolation]);

        let ok = ServerVariableObject::new("bar", Some(vec!["bar".into(), "baz".into()]), None)
            .unwrap();
        assert_eq!(ok.default_value(), "bar");

        assert!(ServerVariableObject::new("anything", None, None).is_ok());
    }

    #[test]
    fn test_empty_enum_admits_no_default() {
        let err = ServerVariableObject::new("foo", Some(Vec::new()), None).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::EnumMembershipViolation]);
    }

    #[test]
    fn test_substitution_yields_canonical_url() {
        let server = ServerObject::new(
            "https://{hostname}.com",
            None,
            variables(&[("hostname", "foobar")]),
        )
        .unwrap();
        assert_eq!(server.url().as_str(), "https://foobar.com/");
    }

    #[test]
    fn test_substitution_in_path_and_port() {
        let server = ServerObject::new(
            "https://{env}.example.com:{port}/{basePath}",
            Some("Tenant server"),
            variables(&[("env", "prod"), ("port", "8443"), ("basePath", "v2")]),
        )
        .unwrap();
        assert_eq!(server.url().as_str(), "https://prod.example.com:8443/v2");
        assert_eq!(server.description(), Some("Tenant server"));
    }

    #[test]
    fn test_placeholder_without_variables_fails() {
        let err = ServerObject::new("https://{hostname}.com", None, IndexMap::new()).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::UnresolvedTemplateVariable]);
        assert_eq!(err.first().path.to_string(), "url");
    }

    #[test]
    fn test_every_missing_variable_is_reported_once() {
        let err = ServerObject::new(
            "https://{a}.{b}.example.com/{a}/{c}",
            None,
            variables(&[("b", "x")]),
        )
        .unwrap_err();
        assert_eq!(
            err.kinds(),
            vec![
                ErrorKind::UnresolvedTemplateVariable,
                ErrorKind::UnresolvedTemplateVariable
            ]
        );
        assert!(err.violations()[0].message.contains("'a'"));
        assert!(err.violations()[1].message.contains("'c'"));
    }

    #[test]
    fn test_masking_fits_host_port_and_path() {
        assert_eq!(
            mask_placeholders("https://{sub}.example.{tld}:{port}/{base}"),
            "https://x.example.x:0/x"
        );

        let server = ServerObject::new(
            "https://api.example.{tld}",
            None,
            variables(&[("tld", "com")]),
        )
        .unwrap();
        assert_eq!(server.url().as_str(), "https://api.example.com/");
    }

    #[test]
    fn test_bad_substitution_is_invalid_url() {
        let err = ServerObject::new(
            "https://{host}.com",
            None,
            variables(&[("host", "has space")]),
        )
        .unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::InvalidUrl]);
    }

    #[test]
    fn test_template_must_be_http() {
        let err = ServerObject::from_value(
            &json!({"url": "ftp://{host}.example.com", "variables": {"host": {"default": "a"}}}),
            &FieldPath::root().key("servers").index(0),
        )
        .unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::InvalidUrl]);
        assert_eq!(err.first().path.to_string(), "servers[0].url");
    }

    #[test]
    fn test_absent_url_uses_default() {
        let server = ServerObject::from_value(&json!({}), &FieldPath::root()).unwrap();
        assert_eq!(server, ServerObject::default());
        assert_eq!(server.url().as_str(), "http://example.com/");
    }

    #[test]
    fn test_variable_errors_are_located() {
        let err = ServerObject::from_value(
            &json!({
                "url": "https://{env}.example.com",
                "variables": {"env": {"default": "qa", "enum": ["prod", "staging"]}}
            }),
            &FieldPath::root(),
        )
        .unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::EnumMembershipViolation]);
        assert_eq!(err.first().path.to_string(), "variables.env.default");
    }

    #[test]
    fn test_resolved_server_serializes_without_template() {
        let server = ServerObject::from_value(
            &json!({
                "url": "https://{env}.example.com",
                "description": "main",
                "variables": {"env": {"default": "prod"}}
            }),
            &FieldPath::root(),
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(&server).unwrap(),
            json!({"url": "https://prod.example.com/", "description": "main"})
        );
    }
}
