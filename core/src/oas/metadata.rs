//! # Metadata Objects
//!
//! Info, Contact, License, Tag, External Documentation and Security Requirement
//! objects: the small records hanging off the document root.

use crate::error::{ErrorKind, FieldPath, ValidationError};
use crate::oas::fields::{
    any_key, constrained, map_of, string, string_list, try_fields, Fields, Parsed,
};
use crate::oas::primitives::{AnyUrl, Email, HttpUrl};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Metadata about the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoObject {
    title: String,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    terms_of_service: Option<HttpUrl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact: Option<ContactObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    license: Option<LicenseObject>,
}

impl InfoObject {
    /// Validates an Info Object located at `path`.
    pub fn from_value(value: &Value, path: &FieldPath) -> Parsed<Self> {
        let fields = Fields::of(value, path, "info")?;
        let title = fields.required("title", string);
        let version = fields.required("version", string);
        let summary = fields.optional("summary", string);
        let description = fields.optional("description", string);
        let terms_of_service = fields.optional("terms_of_service", constrained(HttpUrl::parse));
        let contact = fields.optional("contact", ContactObject::from_value);
        let license = fields.optional("license", LicenseObject::from_value);
        try_fields!(title, version, summary, description, terms_of_service, contact, license);

        Ok(Self {
            title,
            version,
            summary,
            description,
            terms_of_service,
            contact,
            license,
        })
    }

    /// The title of the API.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The version of the API description (not the OpenAPI version).
    pub fn version(&self) -> &str {
        &self.version
    }

    /// A short summary of the API.
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// A CommonMark description of the API.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Terms of Service URL.
    pub fn terms_of_service(&self) -> Option<&HttpUrl> {
        self.terms_of_service.as_ref()
    }

    /// Contact information.
    pub fn contact(&self) -> Option<&ContactObject> {
        self.contact.as_ref()
    }

    /// License information.
    pub fn license(&self) -> Option<&LicenseObject> {
        self.license.as_ref()
    }
}

/// Contact information for the exposed API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactObject {
    name: String,
    url: AnyUrl,
    email: Email,
}

impl ContactObject {
    /// Validates a Contact Object from field values.
    pub fn new(name: &str, url: &str, email: &str) -> Parsed<Self> {
        let root = FieldPath::root();
        let url = AnyUrl::parse(url).map_err(|r| r.at(&root.key("url")));
        let email = Email::parse(email).map_err(|r| r.at(&root.key("email")));
        try_fields!(url, email);
        Ok(Self {
            name: name.to_string(),
            url,
            email,
        })
    }

    /// Validates a Contact Object located at `path`.
    pub fn from_value(value: &Value, path: &FieldPath) -> Parsed<Self> {
        let fields = Fields::of(value, path, "contact")?;
        let name = fields.required("name", string);
        let url = fields.required("url", constrained(AnyUrl::parse));
        let email = fields.required("email", constrained(Email::parse));
        try_fields!(name, url, email);
        Ok(Self { name, url, email })
    }

    /// Name of the contact person or organization.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// URL of the contact information.
    pub fn url(&self) -> &AnyUrl {
        &self.url
    }

    /// Email address of the contact.
    pub fn email(&self) -> &Email {
        &self.email
    }
}

/// License information. Exactly one of `identifier` and `url` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LicenseObject {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<AnyUrl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    identifier: Option<String>,
}

impl LicenseObject {
    /// Validates a License Object from field values.
    pub fn new(name: &str, url: Option<&str>, identifier: Option<&str>) -> Parsed<Self> {
        let root = FieldPath::root();
        let url = url
            .map(AnyUrl::parse)
            .transpose()
            .map_err(|r| r.at(&root.key("url")))?;
        Self::build(
            &root,
            name.to_string(),
            url,
            identifier.map(str::to_string),
        )
    }

    /// Validates a License Object located at `path`.
    pub fn from_value(value: &Value, path: &FieldPath) -> Parsed<Self> {
        let fields = Fields::of(value, path, "license")?;
        let name = fields.required("name", string);
        let url = fields.optional("url", constrained(AnyUrl::parse));
        let identifier = fields.optional("identifier", string);
        try_fields!(name, url, identifier);
        Self::build(fields.path(), name, url, identifier)
    }

    fn build(
        path: &FieldPath,
        name: String,
        url: Option<AnyUrl>,
        identifier: Option<String>,
    ) -> Parsed<Self> {
        // An empty identifier carries no SPDX expression.
        let identifier = identifier.filter(|id| !id.is_empty());
        if identifier.is_some() == url.is_some() {
            return Err(ValidationError::single(
                path,
                ErrorKind::MutuallyExclusiveFieldsViolation,
                "exactly one of 'identifier' or 'url' must be set",
            ));
        }
        Ok(Self {
            name,
            url,
            identifier,
        })
    }

    /// The license name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// URL of the license text, when no SPDX identifier is given.
    pub fn url(&self) -> Option<&AnyUrl> {
        self.url.as_ref()
    }

    /// SPDX license expression, when no URL is given.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }
}

/// Metadata for a tag used by operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagObject {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_docs: Option<ExternalDocumentationObject>,
}

impl TagObject {
    /// Validates a Tag Object located at `path`.
    pub fn from_value(value: &Value, path: &FieldPath) -> Parsed<Self> {
        let fields = Fields::of(value, path, "tag")?;
        let name = fields.required("name", string);
        let description = fields.optional("description", string);
        let external_docs =
            fields.optional("external_docs", ExternalDocumentationObject::from_value);
        try_fields!(name, description, external_docs);
        Ok(Self {
            name,
            description,
            external_docs,
        })
    }

    /// The tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A description of the tag.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Additional external documentation for the tag.
    pub fn external_docs(&self) -> Option<&ExternalDocumentationObject> {
        self.external_docs.as_ref()
    }
}

/// A reference to external documentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalDocumentationObject {
    url: HttpUrl,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl ExternalDocumentationObject {
    /// Validates an External Documentation Object located at `path`.
    pub fn from_value(value: &Value, path: &FieldPath) -> Parsed<Self> {
        let fields = Fields::of(value, path, "externalDocs")?;
        let url = fields.required("url", constrained(HttpUrl::parse));
        let description = fields.optional("description", string);
        try_fields!(url, description);
        Ok(Self { url, description })
    }

    /// URL of the documentation.
    pub fn url(&self) -> &HttpUrl {
        &self.url
    }

    /// A description of the documentation.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Security schemes required together, each with its scopes.
///
/// An empty requirement (`{}`) means anonymous access. Scheme names are not
/// checked against `components` here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SecurityRequirementObject(IndexMap<String, Vec<String>>);

impl SecurityRequirementObject {
    /// Validates a Security Requirement Object located at `path`.
    pub fn from_value(value: &Value, path: &FieldPath) -> Parsed<Self> {
        map_of(any_key, string_list)(value, path).map(Self)
    }

    /// Scopes required for `scheme`, if the scheme is named.
    pub fn scopes(&self, scheme: &str) -> Option<&[String]> {
        self.0.get(scheme).map(Vec::as_slice)
    }

    /// Named schemes, in document order.
    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// True for the anonymous-access requirement.
    pub fn is_anonymous(&self) -> bool {
        self.0.is_empty()
    }
}
