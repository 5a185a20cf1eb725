#![deny(missing_docs)]

//! # OpenAPI Object Model
//!
//! - **primitives**: URL, email and key constraints.
//! - **fields**: the generic field reader every object is validated with.
//! - **aliases**: in-memory to serialized field name table.
//! - **metadata**: Info, Contact, License, Tag, External Docs, Security Requirement.
//! - **server**: Server templates, variables and substitution.
//! - **components**: reusable schemas and responses.
//! - **paths**: Path Items, Paths and Webhooks.
//! - **document**: the root aggregate and entry points.

pub mod aliases;
pub mod components;
pub mod document;
pub(crate) mod fields;
pub mod metadata;
pub mod paths;
pub mod primitives;
pub mod server;

pub use components::{
    ComponentsObject, ReferenceObject, ResponseObject, ResponseOrReference, SchemaObject,
};
pub use document::{
    parse_openapi_document, parse_openapi_json, OpenApiDocument, SUPPORTED_OPENAPI_VERSION,
};
pub use fields::Parsed;
pub use metadata::{
    ContactObject, ExternalDocumentationObject, InfoObject, LicenseObject,
    SecurityRequirementObject, TagObject,
};
pub use paths::{PathItemObject, PathsMapping};
pub use primitives::{AnyUrl, ComponentKey, Email, HttpUrl, PathTemplate};
pub use server::{ServerObject, ServerTemplate, ServerVariableObject, DEFAULT_SERVER_URL};
