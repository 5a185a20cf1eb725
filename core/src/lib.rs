#![deny(missing_docs)]

//! # OASDoc Core
//!
//! Typed, validated model of OpenAPI 3.1.1 description documents.
//!
//! A decoded document (`serde_json::Value`, or YAML/JSON text) is validated
//! field by field into immutable objects. Invalid input yields a
//! [`ValidationError`] listing every violation with its path from the root.

/// Shared error types.
pub mod error;

/// OpenAPI (OAS) object model and validation.
pub mod oas;

pub use error::{
    AppError, AppResult, ErrorKind, FieldPath, PathSegment, ValidationError, Violation,
};
pub use oas::{
    parse_openapi_document, parse_openapi_json, AnyUrl, ComponentKey, ComponentsObject,
    ContactObject, Email, ExternalDocumentationObject, HttpUrl, InfoObject, LicenseObject,
    OpenApiDocument, PathItemObject, PathTemplate, PathsMapping, ReferenceObject,
    ResponseObject, ResponseOrReference, SchemaObject, SecurityRequirementObject, ServerObject,
    ServerTemplate, ServerVariableObject, TagObject, SUPPORTED_OPENAPI_VERSION,
};
