use oasdoc_core::{
    parse_openapi_document, parse_openapi_json, AppError, ErrorKind, LicenseObject,
    OpenApiDocument, PathItemObject, ResponseOrReference, ServerObject, ServerVariableObject,
};
use pretty_assertions::assert_eq;
use serde_json::json;

const PETSTORE: &str = r##"
openapi: 3.1.1
info:
  title: Petstore
  version: 2.4.0
  summary: Pets as a service
  termsOfService: https://example.com/terms
  contact:
    name: API Support
    url: https://example.com/support
    email: support@example.com
  license:
    name: Apache 2.0
    identifier: Apache-2.0
jsonSchemaDialect: https://spec.openapis.org/oas/3.1/dialect/base
servers:
  - url: "https://{env}.example.com:{port}/v1"
    description: Regional endpoint
    variables:
      env:
        default: prod
        enum: [prod, staging]
      port:
        default: "8443"
  - url: https://fallback.example.com
paths:
  /pets:
    summary: All pets
    get:
      operationId: listPets
      responses:
        "200":
          description: ok
  "/pets/{petId}": {}
webhooks:
  newPet:
    post:
      operationId: newPet
components:
  schemas:
    Pet:
      - type: object
        required: [id]
        properties:
          id: {type: integer}
    Pet.Archived:
      - true
  responses:
    NotFound:
      - description: No such pet
      - $ref: "#/components/responses/Gone"
security:
  - petstore_auth: [read:pets, write:pets]
  - {}
tags:
  - name: pets
    description: Everything about pets
    externalDocs:
      url: https://example.com/pets
  - name: store
externalDocs:
  url: https://example.com/docs
x-audience: public
"##;

fn petstore() -> OpenApiDocument {
    parse_openapi_document(PETSTORE).unwrap()
}

#[test]
fn test_full_document_is_typed() {
    let doc = petstore();

    let info = doc.info();
    assert_eq!(info.title(), "Petstore");
    assert_eq!(info.version(), "2.4.0");
    assert_eq!(
        info.terms_of_service().map(|u| u.as_str()),
        Some("https://example.com/terms")
    );
    let contact = info.contact().unwrap();
    assert_eq!(contact.email().as_str(), "support@example.com");
    assert_eq!(contact.url().as_str(), "https://example.com/support");
    assert_eq!(info.license().and_then(LicenseObject::identifier), Some("Apache-2.0"));

    let urls: Vec<&str> = doc.servers().iter().map(|s| s.url().as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://prod.example.com:8443/v1",
            "https://fallback.example.com/"
        ]
    );

    let paths = doc.paths().unwrap();
    let keys: Vec<&str> = paths.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["/pets", "/pets/{petId}"]);
    let items: Vec<&PathItemObject> = paths.values().collect();
    assert_eq!(items[0].summary(), Some("All pets"));
    assert_eq!(items[0].methods().collect::<Vec<_>>(), vec!["get"]);
    assert!(items[1].is_empty());

    let webhooks = doc.webhooks().unwrap();
    assert!(webhooks["newPet"].operation("post").is_some());

    let components = doc.components().unwrap();
    assert_eq!(components.schemas().len(), 2);
    assert!(components.schema("Pet.Archived").is_some());
    let not_found = components.response("NotFound").unwrap();
    assert!(matches!(not_found[0], ResponseOrReference::Response(_)));
    assert!(matches!(not_found[1], ResponseOrReference::Reference(_)));

    let security = doc.security().unwrap();
    assert_eq!(
        security[0].scopes("petstore_auth"),
        Some(&["read:pets".to_string(), "write:pets".to_string()][..])
    );
    assert!(security[1].is_anonymous());

    let tag_names: Vec<&str> = doc.tags().iter().map(|t| t.name()).collect();
    assert_eq!(tag_names, vec!["pets", "store"]);
    assert_eq!(
        doc.external_docs().map(|d| d.url().as_str()),
        Some("https://example.com/docs")
    );
    assert_eq!(doc.extensions().get("x-audience"), Some(&json!("public")));
}

#[test]
fn test_revalidating_serialized_form_is_idempotent() {
    let doc = petstore();
    let serialized = doc.to_value().unwrap();

    assert_eq!(
        serialized["servers"][0],
        json!({"url": "https://prod.example.com:8443/v1", "description": "Regional endpoint"})
    );
    assert_eq!(serialized["info"]["termsOfService"], json!("https://example.com/terms"));
    assert_eq!(serialized["tags"][0]["externalDocs"]["url"], json!("https://example.com/pets"));

    let again = OpenApiDocument::from_value(&serialized).unwrap();
    assert_eq!(again, doc);

    let text = serde_json::to_string(&doc).unwrap();
    let from_json = parse_openapi_json(&text).unwrap();
    assert_eq!(from_json, doc);
}

#[test]
fn test_minimal_document_round_trip() {
    let doc = parse_openapi_document("info: {title: T, version: '1'}").unwrap();
    let serialized = doc.to_value().unwrap();
    assert_eq!(
        serialized,
        json!({
            "openapi": "3.1.1",
            "info": {"title": "T", "version": "1"},
            "servers": [{"url": "http://example.com/"}]
        })
    );
    assert_eq!(OpenApiDocument::from_value(&serialized).unwrap(), doc);
}

#[test]
fn test_violations_across_the_tree_are_collected() {
    let yaml = r#"
openapi: 3.0.3
info:
  title: Broken
  version: "1"
  license:
    name: MIT
servers:
  - url: "https://{tenant}.example.com"
paths:
  pets: {}
components:
  schemas:
    "Bad Key":
      - type: object
tags:
  - name: dup
  - name: dup
externalDocs:
  url: mailto:docs@example.com
"#;
    let err = match parse_openapi_document(yaml) {
        Err(AppError::Validation(err)) => err,
        other => panic!("expected validation error, got {other:?}"),
    };

    let located: Vec<(String, ErrorKind)> = err
        .violations()
        .iter()
        .map(|v| (v.path.to_string(), v.kind))
        .collect();
    assert_eq!(
        located,
        vec![
            ("openapi".to_string(), ErrorKind::UnsupportedVersion),
            (
                "info.license".to_string(),
                ErrorKind::MutuallyExclusiveFieldsViolation
            ),
            (
                "servers[0].url".to_string(),
                ErrorKind::UnresolvedTemplateVariable
            ),
            ("paths.pets".to_string(), ErrorKind::InvalidPathKey),
            (
                r#"components.schemas["Bad Key"]"#.to_string(),
                ErrorKind::InvalidComponentKey
            ),
            ("tags[1].name".to_string(), ErrorKind::DuplicateTagName),
            ("externalDocs.url".to_string(), ErrorKind::InvalidUrl),
        ]
    );

    let rendered = err.to_string();
    assert!(rendered.contains("tags[1].name: duplicate tag name 'dup'"));
    assert!(rendered.contains("[InvalidURL]"));
}

#[test]
fn test_unsupported_version_regardless_of_other_fields() {
    for version in ["3.1.0", "3.2.0", "3.1", "v3.1.1"] {
        let value = json!({"openapi": version, "info": {"title": "T", "version": "1"}});
        let err = OpenApiDocument::from_value(&value).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::UnsupportedVersion]);

        let value = json!({"openapi": version, "info": 5, "tags": [{"name": "a"}, {"name": "a"}]});
        let err = OpenApiDocument::from_value(&value).unwrap_err();
        assert!(err.contains(ErrorKind::UnsupportedVersion));
    }
}

#[test]
fn test_present_but_invalid_never_falls_back_to_default() {
    let err = OpenApiDocument::from_value(&json!({
        "info": {"title": "T", "version": "1"},
        "servers": [{"url": 17}],
        "tags": null
    }))
    .unwrap_err();
    assert_eq!(err.kinds(), vec![ErrorKind::TypeMismatch, ErrorKind::TypeMismatch]);
}

#[test]
fn test_server_template_substitution() {
    let variables = [(
        "hostname".to_string(),
        ServerVariableObject::new("foobar", None, None).unwrap(),
    )]
    .into_iter()
    .collect();
    let server = ServerObject::new("https://{hostname}.com", None, variables).unwrap();
    assert_eq!(server.url().as_str(), "https://foobar.com/");
}

#[test]
fn test_license_scenarios() {
    let err = LicenseObject::new("MIT", Some("zsdfssdf"), None).unwrap_err();
    assert_eq!(err.kinds(), vec![ErrorKind::InvalidUrl]);

    let err = LicenseObject::new("MIT", None, None).unwrap_err();
    assert_eq!(err.kinds(), vec![ErrorKind::MutuallyExclusiveFieldsViolation]);
}

#[test]
fn test_extension_like_path_key_is_rejected() {
    let err = OpenApiDocument::from_value(&json!({
        "info": {"title": "T", "version": "1"},
        "paths": {"x-not-a-path": {"get": {}}, "/ok": {}}
    }))
    .unwrap_err();
    assert_eq!(err.kinds(), vec![ErrorKind::InvalidPathKey]);
    assert_eq!(err.first().path.to_string(), "paths.x-not-a-path");
}

#[test]
fn test_explicit_empty_server_list_is_kept() {
    let doc = OpenApiDocument::from_value(&json!({
        "info": {"title": "T", "version": "1"},
        "servers": []
    }))
    .unwrap();
    assert!(doc.servers().is_empty());
}

#[test]
fn test_placeholder_in_last_host_label() {
    let doc = parse_openapi_document(
        r#"
info: {title: T, version: "1"}
servers:
  - url: "https://api.example.{tld}:{port}"
    variables:
      tld: {default: com}
      port: {default: "8080"}
"#,
    )
    .unwrap();
    assert_eq!(doc.servers()[0].url().as_str(), "https://api.example.com:8080/");
}
