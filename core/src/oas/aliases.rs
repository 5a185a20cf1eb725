//! # Field Aliases
//!
//! In-memory field names are snake_case; a small fixed set is spelled
//! differently in the serialized document. The table is static and is read in
//! both directions.

/// `(in-memory name, serialized name)` pairs.
pub const FIELD_ALIASES: [(&str, &str); 5] = [
    ("external_docs", "externalDocs"),
    ("terms_of_service", "termsOfService"),
    ("json_schema_dialect", "jsonSchemaDialect"),
    ("enum_values", "enum"),
    ("reference", "$ref"),
];

/// Serialized spelling of an in-memory field name.
pub fn serialized_name(field: &str) -> &str {
    FIELD_ALIASES
        .iter()
        .find(|(name, _)| *name == field)
        .map_or(field, |(_, serialized)| serialized)
}

/// In-memory field name of a serialized key.
pub fn field_name(serialized: &str) -> &str {
    FIELD_ALIASES
        .iter()
        .find(|(_, alias)| *alias == serialized)
        .map_or(serialized, |(name, _)| name)
}
