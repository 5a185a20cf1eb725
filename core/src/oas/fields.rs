//! # Field Reader
//!
//! The generic validator every object is built on. A `Fields` view over a
//! mapping reads required, optional and defaulted fields, each through a parse
//! function that receives the child value and its path. Field-level violations
//! are accumulated with [`try_fields!`]; an object's own cross-field rule runs
//! only after all of its fields parsed.

use crate::error::{ErrorKind, FieldPath, Reason, ValidationError, Violation};
use crate::oas::aliases::serialized_name;
use crate::oas::primitives::json_type_name;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Result of validating one value.
pub type Parsed<T> = Result<T, ValidationError>;

/// Accumulates violations across sibling fields.
#[derive(Default)]
pub(crate) struct Collector {
    violations: Vec<Violation>,
}

impl Collector {
    /// Keeps the value of a successful parse, records the violations of a failed one.
    pub(crate) fn absorb<T>(&mut self, parsed: Parsed<T>) -> Option<T> {
        match parsed {
            Ok(value) => Some(value),
            Err(err) => {
                self.violations.extend(err);
                None
            }
        }
    }

    /// `Ok` when nothing was recorded.
    pub(crate) fn finish(self) -> Parsed<()> {
        match ValidationError::from_violations(self.violations) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// The recorded violations. Only called after `absorb` returned `None`.
    pub(crate) fn into_error(self) -> ValidationError {
        ValidationError::from_parts(self.violations)
    }
}

/// Binds each named `Parsed<T>` to its `T`, or returns every violation at once.
macro_rules! try_fields {
    ($($field:ident),+ $(,)?) => {
        let mut collector = $crate::oas::fields::Collector::default();
        $( let $field = collector.absorb($field); )+
        let ($(Some($field),)+) = ($($field,)+) else {
            return Err(collector.into_error());
        };
    };
}
pub(crate) use try_fields;

/// Read-only view over the fields of one mapping value.
pub(crate) struct Fields<'a> {
    map: &'a Map<String, Value>,
    path: FieldPath,
}

impl<'a> Fields<'a> {
    /// Views `value` as the object named `what`; anything but a mapping is a type mismatch.
    pub(crate) fn of(value: &'a Value, path: &FieldPath, what: &str) -> Parsed<Self> {
        match value {
            Value::Object(map) => Ok(Self {
                map,
                path: path.clone(),
            }),
            other => Err(ValidationError::single(
                path,
                ErrorKind::TypeMismatch,
                format!("{} must be an object, found {}", what, json_type_name(other)),
            )),
        }
    }

    /// Path of the mapping itself.
    pub(crate) fn path(&self) -> &FieldPath {
        &self.path
    }

    fn lookup(&self, field: &str) -> (Option<&'a Value>, FieldPath) {
        let key = serialized_name(field);
        (self.map.get(key), self.path.key(key))
    }

    /// A field that must be present.
    pub(crate) fn required<T>(
        &self,
        field: &str,
        parse: impl FnOnce(&Value, &FieldPath) -> Parsed<T>,
    ) -> Parsed<T> {
        match self.lookup(field) {
            (Some(value), path) => parse(value, &path),
            (None, path) => Err(ValidationError::single(
                &path,
                ErrorKind::MissingRequiredField,
                format!("missing required field '{}'", serialized_name(field)),
            )),
        }
    }

    /// A field that may be absent; an explicit `null` also means "not set".
    pub(crate) fn optional<T>(
        &self,
        field: &str,
        parse: impl FnOnce(&Value, &FieldPath) -> Parsed<T>,
    ) -> Parsed<Option<T>> {
        match self.lookup(field) {
            (None | Some(Value::Null), _) => Ok(None),
            (Some(value), path) => parse(value, &path).map(Some),
        }
    }

    /// A field whose default applies only when it is absent.
    pub(crate) fn defaulted<T>(
        &self,
        field: &str,
        default: impl FnOnce() -> T,
        parse: impl FnOnce(&Value, &FieldPath) -> Parsed<T>,
    ) -> Parsed<T> {
        match self.lookup(field) {
            (Some(value), path) => parse(value, &path),
            (None, _) => Ok(default()),
        }
    }

    /// Specification extensions (`x-` keys), in document order.
    pub(crate) fn extensions(&self) -> IndexMap<String, Value> {
        self.map
            .iter()
            .filter(|(key, _)| key.starts_with("x-"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

fn type_mismatch(path: &FieldPath, expected: &str, found: &Value) -> ValidationError {
    ValidationError::single(
        path,
        ErrorKind::TypeMismatch,
        format!("expected {}, found {}", expected, json_type_name(found)),
    )
}

/// A string.
pub(crate) fn string(value: &Value, path: &FieldPath) -> Parsed<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(type_mismatch(path, "string", other)),
    }
}

/// A string passed through a primitive constraint.
pub(crate) fn constrained<T>(
    check: impl Fn(&str) -> Result<T, Reason>,
) -> impl Fn(&Value, &FieldPath) -> Parsed<T> {
    move |value, path| {
        let raw = string(value, path)?;
        check(&raw).map_err(|reason| reason.at(path))
    }
}

/// A mapping kept as raw JSON.
pub(crate) fn raw_object(value: &Value, path: &FieldPath) -> Parsed<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map.clone()),
        other => Err(type_mismatch(path, "object", other)),
    }
}

/// A list whose elements are all parsed; violations of every element are kept.
pub(crate) fn list_of<T>(
    parse: impl Fn(&Value, &FieldPath) -> Parsed<T>,
) -> impl Fn(&Value, &FieldPath) -> Parsed<Vec<T>> {
    move |value, path| {
        let Value::Array(items) = value else {
            return Err(type_mismatch(path, "array", value));
        };
        let mut collector = Collector::default();
        let parsed: Vec<Option<T>> = items
            .iter()
            .enumerate()
            .map(|(index, item)| collector.absorb(parse(item, &path.index(index))))
            .collect();
        collector.finish()?;
        Ok(parsed.into_iter().flatten().collect())
    }
}

/// A list of strings.
pub(crate) fn string_list(value: &Value, path: &FieldPath) -> Parsed<Vec<String>> {
    list_of(string)(value, path)
}

/// A mapping with checked keys and parsed values, in document order.
///
/// A bad key is reported at the entry's own path; its value is still validated.
pub(crate) fn map_of<K, V>(
    parse_key: impl Fn(&str) -> Result<K, Reason>,
    parse_value: impl Fn(&Value, &FieldPath) -> Parsed<V>,
) -> impl Fn(&Value, &FieldPath) -> Parsed<IndexMap<K, V>>
where
    K: std::hash::Hash + Eq,
{
    move |value, path| {
        let Value::Object(map) = value else {
            return Err(type_mismatch(path, "object", value));
        };
        let mut collector = Collector::default();
        let mut entries = IndexMap::with_capacity(map.len());
        for (key, item) in map {
            let entry_path = path.key(key);
            let key = collector.absorb(parse_key(key).map_err(|reason| reason.at(&entry_path)));
            let item = collector.absorb(parse_value(item, &entry_path));
            if let (Some(key), Some(item)) = (key, item) {
                entries.insert(key, item);
            }
        }
        collector.finish()?;
        Ok(entries)
    }
}

/// Key parser for mappings whose keys are free-form strings.
pub(crate) fn any_key(key: &str) -> Result<String, Reason> {
    Ok(key.to_string())
}
