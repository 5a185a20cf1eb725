//! # Error Handling
//!
//! Provides the unified `AppError` enum and the structured `ValidationError`
//! produced when a document does not conform to the typed model.
//!
//! Every violation carries the full field path from the document root, a
//! machine-readable `ErrorKind` and a human-readable message.

use derive_more::{Display, From};
use std::fmt;

/// Machine-readable category of a validation failure.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A field holds the wrong JSON type.
    TypeMismatch,
    /// A required field is absent.
    MissingRequiredField,
    /// A string does not match its required pattern.
    PatternMismatch,
    /// A URL does not parse or uses a disallowed scheme.
    #[display("InvalidURL")]
    InvalidUrl,
    /// A string is not a well-formed email address.
    InvalidEmail,
    /// The `openapi` field is not the supported version literal.
    UnsupportedVersion,
    /// Two fields that exclude each other are both set, or neither is.
    MutuallyExclusiveFieldsViolation,
    /// A value is not a member of its declared enumeration.
    EnumMembershipViolation,
    /// A server URL placeholder has no substitution value.
    UnresolvedTemplateVariable,
    /// Two tags share a name.
    DuplicateTagName,
    /// A components key does not match the component key pattern.
    InvalidComponentKey,
    /// A paths key does not start with `/`.
    InvalidPathKey,
}

/// One accessor step from a parent value to a child value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Mapping key, in its serialized spelling.
    Key(String),
    /// Zero-based list position.
    Index(usize),
}

/// Ordered accessors from the document root to a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns the path of a mapping entry below this path.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    /// Returns the path of a list element below this path.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    /// The segments, root first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// True for the document root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

fn is_plain_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '-'))
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if is_plain_key(key) => {
                    if position > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                PathSegment::Key(key) => write!(f, "[{:?}]", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Failure reason of a primitive constraint, not yet attached to a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reason {
    /// Category of the failure.
    pub kind: ErrorKind,
    /// Human-readable explanation.
    pub message: String,
}

impl Reason {
    /// Creates a reason.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Attaches the reason to the value at `path`.
    pub fn at(self, path: &FieldPath) -> ValidationError {
        ValidationError::single(path, self.kind, self.message)
    }

    /// Same reason under a different kind, used when a container re-tags a primitive failure.
    pub(crate) fn retag(self, kind: ErrorKind) -> Self {
        Self { kind, ..self }
    }
}

/// A single located violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Where the offending value lives.
    pub path: FieldPath,
    /// What rule it broke.
    pub kind: ErrorKind,
    /// Human-readable explanation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.path, self.message, self.kind)
    }
}

/// All violations found while validating one value. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    /// Creates an error holding one violation.
    pub fn single(path: &FieldPath, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            violations: vec![Violation {
                path: path.clone(),
                kind,
                message: message.into(),
            }],
        }
    }

    /// Wraps already collected violations; `None` when there are none.
    pub fn from_violations(violations: Vec<Violation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self { violations })
        }
    }

    /// Wraps violations the caller knows to be non-empty.
    pub(crate) fn from_parts(violations: Vec<Violation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self { violations }
    }

    /// The violations, in discovery order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// The first violation found.
    pub fn first(&self) -> &Violation {
        &self.violations[0]
    }

    /// Kinds of all violations, in discovery order.
    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.violations.iter().map(|v| v.kind).collect()
    }

    /// True if any violation has the given kind.
    pub fn contains(&self, kind: ErrorKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }

    /// Consumes the error, yielding its violations.
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// Appends the violations of `other` after this error's own.
    pub fn merge(&mut self, other: ValidationError) {
        self.violations.extend(other);
    }
}

impl IntoIterator for ValidationError {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationError {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, violation) in self.violations.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The Global Error Enum.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// The text could not be decoded into a generic document value.
    #[display("Parse Error: {_0}")]
    Parse(String),

    /// The decoded document does not conform to the model.
    #[display("Validation Error:\n{_0}")]
    Validation(ValidationError),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(_) => None,
            Self::Validation(err) => Some(err),
        }
    }
}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
