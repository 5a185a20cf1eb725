//! # Primitive Constraints
//!
//! Value-level constraints shared by every object: URLs, email addresses and
//! pattern-constrained keys. Each constructor returns the validated (and possibly
//! normalized) value or a `Reason` that the caller attaches to a field path.
//!
//! URLs are stored in the WHATWG serialization produced by the `url` crate. For
//! `http`/`https` URLs without a path that form ends in `/`.

use crate::error::{ErrorKind, Reason};
use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

/// Pattern every key under `components` must match.
pub const COMPONENT_KEY_PATTERN: &str = r"^[a-zA-Z0-9.\-_]+$";

/// Pattern every key under `paths` must match.
pub const PATH_KEY_PATTERN: &str = r"^/";

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$";

static COMPONENT_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(COMPONENT_KEY_PATTERN).expect("Invalid regex constant"));
static PATH_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PATH_KEY_PATTERN).expect("Invalid regex constant"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("Invalid regex constant"));

/// Name of the JSON type of `value`, for type mismatch messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Checks `value` against a compiled pattern.
fn match_pattern(re: &Regex, pattern: &str, value: &str) -> Result<(), Reason> {
    if re.is_match(value) {
        Ok(())
    } else {
        Err(Reason::new(
            ErrorKind::PatternMismatch,
            format!("'{}' does not match pattern {}", value, pattern),
        ))
    }
}

/// A URL with any scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnyUrl(Url);

impl AnyUrl {
    /// Parses an absolute URL.
    pub fn parse(value: &str) -> Result<Self, Reason> {
        parse_absolute(value).map(Self)
    }

    /// Canonical string form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The parsed URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

/// A URL restricted to the `http` and `https` schemes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HttpUrl(Url);

impl HttpUrl {
    /// Parses an absolute `http`/`https` URL.
    pub fn parse(value: &str) -> Result<Self, Reason> {
        let url = parse_absolute(value)?;
        match url.scheme() {
            "http" | "https" => Ok(Self(url)),
            other => Err(Reason::new(
                ErrorKind::InvalidUrl,
                format!("'{}' must use the http or https scheme, not '{}'", value, other),
            )),
        }
    }

    /// Canonical string form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The parsed URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

fn parse_absolute(value: &str) -> Result<Url, Reason> {
    if value.trim().is_empty() || value.chars().any(char::is_whitespace) {
        return Err(Reason::new(
            ErrorKind::InvalidUrl,
            format!("'{}' is not a valid URL", value),
        ));
    }
    Url::parse(value).map_err(|e| {
        Reason::new(
            ErrorKind::InvalidUrl,
            format!("'{}' is not a valid URL: {}", value, e),
        )
    })
}

/// An email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validates an address of the form `local@domain.tld`.
    pub fn parse(value: &str) -> Result<Self, Reason> {
        let local_len = value.split('@').next().map_or(0, str::len);
        if value.len() <= 254 && local_len <= 64 && EMAIL_RE.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(Reason::new(
                ErrorKind::InvalidEmail,
                format!("'{}' is not a valid email address", value),
            ))
        }
    }

    /// The address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Name under which a reusable object is registered in `components`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKey(String);

impl ComponentKey {
    /// Validates against [`COMPONENT_KEY_PATTERN`].
    pub fn parse(value: &str) -> Result<Self, Reason> {
        match_pattern(&COMPONENT_KEY_RE, COMPONENT_KEY_PATTERN, value)?;
        Ok(Self(value.to_string()))
    }

    /// The key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A relative endpoint path such as `/users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathTemplate(String);

impl PathTemplate {
    /// Validates against [`PATH_KEY_PATTERN`].
    pub fn parse(value: &str) -> Result<Self, Reason> {
        match_pattern(&PATH_KEY_RE, PATH_KEY_PATTERN, value)?;
        Ok(Self(value.to_string()))
    }

    /// The path.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_like {
    ($($ty:ty),+) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl Serialize for $ty {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: Serializer,
                {
                    serializer.serialize_str(self.as_str())
                }
            }

            impl PartialEq<str> for $ty {
                fn eq(&self, other: &str) -> bool {
                    self.as_str() == other
                }
            }

            impl PartialEq<&str> for $ty {
                fn eq(&self, other: &&str) -> bool {
                    self.as_str() == *other
                }
            }
        )+
    };
}

string_like!(AnyUrl, HttpUrl, Email, ComponentKey, PathTemplate);
