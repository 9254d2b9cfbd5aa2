//! Structured validation errors as emitted by either validator.
//!
//! A [`StructuredError`] is produced once by a validation call and only read
//! afterwards. The harness compares errors on three portable axes (kind,
//! field path, origin tag); message text is carried for diagnostics but the
//! two validator implementations are not expected to agree on it.

mod path;

pub use path::{FieldPath, PathParseError, PathSegment};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use strum::{Display, EnumString};

/// Category of violation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorKind {
    Required,
    Invalid,
    Forbidden,
    Duplicate,
    NotFound,
    NotSupported,
    TooLong,
    TooMany,
    TypeInvalid,
    Internal,
}

/// Validation subsystem that emitted an error.
///
/// Diagnostic only: no matcher axis looks at it, which is what lets a
/// hand-written error and a schema-derived error be equivalent.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ValidationSource {
    #[default]
    Imperative,
    Declarative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredError {
    pub kind: ErrorKind,
    pub field: FieldPath,
    /// Rule tag, e.g. `format=k8s-long-name` or `minimum`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default)]
    pub source: ValidationSource,
    #[serde(default)]
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bad_value: Option<Value>,
}

impl StructuredError {
    pub fn new(kind: ErrorKind, field: FieldPath, detail: impl Into<String>) -> Self {
        Self {
            kind,
            field,
            origin: None,
            source: ValidationSource::Imperative,
            detail: detail.into(),
            bad_value: None,
        }
    }

    pub fn required(field: FieldPath, detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Required, field, detail)
    }

    pub fn invalid(field: FieldPath, value: impl Into<Value>, detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Invalid, field, detail).with_value(value)
    }

    pub fn forbidden(field: FieldPath, detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, field, detail)
    }

    pub fn duplicate(field: FieldPath, value: impl Into<Value>) -> Self {
        Self::new(ErrorKind::Duplicate, field, "").with_value(value)
    }

    pub fn not_found(field: FieldPath, value: impl Into<Value>) -> Self {
        Self::new(ErrorKind::NotFound, field, "").with_value(value)
    }

    pub fn not_supported<S: AsRef<str>>(
        field: FieldPath,
        value: impl Into<Value>,
        valid_values: &[S],
    ) -> Self {
        let detail = if valid_values.is_empty() {
            String::new()
        } else {
            let quoted: Vec<String> = valid_values
                .iter()
                .map(|v| format!("\"{}\"", v.as_ref()))
                .collect();
            format!("supported values: {}", quoted.join(", "))
        };
        Self::new(ErrorKind::NotSupported, field, detail).with_value(value)
    }

    pub fn too_long(field: FieldPath, value: impl Into<Value>, max_length: usize) -> Self {
        Self::new(
            ErrorKind::TooLong,
            field,
            format!("may not be more than {max_length} bytes"),
        )
        .with_value(value)
    }

    pub fn too_many(field: FieldPath, actual: usize, max: usize) -> Self {
        Self::new(
            ErrorKind::TooMany,
            field,
            format!("must have at most {max} items"),
        )
        .with_value(actual)
    }

    pub fn type_invalid(
        field: FieldPath,
        value: impl Into<Value>,
        detail: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::TypeInvalid, field, detail).with_value(value)
    }

    pub fn internal(field: FieldPath, detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, field, detail)
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.bad_value = Some(value.into());
        self
    }

    pub fn marked_declarative(mut self) -> Self {
        self.source = ValidationSource::Declarative;
        self
    }
}

impl fmt::Display for StructuredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.kind)?;
        if let Some(origin) = &self.origin {
            write!(f, " (origin={origin})")?;
        }
        if let Some(value) = &self.bad_value {
            write!(f, " value={value}")?;
        }
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}

/// Errors from one validation call. Order is kept for reporting only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorList(Vec<StructuredError>);

impl ErrorList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, error: StructuredError) {
        self.0.push(error);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StructuredError> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[StructuredError] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<StructuredError> {
        self.0
    }
}

impl From<Vec<StructuredError>> for ErrorList {
    fn from(errors: Vec<StructuredError>) -> Self {
        Self(errors)
    }
}

impl FromIterator<StructuredError> for ErrorList {
    fn from_iter<I: IntoIterator<Item = StructuredError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<StructuredError> for ErrorList {
    fn extend<I: IntoIterator<Item = StructuredError>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for ErrorList {
    type Item = StructuredError;
    type IntoIter = std::vec::IntoIter<StructuredError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a StructuredError;
    type IntoIter = std::slice::Iter<'a, StructuredError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("[]");
        }
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "  - {error}")?;
        }
        Ok(())
    }
}
