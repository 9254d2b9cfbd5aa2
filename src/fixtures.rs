//! Expected-error tables authored as TOML.
//!
//! ```toml
//! [[case]]
//! name = "missing request"
//!
//! [[case.expected]]
//! kind = "required"
//! field = "spec.request"
//! origin = "required"
//! ```
//!
//! Objects under test stay Rust values; a fixture file only supplies the
//! errors each named case is expected to produce.

use crate::error::FixtureError;
use crate::field::{ErrorList, StructuredError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct FixtureDocument {
    #[serde(default, rename = "case")]
    cases: Vec<FixtureCase>,
}

#[derive(Debug, Deserialize)]
struct FixtureCase {
    name: String,
    #[serde(default)]
    expected: Vec<StructuredError>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expectations {
    by_case: BTreeMap<String, ErrorList>,
}

impl Expectations {
    /// Expected errors for `case`; unknown cases expect none.
    pub fn expected(&self, case: &str) -> ErrorList {
        self.by_case.get(case).cloned().unwrap_or_default()
    }

    pub fn contains(&self, case: &str) -> bool {
        self.by_case.contains_key(case)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_case.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_case.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_case.is_empty()
    }
}

pub fn load_expectations(path: &Path) -> Result<Expectations, FixtureError> {
    let raw = fs::read_to_string(path).map_err(|source| FixtureError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_expectations(&raw, path)
}

/// `origin` names the document in error messages.
pub fn parse_expectations(raw: &str, origin: &Path) -> Result<Expectations, FixtureError> {
    let document: FixtureDocument = toml::from_str(raw).map_err(|err| FixtureError::Parse {
        path: origin.to_path_buf(),
        message: err.to_string(),
    })?;

    let mut by_case = BTreeMap::new();
    for case in document.cases {
        if by_case.contains_key(&case.name) {
            return Err(FixtureError::DuplicateCase {
                path: origin.to_path_buf(),
                name: case.name,
            });
        }
        by_case.insert(case.name, ErrorList::from(case.expected));
    }

    tracing::debug!(
        path = %origin.display(),
        cases = by_case.len(),
        "loaded expected-error fixtures"
    );
    Ok(Expectations { by_case })
}
