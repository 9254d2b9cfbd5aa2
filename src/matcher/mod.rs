//! Configurable equivalence over [`StructuredError`]s.
//!
//! An [`ErrorMatcher`] is a plain value naming which axes take part in
//! equality; every `by_*` call returns a new matcher with one more axis on.
//! List comparison is multiset comparison: two lists are equivalent iff a
//! bijection exists whose pairs all match.

pub mod dedup;

pub use dedup::{DedupStage, dedupe};

use crate::field::{ErrorList, StructuredError};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MatchAxis {
    Kind,
    Field,
    Origin,
    #[serde(rename = "detail")]
    #[strum(serialize = "detail")]
    DetailExact,
    DetailSubstring,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
enum DetailMode {
    #[default]
    Ignore,
    Exact,
    /// Expected detail must appear inside the actual detail.
    Substring,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ErrorMatcher {
    kind: bool,
    field: bool,
    origin: bool,
    detail: DetailMode,
}

impl ErrorMatcher {
    /// A matcher with no axes: every pair of errors matches.
    pub const fn new() -> Self {
        Self {
            kind: false,
            field: false,
            origin: false,
            detail: DetailMode::Ignore,
        }
    }

    /// Kind, field path and origin tag.
    pub const fn structural() -> Self {
        Self::new().by_kind().by_field().by_origin()
    }

    pub const fn by_kind(self) -> Self {
        Self { kind: true, ..self }
    }

    pub const fn by_field(self) -> Self {
        Self {
            field: true,
            ..self
        }
    }

    pub const fn by_origin(self) -> Self {
        Self {
            origin: true,
            ..self
        }
    }

    pub const fn by_detail_exact(self) -> Self {
        Self {
            detail: DetailMode::Exact,
            ..self
        }
    }

    pub const fn by_detail_substring(self) -> Self {
        Self {
            detail: DetailMode::Substring,
            ..self
        }
    }

    pub fn by_axis(self, axis: MatchAxis) -> Self {
        match axis {
            MatchAxis::Kind => self.by_kind(),
            MatchAxis::Field => self.by_field(),
            MatchAxis::Origin => self.by_origin(),
            MatchAxis::DetailExact => self.by_detail_exact(),
            MatchAxis::DetailSubstring => self.by_detail_substring(),
        }
    }

    pub fn from_axes<'a>(axes: impl IntoIterator<Item = &'a MatchAxis>) -> Self {
        axes.into_iter()
            .fold(Self::new(), |matcher, axis| matcher.by_axis(*axis))
    }

    pub fn axes(&self) -> Vec<MatchAxis> {
        let mut axes = Vec::with_capacity(4);
        if self.kind {
            axes.push(MatchAxis::Kind);
        }
        if self.field {
            axes.push(MatchAxis::Field);
        }
        if self.origin {
            axes.push(MatchAxis::Origin);
        }
        match self.detail {
            DetailMode::Ignore => {}
            DetailMode::Exact => axes.push(MatchAxis::DetailExact),
            DetailMode::Substring => axes.push(MatchAxis::DetailSubstring),
        }
        axes
    }

    /// True iff `expected` and `actual` agree on every enabled axis.
    pub fn matches(&self, expected: &StructuredError, actual: &StructuredError) -> bool {
        if self.kind && expected.kind != actual.kind {
            return false;
        }
        if self.field && expected.field != actual.field {
            return false;
        }
        if self.origin && expected.origin != actual.origin {
            return false;
        }
        match self.detail {
            DetailMode::Ignore => true,
            DetailMode::Exact => expected.detail == actual.detail,
            DetailMode::Substring => actual.detail.contains(expected.detail.as_str()),
        }
    }

    /// Pairs up `expected` with `actual` and reports whatever is left over.
    pub fn compare(&self, expected: &ErrorList, actual: &ErrorList) -> MatchReport {
        let expected = expected.as_slice();
        let actual = actual.as_slice();

        let candidates: Vec<Vec<usize>> = expected
            .iter()
            .map(|want| {
                actual
                    .iter()
                    .enumerate()
                    .filter(|(_, got)| self.matches(want, got))
                    .map(|(j, _)| j)
                    .collect()
            })
            .collect();

        let mut owner_of_actual: Vec<Option<usize>> = vec![None; actual.len()];
        let mut matched_expected = vec![false; expected.len()];
        for i in 0..expected.len() {
            let mut visited = vec![false; actual.len()];
            if augment(i, &candidates, &mut owner_of_actual, &mut visited) {
                matched_expected[i] = true;
            }
        }

        let missing = expected
            .iter()
            .zip(&matched_expected)
            .filter(|(_, matched)| !**matched)
            .map(|(err, _)| err.clone())
            .collect();
        let unexpected = actual
            .iter()
            .zip(&owner_of_actual)
            .filter(|(_, owner)| owner.is_none())
            .map(|(err, _)| err.clone())
            .collect();

        MatchReport {
            matcher: *self,
            missing,
            unexpected,
        }
    }

    /// Asserts `expected` and `actual` are equal as multisets under this matcher.
    pub fn test(&self, expected: &ErrorList, actual: &ErrorList) -> Result<(), MatchReport> {
        let report = self.compare(expected, actual);
        if report.is_match() {
            Ok(())
        } else {
            Err(report)
        }
    }

    /// Renders only the axes this matcher looks at.
    pub fn render(&self, error: &StructuredError) -> String {
        let mut parts = Vec::with_capacity(4);
        if self.kind {
            parts.push(format!("kind={}", error.kind));
        }
        if self.field {
            parts.push(format!("field={}", error.field));
        }
        if self.origin {
            parts.push(format!(
                "origin={}",
                error.origin.as_deref().unwrap_or("<none>")
            ));
        }
        if self.detail != DetailMode::Ignore {
            parts.push(format!("detail={:?}", error.detail));
        }
        if parts.is_empty() {
            return "<any>".to_string();
        }
        format!("{{{}}}", parts.join(", "))
    }
}

impl fmt::Display for ErrorMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axes = self.axes();
        if axes.is_empty() {
            return f.write_str("<wildcard>");
        }
        let names: Vec<String> = axes.iter().map(ToString::to_string).collect();
        f.write_str(&names.join(","))
    }
}

// Kuhn's augmenting path step for expected row `row`.
fn augment(
    row: usize,
    candidates: &[Vec<usize>],
    owner_of_actual: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &col in &candidates[row] {
        if visited[col] {
            continue;
        }
        visited[col] = true;
        let free = match owner_of_actual[col] {
            None => true,
            Some(other) => augment(other, candidates, owner_of_actual, visited),
        };
        if free {
            owner_of_actual[col] = Some(row);
            return true;
        }
    }
    false
}

/// Result of comparing two error lists under a matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchReport {
    pub matcher: ErrorMatcher,
    /// Expected entries with no partner in the actual list.
    pub missing: ErrorList,
    /// Actual entries with no partner in the expected list.
    pub unexpected: ErrorList,
}

impl MatchReport {
    pub fn is_match(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_match() {
            return write!(f, "error lists match (by {})", self.matcher);
        }
        write!(
            f,
            "error lists differ (by {}): {} missing, {} unexpected",
            self.matcher,
            self.missing.len(),
            self.unexpected.len()
        )?;
        if !self.missing.is_empty() {
            f.write_str("\nmissing expected errors:")?;
            for err in &self.missing {
                write!(f, "\n  - {} :: {err}", self.matcher.render(err))?;
            }
        }
        if !self.unexpected.is_empty() {
            f.write_str("\nunexpected actual errors:")?;
            for err in &self.unexpected {
                write!(f, "\n  - {} :: {err}", self.matcher.render(err))?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for MatchReport {}
