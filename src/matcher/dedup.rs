use super::ErrorMatcher;
use crate::field::ErrorList;
use serde::{Deserialize, Serialize};

/// Where the legacy run's errors are collapsed before being compared.
///
/// The hand-written validator may report one defect from several layers; the
/// declarative one does not. Only runs on the legacy path are ever collapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DedupStage {
    /// Compare raw legacy output everywhere.
    Disabled,
    /// Collapse only for the legacy-vs-authoritative convergence check.
    #[default]
    Convergence,
    /// Also collapse legacy-path runs before their expected-error check, so
    /// a fixture may list a doubly reported defect once.
    Legacy,
}

impl DedupStage {
    pub fn before_convergence(self) -> bool {
        !matches!(self, Self::Disabled)
    }

    pub fn before_expectations(self) -> bool {
        matches!(self, Self::Legacy)
    }

    /// `errors` collapsed under `matcher` when `enabled`, otherwise a copy.
    pub fn collapse_if(enabled: bool, errors: &ErrorList, matcher: &ErrorMatcher) -> ErrorList {
        if enabled {
            dedupe(errors, matcher)
        } else {
            errors.clone()
        }
    }
}

/// Keeps the first-seen error of each equivalence class under `matcher`.
pub fn dedupe(errors: &ErrorList, matcher: &ErrorMatcher) -> ErrorList {
    let mut kept = ErrorList::new();
    for err in errors {
        if kept.iter().any(|existing| matcher.matches(existing, err)) {
            tracing::debug!(error = %err, "collapsing duplicate error");
            continue;
        }
        kept.push(err.clone());
    }
    kept
}
