//! Cross-version equivalence: the same logical object must validate the same
//! way under every API version a resource is served at.

use crate::context::{RequestInfo, ValidationContext};
use crate::field::ErrorList;
use crate::gates::GateState;
use crate::matcher::{ErrorMatcher, MatchReport};
use crate::runner::stamp_versions;
use crate::strategy::{ValidationStrategy, Versioned};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VersionDivergence {
    #[error("{version} disagrees with {baseline}: {report}")]
    Mismatch {
        baseline: String,
        version: String,
        report: MatchReport,
    },
}

/// Re-validates an object (and its prior state for updates) across every
/// supported schema representation.
pub trait VersionEquivalenceChecker<O> {
    fn verify(&self, object: &O, old: Option<&O>) -> Result<(), VersionDivergence>;
}

/// For resources served at a single version.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopVersionChecker;

impl<O> VersionEquivalenceChecker<O> for NoopVersionChecker {
    fn verify(&self, _object: &O, _old: Option<&O>) -> Result<(), VersionDivergence> {
        Ok(())
    }
}

/// Runs the authoritative path once per API version and requires every
/// version's errors to match the first version's.
pub struct ContextVersionChecker<S> {
    strategy: S,
    api_group: String,
    versions: Vec<String>,
    matcher: ErrorMatcher,
}

impl<S: ValidationStrategy> ContextVersionChecker<S> {
    pub fn new(
        strategy: S,
        api_group: impl Into<String>,
        versions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            strategy,
            api_group: api_group.into(),
            versions: versions.into_iter().map(Into::into).collect(),
            matcher: ErrorMatcher::structural(),
        }
    }

    pub fn with_matcher(mut self, matcher: ErrorMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    fn validate_at(&self, version: &str, object: &S::Object, old: Option<&S::Object>) -> ErrorList {
        let request = RequestInfo::new(self.api_group.clone(), version);
        let ctx = ValidationContext::new(&request, GateState::ALL_ON);
        match old {
            Some(old) => self.strategy.validate_update(&ctx, object, old),
            None => self.strategy.validate(&ctx, object),
        }
    }
}

impl<S> VersionEquivalenceChecker<S::Object> for ContextVersionChecker<S>
where
    S: ValidationStrategy,
    S::Object: Versioned,
{
    fn verify(&self, object: &S::Object, old: Option<&S::Object>) -> Result<(), VersionDivergence> {
        let Some((baseline, rest)) = self.versions.split_first() else {
            return Ok(());
        };

        let stamped = old.map(|old| stamp_versions(object, old));
        let (object, old) = match &stamped {
            Some((object, old)) => (object, Some(old)),
            None => (object, None),
        };

        let expected = self.validate_at(baseline, object, old);
        for version in rest {
            let actual = self.validate_at(version, object, old);
            self.matcher
                .test(&expected, &actual)
                .map_err(|report| VersionDivergence::Mismatch {
                    baseline: baseline.clone(),
                    version: version.clone(),
                    report,
                })?;
        }
        Ok(())
    }
}
