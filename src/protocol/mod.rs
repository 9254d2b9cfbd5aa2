//! Legacy-vs-declarative equivalence protocol.
//!
//! For every (case, API version) pair:
//!
//! 1. run the entry point under each gate configuration of the matrix,
//! 2. check each run's raw errors against the case's expected errors (an
//!    empty expectation means no errors at all); only the opt-in
//!    [`DedupStage::Legacy`] collapses legacy-path runs first,
//! 3. collapse duplicate legacy errors unless dedup is disabled,
//! 4. require the collapsed legacy errors and the authoritative errors to be
//!    equivalent, and under the three-point matrix require the raw legacy and
//!    validation-only errors to be equivalent too,
//! 5. hand the object to the cross-version checker.
//!
//! Every step runs even when an earlier one failed, so a report lists all
//! divergences of a case at once. Nothing is retried.

pub mod report;

pub use report::{CaseSummary, SuiteReport};

use crate::context::RequestInfo;
use crate::field::ErrorList;
use crate::gates::{FeatureGates, GateError};
use crate::matcher::{DedupStage, ErrorMatcher, MatchReport};
use crate::runner::{GateConfiguration, GateMatrix, GateMatrixRunner, MatrixOutcome};
use crate::strategy::{ValidationStrategy, Versioned};
use crate::versions::{VersionDivergence, VersionEquivalenceChecker};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct CreateCase<O> {
    pub input: O,
    pub expected: ErrorList,
}

impl<O> CreateCase<O> {
    pub fn new(input: O) -> Self {
        Self {
            input,
            expected: ErrorList::new(),
        }
    }

    pub fn expecting(mut self, expected: impl Into<ErrorList>) -> Self {
        self.expected = expected.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct UpdateCase<O> {
    pub old: O,
    pub update: O,
    pub expected: ErrorList,
}

impl<O> UpdateCase<O> {
    pub fn new(old: O, update: O) -> Self {
        Self {
            old,
            update,
            expected: ErrorList::new(),
        }
    }

    pub fn expecting(mut self, expected: impl Into<ErrorList>) -> Self {
        self.expected = expected.into();
        self
    }
}

/// Fixture tables are keyed by case name and run in name order.
pub type CaseTable<C> = BTreeMap<String, C>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Failure {
    #[error("{configuration} run does not match the expected errors: {report}")]
    ExpectationMismatch {
        configuration: GateConfiguration,
        report: MatchReport,
    },

    #[error("{configuration} run expected no errors, but got:\n{errors}")]
    UnexpectedErrors {
        configuration: GateConfiguration,
        errors: ErrorList,
    },

    #[error("legacy and authoritative errors diverge: {report}")]
    ImplementationDivergence { report: MatchReport },

    #[error("declarative validation without takeover changed the legacy errors: {report}")]
    TakeoverAssumption { report: MatchReport },

    #[error("cross-version divergence: {0}")]
    Version(#[from] VersionDivergence),

    #[error("gate setup failed: {0}")]
    Gate(#[from] GateError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseReport {
    pub case: String,
    pub api_version: String,
    pub operation: Operation,
    pub failures: Vec<Failure>,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.passed() { Ok(()) } else { Err(self) }
    }

    /// Panics with the full diagnostic when the case failed.
    #[track_caller]
    pub fn assert_passed(&self) {
        assert!(self.passed(), "{self}");
    }
}

impl fmt::Display for CaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.passed() { "PASS" } else { "FAIL" };
        write!(
            f,
            "{verdict} {} {} @ {}",
            self.operation, self.case, self.api_version
        )?;
        for failure in &self.failures {
            write!(f, "\n  {failure}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolOptions {
    /// Compares each run against the case's expected errors.
    pub output_matcher: ErrorMatcher,
    /// Compares legacy against authoritative output, and drives dedup.
    pub equivalence_matcher: ErrorMatcher,
    pub dedup: DedupStage,
    pub matrix: GateMatrix,
}

impl Default for ProtocolOptions {
    fn default() -> Self {
        Self {
            output_matcher: ErrorMatcher::structural(),
            equivalence_matcher: ErrorMatcher::structural(),
            dedup: DedupStage::Convergence,
            matrix: GateMatrix::TwoPoint,
        }
    }
}

pub struct EquivalenceProtocol<S, C> {
    strategy: S,
    checker: C,
    options: ProtocolOptions,
    gates: FeatureGates,
}

impl<S, C> EquivalenceProtocol<S, C>
where
    S: ValidationStrategy,
    C: VersionEquivalenceChecker<S::Object>,
{
    pub fn new(strategy: S, checker: C, options: ProtocolOptions) -> Self {
        Self {
            strategy,
            checker,
            options,
            gates: FeatureGates::new(),
        }
    }

    /// Starts from `gates` instead of the all-off defaults.
    pub fn with_gates(mut self, gates: FeatureGates) -> Self {
        self.gates = gates;
        self
    }

    pub fn gates(&self) -> &FeatureGates {
        &self.gates
    }

    pub fn options(&self) -> &ProtocolOptions {
        &self.options
    }

    pub fn run_create(
        &mut self,
        name: &str,
        case: &CreateCase<S::Object>,
        request: &RequestInfo,
    ) -> CaseReport {
        let mut report = CaseReport {
            case: name.to_string(),
            api_version: request.api_version.clone(),
            operation: Operation::Create,
            failures: Vec::new(),
        };

        let outcome = GateMatrixRunner::new(&mut self.gates, self.options.matrix).run_create(
            &self.strategy,
            request,
            &case.input,
        );
        match outcome {
            Ok(outcome) => self.reconcile(&outcome, &case.expected, &mut report.failures),
            Err(err) => report.failures.push(err.into()),
        }

        if let Err(divergence) = self.checker.verify(&case.input, None) {
            report.failures.push(divergence.into());
        }

        log_case(&report);
        report
    }

    pub fn run_update(
        &mut self,
        name: &str,
        case: &UpdateCase<S::Object>,
        request: &RequestInfo,
    ) -> CaseReport
    where
        S::Object: Versioned,
    {
        let mut report = CaseReport {
            case: name.to_string(),
            api_version: request.api_version.clone(),
            operation: Operation::Update,
            failures: Vec::new(),
        };

        let outcome = GateMatrixRunner::new(&mut self.gates, self.options.matrix).run_update(
            &self.strategy,
            request,
            &case.update,
            &case.old,
        );
        match outcome {
            Ok(outcome) => self.reconcile(&outcome, &case.expected, &mut report.failures),
            Err(err) => report.failures.push(err.into()),
        }

        if let Err(divergence) = self.checker.verify(&case.update, Some(&case.old)) {
            report.failures.push(divergence.into());
        }

        log_case(&report);
        report
    }

    pub fn run_create_suite(
        &mut self,
        suite: &str,
        cases: &CaseTable<CreateCase<S::Object>>,
        api_group: &str,
        versions: &[String],
    ) -> SuiteReport {
        let mut reports = Vec::with_capacity(cases.len() * versions.len());
        for version in versions {
            let request = RequestInfo::new(api_group, version.as_str());
            for (name, case) in cases {
                reports.push(self.run_create(name, case, &request));
            }
        }
        SuiteReport::from_cases(suite, reports)
    }

    pub fn run_update_suite(
        &mut self,
        suite: &str,
        cases: &CaseTable<UpdateCase<S::Object>>,
        api_group: &str,
        versions: &[String],
    ) -> SuiteReport
    where
        S::Object: Versioned,
    {
        let mut reports = Vec::with_capacity(cases.len() * versions.len());
        for version in versions {
            let request = RequestInfo::new(api_group, version.as_str());
            for (name, case) in cases {
                reports.push(self.run_update(name, case, &request));
            }
        }
        SuiteReport::from_cases(suite, reports)
    }

    fn reconcile(&self, outcome: &MatrixOutcome, expected: &ErrorList, failures: &mut Vec<Failure>) {
        let equivalence = &self.options.equivalence_matcher;
        let dedup = self.options.dedup;

        for (configuration, errors) in outcome.runs() {
            let errors = DedupStage::collapse_if(
                dedup.before_expectations() && configuration.is_legacy_path(),
                errors,
                equivalence,
            );
            check_expected(
                &self.options.output_matcher,
                *configuration,
                expected,
                &errors,
                failures,
            );
        }

        let (Some(authoritative), Some(legacy)) = (outcome.authoritative(), outcome.legacy())
        else {
            return;
        };

        let collapsed = DedupStage::collapse_if(dedup.before_convergence(), legacy, equivalence);
        if let Err(report) = equivalence.test(&collapsed, authoritative) {
            failures.push(Failure::ImplementationDivergence { report });
        }

        if let Some(validation_only) = outcome.validation_only()
            && let Err(report) = equivalence.test(legacy, validation_only)
        {
            failures.push(Failure::TakeoverAssumption { report });
        }
    }
}

fn check_expected(
    matcher: &ErrorMatcher,
    configuration: GateConfiguration,
    expected: &ErrorList,
    errors: &ErrorList,
    failures: &mut Vec<Failure>,
) {
    if !expected.is_empty() {
        if let Err(report) = matcher.test(expected, errors) {
            failures.push(Failure::ExpectationMismatch {
                configuration,
                report,
            });
        }
    } else if !errors.is_empty() {
        failures.push(Failure::UnexpectedErrors {
            configuration,
            errors: errors.clone(),
        });
    }
}

fn log_case(report: &CaseReport) {
    if report.passed() {
        tracing::debug!(
            case = %report.case,
            operation = %report.operation,
            api_version = %report.api_version,
            "equivalence case passed"
        );
    } else {
        tracing::warn!(
            case = %report.case,
            operation = %report.operation,
            api_version = %report.api_version,
            failures = report.failures.len(),
            "equivalence case failed"
        );
    }
}
