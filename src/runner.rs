//! Runs one validation entry point under each gate configuration of a matrix.

use crate::context::{RequestInfo, ValidationContext};
use crate::field::ErrorList;
use crate::gates::{
    DECLARATIVE_VALIDATION, DECLARATIVE_VALIDATION_TAKEOVER, FeatureGates, GateError, GateState,
};
use crate::strategy::{SYNTHETIC_RESOURCE_VERSION, ValidationStrategy, Versioned};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GateConfiguration {
    /// Both gates on: declarative output is authoritative.
    Authoritative,
    /// Both gates off: hand-written validation only.
    Legacy,
    /// Declarative validation running without takeover.
    ValidationOnly,
}

impl GateConfiguration {
    pub const fn state(self) -> GateState {
        match self {
            Self::Authoritative => GateState::ALL_ON,
            Self::Legacy => GateState::ALL_OFF,
            Self::ValidationOnly => GateState::VALIDATION_ONLY,
        }
    }

    /// Whether the hand-written validator's output is the one returned.
    pub const fn is_legacy_path(self) -> bool {
        !self.state().effective_takeover()
    }
}

/// Which gate configurations a case runs under.
///
/// `TwoPoint` relies on "validation on, takeover off" behaving exactly like
/// "both off"; `ThreePoint` runs that configuration too so the assumption is
/// checked instead of assumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GateMatrix {
    #[default]
    TwoPoint,
    ThreePoint,
}

impl GateMatrix {
    pub const fn configurations(self) -> &'static [GateConfiguration] {
        match self {
            Self::TwoPoint => &[GateConfiguration::Authoritative, GateConfiguration::Legacy],
            Self::ThreePoint => &[
                GateConfiguration::Authoritative,
                GateConfiguration::Legacy,
                GateConfiguration::ValidationOnly,
            ],
        }
    }
}

/// Errors produced by each configuration that was executed, in run order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatrixOutcome {
    runs: Vec<(GateConfiguration, ErrorList)>,
}

impl MatrixOutcome {
    pub fn get(&self, configuration: GateConfiguration) -> Option<&ErrorList> {
        self.runs
            .iter()
            .find(|(c, _)| *c == configuration)
            .map(|(_, errors)| errors)
    }

    pub fn authoritative(&self) -> Option<&ErrorList> {
        self.get(GateConfiguration::Authoritative)
    }

    pub fn legacy(&self) -> Option<&ErrorList> {
        self.get(GateConfiguration::Legacy)
    }

    pub fn validation_only(&self) -> Option<&ErrorList> {
        self.get(GateConfiguration::ValidationOnly)
    }

    pub fn runs(&self) -> &[(GateConfiguration, ErrorList)] {
        &self.runs
    }
}

pub struct GateMatrixRunner<'g> {
    gates: &'g mut FeatureGates,
    matrix: GateMatrix,
}

impl<'g> GateMatrixRunner<'g> {
    pub fn new(gates: &'g mut FeatureGates, matrix: GateMatrix) -> Self {
        Self { gates, matrix }
    }

    /// Calls `entry` once per configuration. Gates are restored after every
    /// call, so `entry` panicking leaves them as they were before the run.
    pub fn run<F>(&mut self, request: &RequestInfo, mut entry: F) -> Result<MatrixOutcome, GateError>
    where
        F: FnMut(&ValidationContext<'_>) -> ErrorList,
    {
        let mut outcome = MatrixOutcome::default();
        for &configuration in self.matrix.configurations() {
            let state = configuration.state();
            let errors = {
                let mut validation =
                    self.gates
                        .override_gate(DECLARATIVE_VALIDATION, state.declarative_validation)?;
                let takeover = validation
                    .override_gate(DECLARATIVE_VALIDATION_TAKEOVER, state.declarative_takeover)?;
                let ctx = ValidationContext::new(request, takeover.state());
                entry(&ctx)
            };
            tracing::debug!(
                %configuration,
                api_version = %request.api_version,
                errors = errors.len(),
                "gated validation run finished"
            );
            outcome.runs.push((configuration, errors));
        }
        Ok(outcome)
    }

    pub fn run_create<S: ValidationStrategy>(
        &mut self,
        strategy: &S,
        request: &RequestInfo,
        object: &S::Object,
    ) -> Result<MatrixOutcome, GateError> {
        self.run(request, |ctx| strategy.validate(ctx, object))
    }

    /// Stamps both sides with [`SYNTHETIC_RESOURCE_VERSION`] before running.
    pub fn run_update<S>(
        &mut self,
        strategy: &S,
        request: &RequestInfo,
        object: &S::Object,
        old: &S::Object,
    ) -> Result<MatrixOutcome, GateError>
    where
        S: ValidationStrategy,
        S::Object: Versioned,
    {
        let (object, old) = stamp_versions(object, old);
        self.run(request, |ctx| strategy.validate_update(ctx, &object, &old))
    }
}

pub(crate) fn stamp_versions<O: Clone + Versioned>(object: &O, old: &O) -> (O, O) {
    let mut object = object.clone();
    let mut old = old.clone();
    object.set_resource_version(SYNTHETIC_RESOURCE_VERSION);
    old.set_resource_version(SYNTHETIC_RESOURCE_VERSION);
    (object, old)
}
