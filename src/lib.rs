#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

//! Differential harness proving that a hand-written validator and a
//! declarative, schema-driven validator report equivalent errors.

pub mod config;
pub mod context;
pub mod error;
pub mod field;
pub mod fixtures;
pub mod gates;
pub mod matcher;
pub mod protocol;
pub mod runner;
pub mod strategy;
pub mod versions;

pub use config::HarnessConfig;
pub use context::{RequestInfo, ValidationContext};
pub use field::{ErrorKind, ErrorList, FieldPath, StructuredError, ValidationSource};
pub use gates::{FeatureGates, GateState};
pub use matcher::{ErrorMatcher, MatchReport, dedupe};
pub use protocol::{
    CaseReport, CaseTable, CreateCase, EquivalenceProtocol, Failure, ProtocolOptions, SuiteReport,
    UpdateCase,
};
pub use runner::{GateConfiguration, GateMatrix, GateMatrixRunner};
pub use strategy::{ValidationStrategy, Versioned};
pub use versions::{ContextVersionChecker, NoopVersionChecker, VersionEquivalenceChecker};
