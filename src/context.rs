use crate::gates::GateState;
use serde::{Deserialize, Serialize};

/// Request-scoped metadata a validator may branch on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestInfo {
    pub api_group: String,
    pub api_version: String,
}

impl RequestInfo {
    pub fn new(api_group: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            api_group: api_group.into(),
            api_version: api_version.into(),
        }
    }
}

/// Everything a validation entry point may read besides the object itself.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub request: &'a RequestInfo,
    pub gates: GateState,
}

impl<'a> ValidationContext<'a> {
    pub fn new(request: &'a RequestInfo, gates: GateState) -> Self {
        Self { request, gates }
    }

    pub fn declarative_enabled(&self) -> bool {
        self.gates.declarative_validation
    }

    /// Whether declarative output replaces the hand-written output.
    pub fn declarative_authoritative(&self) -> bool {
        self.gates.effective_takeover()
    }
}
