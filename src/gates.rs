//! Feature gates as an explicit, test-scoped value.
//!
//! Gates are owned by whoever drives a run and handed to validators through
//! the [`ValidationContext`](crate::context::ValidationContext); there is no
//! process-wide toggle. Overrides are guards that restore the previous value
//! when dropped, unwinding included, and hold `&mut` on the gates for their
//! whole lifetime so two runs can never interleave on the same gates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use thiserror::Error;

pub const DECLARATIVE_VALIDATION: &str = "DeclarativeValidation";
pub const DECLARATIVE_VALIDATION_TAKEOVER: &str = "DeclarativeValidationTakeover";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("unknown feature gate {0:?}")]
    Unknown(String),
}

/// Snapshot of the two gates validators care about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GateState {
    pub declarative_validation: bool,
    pub declarative_takeover: bool,
}

impl GateState {
    pub const ALL_ON: Self = Self {
        declarative_validation: true,
        declarative_takeover: true,
    };
    pub const ALL_OFF: Self = Self {
        declarative_validation: false,
        declarative_takeover: false,
    };
    pub const VALIDATION_ONLY: Self = Self {
        declarative_validation: true,
        declarative_takeover: false,
    };

    /// Takeover has no effect unless declarative validation itself is on.
    pub const fn effective_takeover(self) -> bool {
        self.declarative_validation && self.declarative_takeover
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureGates {
    gates: BTreeMap<String, bool>,
}

impl Default for FeatureGates {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureGates {
    /// Both declarative gates registered and off.
    pub fn new() -> Self {
        let mut gates = BTreeMap::new();
        gates.insert(DECLARATIVE_VALIDATION.to_string(), false);
        gates.insert(DECLARATIVE_VALIDATION_TAKEOVER.to_string(), false);
        Self { gates }
    }

    pub fn with_gate(mut self, name: impl Into<String>, default: bool) -> Self {
        self.gates.insert(name.into(), default);
        self
    }

    pub fn enabled(&self, name: &str) -> Result<bool, GateError> {
        self.gates
            .get(name)
            .copied()
            .ok_or_else(|| GateError::Unknown(name.to_string()))
    }

    pub fn set(&mut self, name: &str, value: bool) -> Result<(), GateError> {
        let slot = self
            .gates
            .get_mut(name)
            .ok_or_else(|| GateError::Unknown(name.to_string()))?;
        *slot = value;
        Ok(())
    }

    pub fn state(&self) -> GateState {
        GateState {
            declarative_validation: self.flag(DECLARATIVE_VALIDATION),
            declarative_takeover: self.flag(DECLARATIVE_VALIDATION_TAKEOVER),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.gates.keys().map(String::as_str)
    }

    /// Sets `name` for as long as the returned guard lives.
    pub fn override_gate(&mut self, name: &str, value: bool) -> Result<GateOverride<'_>, GateError> {
        let previous = self.enabled(name)?;
        self.set(name, value)?;
        tracing::trace!(gate = name, value, previous, "feature gate overridden");
        Ok(GateOverride {
            gates: self,
            name: name.to_string(),
            previous,
        })
    }

    fn flag(&self, name: &str) -> bool {
        self.gates.get(name).copied().unwrap_or(false)
    }

    fn put(&mut self, name: &str, value: bool) {
        self.gates.insert(name.to_string(), value);
    }
}

/// Restores one gate on drop.
#[derive(Debug)]
pub struct GateOverride<'a> {
    gates: &'a mut FeatureGates,
    name: String,
    previous: bool,
}

impl Deref for GateOverride<'_> {
    type Target = FeatureGates;

    fn deref(&self) -> &Self::Target {
        self.gates
    }
}

impl DerefMut for GateOverride<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.gates
    }
}

impl Drop for GateOverride<'_> {
    fn drop(&mut self) {
        self.gates.put(&self.name, self.previous);
    }
}
