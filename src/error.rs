use std::path::PathBuf;
use thiserror::Error;

pub use crate::gates::GateError;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Errors raised while setting up or reporting a harness run.
///
/// Equivalence violations are not errors in this sense: they are collected
/// as [`Failure`](crate::protocol::Failure)s on the case report.
#[derive(Debug, Error)]
pub enum HarnessError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Feature gates ───────────────────────────────────────────────────
    #[error("gate: {0}")]
    Gate(#[from] GateError),

    // ── Fixtures ────────────────────────────────────────────────────────
    #[error("fixture: {0}")]
    Fixture(#[from] FixtureError),

    // ── Reports / evidence ──────────────────────────────────────────────
    #[error("report: {0}")]
    Report(#[from] ReportError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Fixture errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("duplicate case {name:?} in {path}")]
    DuplicateCase { path: PathBuf, name: String },
}

// ─── Report errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, HarnessError>;
