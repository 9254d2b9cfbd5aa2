use crate::error::ConfigError;
use crate::matcher::{DedupStage, ErrorMatcher, MatchAxis};
use crate::protocol::{ProtocolOptions, SuiteReport};
use crate::runner::GateMatrix;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Path the config was read from - not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default = "default_api_group")]
    pub api_group: String,

    /// Every schema version a case is run against, in run order.
    #[serde(default = "default_api_versions")]
    pub api_versions: Vec<String>,

    #[serde(default)]
    pub matrix: GateMatrix,

    #[serde(default)]
    pub dedup: DedupStage,

    #[serde(default)]
    pub matcher: MatcherConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

fn default_api_group() -> String {
    "certificates.k8s.io".into()
}

fn default_api_versions() -> Vec<String> {
    vec!["v1".into(), "v1alpha1".into(), "v1beta1".into()]
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            api_group: default_api_group(),
            api_versions: default_api_versions(),
            matrix: GateMatrix::default(),
            dedup: DedupStage::default(),
            matcher: MatcherConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Axes used to check each run against its expected errors.
    #[serde(default = "default_axes")]
    pub output: Vec<MatchAxis>,
    /// Axes used for legacy-vs-authoritative convergence and dedup.
    #[serde(default = "default_axes")]
    pub equivalence: Vec<MatchAxis>,
}

fn default_axes() -> Vec<MatchAxis> {
    vec![MatchAxis::Kind, MatchAxis::Field, MatchAxis::Origin]
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            output: default_axes(),
            equivalence: default_axes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Where suite evidence is written; nothing is written when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_report_slug")]
    pub slug: String,
}

fn default_report_slug() -> String {
    "declarative-equivalence".into()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: None,
            slug: default_report_slug(),
        }
    }
}

impl HarnessConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_versions.is_empty() {
            return Err(ConfigError::Validation(
                "api_versions must name at least one version".into(),
            ));
        }
        if let Some(blank) = self.api_versions.iter().position(|v| v.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "api_versions[{blank}] is blank"
            )));
        }
        if self.matcher.output.is_empty() {
            return Err(ConfigError::Validation(
                "matcher.output must enable at least one axis".into(),
            ));
        }
        if self.matcher.equivalence.is_empty() {
            return Err(ConfigError::Validation(
                "matcher.equivalence must enable at least one axis".into(),
            ));
        }
        if self.report.slug.trim().is_empty() {
            return Err(ConfigError::Validation("report.slug is blank".into()));
        }
        Ok(())
    }

    pub fn protocol_options(&self) -> ProtocolOptions {
        ProtocolOptions {
            output_matcher: ErrorMatcher::from_axes(&self.matcher.output),
            equivalence_matcher: ErrorMatcher::from_axes(&self.matcher.equivalence),
            dedup: self.dedup,
            matrix: self.matrix,
        }
    }

    /// Writes `suite` as evidence under `report.dir`. Nothing is written, and
    /// no paths are returned, when no evidence directory is configured.
    pub fn record_suite(&self, suite: &SuiteReport) -> crate::error::Result<Vec<PathBuf>> {
        let Some(dir) = &self.report.dir else {
            tracing::debug!(suite = %suite.suite, "no evidence directory configured");
            return Ok(Vec::new());
        };
        Ok(suite.write_evidence(dir, &self.report.slug)?)
    }
}
