use super::{CaseReport, Operation};
use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct SuiteReport {
    pub suite: String,
    pub case_count: usize,
    pub pass_count: usize,
    pub cases: Vec<CaseReport>,
}

/// Serializable view of one case, with failures rendered to text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseSummary {
    pub case: String,
    pub operation: Operation,
    pub api_version: String,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SuiteEvidence {
    suite: String,
    case_count: usize,
    pass_count: usize,
    cases: Vec<CaseSummary>,
}

impl SuiteReport {
    pub fn from_cases(suite: impl Into<String>, cases: Vec<CaseReport>) -> Self {
        let suite = suite.into();
        let pass_count = cases.iter().filter(|c| c.passed()).count();
        let report = Self {
            case_count: cases.len(),
            pass_count,
            suite,
            cases,
        };
        tracing::info!(
            suite = %report.suite,
            cases = report.case_count,
            passed = report.pass_count,
            "equivalence suite finished"
        );
        report
    }

    pub fn all_passed(&self) -> bool {
        self.case_count == self.pass_count
    }

    pub fn failed_cases(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|c| !c.passed())
    }

    /// Folds another suite's cases into this one.
    pub fn absorb(&mut self, other: SuiteReport) {
        self.case_count += other.case_count;
        self.pass_count += other.pass_count;
        self.cases.extend(other.cases);
    }

    pub fn summaries(&self) -> Vec<CaseSummary> {
        self.cases
            .iter()
            .map(|c| CaseSummary {
                case: c.case.clone(),
                operation: c.operation,
                api_version: c.api_version.clone(),
                passed: c.passed(),
                failures: c.failures.iter().map(ToString::to_string).collect(),
            })
            .collect()
    }

    pub fn render_text(&self) -> String {
        let mut lines = vec![format!(
            "suite={} cases={} passed={} failed={}",
            self.suite,
            self.case_count,
            self.pass_count,
            self.case_count - self.pass_count
        )];
        lines.extend(self.cases.iter().map(ToString::to_string));
        lines.join("\n") + "\n"
    }

    pub fn render_json(&self) -> Result<String, ReportError> {
        let evidence = SuiteEvidence {
            suite: self.suite.clone(),
            case_count: self.case_count,
            pass_count: self.pass_count,
            cases: self.summaries(),
        };
        Ok(serde_json::to_string_pretty(&evidence)?)
    }

    /// Writes `<slug>.txt` and `<slug>.json` under `dir`.
    pub fn write_evidence(&self, dir: &Path, slug: &str) -> Result<Vec<PathBuf>, ReportError> {
        fs::create_dir_all(dir)?;
        let txt_path = dir.join(format!("{slug}.txt"));
        let json_path = dir.join(format!("{slug}.json"));

        fs::write(&txt_path, self.render_text())?;
        fs::write(&json_path, self.render_json()?)?;

        tracing::debug!(path = %json_path.display(), "wrote equivalence evidence");
        Ok(vec![txt_path, json_path])
    }
}
