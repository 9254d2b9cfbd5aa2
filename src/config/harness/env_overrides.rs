use super::HarnessConfig;
use crate::runner::GateMatrix;
use std::path::PathBuf;

impl HarnessConfig {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(group) = std::env::var("VALPARITY_API_GROUP")
            && !group.is_empty()
        {
            self.api_group = group;
        }

        if let Ok(raw) = std::env::var("VALPARITY_API_VERSIONS") {
            let versions: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();
            if !versions.is_empty() {
                self.api_versions = versions;
            }
        }

        if let Ok(flag) = std::env::var("VALPARITY_THREE_POINT")
            && let Ok(three_point) = flag.trim().parse::<bool>()
        {
            self.matrix = if three_point {
                GateMatrix::ThreePoint
            } else {
                GateMatrix::TwoPoint
            };
        }

        if let Ok(dir) = std::env::var("VALPARITY_REPORT_DIR")
            && !dir.is_empty()
        {
            self.report.dir = Some(PathBuf::from(dir));
        }
    }
}
