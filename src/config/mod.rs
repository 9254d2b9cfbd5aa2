mod harness;

pub use harness::{HarnessConfig, MatcherConfig, ReportConfig};
