use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::info;
use valparity::matcher::{ErrorMatcher, MatchAxis, dedupe};
use valparity::{ErrorList, HarnessConfig};

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Compare {
            expected,
            actual,
            by,
            dedupe_expected,
        } => {
            let report = compare_files(&expected, &actual, &by, dedupe_expected)?;
            println!("{report}");
            if !report.is_match() {
                bail!(
                    "{} and {} are not equivalent",
                    expected.display(),
                    actual.display()
                );
            }
            Ok(())
        }
        Commands::Dedupe { input, by } => {
            let collapsed = dedupe_file(&input, &by)?;
            println!("{}", serde_json::to_string_pretty(&collapsed)?);
            Ok(())
        }
        Commands::Config { path } => {
            let config = HarnessConfig::load_or_default(path.as_deref())?;
            info!(path = %config.config_path.display(), "effective configuration");
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn read_error_list(path: &Path) -> Result<ErrorList> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read error list {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse error list {}", path.display()))
}

fn compare_files(
    expected: &Path,
    actual: &Path,
    axes: &[MatchAxis],
    dedupe_expected: bool,
) -> Result<valparity::MatchReport> {
    let matcher = ErrorMatcher::from_axes(axes);
    let mut expected_errors = read_error_list(expected)?;
    let actual_errors = read_error_list(actual)?;
    if dedupe_expected {
        expected_errors = dedupe(&expected_errors, &matcher);
    }
    info!(
        %matcher,
        expected = expected_errors.len(),
        actual = actual_errors.len(),
        "comparing error lists"
    );
    Ok(matcher.compare(&expected_errors, &actual_errors))
}

fn dedupe_file(input: &Path, axes: &[MatchAxis]) -> Result<ErrorList> {
    let errors = read_error_list(input)?;
    let collapsed = dedupe(&errors, &ErrorMatcher::from_axes(axes));
    info!(
        before = errors.len(),
        after = collapsed.len(),
        "collapsed duplicate errors"
    );
    Ok(collapsed)
}
