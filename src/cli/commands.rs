use clap::{Parser, Subcommand};
use std::path::PathBuf;
use valparity::matcher::MatchAxis;

/// `valparity` - compare validator error lists for structural equivalence.
#[derive(Parser, Debug)]
#[command(name = "valparity")]
#[command(version = "0.1.0")]
#[command(
    about = "Checks that legacy and declarative validators report equivalent errors.",
    long_about = None
)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare two JSON error lists as multisets; exits non-zero on mismatch
    Compare {
        /// Reference error list (e.g. the legacy validator's output)
        #[arg(long)]
        expected: PathBuf,

        /// Candidate error list (e.g. the declarative validator's output)
        #[arg(long)]
        actual: PathBuf,

        /// Axes that take part in equality: kind, field, origin, detail, detail-substring
        #[arg(long, value_delimiter = ',', default_value = "kind,field,origin")]
        by: Vec<MatchAxis>,

        /// Collapse duplicate entries of the expected list before comparing
        #[arg(long)]
        dedupe_expected: bool,
    },

    /// Print a JSON error list with one entry per equivalence class
    Dedupe {
        /// JSON error list to collapse
        #[arg(long)]
        input: PathBuf,

        /// Axes defining the equivalence classes
        #[arg(long, value_delimiter = ',', default_value = "kind,field,origin")]
        by: Vec<MatchAxis>,
    },

    /// Print the effective harness configuration
    Config {
        /// Config file (default: ~/.valparity/valparity.toml)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}
