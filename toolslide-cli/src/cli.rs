//! Command-line argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Run a toolslide scenario against an in-memory document
#[derive(Parser, Debug)]
#[command(name = "toolslide", version, about = "Run a toolslide widget scenario")]
pub struct CliArgs {
    /// Scenario JSON file, or `-` for stdin
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Print the report on a single line
    #[arg(short, long)]
    pub compact: bool,

    /// Log widget activity (filter with RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    pub fn is_stdin(&self) -> bool {
        self.scenario.as_os_str() == "-"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = CliArgs::parse_from(["toolslide", "demo.json", "--compact"]);
        assert_eq!(args.scenario, PathBuf::from("demo.json"));
        assert!(args.compact);
        assert!(!args.verbose);
        assert!(!args.is_stdin());
    }

    #[test]
    fn test_stdin_marker() {
        let args = CliArgs::parse_from(["toolslide", "-", "-v"]);
        assert!(args.is_stdin());
        assert!(args.verbose);
    }
}
