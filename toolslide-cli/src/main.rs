//! Toolslide headless host
//!
//! Builds markup from a scenario file, mounts the widget on it, replays the
//! scripted host events and prints the resulting state as JSON.

mod cli;
mod scenario;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;

use cli::CliArgs;
use scenario::Scenario;

fn main() -> Result<()> {
    let args = CliArgs::parse();

    if args.verbose {
        toolslide_core::init_logging();
    }

    let input = if args.is_stdin() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read scenario from stdin")?;
        input
    } else {
        std::fs::read_to_string(&args.scenario)
            .with_context(|| format!("Failed to read scenario {}", args.scenario.display()))?
    };

    let scenario: Scenario = serde_json::from_str(&input).context("Invalid scenario")?;
    let report = scenario.run()?;

    let output = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{}", output);

    Ok(())
}
