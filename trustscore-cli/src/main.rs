// Copyright 2025 AgentReplay (https://github.com/agentreplay)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use trustscore_core::{MetricWeights, ScoredResult, TrustSuite};
use trustscore_evals::{
    export_report, export_results, import_results, ReportGenerator, SuiteRunner,
};

#[derive(Parser, Debug)]
#[command(name = "trustscore", author, version, about = "Trust score simulation and reporting", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate every test case of a suite and write the results as JSON
    Simulate {
        /// Path to the suite file (TOML)
        #[arg(short, long)]
        suite: PathBuf,

        /// Seed for reproducible runs (overrides suite and environment)
        #[arg(long)]
        seed: Option<u64>,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build a trust index report from exported results
    Report {
        /// Results JSON produced by `simulate`
        #[arg(short, long)]
        results: PathBuf,

        #[arg(long)]
        application: Option<String>,

        #[arg(long)]
        archetype: Option<String>,

        /// Suite file supplying labels and metric weights
        #[arg(long)]
        suite: Option<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Simulate a suite and write the report in one step
    Run {
        #[arg(short, long)]
        suite: PathBuf,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_suite(path: &Path, seed: Option<u64>) -> Result<TrustSuite> {
    let mut suite = TrustSuite::load(path.to_path_buf())
        .with_context(|| format!("failed to load suite {}", path.display()))?;
    if let Some(seed) = seed {
        suite.simulation.seed = Some(seed);
    }
    Ok(suite)
}

fn simulate(suite: &TrustSuite) -> Vec<ScoredResult> {
    SuiteRunner::new(suite).run()
}

fn write_output(output: Option<&Path>, json: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn read_results(path: &Path) -> Result<Vec<ScoredResult>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_results(&raw).with_context(|| format!("failed to parse results in {}", path.display()))
}

/// Labels and weights for `report`: explicit flags win over the suite file
fn report_generator(
    application: Option<String>,
    archetype: Option<String>,
    suite: Option<&TrustSuite>,
) -> Result<ReportGenerator> {
    let (suite_application, suite_archetype, weights) = match suite {
        Some(s) => (
            Some(s.application.clone()),
            Some(s.archetype.clone()),
            s.weights.clone(),
        ),
        None => (None, None, MetricWeights::new()),
    };

    let application = application
        .or(suite_application)
        .context("--application is required when no --suite is given")?;
    let archetype = archetype
        .or(suite_archetype)
        .context("--archetype is required when no --suite is given")?;

    Ok(ReportGenerator::new(application, archetype).with_weights(weights))
}

fn execute(command: Command) -> Result<()> {
    match command {
        Command::Simulate {
            suite,
            seed,
            output,
        } => {
            let suite = load_suite(&suite, seed)?;
            let results = simulate(&suite);
            write_output(output.as_deref(), &export_results(&results)?)
        }
        Command::Report {
            results,
            application,
            archetype,
            suite,
            output,
        } => {
            let suite = suite
                .map(|path| load_suite(&path, None))
                .transpose()?;
            let results = read_results(&results)?;
            let report = report_generator(application, archetype, suite.as_ref())?.generate(&results);
            write_output(output.as_deref(), &export_report(&report)?)
        }
        Command::Run {
            suite,
            seed,
            output,
        } => {
            let suite = load_suite(&suite, seed)?;
            let results = simulate(&suite);
            let report = ReportGenerator::from_suite(&suite).generate(&results);
            write_output(output.as_deref(), &export_report(&report)?)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    execute(cli.command)
}
