//! tally daemon — replays validator votes through a round's voting tables.

mod config;
mod error;
mod replay;
mod scenario;

use clap::Parser;
use std::path::PathBuf;

use tally_consensus::QuorumMode;
use tally_utils::LogFormat;

use crate::config::DaemonConfig;
use crate::scenario::Scenario;

#[derive(Parser)]
#[command(name = "tallyd", about = "Round voting table daemon")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base; CLI
    /// flags and env vars override them.
    #[arg(long, env = "TALLY_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "TALLY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "TALLY_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Quorum counting mode: "total" or "per_candidate".
    #[arg(long, env = "TALLY_QUORUM_MODE")]
    quorum_mode: Option<QuorumMode>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replay the votes of a scenario file concurrently and report the outcome.
    Replay {
        /// Scenario TOML file.
        scenario: PathBuf,
    },
    /// Print the effective configuration as TOML.
    Config,
    /// Print the quorum threshold for a validator set size.
    Threshold {
        /// Number of eligible validators.
        voters: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => DaemonConfig::from_toml_file(path)?,
        None => DaemonConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(mode) = cli.quorum_mode {
        config.voting.quorum_mode = mode;
    }

    tally_utils::init_logging(config.log_format, &config.log_level)?;

    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
        Command::Threshold { voters } => {
            println!("{}", tally_consensus::threshold(voters));
        }
        Command::Replay { scenario } => {
            let scenario = Scenario::from_toml_file(&scenario)?;
            tracing::info!(
                block_number = scenario.block_number,
                round = scenario.round,
                votes = scenario.votes.len(),
                mode = %config.voting.quorum_mode,
                "replaying scenario"
            );

            let report = replay::replay(scenario, &config.voting).await?;

            println!("threshold: {}", report.threshold);
            println!(
                "accepted: {}  rejected: {} (not eligible: {}  duplicate: {}  wrong round: {})",
                report.stats.accepted(),
                report.stats.rejected(),
                report.stats.not_eligible(),
                report.stats.duplicate(),
                report.stats.round_mismatch(),
            );
            for (vote_type, summary) in &report.tables {
                let majority = summary
                    .majority
                    .map_or_else(|| "-".to_string(), |hash| hash.to_string());
                println!(
                    "{vote_type}: votes {}  leader {}  majority {majority}",
                    summary.votes, summary.leader
                );
            }
        }
    }

    Ok(())
}
