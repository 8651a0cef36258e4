//! CLI interface for margin-sim
//!
//! Provides subcommands for:
//! - `run`: Replay a price series through one episode
//! - `sweep`: Replay the same series at several leverages in parallel
//! - `config`: Show the effective configuration

mod run;
mod sweep;

pub use run::{OutputFormat, RunArgs, SourceArgs};
pub use sweep::SweepArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "margin-sim")]
#[command(about = "Leveraged single-instrument margin trading simulator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one episode over a price series
    Run(RunArgs),
    /// Run one episode per leverage in parallel
    Sweep(SweepArgs),
    /// Show configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::parse_from([
            "margin-sim",
            "run",
            "--synthetic",
            "500",
            "--seed",
            "7",
            "--format",
            "json",
        ]);
        assert_eq!(cli.config, "config.toml");
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.source.synthetic, Some(500));
                assert_eq!(args.source.seed, Some(7));
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_sweep() {
        let cli = Cli::parse_from([
            "margin-sim",
            "-c",
            "custom.toml",
            "sweep",
            "--leverage",
            "10,50,100",
        ]);
        assert_eq!(cli.config, "custom.toml");
        match cli.command {
            Commands::Sweep(args) => assert_eq!(args.leverage, vec![10.0, 50.0, 100.0]),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
