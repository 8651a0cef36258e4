use clap::Parser;
use margin_sim::cli::{Cli, Commands};
use margin_sim::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            Config::default()
        }
    };

    // Initialize telemetry
    margin_sim::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting episode run");
            args.execute(&config).await?;
        }
        Commands::Sweep(args) => {
            tracing::info!(leverages = ?args.leverage, "Starting leverage sweep");
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
