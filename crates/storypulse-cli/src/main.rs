use clap::{Parser, Subcommand};

mod describe;
mod generate;

#[derive(Debug, Parser)]
#[command(name = "storypulse")]
#[command(about = "Build resumable news-signal datasets from the search API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Retrieve time series and story samples for a set of signals
    Generate(generate::GenerateArgs),
    /// Print summary statistics for a generated dataset
    Describe(describe::DescribeArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = storypulse_core::load_app_config_from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => generate::run_generate(&config, &args).await,
        Commands::Describe(args) => describe::run_describe(&args),
    }
}
