//! coinsight CLI - crypto chat, scoring, and news over the Sonar API.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coinsight::{ChatService, Config, NewsService, RetryController, ScoreService, SonarClient};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "coinsight")]
#[command(version)]
#[command(about = "Crypto chat, multi-category scoring, and news curation via the Sonar API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "coinsight.toml")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the crypto chatbot a question
    Chat {
        /// The question to ask
        prompt: String,
    },

    /// Run a market-scan command (e.g. MOON, FLASH)
    Command {
        /// Command name
        name: String,
    },

    /// Score an asset across analysis categories
    Score {
        /// Asset name (e.g. Ethereum)
        #[arg(short, long)]
        asset: String,

        /// Blockchain network name (e.g. Ethereum)
        #[arg(short, long)]
        network: String,

        /// Categories to score (default: all)
        #[arg(long, value_delimiter = ',')]
        categories: Vec<String>,
    },

    /// Fetch curated news for interest topics
    News {
        /// Interest topics (default: general market trends)
        #[arg(long, value_delimiter = ',')]
        interests: Vec<String>,

        /// Lookback window in days (1-30)
        #[arg(long, default_value = "7")]
        days: u32,
    },

    /// Validate configuration and credentials
    Validate,

    /// Show example configuration
    Example,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");
}

fn print_example_config() {
    let example = r#"# coinsight configuration file

[sonar]
# API key (can also use SONAR_API_KEY env var)
# api_key = "pplx-..."
base_url = "https://api.perplexity.ai/chat/completions"
chat_timeout_secs = 90
analysis_timeout_secs = 120

[dispatch]
max_attempts = 3
base_delay_ms = 500
max_concurrency = 16
"#;
    println!("{example}");
}

fn load_config(path: &PathBuf) -> Result<Config> {
    Config::load_or_default(path).with_context(|| format!("Failed to load config from {path:?}"))
}

fn build_controller(config: &Config) -> Result<Arc<RetryController<SonarClient>>> {
    let api_key = config
        .resolve_api_key()
        .context("Failed to resolve API key")?;
    let client = SonarClient::new(api_key, config.sonar.base_url.clone())
        .context("Failed to build Sonar client")?;
    Ok(Arc::new(RetryController::new(
        Arc::new(client),
        config.dispatch.retry_policy(),
    )))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Example => {
            print_example_config();
            return Ok(());
        }

        Commands::Validate => {
            let config = load_config(&cli.config)?;
            config
                .resolve_api_key()
                .context("Failed to resolve API key")?;

            info!("Configuration is valid");
            info!("  Endpoint: {}", config.sonar.base_url);
            info!(
                "  Retry: {} attempts, {}ms base delay",
                config.dispatch.max_attempts, config.dispatch.base_delay_ms
            );
            info!("  Fan-out concurrency: {}", config.dispatch.max_concurrency);
        }

        Commands::Chat { prompt } => {
            let config = load_config(&cli.config)?;
            let controller = build_controller(&config)?;
            let service = ChatService::new(controller, &config);
            let response = service.chat(&prompt).await?;
            println!("{response}");
        }

        Commands::Command { name } => {
            let config = load_config(&cli.config)?;
            let controller = build_controller(&config)?;
            let service = ChatService::new(controller, &config);
            let payload = service.command(&name).await?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }

        Commands::Score {
            asset,
            network,
            categories,
        } => {
            let config = load_config(&cli.config)?;
            let controller = build_controller(&config)?;
            let service = ScoreService::new(controller, &config);
            let batch = service.score(&asset, &network, &categories).await?;
            println!("{}", serde_json::to_string_pretty(&batch.to_json())?);
        }

        Commands::News { interests, days } => {
            let config = load_config(&cli.config)?;
            let controller = build_controller(&config)?;
            let service = NewsService::new(controller, &config);
            let payload = service.news(&interests, days).await?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }

    Ok(())
}
