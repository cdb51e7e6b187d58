use clap::Parser;
use nf_core::Result;
use nf_feeds::cli::{handle_command, FeedArgs, FeedCommands};
use nf_feeds::logging::init_logging;
use nf_feeds::{CollectorConfig, FeedCollector};
use nf_web::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

const DEFAULT_ADDR: &str = "127.0.0.1:8501";

#[derive(Parser, Debug)]
#[command(author, version, about = "Keyword news feed monitor", long_about = None)]
pub struct Cli {
    /// JSON collector configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Feeds(FeedCommands),
    /// Start the HTTP host
    Serve {
        #[arg(long, default_value = DEFAULT_ADDR)]
        addr: SocketAddr,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<CollectorConfig> {
    match path {
        Some(path) => {
            let config = CollectorConfig::from_file(path)?;
            info!("⚙️ Loaded configuration from {}", path.display());
            Ok(config)
        }
        None => Ok(CollectorConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Feeds(command) => handle_command(FeedArgs { command }, &config).await?,
        Commands::Serve { addr } => {
            config.validate()?;
            let collector = FeedCollector::from_config(&config)?;
            info!(
                "📰 Monitoring {} keywords via {}",
                config.keywords.len(),
                collector.fetcher().name()
            );
            nf_web::serve(addr, AppState::new(collector, config.keywords.clone())).await?;
        }
    }

    Ok(())
}
