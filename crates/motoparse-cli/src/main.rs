mod archive;
mod history;
mod parse;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use motoparse_core::AppConfig;
use motoparse_store::{FileStore, HistoryStore, KeyValueCache};
use tracing_subscriber::EnvFilter;

use history::HistoryCommands;

#[derive(Debug, Parser)]
#[command(name = "motoparse")]
#[command(about = "Parse motorcycle shop pages through the remote parser")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse a catalog or product page
    Parse {
        /// Page URL on a supported site
        url: String,
        /// Print the raw result as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Inspect or edit the search history
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Manage the local result cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
    /// Download an image archive for products of a parsed page
    Archive {
        /// URL of a page parsed earlier
        url: String,
        /// Where to write the archive
        #[arg(long, short, default_value = "product_images.zip")]
        output: PathBuf,
        /// Only include the product with this link (repeatable)
        #[arg(long = "link")]
        links: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
enum CacheCommands {
    /// Remove every cached entry, history included
    Clear,
}

/// Storage handles shared by every command.
pub(crate) struct Context {
    pub config: AppConfig,
    pub cache: KeyValueCache,
    pub history: HistoryStore,
}

impl Context {
    fn open(config: AppConfig) -> anyhow::Result<Self> {
        let store = FileStore::open_or_reset(&config.data_dir, &config.origin)?;
        tracing::debug!(path = %store.path().display(), "opened store");
        let cache = KeyValueCache::with_namespace(Arc::new(store), config.cache_namespace.clone());
        let history = HistoryStore::with_limit(cache.clone(), config.history_limit);
        Ok(Self {
            config,
            cache,
            history,
        })
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("motoparse: nothing to do, see --help");
        return Ok(());
    };

    dotenvy::dotenv().ok();
    let config = motoparse_core::load_app_config_from_env()?;
    init_tracing(&config);

    let ctx = Context::open(config)?;
    match command {
        Commands::Parse { url, json } => parse::run_parse(&ctx, &url, json).await?,
        Commands::History { command } => history::run_history(&ctx, command),
        Commands::Cache {
            command: CacheCommands::Clear,
        } => {
            ctx.cache.clear();
            println!("Кэш очищен.");
        }
        Commands::Archive {
            url,
            output,
            links,
        } => archive::run_archive(&ctx, &url, &output, &links).await?,
    }

    Ok(())
}
