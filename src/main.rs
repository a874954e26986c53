use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use rate_tracker::common;
use rate_tracker::config::{AppConfig, ConfigOverrides};
use rate_tracker::render::to_svg;
use rate_tracker::series::{append_observation, today};
use rate_tracker::storage::SeriesStore;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    /// TOML config file (defaults to ./rate-tracker.toml when present)
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct StorageArgs {
    /// Directory holding one CSV file per game
    #[clap(short, long, env = "RATE_TRACKER_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the interactive page
    #[cfg(feature = "server")]
    Serve {
        #[clap(short, long)]
        port: Option<u16>,
        #[clap(short, long)]
        bind: Option<String>,
        #[clap(flatten)]
        storage: StorageArgs,
    },
    /// Append a rate to a game's series
    Add {
        #[clap(short, long)]
        game: String,
        #[clap(short, long)]
        rate: u32,
        #[clap(flatten)]
        storage: StorageArgs,
    },
    /// Print a game's series
    Show {
        #[clap(short, long)]
        game: String,
        #[clap(flatten)]
        storage: StorageArgs,
    },
    /// Write a game's chart as SVG
    Chart {
        #[clap(short, long)]
        game: String,
        #[clap(short, long)]
        output: PathBuf,
        #[clap(flatten)]
        storage: StorageArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(args.log_level.as_deref());

    let config = AppConfig::load(args.config.as_deref())?;

    match args.command {
        #[cfg(feature = "server")]
        Commands::Serve {
            port,
            bind,
            storage,
        } => {
            let config = config.apply(ConfigOverrides {
                data_dir: storage.data_dir,
                bind,
                port,
            });
            info!("Starting server on {}", config.listen_addr());
            rate_tracker::server::start_server(&config).await?;
        }
        Commands::Add {
            game,
            rate,
            storage,
        } => {
            let store = open_store(config, storage)?;
            let (location, series) = store.open(&game)?;
            let series = append_observation(series, i64::from(rate), today());
            store.save(&series, &location)?;
            info!("Added rate {} to '{}' ({} rows)", rate, game, series.len());
        }
        Commands::Show { game, storage } => {
            let store = open_store(config, storage)?;
            let location = store.location(&game)?;
            let series = store.load(&location)?;
            if series.is_empty() {
                println!("{}", to_svg::NO_DATA_NOTICE);
            }
            for observation in &series {
                println!(
                    "{}\t{}\t{}",
                    observation.date, observation.race_number, observation.rate
                );
            }
        }
        Commands::Chart {
            game,
            output,
            storage,
        } => {
            let store = open_store(config, storage)?;
            let location = store.location(&game)?;
            let series = store.load(&location)?;
            let svg = to_svg::render(&series)?;
            common::write_string_to_file(&output, &svg)
                .with_context(|| format!("Failed to write chart to {}", output.display()))?;
            info!("Wrote chart for '{}' to {}", game, output.display());
        }
    }

    Ok(())
}

fn open_store(config: AppConfig, storage: StorageArgs) -> Result<SeriesStore> {
    let config = config.apply(ConfigOverrides {
        data_dir: storage.data_dir,
        ..Default::default()
    });
    let store = SeriesStore::new(config.data_dir);
    store.ensure_root()?;
    Ok(store)
}

fn log_filter(log_level: Option<&str>) -> String {
    let log_level = match log_level.unwrap_or("info").to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    format!("handlebars=off,{}", log_level)
}

fn setup_logging(log_level: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_filter(log_level)))
        .without_time()
        .init();
}
