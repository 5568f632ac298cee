//! cinefuse-ingest - movie metadata fusion pipeline
//!
//! Subcommands map to pipeline stages and may be run independently:
//!
//! ```text
//! cinefuse-ingest fetch-tmdb     # TMDB id dump -> tmdb-{n}.json
//! cinefuse-ingest process        # tmdb-{n}.json + caches -> movies-{n}.json
//! cinefuse-ingest enrich-omdb    # movies-{n}.json -> omdb-movies.json
//! cinefuse-ingest upsert         # movies-{n}.json -> SQLite
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use cinefuse_ingest::build_info;
use cinefuse_ingest::config::IngestConfig;
use cinefuse_ingest::db;
use cinefuse_ingest::models::OmdbMovie;
use cinefuse_ingest::pipeline::enrich::{enrich_batches, imdb_key};
use cinefuse_ingest::pipeline::fetch::fetch_batches;
use cinefuse_ingest::pipeline::layout::OMDB_CACHE_FILE;
use cinefuse_ingest::pipeline::{
    load_sources, resolve_num_batches, BatchDriver, DriverOptions, Layout,
};
use cinefuse_ingest::sources::{OmdbClient, TmdbClient};
use cinefuse_ingest::store::Store;

/// Command-line arguments for cinefuse-ingest
#[derive(Parser, Debug)]
#[command(name = "cinefuse-ingest")]
#[command(about = "Fuse, filter and score movie metadata in batches")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Config file (default: <config_dir>/cinefuse/cinefuse.toml)
    #[arg(short, long, global = true, env = "CINEFUSE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the raw dumps
    #[arg(long, global = true, env = "CINEFUSE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Directory for batch files and caches (default: <data_dir>/out)
    #[arg(long, global = true, env = "CINEFUSE_OUT_DIR")]
    out_dir: Option<PathBuf>,

    /// First batch to handle
    #[arg(long, global = true, default_value_t = 0)]
    start_batch: usize,

    /// Number of batches (default: derived from the TMDB id dump)
    #[arg(long, global = true)]
    num_batches: Option<usize>,

    /// Redo batches and keys that already have output
    #[arg(long, global = true)]
    force: bool,

    /// Log level or filter directive (RUST_LOG wins when set)
    #[arg(long, global = true, env = "CINEFUSE_LOG_LEVEL")]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch TMDB details for every batch of the id dump
    FetchTmdb {
        /// TMDB API read access token
        #[arg(long, env = "CINEFUSE_TMDB_TOKEN", hide_env_values = true)]
        tmdb_token: Option<String>,
    },
    /// Convert, merge, filter and score every batch
    Process,
    /// Populate the OMDB cache for every checkpointed movie
    EnrichOmdb {
        /// OMDB API key
        #[arg(long, env = "CINEFUSE_OMDB_API_KEY", hide_env_values = true)]
        omdb_api_key: Option<String>,
    },
    /// Upsert checkpoints into SQLite
    Upsert {
        /// Database file (default: <data_dir>/cinefuse.db)
        #[arg(long, env = "CINEFUSE_DB")]
        db: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = IngestConfig::load(cli.common.config.as_deref())
        .context("Failed to load configuration")?;
    apply_overrides(&mut config, &cli.common);
    config.validate().context("Invalid configuration")?;

    cinefuse_common::logging::init(&config.logging).context("Failed to initialize logging")?;

    info!("Starting {}", build_info::summary());

    let data_dir = config.resolve_data_dir(cli.common.data_dir.as_deref());
    let out_dir = config.resolve_out_dir(&data_dir);
    info!("Data directory: {}", data_dir.display());
    info!("Output directory: {}", out_dir.display());
    let layout = Layout::new(&data_dir, &out_dir);

    let num_batches = resolve_num_batches(&config, &layout)
        .context("Failed to determine the number of batches")?;
    let start_batch = cli.common.start_batch;

    match cli.command {
        Command::FetchTmdb { tmdb_token } => {
            let token = tmdb_token
                .or_else(|| config.tmdb_bearer_token.clone())
                .context("TMDB token missing (--tmdb-token, CINEFUSE_TMDB_TOKEN or config)")?;
            let client = TmdbClient::new(token, config.rate_limits.tmdb)?;
            let written = fetch_batches(&client, &layout, &config, start_batch)
                .await
                .context("TMDB fetch failed")?;
            info!(written, "TMDB fetch complete");
        }
        Command::Process => {
            let sources = load_sources(&layout).context("Failed to load secondary sources")?;
            let driver =
                BatchDriver::new(layout, sources, DriverOptions::from(&config), Utc::now());
            driver
                .run(start_batch, num_batches)
                .await
                .context("Batch processing failed")?;
        }
        Command::EnrichOmdb { omdb_api_key } => {
            let api_key = omdb_api_key
                .or_else(|| config.omdb_api_key.clone())
                .context("OMDB API key missing (--omdb-api-key, CINEFUSE_OMDB_API_KEY or config)")?;
            let client = OmdbClient::new(api_key, config.rate_limits.omdb)?;
            let store: Store<OmdbMovie> = Store::open(
                "omdb",
                &layout.cache(OMDB_CACHE_FILE),
                config.store_flush_every,
            )?;
            enrich_batches(
                &client,
                &store,
                imdb_key,
                &layout,
                &config,
                start_batch,
                num_batches,
            )
            .await
            .context("OMDB enrichment failed")?;
        }
        Command::Upsert { db } => {
            let db_path = db.unwrap_or_else(|| data_dir.join("cinefuse.db"));
            info!("Database: {}", db_path.display());
            let pool = db::init_database(&db_path)
                .await
                .context("Failed to open database")?;
            let rows = db::upsert_checkpoints(&pool, &layout, start_batch, num_batches)
                .await
                .context("Upsert failed")?;
            info!(rows, "Upsert complete");
        }
    }

    Ok(())
}

/// Apply command-line values on top of the loaded config
fn apply_overrides(config: &mut IngestConfig, args: &CommonArgs) {
    if let Some(out_dir) = &args.out_dir {
        config.out_dir = Some(out_dir.clone());
    }
    if let Some(n) = args.num_batches {
        config.num_batches = Some(n);
    }
    if args.force {
        config.force = true;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
}
