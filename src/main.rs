use anyhow::Result;
use clap::Parser;
use playmart::pipeline::{self, PipelineConfig};
use playmart::warehouse::SqliteWarehouse;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "playmart")]
#[command(about = "Load song catalog and play event logs into a star schema warehouse")]
struct Args {
    /// Path to the SQLite warehouse database file
    #[arg(value_name = "WAREHOUSE_DB")]
    warehouse_db: PathBuf,

    /// Root directory of the song catalog tree
    #[arg(long, default_value = "data/song_data")]
    song_data: PathBuf,

    /// Root directory of the play event log tree
    #[arg(long, default_value = "data/log_data")]
    log_data: PathBuf,

    /// Abort the whole run on the first failing file instead of skipping it
    #[arg(long, default_value_t = false)]
    fail_fast: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("Warehouse database: {}", args.warehouse_db.display());
    info!("Song data: {}", args.song_data.display());
    info!("Log data: {}", args.log_data.display());

    let warehouse = SqliteWarehouse::open(&args.warehouse_db)?;

    let stats = pipeline::run(
        &warehouse,
        &PipelineConfig {
            song_data: args.song_data,
            log_data: args.log_data,
            fail_fast: args.fail_fast,
        },
    )?;

    info!("");
    info!("Load summary");
    info!("============");
    info!("Files processed: {}/{}", stats.files_processed, stats.files_found);
    info!("Songs loaded: {}", stats.songs);
    info!("Artists loaded: {}", stats.artists);
    info!("Time rows loaded: {}", stats.times);
    info!("User rows loaded: {}", stats.users);
    info!("Songplays loaded: {}", stats.songplays);
    if stats.errors > 0 {
        warn!("Files skipped after errors: {}", stats.errors);
    }

    Ok(())
}
