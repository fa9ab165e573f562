//! Loader driver: discovery, extraction, submission, per-file commit.

use crate::records::{extract_event_file, extract_song_file, SongplayDraft};
use crate::scan;
use crate::warehouse::WarehouseSink;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Clone, Copy, Debug)]
enum SourceKind {
    SongCatalog,
    EventLog,
}

#[derive(Debug)]
pub struct PipelineConfig {
    /// Root of the song catalog tree.
    pub song_data: PathBuf,
    /// Root of the play event log tree.
    pub log_data: PathBuf,
    /// Abort the whole run on the first failing file. The default is to log
    /// the failure, roll the file back and continue with the next one.
    pub fail_fast: bool,
}

/// Counters accumulated over one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub files_found: usize,
    pub files_processed: usize,
    pub songs: usize,
    pub artists: usize,
    pub times: usize,
    pub users: usize,
    pub songplays: usize,
    pub errors: usize,
}

/// Sweeps the song catalog tree, then the event log tree.
///
/// The catalog goes first so that plays can be matched against it. All rows
/// from one file commit as a unit; a failed file never leaves partial rows
/// behind.
pub fn run(sink: &dyn WarehouseSink, config: &PipelineConfig) -> Result<ImportStats> {
    let mut stats = ImportStats::default();
    process_tree(
        sink,
        &config.song_data,
        SourceKind::SongCatalog,
        config.fail_fast,
        &mut stats,
    )?;
    process_tree(
        sink,
        &config.log_data,
        SourceKind::EventLog,
        config.fail_fast,
        &mut stats,
    )?;
    Ok(stats)
}

fn process_tree(
    sink: &dyn WarehouseSink,
    root: &Path,
    kind: SourceKind,
    fail_fast: bool,
    stats: &mut ImportStats,
) -> Result<()> {
    let files = scan::find_json_files(root);
    info!("{} files found in {}", files.len(), root.display());
    stats.files_found += files.len();

    for (index, path) in files.iter().enumerate() {
        match process_file(sink, path, kind, stats) {
            Ok(()) => {}
            Err(err) => {
                if fail_fast {
                    return Err(err.context(format!("Failed to process {}", path.display())));
                }
                error!("Failed to process {}: {:#}", path.display(), err);
                stats.errors += 1;
            }
        }
        info!("{}/{} files processed", index + 1, files.len());
    }
    Ok(())
}

fn process_file(
    sink: &dyn WarehouseSink,
    path: &Path,
    kind: SourceKind,
    stats: &mut ImportStats,
) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    sink.begin_file()?;
    match submit_file(sink, &text, kind) {
        Ok(delta) => {
            if let Err(err) = sink.commit_file() {
                // A failed commit must not leave the transaction open for
                // the next file.
                let _ = sink.rollback_file();
                return Err(err);
            }
            // Counters only reflect committed rows.
            stats.files_processed += 1;
            stats.songs += delta.songs;
            stats.artists += delta.artists;
            stats.times += delta.times;
            stats.users += delta.users;
            stats.songplays += delta.songplays;
            Ok(())
        }
        Err(err) => {
            sink.rollback_file()?;
            Err(err)
        }
    }
}

fn submit_file(sink: &dyn WarehouseSink, text: &str, kind: SourceKind) -> Result<ImportStats> {
    let mut delta = ImportStats::default();
    match kind {
        SourceKind::SongCatalog => {
            let batch = extract_song_file(text)?;
            sink.insert_song(&batch.song)?;
            sink.insert_artist(&batch.artist)?;
            delta.songs += 1;
            delta.artists += 1;
        }
        SourceKind::EventLog => {
            let batch = extract_event_file(text)?;
            for row in &batch.times {
                sink.insert_time(row)?;
            }
            delta.times += batch.times.len();
            for row in &batch.users {
                sink.insert_user(row)?;
            }
            delta.users += batch.users.len();
            for draft in batch.plays {
                let ids = resolve_play_ids(sink, &draft)?;
                sink.insert_songplay(&draft.into_row(ids))?;
                delta.songplays += 1;
            }
        }
    }
    Ok(delta)
}

/// A play matches the catalog only when its song title, artist name and
/// length are all present and identify a unique song/artist pair.
fn resolve_play_ids(
    sink: &dyn WarehouseSink,
    draft: &SongplayDraft,
) -> Result<Option<(String, String)>> {
    match (&draft.song, &draft.artist, draft.length) {
        (Some(song), Some(artist), Some(length)) => sink.lookup_song_artist(song, artist, length),
        _ => Ok(None),
    }
}
