//! Source record parsing and extraction.
//!
//! Extractors are pure functions from file text to row batches; resolving
//! catalog foreign keys and submitting rows is the pipeline's job.

mod event;
mod song;

use thiserror::Error;

pub use event::{extract_event_file, EventBatch, PlayEventRecord, SongplayDraft};
pub use song::{extract_song_file, SongBatch, SongCatalogRecord};

/// Errors that can occur while extracting rows from a source file.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no records in file, expected one JSON object")]
    NoRecords,

    #[error("invalid JSON on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("record on line {line} has a missing or out-of-range timestamp")]
    BadTimestamp { line: usize },
}
