//! Song catalog file extraction.

use super::ExtractError;
use crate::warehouse::{ArtistRow, SongRow};
use serde::Deserialize;

/// One song catalog record. Each catalog file embeds exactly one song and
/// its artist; the identity fields are required, the artist's location and
/// coordinates are frequently null or absent.
#[derive(Debug, Deserialize)]
pub struct SongCatalogRecord {
    pub song_id: String,
    pub title: String,
    pub year: i32,
    pub duration: f64,
    pub artist_id: String,
    pub artist_name: String,
    #[serde(default)]
    pub artist_location: Option<String>,
    #[serde(default)]
    pub artist_latitude: Option<f64>,
    #[serde(default)]
    pub artist_longitude: Option<f64>,
}

/// The rows produced from one song catalog file.
#[derive(Debug)]
pub struct SongBatch {
    pub song: SongRow,
    pub artist: ArtistRow,
}

/// Parses a song catalog file into one song row and one artist row.
///
/// The file is newline-delimited JSON carrying a single record; only the
/// first record is read. A file with no records, malformed JSON, or a
/// missing required field fails extraction.
pub fn extract_song_file(text: &str) -> Result<SongBatch, ExtractError> {
    let (line_number, line) = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .find(|(_, line)| !line.is_empty())
        .ok_or(ExtractError::NoRecords)?;

    let record: SongCatalogRecord = serde_json::from_str(line).map_err(|source| {
        ExtractError::Json {
            line: line_number,
            source,
        }
    })?;

    Ok(SongBatch {
        song: SongRow {
            song_id: record.song_id,
            title: record.title,
            artist_id: record.artist_id.clone(),
            year: record.year,
            duration: record.duration,
        },
        artist: ArtistRow {
            artist_id: record.artist_id,
            name: record.artist_name,
            location: record.artist_location,
            latitude: record.artist_latitude,
            longitude: record.artist_longitude,
        },
    })
}
