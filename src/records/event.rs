//! Play event log extraction.

use super::ExtractError;
use crate::warehouse::{SongplayRow, TimeRow, UserRow};
use chrono::{DateTime, Datelike, Timelike};
use serde::{Deserialize, Deserializer};

/// Only events from this page describe an actual play; everything else
/// (Home, Login, logout traffic and so on) is discarded.
const NEXT_SONG_PAGE: &str = "NextSong";

/// One raw play event record.
///
/// `ts` and `page` are the only structurally load-bearing fields: a record
/// without a `page` match is discarded, a retained record without a usable
/// `ts` fails the file. Everything else propagates as null when absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayEventRecord {
    #[serde(default)]
    pub ts: Option<i64>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub song: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub session_id: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

// The logs are inconsistent about user ids: some exports carry them as JSON
// numbers, others as strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}

/// A songplay fact row before catalog resolution: the row fields plus the
/// (song, artist, length) triple the pipeline matches against the catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct SongplayDraft {
    pub start_time: i64,
    pub user_id: Option<String>,
    pub level: Option<String>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
}

impl SongplayDraft {
    /// Completes the fact row with the resolved catalog ids, or nulls when
    /// there was no match.
    pub fn into_row(self, ids: Option<(String, String)>) -> SongplayRow {
        let (song_id, artist_id) = match ids {
            Some((song_id, artist_id)) => (Some(song_id), Some(artist_id)),
            None => (None, None),
        };
        SongplayRow {
            start_time: self.start_time,
            user_id: self.user_id,
            level: self.level,
            song_id,
            artist_id,
            session_id: self.session_id,
            location: self.location,
            user_agent: self.user_agent,
        }
    }
}

/// The rows produced from one event log file. The three lists are derived
/// from the same filtered record set and keep source order, so their
/// lengths always match.
#[derive(Debug, Default)]
pub struct EventBatch {
    pub times: Vec<TimeRow>,
    pub users: Vec<UserRow>,
    pub plays: Vec<SongplayDraft>,
}

/// Parses an event log file into time, user and songplay rows.
///
/// Every non-empty line must be a valid JSON record; only records whose
/// `page` is `"NextSong"` contribute rows.
pub fn extract_event_file(text: &str) -> Result<EventBatch, ExtractError> {
    let mut batch = EventBatch::default();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let line_number = index + 1;
        let record: PlayEventRecord = serde_json::from_str(line).map_err(|source| {
            ExtractError::Json {
                line: line_number,
                source,
            }
        })?;

        if record.page.as_deref() != Some(NEXT_SONG_PAGE) {
            continue;
        }

        let ts = record
            .ts
            .ok_or(ExtractError::BadTimestamp { line: line_number })?;
        let time = decompose_timestamp(ts)
            .ok_or(ExtractError::BadTimestamp { line: line_number })?;

        batch.times.push(time);
        batch.users.push(UserRow {
            user_id: record.user_id.clone(),
            first_name: record.first_name,
            last_name: record.last_name,
            gender: record.gender,
            level: record.level.clone(),
        });
        batch.plays.push(SongplayDraft {
            start_time: ts,
            user_id: record.user_id,
            level: record.level,
            session_id: record.session_id,
            location: record.location,
            user_agent: record.user_agent,
            song: record.song,
            artist: record.artist,
            length: record.length,
        });
    }

    Ok(batch)
}

/// Decomposes an epoch-millisecond timestamp into calendar fields.
///
/// The raw value is decomposed as-is with no timezone conversion, matching
/// how the logs have always been interpreted. Week is the ISO week of the
/// year, weekday is zero-based with Monday = 0.
fn decompose_timestamp(ts_millis: i64) -> Option<TimeRow> {
    let datetime = DateTime::from_timestamp_millis(ts_millis)?.naive_utc();
    Some(TimeRow {
        start_time: ts_millis,
        hour: datetime.hour(),
        day: datetime.day(),
        week: datetime.iso_week().week(),
        month: datetime.month(),
        year: datetime.year(),
        weekday: datetime.weekday().num_days_from_monday(),
    })
}
