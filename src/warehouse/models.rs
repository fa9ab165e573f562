//! Row types for the star schema.
//!
//! These are the units the extractors produce and the sinks consume. All
//! timestamps are raw epoch milliseconds; the `time` dimension carries the
//! decomposed calendar fields alongside the original value so the fact and
//! dimension tables stay joinable on `start_time`.

/// One row of the `songs` dimension.
#[derive(Clone, Debug, PartialEq)]
pub struct SongRow {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
}

/// One row of the `artists` dimension. Location may be an empty string in
/// the source data and is kept as-is; coordinates are frequently absent.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtistRow {
    pub artist_id: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// One row of the `time` dimension, derived entirely from an event
/// timestamp. Weekday is zero-based with Monday = 0; week is the ISO week
/// of the year.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeRow {
    pub start_time: i64,
    pub hour: u32,
    pub day: u32,
    pub week: u32,
    pub month: u32,
    pub year: i32,
    pub weekday: u32,
}

/// One row of the `users` dimension. Everything but the id is optional;
/// `level` may change across events for the same user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRow {
    pub user_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
}

/// One row of the `songplays` fact table. `song_id` and `artist_id` stay
/// `None` when the play could not be matched against the catalog; that is
/// expected for most plays, not an error.
#[derive(Clone, Debug, PartialEq)]
pub struct SongplayRow {
    pub start_time: i64,
    pub user_id: Option<String>,
    pub level: Option<String>,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}
