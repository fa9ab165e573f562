//! WarehouseSink trait definition.

use super::models::{ArtistRow, SongRow, SongplayRow, TimeRow, UserRow};
use anyhow::Result;

/// Trait for warehouse storage backends.
///
/// The pipeline talks to the warehouse only through this interface, so the
/// load logic is testable against an in-memory double and the duplicate
/// handling policy stays a sink concern.
pub trait WarehouseSink: Send + Sync {
    // =========================================================================
    // Row Submission
    // =========================================================================

    /// Inserts one song dimension row. A song id seen before is the
    /// implementation's concern; dimension rows are immutable once stored.
    fn insert_song(&self, row: &SongRow) -> Result<()>;

    /// Inserts one artist dimension row.
    fn insert_artist(&self, row: &ArtistRow) -> Result<()>;

    /// Inserts one time dimension row.
    fn insert_time(&self, row: &TimeRow) -> Result<()>;

    /// Inserts one user dimension row. A repeated user id must not corrupt
    /// the identity fields; last-writer-wins on `level` is acceptable.
    fn insert_user(&self, row: &UserRow) -> Result<()>;

    /// Inserts one songplay fact row.
    fn insert_songplay(&self, row: &SongplayRow) -> Result<()>;

    // =========================================================================
    // Foreign Key Resolution
    // =========================================================================

    /// Finds the song/artist pair whose title, artist name and duration
    /// exactly match the given values.
    /// Returns Ok(None) when there is no match or the match is ambiguous.
    /// Returns Err only on a storage error.
    fn lookup_song_artist(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<Option<(String, String)>>;

    // =========================================================================
    // Per-File Transaction Boundary
    // =========================================================================

    /// Opens the transaction covering one source file's rows.
    fn begin_file(&self) -> Result<()>;

    /// Commits everything submitted since `begin_file`.
    fn commit_file(&self) -> Result<()>;

    /// Discards everything submitted since `begin_file`.
    fn rollback_file(&self) -> Result<()>;
}
