//! SQLite-backed warehouse implementation.

use super::models::{ArtistRow, SongRow, SongplayRow, TimeRow, UserRow};
use super::schema::WAREHOUSE_SCHEMA;
use super::trait_def::WarehouseSink;
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

/// SQLite-backed warehouse.
///
/// A fresh database file gets the star schema created on open; an existing
/// one (including a database created externally) is validated against the
/// declared table definitions instead.
#[derive(Clone)]
pub struct SqliteWarehouse {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteWarehouse {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path.as_ref()).with_context(|| {
            format!("Failed to open warehouse database {}", db_path.as_ref().display())
        })?;
        Self::from_connection(conn)
    }

    /// In-memory warehouse, mostly useful in tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let table_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
                [],
                |r| r.get(0),
            )
            .unwrap_or(0);

        if table_count == 0 {
            info!("Creating warehouse schema");
            WAREHOUSE_SCHEMA.create(&conn)?;
        } else {
            WAREHOUSE_SCHEMA
                .validate(&conn)
                .context("Existing warehouse database does not match the expected schema")?;
        }

        Ok(SqliteWarehouse {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

impl WarehouseSink for SqliteWarehouse {
    fn insert_song(&self, row: &SongRow) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO songs (song_id, title, artist_id, year, duration) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![row.song_id, row.title, row.artist_id, row.year, row.duration],
        )
        .with_context(|| format!("Failed to insert song {}", row.song_id))?;
        Ok(())
    }

    fn insert_artist(&self, row: &ArtistRow) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO artists (artist_id, name, location, latitude, longitude) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                row.artist_id,
                row.name,
                row.location,
                row.latitude,
                row.longitude
            ],
        )
        .with_context(|| format!("Failed to insert artist {}", row.artist_id))?;
        Ok(())
    }

    fn insert_time(&self, row: &TimeRow) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO time (start_time, hour, day, week, month, year, weekday) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                row.start_time,
                row.hour,
                row.day,
                row.week,
                row.month,
                row.year,
                row.weekday
            ],
        )
        .with_context(|| format!("Failed to insert time row for {}", row.start_time))?;
        Ok(())
    }

    fn insert_user(&self, row: &UserRow) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users (user_id, first_name, last_name, gender, level) \
             VALUES (?1, ?2, ?3, ?4, ?5) \
             ON CONFLICT(user_id) DO UPDATE SET level = excluded.level",
            params![
                row.user_id,
                row.first_name,
                row.last_name,
                row.gender,
                row.level
            ],
        )
        .with_context(|| format!("Failed to insert user {:?}", row.user_id))?;
        Ok(())
    }

    fn insert_songplay(&self, row: &SongplayRow) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO songplays \
             (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                row.start_time,
                row.user_id,
                row.level,
                row.song_id,
                row.artist_id,
                row.session_id,
                row.location,
                row.user_agent
            ],
        )
        .with_context(|| format!("Failed to insert songplay at {}", row.start_time))?;
        Ok(())
    }

    fn lookup_song_artist(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<Option<(String, String)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT s.song_id, s.artist_id FROM songs s \
             JOIN artists a ON a.artist_id = s.artist_id \
             WHERE s.title = ?1 AND a.name = ?2 AND s.duration = ?3 \
             LIMIT 2",
        )?;
        let mut rows = stmt.query_map(params![title, artist_name, duration], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let first = match rows.next() {
            Some(row) => row?,
            None => return Ok(None),
        };
        // More than one hit means the triple is ambiguous, which counts as
        // no match.
        if rows.next().is_some() {
            return Ok(None);
        }
        Ok(Some(first))
    }

    fn begin_file(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch("BEGIN")
            .context("Failed to begin file transaction")?;
        Ok(())
    }

    fn commit_file(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch("COMMIT")
            .context("Failed to commit file transaction")?;
        Ok(())
    }

    fn rollback_file(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch("ROLLBACK")
            .context("Failed to roll back file transaction")?;
        Ok(())
    }
}
