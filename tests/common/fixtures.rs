//! Test fixture creation for source trees and the warehouse database.

use anyhow::Result;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Creates a temp directory holding the conventional source layout:
/// `song_data/` and `log_data/` roots plus a path for the warehouse file.
/// Returns (temp_dir, song_data, log_data, warehouse_db).
pub fn create_workspace() -> Result<(TempDir, PathBuf, PathBuf, PathBuf)> {
    let dir = TempDir::new()?;
    let song_data = dir.path().join("data/song_data");
    let log_data = dir.path().join("data/log_data");
    fs::create_dir_all(&song_data)?;
    fs::create_dir_all(&log_data)?;
    let warehouse_db = dir.path().join("warehouse.db");
    Ok((dir, song_data, log_data, warehouse_db))
}

/// Writes one song catalog file under `root`, nested the way the real
/// dataset nests them.
pub fn write_song_file(
    root: &Path,
    song_id: &str,
    title: &str,
    artist_id: &str,
    artist_name: &str,
    year: i32,
    duration: f64,
) -> Result<()> {
    let path = root.join(format!("{}/{}.json", &artist_id[..1], song_id));
    fs::create_dir_all(path.parent().unwrap())?;
    let record = serde_json::json!({
        "song_id": song_id,
        "title": title,
        "artist_id": artist_id,
        "artist_name": artist_name,
        "artist_location": "",
        "artist_latitude": null,
        "artist_longitude": null,
        "year": year,
        "duration": duration,
    });
    fs::write(path, format!("{}\n", record))?;
    Ok(())
}

/// A single play event line; `page` controls whether the loader keeps it.
pub fn event_line(ts: i64, page: &str, user_id: &str, song: &str, artist: &str, length: f64) -> String {
    serde_json::json!({
        "ts": ts,
        "page": page,
        "userId": user_id,
        "firstName": "Ryan",
        "lastName": "Smith",
        "gender": "M",
        "level": "free",
        "song": song,
        "artist": artist,
        "length": length,
        "sessionId": 583,
        "location": "San Jose-Sunnyvale-Santa Clara, CA",
        "userAgent": "Mozilla/5.0"
    })
    .to_string()
}

/// Writes one event log file under `root` from pre-rendered lines.
pub fn write_event_file(root: &Path, name: &str, lines: &[String]) -> Result<()> {
    let path = root.join(name);
    fs::create_dir_all(path.parent().unwrap())?;
    fs::write(path, format!("{}\n", lines.join("\n")))?;
    Ok(())
}

/// Counts the rows of a warehouse table through a fresh connection.
pub fn count_rows(db_path: &Path, table: &str) -> i64 {
    let conn = Connection::open(db_path).unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
        .unwrap()
}
