//! End-to-end sweeps over temp source trees into a real SQLite warehouse.

mod common;

use common::fixtures::{
    count_rows, create_workspace, event_line, write_event_file, write_song_file,
};
use playmart::pipeline::{self, PipelineConfig};
use playmart::warehouse::SqliteWarehouse;
use rusqlite::Connection;

fn run_sweep(
    song_data: std::path::PathBuf,
    log_data: std::path::PathBuf,
    warehouse_db: &std::path::Path,
    fail_fast: bool,
) -> anyhow::Result<pipeline::ImportStats> {
    let warehouse = SqliteWarehouse::open(warehouse_db)?;
    pipeline::run(
        &warehouse,
        &PipelineConfig {
            song_data,
            log_data,
            fail_fast,
        },
    )
}

#[test]
fn test_empty_trees_load_nothing() {
    let (_dir, song_data, log_data, warehouse_db) = create_workspace().unwrap();

    let stats = run_sweep(song_data, log_data, &warehouse_db, false).unwrap();

    assert_eq!(stats.files_found, 0);
    for table in ["songs", "artists", "time", "users", "songplays"] {
        assert_eq!(count_rows(&warehouse_db, table), 0, "table {}", table);
    }
}

#[test]
fn test_page_filter_controls_all_three_tables() {
    let (_dir, song_data, log_data, warehouse_db) = create_workspace().unwrap();
    write_event_file(
        &log_data,
        "2018/11/events.json",
        &[
            event_line(1541903636796, "NextSong", "26", "X", "Y", 180.5),
            event_line(1541903700000, "Login", "26", "X", "Y", 180.5),
            event_line(1541990000000, "NextSong", "26", "Z", "W", 99.0),
        ],
    )
    .unwrap();

    let stats = run_sweep(song_data, log_data, &warehouse_db, false).unwrap();

    assert_eq!(stats.times, 2);
    assert_eq!(stats.users, 2);
    assert_eq!(stats.songplays, 2);
    assert_eq!(count_rows(&warehouse_db, "time"), 2);
    // Both retained events came from the same user.
    assert_eq!(count_rows(&warehouse_db, "users"), 1);
    assert_eq!(count_rows(&warehouse_db, "songplays"), 2);
}

#[test]
fn test_plays_resolve_against_loaded_catalog() {
    let (_dir, song_data, log_data, warehouse_db) = create_workspace().unwrap();
    write_song_file(&song_data, "S1", "X", "A1", "Y", 2000, 180.5).unwrap();
    write_song_file(&song_data, "S2", "Other", "A2", "Someone", 1999, 211.0).unwrap();
    write_event_file(
        &log_data,
        "2018/11/events.json",
        &[
            event_line(1541903636796, "NextSong", "26", "X", "Y", 180.5),
            event_line(1541990000000, "NextSong", "26", "X", "Y", 123.0),
        ],
    )
    .unwrap();

    let stats = run_sweep(song_data, log_data, &warehouse_db, false).unwrap();
    assert_eq!(stats.songs, 2);
    assert_eq!(stats.artists, 2);
    assert_eq!(stats.songplays, 2);

    let conn = Connection::open(&warehouse_db).unwrap();
    let resolved: (Option<String>, Option<String>) = conn
        .query_row(
            "SELECT song_id, artist_id FROM songplays WHERE start_time = 1541903636796",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(resolved.0.as_deref(), Some("S1"));
    assert_eq!(resolved.1.as_deref(), Some("A1"));

    // Same title and artist but a different length must not match.
    let unresolved: (Option<String>, Option<String>) = conn
        .query_row(
            "SELECT song_id, artist_id FROM songplays WHERE start_time = 1541990000000",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(unresolved, (None, None));
}

#[test]
fn test_rerun_keeps_dimensions_stable() {
    let (_dir, song_data, log_data, warehouse_db) = create_workspace().unwrap();
    write_song_file(&song_data, "S1", "X", "A1", "Y", 2000, 180.5).unwrap();
    write_event_file(
        &log_data,
        "events.json",
        &[event_line(1541903636796, "NextSong", "26", "X", "Y", 180.5)],
    )
    .unwrap();

    run_sweep(song_data.clone(), log_data.clone(), &warehouse_db, false).unwrap();
    run_sweep(song_data, log_data, &warehouse_db, false).unwrap();

    assert_eq!(count_rows(&warehouse_db, "songs"), 1);
    assert_eq!(count_rows(&warehouse_db, "artists"), 1);
    assert_eq!(count_rows(&warehouse_db, "time"), 1);
    assert_eq!(count_rows(&warehouse_db, "users"), 1);
    // The fact table appends; duplicate handling for facts is not a
    // dimension concern.
    assert_eq!(count_rows(&warehouse_db, "songplays"), 2);
}

#[test]
fn test_bad_file_is_isolated_from_the_rest_of_the_sweep() {
    let (_dir, song_data, log_data, warehouse_db) = create_workspace().unwrap();
    write_song_file(&song_data, "S1", "X", "A1", "Y", 2000, 180.5).unwrap();
    std::fs::write(song_data.join("broken.json"), "{not json\n").unwrap();
    write_event_file(
        &log_data,
        "events.json",
        &[event_line(1541903636796, "NextSong", "26", "X", "Y", 180.5)],
    )
    .unwrap();

    let stats = run_sweep(song_data, log_data, &warehouse_db, false).unwrap();

    assert_eq!(stats.errors, 1);
    assert_eq!(stats.files_found, 3);
    assert_eq!(stats.files_processed, 2);
    assert_eq!(count_rows(&warehouse_db, "songs"), 1);
    assert_eq!(count_rows(&warehouse_db, "songplays"), 1);
}

#[test]
fn test_fail_fast_aborts_and_rolls_back_the_failing_file() {
    let (_dir, song_data, log_data, warehouse_db) = create_workspace().unwrap();
    std::fs::write(song_data.join("broken.json"), "{not json\n").unwrap();

    let result = run_sweep(song_data, log_data, &warehouse_db, true);

    assert!(result.is_err());
    assert_eq!(count_rows(&warehouse_db, "songs"), 0);
    assert_eq!(count_rows(&warehouse_db, "artists"), 0);
}

#[test]
fn test_level_change_updates_user_dimension() {
    let (_dir, song_data, log_data, warehouse_db) = create_workspace().unwrap();
    let free = event_line(1541903636796, "NextSong", "26", "X", "Y", 180.5);
    let paid = event_line(1541990000000, "NextSong", "26", "Z", "W", 99.0)
        .replace("\"free\"", "\"paid\"");
    write_event_file(&log_data, "events.json", &[free, paid]).unwrap();

    run_sweep(song_data, log_data, &warehouse_db, false).unwrap();

    assert_eq!(count_rows(&warehouse_db, "users"), 1);
    let conn = Connection::open(&warehouse_db).unwrap();
    let level: String = conn
        .query_row("SELECT level FROM users WHERE user_id = '26'", [], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(level, "paid");
}

#[test]
fn test_time_rows_carry_decomposed_calendar_fields() {
    let (_dir, song_data, log_data, warehouse_db) = create_workspace().unwrap();
    write_event_file(
        &log_data,
        "events.json",
        &[event_line(1541903636796, "NextSong", "26", "X", "Y", 180.5)],
    )
    .unwrap();

    run_sweep(song_data, log_data, &warehouse_db, false).unwrap();

    let conn = Connection::open(&warehouse_db).unwrap();
    let row: (i64, i64, i64, i64, i64, i64, i64) = conn
        .query_row(
            "SELECT start_time, hour, day, week, month, year, weekday FROM time",
            [],
            |r| {
                Ok((
                    r.get(0)?,
                    r.get(1)?,
                    r.get(2)?,
                    r.get(3)?,
                    r.get(4)?,
                    r.get(5)?,
                    r.get(6)?,
                ))
            },
        )
        .unwrap();
    // 2018-11-11T02:33:56.796, a Sunday in ISO week 45.
    assert_eq!(row, (1541903636796, 2, 11, 45, 11, 2018, 6));
}
