//! In-memory warehouse double.
//!
//! Records every submitted row and answers catalog lookups from the rows it
//! has seen, so pipeline behavior can be exercised without touching SQLite.

use super::models::{ArtistRow, SongRow, SongplayRow, TimeRow, UserRow};
use super::trait_def::WarehouseSink;
use anyhow::Result;
use std::sync::Mutex;

/// Rows held by a [`MemorySink`], grouped by table.
#[derive(Clone, Debug, Default)]
pub struct Rows {
    pub songs: Vec<SongRow>,
    pub artists: Vec<ArtistRow>,
    pub times: Vec<TimeRow>,
    pub users: Vec<UserRow>,
    pub songplays: Vec<SongplayRow>,
}

impl Rows {
    fn append(&mut self, other: &mut Rows) {
        self.songs.append(&mut other.songs);
        self.artists.append(&mut other.artists);
        self.times.append(&mut other.times);
        self.users.append(&mut other.users);
        self.songplays.append(&mut other.songplays);
    }
}

#[derive(Default)]
struct State {
    committed: Rows,
    pending: Rows,
    in_file: bool,
}

/// A warehouse double that keeps everything in memory.
#[derive(Default)]
pub struct MemorySink {
    state: Mutex<State>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the committed rows.
    pub fn rows(&self) -> Rows {
        self.state.lock().unwrap().committed.clone()
    }
}

impl WarehouseSink for MemorySink {
    fn insert_song(&self, row: &SongRow) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let rows = if state.in_file {
            &mut state.pending
        } else {
            &mut state.committed
        };
        rows.songs.push(row.clone());
        Ok(())
    }

    fn insert_artist(&self, row: &ArtistRow) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let rows = if state.in_file {
            &mut state.pending
        } else {
            &mut state.committed
        };
        rows.artists.push(row.clone());
        Ok(())
    }

    fn insert_time(&self, row: &TimeRow) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let rows = if state.in_file {
            &mut state.pending
        } else {
            &mut state.committed
        };
        rows.times.push(row.clone());
        Ok(())
    }

    fn insert_user(&self, row: &UserRow) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let rows = if state.in_file {
            &mut state.pending
        } else {
            &mut state.committed
        };
        rows.users.push(row.clone());
        Ok(())
    }

    fn insert_songplay(&self, row: &SongplayRow) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let rows = if state.in_file {
            &mut state.pending
        } else {
            &mut state.committed
        };
        rows.songplays.push(row.clone());
        Ok(())
    }

    fn lookup_song_artist(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<Option<(String, String)>> {
        let state = self.state.lock().unwrap();
        let songs = state
            .committed
            .songs
            .iter()
            .chain(state.pending.songs.iter());
        let artist_name_of = |artist_id: &str| -> Option<String> {
            state
                .committed
                .artists
                .iter()
                .chain(state.pending.artists.iter())
                .find(|a| a.artist_id == artist_id)
                .map(|a| a.name.clone())
        };

        let mut matches = songs.filter(|s| {
            s.title == title
                && s.duration == duration
                && artist_name_of(&s.artist_id).as_deref() == Some(artist_name)
        });

        let first = match matches.next() {
            Some(song) => (song.song_id.clone(), song.artist_id.clone()),
            None => return Ok(None),
        };
        if matches.next().is_some() {
            return Ok(None);
        }
        Ok(Some(first))
    }

    fn begin_file(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.in_file = true;
        Ok(())
    }

    fn commit_file(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let mut pending = std::mem::take(&mut state.pending);
        state.committed.append(&mut pending);
        state.in_file = false;
        Ok(())
    }

    fn rollback_file(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.pending = Rows::default();
        state.in_file = false;
        Ok(())
    }
}
