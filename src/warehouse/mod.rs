//! Warehouse sink: the star schema and the stores that receive rows.

mod memory_sink;
mod models;
pub mod schema;
mod sqlite_warehouse;
mod trait_def;

pub use memory_sink::{MemorySink, Rows};
pub use models::{ArtistRow, SongRow, SongplayRow, TimeRow, UserRow};
pub use sqlite_warehouse::SqliteWarehouse;
pub use trait_def::WarehouseSink;
