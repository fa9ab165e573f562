mod table;

pub use table::{Column, Schema, SqlType, Table};
