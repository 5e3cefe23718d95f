//! mae-ingest: maps loosely-typed statement rows from the parsing service
//! into canonical transactions.

pub mod types;
pub mod lookup;
pub mod rules;
pub mod mapper;

pub use types::{RawRow, RawValue};
pub use mapper::{MappedRows, map_row, map_rows};
