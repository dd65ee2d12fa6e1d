//! Data ingestion and export
//!
//! Loading game sheets into records and writing derived tables back out.

pub mod export;
pub mod source;

pub use export::OutputFormat;
pub use source::{CsvSource, GameSource, LoadedGames};
