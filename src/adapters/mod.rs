//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external systems:
//! - `sqlite`: SQLite project database
//! - `pages`: scraped pages cached on disk
//! - `params_file`: JSON parameters exported by the training pipeline

pub mod pages;
pub mod params_file;
pub mod sqlite;

pub use pages::CachedPageSource;
pub use params_file::{JsonParameterFile, ParameterError};
pub use sqlite::{SqliteProjectStore, StorageError};
