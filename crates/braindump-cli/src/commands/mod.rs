pub mod config;
pub mod render;
pub mod replay;
pub mod toggle;

use std::path::PathBuf;

use braindump_core::{CoreError, FileStore};

/// Settings store at `path`, or at the default location.
pub fn open_store(path: Option<PathBuf>) -> Result<FileStore, CoreError> {
    match path {
        Some(path) => Ok(FileStore::new(path)),
        None => Ok(FileStore::default_location()?),
    }
}
