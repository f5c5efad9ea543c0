// Utility functions
use crate::model::FileError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Reads and decodes a JSON file.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, FileError> {
    let content = fs::read_to_string(path).map_err(|source| FileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| FileError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `data` as 2-space indented JSON, creating parent directories.
/// Non-ASCII text is written as-is.
pub fn write_json_file<T: Serialize>(path: &Path, data: &T) -> Result<(), FileError> {
    let io_err = |source| FileError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let body = serde_json::to_string_pretty(data).map_err(|source| FileError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, body).map_err(io_err)
}
