//! Error types for snapsort
//!
//! Only run-aborting conditions live here. Expected per-file outcomes
//! (unrecognized extension, timestamp mismatch, duplicate) are not errors;
//! they are reported as [`crate::process::Outcome`] variants and processing
//! continues with the next file.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for snapsort operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for snapsort
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed EXIF timestamp in {path}: {value:?} (expected \"YYYY:MM:DD HH:MM:SS\")")]
    MalformedExifTimestamp { path: PathBuf, value: String },

    #[error("Timestamp resolved to an invalid value: {0:?}")]
    MissingTimestamp(String),

    #[error("Year directory {path} did not exist after creation attempt")]
    YearDirMissing { path: PathBuf },

    #[error("Cannot rename {occupant} to {target}: target already exists")]
    RenameCollision { occupant: PathBuf, target: PathBuf },

    #[error("File hash computation failed for {path}: {message}")]
    HashComputation { path: PathBuf, message: String },

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),
}
