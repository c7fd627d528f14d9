//! snapsort - files photos and movies into year directories by capture time
//!
//! This library provides functionality for organizing a flat directory of
//! media files with support for:
//! - EXIF capture-time extraction for photos
//! - Filesystem-time fallback (earliest of mtime and ctime)
//! - Canonical 14-digit timestamp filenames
//! - SHA-256 duplicate detection on destination collisions
//! - Retroactive renaming for consistent collision numbering

pub mod cli;
pub mod config;
pub mod error;
pub mod hash;
pub mod place;
pub mod process;
pub mod scan;
pub mod time;

pub use cli::Cli;
pub use config::{Config, ConfigError, MismatchPolicy};
pub use error::{Error, Result};
pub use process::{FileResult, Outcome, Processor, Stats};
