//! Directory scanning and extension classification
//!
//! Enumerates the direct entries of the working directory (no recursion) and
//! classifies each file by its lowercased extension. Entries without an
//! extension are not candidates at all; entries matching an ignore pattern
//! are dropped silently.

use crate::config::Config;
use crate::error::Result;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Classification of a candidate file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Photo: EXIF capture time is consulted
    Photo,
    /// Movie: filesystem time only
    Movie,
    /// Has an extension, but not one we handle
    Unrecognized,
}

/// A file found in the working directory
#[derive(Debug, Clone)]
pub struct Candidate {
    pub path: PathBuf,
    pub kind: FileKind,
    /// Lowercased extension, without the dot
    pub extension: String,
}

/// Scans one directory level and classifies entries
pub struct Scanner {
    config: Config,
    ignore: Vec<Regex>,
}

impl Scanner {
    pub fn new(config: &Config) -> Result<Self> {
        let ignore = config
            .ignore_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            config: config.clone(),
            ignore,
        })
    }

    /// Enumerate candidates in directory-listing order
    ///
    /// The order is filesystem-dependent; nothing downstream may assume it
    /// is sorted.
    pub fn scan(&self, dir: &Path) -> Result<Vec<Candidate>> {
        let mut candidates = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };

            let file_name = entry.file_name().to_string_lossy();
            if self.ignore.iter().any(|re| re.is_match(&file_name)) {
                debug!(?path, "ignoring own artifact");
                continue;
            }

            let extension = ext.to_lowercase();
            let kind = self.classify(&extension);
            candidates.push(Candidate {
                path: path.to_path_buf(),
                kind,
                extension,
            });
        }

        Ok(candidates)
    }

    fn classify(&self, ext_lower: &str) -> FileKind {
        if self.config.is_photo(ext_lower) {
            FileKind::Photo
        } else if self.config.is_movie(ext_lower) {
            FileKind::Movie
        } else {
            FileKind::Unrecognized
        }
    }
}
