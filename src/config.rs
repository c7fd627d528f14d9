//! Configuration types for snapsort

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Policy for resolving a disagreement between the EXIF capture time
/// and the filesystem time
///
/// Set from the config file or via the `--use-exif`/`--use-mtime` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MismatchPolicy {
    /// Leave the file in place and report both values
    #[default]
    Skip,
    /// Trust the EXIF capture time
    UseExif,
    /// Trust the filesystem time
    UseMtime,
}

/// Configuration for a snapsort run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the files to organize; year subdirectories are
    /// created directly under it
    pub dir: PathBuf,

    /// How to resolve EXIF/filesystem timestamp disagreements
    pub mismatch: MismatchPolicy,

    /// Dry run mode - don't create directories or move files
    pub dry_run: bool,

    /// Verbose output
    pub verbose: bool,

    /// Extensions treated as photos (EXIF is consulted)
    pub photo_extensions: Vec<String>,

    /// Extensions treated as movies (filesystem time only)
    pub movie_extensions: Vec<String>,

    /// Filenames matching any of these regexes are ignored without a
    /// diagnostic (the tool's own artifacts: logs, config files)
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            mismatch: MismatchPolicy::default(),
            dry_run: false,
            verbose: false,
            photo_extensions: vec!["jpg".into(), "jpeg".into(), "png".into()],
            movie_extensions: vec![
                "mpg".into(),
                "mpeg".into(),
                "mov".into(),
                "avi".into(),
            ],
            ignore_patterns: vec![r"\.log$".into(), r"\.toml$".into()],
        }
    }
}

impl Config {
    /// Check if a file extension is a photo format
    pub fn is_photo(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.photo_extensions.iter().any(|e| e == &ext_lower)
    }

    /// Check if a file extension is a movie format
    pub fn is_movie(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.movie_extensions.iter().any(|e| e == &ext_lower)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# snapsort configuration file
# This file uses TOML format (https://toml.io)

# Directory holding the files to organize.
# Year subdirectories (e.g. "2012/") are created directly under it.
dir = "/data/photos/inbox"

# Mismatch policy: "skip", "use-exif", or "use-mtime"
# - skip: leave the file in place and report both values (default)
# - use-exif: trust the EXIF capture time
# - use-mtime: trust the filesystem time
mismatch = "skip"

# Dry run mode - show what would be done without doing it
dry_run = false

# Verbose output
verbose = false

# Extensions treated as photos (EXIF capture time is consulted)
photo_extensions = ["jpg", "jpeg", "png"]

# Extensions treated as movies (filesystem time only)
movie_extensions = ["mpg", "mpeg", "mov", "avi"]

# Filenames matching any of these regexes are ignored silently
ignore_patterns = ['\.log$', '\.toml$']
"#
        .to_string()
    }
}

/// Errors that can occur when loading configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}
