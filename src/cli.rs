//! CLI argument parsing with clap

use crate::config::{Config, MismatchPolicy};
use clap::Parser;
use std::path::PathBuf;

/// snapsort - file photos and movies into year directories by capture time
///
/// Renames each recognized file in DIR to its canonical 14-digit timestamp
/// (YYYYMMDDHHMMSS) and moves it into a year subdirectory, resolving the
/// timestamp from EXIF capture time and filesystem times.
#[derive(Parser, Debug)]
#[command(name = "snapsort")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the files to organize
    ///
    /// Year subdirectories are created directly under it. Required unless
    /// supplied through a config file.
    pub dir: Option<PathBuf>,

    /// Path to configuration file (TOML format)
    ///
    /// When specified, settings from the config file are used as defaults.
    /// CLI arguments will override config file settings.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// On EXIF/filesystem timestamp mismatch, trust the EXIF capture time
    #[arg(long, conflicts_with = "use_mtime")]
    pub use_exif: bool,

    /// On EXIF/filesystem timestamp mismatch, trust the filesystem time
    #[arg(long)]
    pub use_mtime: bool,

    /// Dry run mode - show what would be done without doing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output log format as JSON
    #[arg(long)]
    pub json_log: bool,

    /// Mirror logs to a file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Print a sample configuration file and exit
    #[arg(long)]
    pub print_sample_config: bool,
}

impl Cli {
    fn mismatch_policy(&self) -> Option<MismatchPolicy> {
        if self.use_exif {
            Some(MismatchPolicy::UseExif)
        } else if self.use_mtime {
            Some(MismatchPolicy::UseMtime)
        } else {
            None
        }
    }

    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref dir) = self.dir {
            config.dir = dir.clone();
        }
        if let Some(policy) = self.mismatch_policy() {
            config.mismatch = policy;
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if self.verbose {
            config.verbose = true;
        }

        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        let mut config = Config::default();

        if let Some(ref dir) = self.dir {
            config.dir = dir.clone();
        }
        if let Some(policy) = self.mismatch_policy() {
            config.mismatch = policy;
        }
        config.dry_run = self.dry_run;
        config.verbose = self.verbose;

        config
    }
}
