//! Sequential file processor
//!
//! Drives scan -> resolve -> place for each file in the working directory,
//! one at a time. Expected per-file conditions become reported outcomes and
//! processing continues; invariant violations propagate as errors and abort
//! the run before any file can be misplaced.

use crate::config::Config;
use crate::error::Result;
use crate::place::{self, Placement};
use crate::scan::{FileKind, Scanner};
use crate::time::{self, Resolution};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of processing a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// File was moved to its destination
    Moved,
    /// Dry run: destination computed, nothing touched
    WouldMove,
    /// Identical content already present in destination
    Duplicate,
    /// EXIF and filesystem time disagree and no forcing flag was given
    Mismatch,
    /// Extension is not a photo or movie
    Unrecognized,
}

/// Result of processing a single file
#[derive(Debug, Clone)]
pub struct FileResult {
    /// Source file path
    pub source: PathBuf,
    /// Destination path (for moved files)
    pub destination: Option<PathBuf>,
    /// What happened
    pub outcome: Outcome,
    /// Retroactive rename performed to free the bare slot, if any
    pub renamed_original: Option<(PathBuf, PathBuf)>,
    /// Human-readable decision line
    pub line: String,
}

/// Run counters
#[derive(Debug, Default, Clone)]
pub struct Stats {
    pub total: usize,
    pub moved: usize,
    pub skipped: usize,
    pub duplicates: usize,
    pub renamed_originals: usize,
}

impl Stats {
    pub fn summary(&self) -> String {
        format!(
            "Total: {}, Moved: {}, Skipped: {}, Duplicates: {}, Renamed originals: {}",
            self.total, self.moved, self.skipped, self.duplicates, self.renamed_originals
        )
    }
}

/// Sequential processor for one directory
pub struct Processor {
    config: Config,
    scanner: Scanner,
    stats: Stats,
}

impl Processor {
    pub fn new(config: Config) -> Result<Self> {
        let scanner = Scanner::new(&config)?;
        Ok(Self {
            config,
            scanner,
            stats: Stats::default(),
        })
    }

    /// Process every candidate in the configured directory
    pub fn run(&mut self) -> Result<Vec<FileResult>> {
        info!(dir = %self.config.dir.display(), "scanning");
        let candidates = self.scanner.scan(&self.config.dir)?;
        info!(count = candidates.len(), "found candidate files");

        let mut results = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            self.stats.total += 1;
            let name = display_name(&candidate.path);

            if candidate.kind == FileKind::Unrecognized {
                warn!(path = %candidate.path.display(), "not a photo or movie");
                self.stats.skipped += 1;
                results.push(FileResult {
                    line: format!("{}: not a photo or movie, skipping...", name),
                    source: candidate.path,
                    destination: None,
                    outcome: Outcome::Unrecognized,
                    renamed_original: None,
                });
                continue;
            }

            let is_photo = candidate.kind == FileKind::Photo;
            let timestamp = match time::resolve(&candidate.path, is_photo, &self.config)? {
                Resolution::Resolved(ts) => ts,
                Resolution::Mismatch { exif, fs } => {
                    warn!(
                        path = %candidate.path.display(),
                        %exif, %fs,
                        "exif/mtime mismatch, leaving file in place"
                    );
                    self.stats.skipped += 1;
                    results.push(FileResult {
                        line: format!("{}: exif/mtime mismatch: {} != {}", name, exif, fs),
                        source: candidate.path,
                        destination: None,
                        outcome: Outcome::Mismatch,
                        renamed_original: None,
                    });
                    continue;
                }
            };

            let extension = place::normalize_extension(&candidate.extension);
            let placement = place::place(
                &candidate.path,
                &timestamp,
                &extension,
                &self.config.dir,
                self.config.dry_run,
            )?;

            results.push(self.record(candidate.path, placement));
        }

        info!("{}", self.stats.summary());
        Ok(results)
    }

    fn record(&mut self, source: PathBuf, placement: Placement) -> FileResult {
        let name = display_name(&source);
        match placement {
            Placement::Moved(placed) => {
                self.stats.moved += 1;
                if placed.renamed_original.is_some() {
                    self.stats.renamed_originals += 1;
                }
                FileResult {
                    line: format!("{} -> {}", name, relative(&placed.dest, &self.config.dir)),
                    source,
                    destination: Some(placed.dest),
                    outcome: Outcome::Moved,
                    renamed_original: placed.renamed_original,
                }
            }
            Placement::WouldMove(placed) => {
                self.stats.moved += 1;
                if placed.renamed_original.is_some() {
                    self.stats.renamed_originals += 1;
                }
                FileResult {
                    line: format!(
                        "{} -> {} (dry run)",
                        name,
                        relative(&placed.dest, &self.config.dir)
                    ),
                    source,
                    destination: Some(placed.dest),
                    outcome: Outcome::WouldMove,
                    renamed_original: placed.renamed_original,
                }
            }
            Placement::Duplicate { existing } => {
                self.stats.duplicates += 1;
                FileResult {
                    line: format!(
                        "{} identical to {}, skipping...",
                        name,
                        relative(&existing, &self.config.dir)
                    ),
                    source,
                    destination: Some(existing),
                    outcome: Outcome::Duplicate,
                    renamed_original: None,
                }
            }
        }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base).unwrap_or(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MismatchPolicy;
    use crate::time::fs_time;
    use std::fs;
    use tempfile::TempDir;

    /// Minimal JPEG carrying an APP1 Exif segment whose IFD0 holds a single
    /// `DateTime` ASCII entry
    fn exif_jpeg(datetime: &str) -> Vec<u8> {
        assert_eq!(datetime.len(), 19);

        let mut tiff = Vec::new();
        tiff.extend_from_slice(b"II"); // little-endian
        tiff.extend_from_slice(&42u16.to_le_bytes());
        tiff.extend_from_slice(&8u32.to_le_bytes()); // IFD0 offset
        tiff.extend_from_slice(&1u16.to_le_bytes()); // one entry
        tiff.extend_from_slice(&0x0132u16.to_le_bytes()); // DateTime
        tiff.extend_from_slice(&2u16.to_le_bytes()); // ASCII
        tiff.extend_from_slice(&20u32.to_le_bytes()); // 19 chars + NUL
        tiff.extend_from_slice(&26u32.to_le_bytes()); // value offset
        tiff.extend_from_slice(&0u32.to_le_bytes()); // no next IFD
        tiff.extend_from_slice(datetime.as_bytes());
        tiff.push(0);

        let mut app1 = Vec::new();
        app1.extend_from_slice(b"Exif\0\0");
        app1.extend_from_slice(&tiff);

        let mut jpeg = vec![0xff, 0xd8];
        jpeg.extend_from_slice(&[0xff, 0xe1]);
        jpeg.extend_from_slice(&((app1.len() + 2) as u16).to_be_bytes());
        jpeg.extend_from_slice(&app1);
        jpeg.extend_from_slice(&[0xff, 0xd9]);
        jpeg
    }

    /// Set a file's mtime to the given local wall time
    fn set_mtime(path: &std::path::Path, dt: chrono::NaiveDateTime) {
        use chrono::TimeZone;
        let local = chrono::Local.from_local_datetime(&dt).earliest().unwrap();
        std::fs::OpenOptions::new()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(local.into())
            .unwrap();
    }

    fn capture_dt() -> chrono::NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2012, 7, 4)
            .unwrap()
            .and_hms_opt(18, 56, 41)
            .unwrap()
    }

    fn run_in(dir: &TempDir, adjust: impl FnOnce(&mut Config)) -> (Vec<FileResult>, Stats) {
        let mut config = Config {
            dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        adjust(&mut config);
        let mut processor = Processor::new(config).unwrap();
        let results = processor.run().unwrap();
        let stats = processor.stats().clone();
        (results, stats)
    }

    #[test]
    fn test_movie_moves_into_year_dir_with_normalized_extension() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("movie.MOV");
        fs::write(&source, b"movie bytes").unwrap();
        let expected_ts = fs_time(&source).unwrap();

        let (results, stats) = run_in(&dir, |_| {});

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].outcome, Outcome::Moved);
        let dest = results[0].destination.clone().unwrap();
        assert_eq!(
            dest,
            dir.path()
                .join(expected_ts.year())
                .join(format!("{}.mov", expected_ts.compact()))
        );
        assert!(dest.exists());
        assert!(!source.exists());
        assert_eq!(stats.moved, 1);
    }

    #[test]
    fn test_jpeg_extension_normalized_to_jpg() {
        let dir = TempDir::new().unwrap();
        // Not a real JPEG, so EXIF is absent and fs time applies
        let source = dir.path().join("pic.JPEG");
        fs::write(&source, b"\xff\xd8junk").unwrap();

        let (results, _) = run_in(&dir, |_| {});
        let dest = results[0].destination.clone().unwrap();
        assert_eq!(dest.extension().unwrap(), "jpg");
        assert!(dest.exists());
    }

    #[test]
    fn test_unrecognized_file_left_in_place() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("readme.txt");
        fs::write(&source, b"hello").unwrap();

        let (results, stats) = run_in(&dir, |_| {});

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].outcome, Outcome::Unrecognized);
        assert!(results[0].line.contains("not a photo or movie"));
        assert!(source.exists());
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.moved, 0);
        // No year directory was created
        assert_eq!(
            fs::read_dir(dir.path())
                .unwrap()
                .filter(|e| e.as_ref().unwrap().path().is_dir())
                .count(),
            0
        );
    }

    #[test]
    fn test_duplicate_import_leaves_source_untouched() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("first.mov");
        fs::write(&source, b"same content").unwrap();
        let ts = fs_time(&source).unwrap();
        let year = dir.path().join(ts.year());
        fs::create_dir(&year).unwrap();
        fs::write(year.join(format!("{}.mov", ts.compact())), b"same content").unwrap();

        let (results, stats) = run_in(&dir, |_| {});

        assert_eq!(results[0].outcome, Outcome::Duplicate);
        assert!(results[0].line.contains("identical"));
        assert!(source.exists());
        assert_eq!(stats.duplicates, 1);
        // Still only the one file in the year directory
        assert_eq!(fs::read_dir(&year).unwrap().count(), 1);
    }

    #[test]
    fn test_distinct_collision_retroactively_renames() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("second.mov");
        fs::write(&source, b"different content").unwrap();
        let ts = fs_time(&source).unwrap();
        let year = dir.path().join(ts.year());
        fs::create_dir(&year).unwrap();
        fs::write(year.join(format!("{}.mov", ts.compact())), b"original").unwrap();

        let (results, stats) = run_in(&dir, |_| {});

        assert_eq!(results[0].outcome, Outcome::Moved);
        let (from, to) = results[0].renamed_original.clone().unwrap();
        assert_eq!(from, year.join(format!("{}.mov", ts.compact())));
        assert_eq!(to, year.join(format!("{}-1.mov", ts.compact())));
        assert_eq!(
            fs::read(year.join(format!("{}-1.mov", ts.compact()))).unwrap(),
            b"original"
        );
        assert_eq!(
            fs::read(year.join(format!("{}-2.mov", ts.compact()))).unwrap(),
            b"different content"
        );
        assert_eq!(stats.renamed_originals, 1);
    }

    #[test]
    fn test_dry_run_reports_without_moving() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("clip.avi");
        fs::write(&source, b"avi bytes").unwrap();

        let (results, _) = run_in(&dir, |c| c.dry_run = true);

        assert_eq!(results[0].outcome, Outcome::WouldMove);
        assert!(source.exists());
        assert!(!results[0].destination.as_ref().unwrap().exists());
    }

    #[test]
    fn test_photo_with_agreeing_exif_moves_by_capture_time() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("photo.jpg");
        fs::write(&source, exif_jpeg("2012:07:04 18:56:41")).unwrap();
        set_mtime(&source, capture_dt());

        let (results, stats) = run_in(&dir, |_| {});

        assert_eq!(results[0].outcome, Outcome::Moved);
        let dest = dir.path().join("2012").join("20120704185641.jpg");
        assert_eq!(results[0].destination.clone().unwrap(), dest);
        assert!(dest.exists());
        assert!(!source.exists());
        assert_eq!(stats.moved, 1);
    }

    #[test]
    fn test_exif_mtime_disagreement_without_flag_leaves_file() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("photo.jpg");
        // mtime stays "now", which cannot agree with the 2012 capture time
        fs::write(&source, exif_jpeg("2012:07:04 18:56:41")).unwrap();

        let (results, stats) = run_in(&dir, |_| {});

        assert_eq!(results[0].outcome, Outcome::Mismatch);
        assert!(results[0].line.contains("mismatch"));
        assert!(results[0].line.contains("20120704185641"));
        assert!(source.exists());
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.moved, 0);
        // The mismatch diagnostic is the only effect: no directory appeared
        assert_eq!(
            fs::read_dir(dir.path())
                .unwrap()
                .filter(|e| e.as_ref().unwrap().path().is_dir())
                .count(),
            0
        );
    }

    #[test]
    fn test_forced_exif_policy_moves_despite_disagreement() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("photo.jpg");
        fs::write(&source, exif_jpeg("2012:07:04 18:56:41")).unwrap();

        let (results, _) = run_in(&dir, |c| c.mismatch = MismatchPolicy::UseExif);

        assert_eq!(results[0].outcome, Outcome::Moved);
        let dest = dir.path().join("2012").join("20120704185641.jpg");
        assert_eq!(results[0].destination.clone().unwrap(), dest);
        assert!(dest.exists());
    }

    #[test]
    fn test_forced_mtime_policy_uses_filesystem_time() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("photo.jpg");
        fs::write(&source, exif_jpeg("2012:07:04 18:56:41")).unwrap();
        let fs_ts = fs_time(&source).unwrap();

        let (results, _) = run_in(&dir, |c| c.mismatch = MismatchPolicy::UseMtime);

        assert_eq!(results[0].outcome, Outcome::Moved);
        assert_eq!(
            results[0].destination.clone().unwrap(),
            dir.path()
                .join(fs_ts.year())
                .join(format!("{}.jpg", fs_ts.compact()))
        );
    }

    #[test]
    fn test_forced_mismatch_policy_still_moves_photos() {
        // A photo with no EXIF never mismatches, so the policy only has to
        // not get in the way here
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("pic.png");
        fs::write(&source, b"\x89PNGjunk").unwrap();

        let (results, _) = run_in(&dir, |c| c.mismatch = MismatchPolicy::UseMtime);
        assert_eq!(results[0].outcome, Outcome::Moved);
    }
}
