//! Timestamp resolution
//!
//! Every file gets a canonical 14-digit timestamp. Movies use the earliest
//! filesystem time; photos additionally consult the EXIF capture time, and a
//! disagreement between the two is resolved by the configured policy.

pub mod exif;

use crate::config::{Config, MismatchPolicy};
use crate::error::{Error, Result};
use chrono::{DateTime, Datelike, Local, NaiveDateTime};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Canonical `YYYYMMDDHHMMSS` timestamp
///
/// Invariant: the compact form is always exactly 14 ASCII digits. Used both
/// for mismatch comparison and as the basis of destination filenames.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    compact: String,
}

impl Timestamp {
    /// Build from a datetime, validating the 14-digit invariant
    ///
    /// Years outside 1000..=9999 cannot form a plausible 4-digit prefix and
    /// are rejected.
    pub fn from_datetime(dt: NaiveDateTime) -> Result<Self> {
        let compact = dt.format("%Y%m%d%H%M%S").to_string();
        if !(1000..=9999).contains(&dt.year())
            || compact.len() != 14
            || !compact.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(Error::MissingTimestamp(compact));
        }
        Ok(Self { compact })
    }

    /// The 14-digit `YYYYMMDDHHMMSS` form
    pub fn compact(&self) -> &str {
        &self.compact
    }

    /// First four digits of the compact form
    pub fn year(&self) -> &str {
        &self.compact[..4]
    }

    /// Parse the compact form back into a datetime
    pub fn to_datetime(&self) -> Result<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.compact, "%Y%m%d%H%M%S")
            .map_err(|_| Error::MissingTimestamp(self.compact.clone()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.compact)
    }
}

/// Result of timestamp resolution for one file
#[derive(Debug, Clone)]
pub enum Resolution {
    /// A single canonical timestamp was agreed on
    Resolved(Timestamp),
    /// EXIF and filesystem time disagree and no forcing policy applies
    Mismatch { exif: Timestamp, fs: Timestamp },
}

/// Derive the filesystem timestamp: the earlier of modification time and
/// status-change time, formatted as local time
///
/// A freshly imported file's mtime usually reflects original creation, but a
/// transfer across filesystems can leave ctime earlier and more trustworthy.
pub fn fs_time(path: &Path) -> Result<Timestamp> {
    let metadata = fs::metadata(path)?;
    let mut earliest = metadata.modified()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        if metadata.ctime() >= 0 {
            let changed = std::time::UNIX_EPOCH
                + std::time::Duration::new(metadata.ctime() as u64, metadata.ctime_nsec() as u32);
            if changed < earliest {
                debug!(?path, "ctime earlier than mtime, using ctime");
                earliest = changed;
            }
        }
    }

    let local: DateTime<Local> = earliest.into();
    Timestamp::from_datetime(local.naive_local())
}

/// Resolve the canonical timestamp for a candidate file
///
/// Movies never carry EXIF and use the filesystem time directly. For photos,
/// an absent EXIF capture time falls back silently to the filesystem time;
/// when both are present and disagree, the configured mismatch policy decides.
pub fn resolve(path: &Path, is_photo: bool, config: &Config) -> Result<Resolution> {
    let fs_ts = fs_time(path)?;

    if !is_photo {
        return Ok(Resolution::Resolved(fs_ts));
    }

    let exif_ts = exif::capture_time(path)?;
    if exif_ts.is_none() {
        debug!(?path, "no EXIF capture time, using filesystem time");
    }
    Ok(reconcile(exif_ts, fs_ts, config.mismatch))
}

/// Reconcile an optional EXIF timestamp with the filesystem timestamp
fn reconcile(exif: Option<Timestamp>, fs: Timestamp, policy: MismatchPolicy) -> Resolution {
    let Some(exif) = exif else {
        return Resolution::Resolved(fs);
    };

    if exif == fs {
        return Resolution::Resolved(exif);
    }

    match policy {
        MismatchPolicy::UseExif => Resolution::Resolved(exif),
        MismatchPolicy::UseMtime => Resolution::Resolved(fs),
        MismatchPolicy::Skip => Resolution::Mismatch { exif, fs },
    }
}
