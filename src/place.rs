//! Collision-safe placement of files into year directories
//!
//! Destinations are named `YYYYMMDDHHMMSS[-N].ext`. The first file with a
//! given timestamp takes the bare name; when a second distinct file arrives,
//! the original occupant is retroactively renamed to `-1` and the newcomer
//! becomes `-2`, so numbered siblings stay consistent. Content digests decide
//! whether a colliding file is genuinely new or an exact duplicate.

use crate::error::{Error, Result};
use crate::hash;
use crate::time::Timestamp;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A computed destination, plus the retroactive rename it required (if any)
#[derive(Debug, Clone)]
pub struct Placed {
    pub dest: PathBuf,
    /// `(from, to)` of the bare-slot occupant renamed to make numbering
    /// consistent
    pub renamed_original: Option<(PathBuf, PathBuf)>,
}

/// Outcome of placing one file
#[derive(Debug, Clone)]
pub enum Placement {
    /// File was moved to its destination
    Moved(Placed),
    /// Dry run: destination computed, nothing touched
    WouldMove(Placed),
    /// Identical content already present; file left in place
    Duplicate { existing: PathBuf },
}

/// Normalize an extension for output filenames: lowercase, `jpeg` -> `jpg`,
/// `mpeg` -> `mpg`
pub fn normalize_extension(ext: &str) -> String {
    ext.to_lowercase().replace("peg", "pg")
}

/// Move `source` to `base/year/timestamp[-N].ext`
///
/// The year directory is created on demand and verified afterwards. The move
/// itself is a single `fs::rename`, never copy+delete, so it is atomic at the
/// filesystem level.
pub fn place(
    source: &Path,
    timestamp: &Timestamp,
    extension: &str,
    base: &Path,
    dry_run: bool,
) -> Result<Placement> {
    let year_dir = base.join(timestamp.year());

    if !dry_run {
        fs::create_dir_all(&year_dir)?;
        if !year_dir.is_dir() {
            return Err(Error::YearDirMissing { path: year_dir });
        }
    }

    // Source digest, computed once on the first collision
    let mut source_digest: Option<String> = None;

    let bare_name = format!("{}.{}", timestamp.compact(), extension);
    let mut need_rename_original = false;
    let mut chosen: Option<PathBuf> = None;

    for i in std::iter::once(0usize).chain(2..) {
        let name = if i == 0 {
            bare_name.clone()
        } else {
            format!("{}-{}.{}", timestamp.compact(), i, extension)
        };
        let candidate = year_dir.join(&name);

        if !candidate.exists() {
            chosen = Some(candidate);
            break;
        }

        // Occupied slot: an identical occupant means we hold a duplicate
        let ours = match source_digest.as_ref() {
            Some(d) => d.clone(),
            None => {
                let d = hash::file_digest(source)?;
                source_digest = Some(d.clone());
                d
            }
        };
        let theirs = hash::file_digest(&candidate)?;
        if ours == theirs {
            debug!(?source, existing = ?candidate, "identical content, skipping");
            return Ok(Placement::Duplicate {
                existing: candidate,
            });
        }

        if i == 0 {
            need_rename_original = true;
        }
    }

    // The 2.. range only terminates through the loop break
    let dest = chosen.expect("candidate name sequence is unbounded");

    let renamed_original = if need_rename_original {
        let occupant = year_dir.join(&bare_name);
        let target = year_dir.join(format!("{}-1.{}", timestamp.compact(), extension));
        if target.exists() {
            return Err(Error::RenameCollision { occupant, target });
        }
        if !dry_run {
            info!(from = ?occupant, to = ?target, "renaming original to free bare slot");
            fs::rename(&occupant, &target)?;
        }
        Some((occupant, target))
    } else {
        None
    };

    if dry_run {
        return Ok(Placement::WouldMove(Placed {
            dest,
            renamed_original,
        }));
    }

    fs::rename(source, &dest)?;
    info!(?source, ?dest, "moved");

    Ok(Placement::Moved(Placed {
        dest,
        renamed_original,
    }))
}
