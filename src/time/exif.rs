//! EXIF capture-time extraction
//!
//! Only the `DateTime` tag is consulted. An absent tag (or a container with
//! no EXIF data at all) is an expected condition and yields `None`; a tag
//! that is present but not in the exact `"YYYY:MM:DD HH:MM:SS"` shape is a
//! fatal error, since a malformed value indicates a corrupt or unexpected
//! metadata format and must not be silently misinterpreted.

use crate::error::{Error, Result};
use crate::time::Timestamp;
use chrono::NaiveDateTime;
use exif::{Field, In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Extract the EXIF capture time, if any
pub fn capture_time(path: &Path) -> Result<Option<Timestamp>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let exif = match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(e) => {
            debug!(?path, error = %e, "no readable EXIF data");
            return Ok(None);
        }
    };

    let Some(field) = exif.get_field(Tag::DateTime, In::PRIMARY) else {
        return Ok(None);
    };

    datetime_from_field(field, path).map(Some)
}

/// Pull the raw ASCII datetime out of a `DateTime` field
///
/// The raw tag value is consulted, not `display_value()`: the display
/// rendering reformats dates with dashes (`"2012-07-04 18:56:41"`), which
/// the strict shape check would reject. A non-ASCII value is malformed.
fn datetime_from_field(field: &Field, path: &Path) -> Result<Timestamp> {
    match &field.value {
        Value::Ascii(lines) if !lines.is_empty() => {
            let raw =
                std::str::from_utf8(&lines[0]).map_err(|_| Error::MalformedExifTimestamp {
                    path: path.to_path_buf(),
                    value: String::from_utf8_lossy(&lines[0]).into_owned(),
                })?;
            convert_datetime_string(raw.trim_end_matches('\0').trim(), path)
        }
        _ => Err(Error::MalformedExifTimestamp {
            path: path.to_path_buf(),
            value: field.display_value().to_string(),
        }),
    }
}

/// Convert an EXIF datetime string to the canonical 14-digit form
///
/// The expected raw shape is exactly `"YYYY:MM:DD HH:MM:SS"`: one space,
/// four colons, and a calendar-valid datetime. Converting strips the colons
/// and the space. Anything else fails loudly.
pub fn convert_datetime_string(s: &str, path: &Path) -> Result<Timestamp> {
    let malformed = || Error::MalformedExifTimestamp {
        path: path.to_path_buf(),
        value: s.to_string(),
    };

    if s.len() != 19
        || s.chars().filter(|&c| c == ' ').count() != 1
        || s.chars().filter(|&c| c == ':').count() != 4
    {
        return Err(malformed());
    }

    let dt = NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S").map_err(|_| malformed())?;
    let ts = Timestamp::from_datetime(dt).map_err(|_| malformed())?;
    debug_assert_eq!(ts.compact(), s.replace(':', "").replace(' ', ""));
    Ok(ts)
}
