//! SHA-256 content digests for duplicate detection
//!
//! Files are hashed in fixed-size chunks so large movie files are never
//! slurped into memory. Hashing only happens when a destination collision is
//! detected, so the common case reads nothing.

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::trace;

/// Read chunk size (256 KiB)
const CHUNK_SIZE: usize = 256 * 1024;

/// Compute the whole-file SHA-256 digest as a hex string
pub fn file_digest(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| Error::HashComputation {
        path: path.to_path_buf(),
        message: format!("Failed to open file: {}", e),
    })?;

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(|e| Error::HashComputation {
            path: path.to_path_buf(),
            message: format!("Failed to read file: {}", e),
        })?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let digest = hex::encode(hasher.finalize());
    trace!(?path, digest, "Computed file digest");
    Ok(digest)
}
