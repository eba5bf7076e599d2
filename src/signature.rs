//! Content signatures for staged firmware images.
//!
//! The installer verifies downloads against a SHA-256 digest of the staged
//! bytes. Each staged image is described by its byte size, flash offset,
//! release-relative path, and signature; the descriptor is created once when
//! the image is staged and never mutated afterwards.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::ManifestError;

/// Algorithm tag recorded alongside every digest.
pub const SIGNATURE_ALGORITHM: &str = "SHA2-256";

/// Integrity signature over a staged image's full contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub algorithm: String,
    pub value: String,
}

/// One staged binary artifact as the installer sees it.
///
/// `offset` is an opaque flash/load address string (e.g. `"0x1000"`) passed
/// through to the flashing tool. `path` is the download path relative to the
/// release root, always forward-slash separated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub size: u64,
    pub offset: String,
    pub path: String,
    pub signature: Signature,
}

/// Stream a file through SHA-256, returning the lowercase hex digest and the
/// byte size. Identical bytes always produce an identical digest.
pub fn sha256_file(path: &Path) -> Result<(String, u64), ManifestError> {
    let f = File::open(path).map_err(|e| ManifestError::filesystem(path, e))?;
    let mut r = BufReader::new(f);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    let mut size = 0u64;
    loop {
        let n = r
            .read(&mut buf)
            .map_err(|e| ManifestError::filesystem(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        size += n as u64;
    }
    Ok((format!("{:x}", hasher.finalize()), size))
}

/// Build the descriptor for a staged image: hash its contents and record
/// size, the caller-supplied offset, and the release-relative path.
pub fn describe_image(
    staged: &Path,
    rel_path: &str,
    offset: &str,
) -> Result<ImageDescriptor, ManifestError> {
    let (digest, size) = sha256_file(staged)?;
    Ok(ImageDescriptor {
        size,
        offset: offset.to_string(),
        path: rel_path.to_string(),
        signature: Signature {
            algorithm: SIGNATURE_ALGORITHM.to_string(),
            value: digest,
        },
    })
}
