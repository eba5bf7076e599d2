use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ManifestError;

/// Copy one built artifact into the versioned release layout.
///
/// Ensures `release_root/dest_subdir` exists (creating intermediate
/// directories as needed), then copies `src_dir/filename` into it
/// byte-for-byte. Returns the staged file's path.
///
/// This is a one-shot build step: a missing source or an unwritable
/// destination fails the whole run, there is no retry.
pub fn stage_artifact(
    src_dir: &Path,
    filename: &str,
    release_root: &Path,
    dest_subdir: &str,
) -> Result<PathBuf, ManifestError> {
    let src = src_dir.join(filename);
    if !src.is_file() {
        return Err(ManifestError::MissingArtifact(src));
    }

    let dest_dir = release_root.join(dest_subdir);
    fs::create_dir_all(&dest_dir).map_err(|e| ManifestError::filesystem(&dest_dir, e))?;

    let dest = dest_dir.join(filename);
    fs::copy(&src, &dest).map_err(|e| ManifestError::filesystem(&dest, e))?;
    Ok(dest)
}
