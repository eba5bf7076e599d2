//! Release tag lookup.
//!
//! The version recorded in the manifest is the most recent annotated tag of
//! the checkout being packaged, as reported by `git describe`.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

/// Resolve the release tag for `dir` via `git describe --tags --abbrev=0`.
pub fn describe_tag(dir: &Path) -> Result<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--abbrev=0"])
        .current_dir(dir)
        .output()
        .with_context(|| format!("running git describe in '{}'", dir.display()))?;

    if !output.status.success() {
        bail!(
            "git describe failed in '{}': {}",
            dir.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let tag = String::from_utf8(output.stdout)
        .context("git describe produced non-UTF-8 output")?
        .trim()
        .to_string();
    if tag.is_empty() {
        bail!("git describe returned no tag in '{}'", dir.display());
    }
    Ok(tag)
}
