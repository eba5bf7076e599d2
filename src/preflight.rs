//! Host-tool checks before a build.
//!
//! Failing fast here avoids a cryptic error halfway through staging.

use anyhow::{bail, Result};

/// Tools the manifest build shells out to.
///
/// Each tuple is (command_name, package_name).
pub const REQUIRED_TOOLS: &[(&str, &str)] = &[("git", "git")];

/// Check if a command exists on the host system.
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Check that specific tools are available.
///
/// Returns `Err` listing every missing tool and its package.
pub fn check_required_tools(tools: &[(&str, &str)]) -> Result<()> {
    let missing: Vec<_> = tools
        .iter()
        .filter(|(cmd, _)| !command_exists(cmd))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    let mut message = String::from("missing required tools:");
    for (cmd, package) in missing {
        message.push_str(&format!("\n  {cmd} (install package: {package})"));
    }
    bail!(message);
}
