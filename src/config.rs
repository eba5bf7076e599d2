//! Release configuration.
//!
//! `release.toml` describes the product header, the build environments whose
//! merged images ship, and the dial-type choices the installer offers. The
//! copy at the repository root is embedded as the built-in default, so the
//! tool runs without a config file in a stock checkout.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::builder::ProductHeader;

/// Artifact filename produced by every environment build.
pub const MERGED_IMAGE_FILENAME: &str = "merged-flash.bin";

const BUILTIN_CONFIG: &str = include_str!("../release.toml");

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseConfig {
    /// Build output root, relative to the project root.
    #[serde(default = "default_build_root")]
    pub build_root: String,
    /// Release layout root, relative to the project root.
    #[serde(default = "default_release_root")]
    pub release_root: String,
    pub product: ProductConfig,
    #[serde(default)]
    pub install: InstallConfig,
    #[serde(rename = "environment")]
    pub environments: Vec<EnvironmentConfig>,
    #[serde(rename = "dial_type")]
    pub dial_types: Vec<DialTypeConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductConfig {
    pub name: String,
    pub repository: String,
    pub funding_url: String,
}

impl ProductConfig {
    /// Derive the manifest header for a release tag.
    pub fn header(&self, tag: &str) -> ProductHeader {
        ProductHeader {
            name: self.name.clone(),
            source_url: format!("{}/tree/{}", self.repository, tag),
            release_url: format!("{}/releases/tag/{}", self.repository, tag),
            funding_url: self.funding_url.clone(),
        }
    }
}

/// Shared metadata for the fresh-install action added to every dial type.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallConfig {
    #[serde(default = "default_install_name")]
    pub name: String,
    #[serde(default = "default_install_description")]
    pub description: String,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            name: default_install_name(),
            description: default_install_description(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    pub name: String,
    /// Flash offset passed through to the installer, opaque to this tool.
    #[serde(default = "default_offset")]
    pub offset: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DialTypeConfig {
    pub name: String,
    pub description: String,
    #[serde(default = "default_choice_label")]
    pub choice_label: String,
    #[serde(default = "default_erase")]
    pub erase: bool,
    pub images: Vec<String>,
}

impl ReleaseConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading release config '{}'", path.display()))?;
        let parsed: ReleaseConfig = toml::from_str(&text)
            .with_context(|| format!("parsing release config '{}'", path.display()))?;
        parsed
            .validate()
            .with_context(|| format!("invalid release config '{}'", path.display()))?;
        Ok(parsed)
    }

    /// Built-in configuration, an embedded copy of the repository's
    /// `release.toml`.
    pub fn builtin() -> Result<Self> {
        let parsed: ReleaseConfig =
            toml::from_str(BUILTIN_CONFIG).context("parsing built-in release configuration")?;
        parsed
            .validate()
            .context("invalid built-in release configuration")?;
        Ok(parsed)
    }

    fn validate(&self) -> Result<()> {
        if self.environments.is_empty() {
            bail!("at least one [[environment]] is required");
        }
        let mut seen = BTreeSet::new();
        for env in &self.environments {
            validate_name_segment(&env.name)?;
            if !seen.insert(env.name.as_str()) {
                bail!("duplicate environment name '{}'", env.name);
            }
        }
        if self.dial_types.is_empty() {
            bail!("at least one [[dial_type]] is required");
        }
        Ok(())
    }
}

// Environment names become release subdirectories and image keys.
fn validate_name_segment(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("environment name must not be empty");
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        bail!("environment name must be a safe path segment: {name}");
    }
    Ok(())
}

fn default_build_root() -> String {
    ".pio/build".to_string()
}

fn default_release_root() -> String {
    "release".to_string()
}

fn default_install_name() -> String {
    "install".to_string()
}

fn default_install_description() -> String {
    "Complete FluidDial installation".to_string()
}

fn default_offset() -> String {
    "0x1000".to_string()
}

fn default_choice_label() -> String {
    "FluidDial type".to_string()
}

fn default_erase() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_describes_both_dials() {
        let config = ReleaseConfig::builtin().unwrap();
        assert_eq!(config.build_root, ".pio/build");
        assert_eq!(config.release_root, "release");
        assert_eq!(config.product.name, "FluidDial");

        let names: Vec<_> = config.environments.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["m5dial", "cyddial"]);
        assert!(config.environments.iter().all(|e| e.offset == "0x1000"));
        assert_eq!(config.dial_types.len(), 2);
        assert!(config.dial_types.iter().all(|d| d.erase));
    }

    #[test]
    fn header_derives_release_urls_from_repository() {
        let config = ReleaseConfig::builtin().unwrap();
        let header = config.product.header("v1.2");
        assert_eq!(
            header.source_url,
            "https://github.com/bdring/FluidDial/tree/v1.2"
        );
        assert_eq!(
            header.release_url,
            "https://github.com/bdring/FluidDial/releases/tag/v1.2"
        );
    }

    #[test]
    fn defaults_fill_optional_fields() {
        let config: ReleaseConfig = toml::from_str(
            r#"
            [product]
            name = "FluidDial"
            repository = "https://example.com/repo"
            funding_url = "https://example.com/donate"

            [[environment]]
            name = "m5dial"

            [[dial_type]]
            name = "FluidDial for M5Dial"
            description = "FluidDial for M5Dial"
            images = ["m5dial"]
            "#,
        )
        .unwrap();

        assert_eq!(config.environments[0].offset, "0x1000");
        assert_eq!(config.dial_types[0].choice_label, "FluidDial type");
        assert!(config.dial_types[0].erase);
        assert_eq!(config.install.name, "install");
    }

    #[test]
    fn rejects_duplicate_environment_names() {
        let config: ReleaseConfig = toml::from_str(
            r#"
            [product]
            name = "FluidDial"
            repository = "https://example.com/repo"
            funding_url = "https://example.com/donate"

            [[environment]]
            name = "m5dial"

            [[environment]]
            name = "m5dial"

            [[dial_type]]
            name = "FluidDial for M5Dial"
            description = "FluidDial for M5Dial"
            images = ["m5dial"]
            "#,
        )
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate environment name"));
    }

    #[test]
    fn rejects_unknown_fields() {
        let result: std::result::Result<ReleaseConfig, _> = toml::from_str(
            r#"
            surprise = true

            [product]
            name = "FluidDial"
            repository = "https://example.com/repo"
            funding_url = "https://example.com/donate"
            "#,
        );
        assert!(result.is_err());
    }
}
