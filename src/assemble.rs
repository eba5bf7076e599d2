//! Top-level release assembly.
//!
//! Strictly linear: stage, hash, and register each environment's merged
//! image, then declare the dial-type choices, then write the manifest. Any
//! failure aborts before `manifest.json` is written; staged copies left by an
//! aborted run are overwritten by the next run from scratch.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::builder::ManifestBuilder;
use crate::config::{ReleaseConfig, MERGED_IMAGE_FILENAME};
use crate::model::Manifest;
use crate::signature;
use crate::stage;

pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Assemble the release under `release_root` and write `manifest.json`.
///
/// `project_root` is the checkout containing the build output; `tag` is the
/// release version recorded in the manifest header.
pub fn build_release(
    config: &ReleaseConfig,
    tag: &str,
    project_root: &Path,
    release_root: &Path,
) -> Result<Manifest> {
    let mut builder = ManifestBuilder::new(config.product.header(tag), tag);

    for env in &config.environments {
        let build_dir = project_root.join(&config.build_root).join(&env.name);
        let staged = stage::stage_artifact(&build_dir, MERGED_IMAGE_FILENAME, release_root, &env.name)
            .with_context(|| format!("staging image for environment '{}'", env.name))?;

        let rel_path = format!("{}/{}", env.name, MERGED_IMAGE_FILENAME);
        let descriptor = signature::describe_image(&staged, &rel_path, &env.offset)
            .with_context(|| format!("hashing staged image '{}'", staged.display()))?;

        builder
            .register_image(&env.name, descriptor)
            .with_context(|| format!("registering image for environment '{}'", env.name))?;
    }

    for dial in &config.dial_types {
        let group = builder.add_dial_type(&dial.name, &dial.description, &dial.choice_label);
        builder
            .add_installable(
                group,
                &config.install.name,
                &config.install.description,
                dial.erase,
                &dial.images,
            )
            .with_context(|| format!("declaring installable for dial type '{}'", dial.name))?;
    }

    let manifest = builder.finish();
    write_manifest(&manifest, release_root)?;
    Ok(manifest)
}

/// Serialize `manifest` with stable key ordering to
/// `release_root/manifest.json`. Repeated builds of identical inputs produce
/// byte-identical documents.
pub fn write_manifest(manifest: &Manifest, release_root: &Path) -> Result<()> {
    fs::create_dir_all(release_root)
        .with_context(|| format!("creating release directory '{}'", release_root.display()))?;

    let bytes = serde_json::to_vec_pretty(manifest).context("serializing manifest")?;
    let path = release_root.join(MANIFEST_FILENAME);
    fs::write(&path, bytes).with_context(|| format!("writing manifest '{}'", path.display()))?;
    Ok(())
}
