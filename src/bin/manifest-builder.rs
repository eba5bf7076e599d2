use std::path::Path;

use anyhow::{bail, Context, Result};
use manifest_builder::assemble::{self, MANIFEST_FILENAME};
use manifest_builder::config::ReleaseConfig;
use manifest_builder::model::Manifest;
use manifest_builder::{preflight, version};

const CONFIG_FILENAME: &str = "release.toml";

fn usage() -> &'static str {
    "Usage:\n  manifest-builder build [project_root]\n  manifest-builder check <manifest.json>"
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.as_slice() {
        [cmd] if cmd == "build" => build(Path::new(".")),
        [cmd, root] if cmd == "build" => build(Path::new(root)),
        [cmd, path] if cmd == "check" => check(Path::new(path)),
        _ => bail!(usage()),
    }
}

fn build(project_root: &Path) -> Result<()> {
    preflight::check_required_tools(preflight::REQUIRED_TOOLS)?;

    let config = load_config(project_root)?;
    let tag = version::describe_tag(project_root)?;
    let release_root = project_root.join(&config.release_root);

    let manifest = assemble::build_release(&config, &tag, project_root, &release_root)?;

    for (name, image) in &manifest.images {
        println!("[manifest] staged {name}: {} bytes ({})", image.size, image.path);
    }
    println!(
        "[manifest] wrote {} for {} {}",
        release_root.join(MANIFEST_FILENAME).display(),
        manifest.name,
        manifest.version
    );
    Ok(())
}

fn load_config(project_root: &Path) -> Result<ReleaseConfig> {
    let path = project_root.join(CONFIG_FILENAME);
    if path.is_file() {
        ReleaseConfig::load(&path)
    } else {
        ReleaseConfig::builtin()
    }
}

fn check(path: &Path) -> Result<()> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading manifest '{}'", path.display()))?;
    let manifest: Manifest = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing manifest '{}'", path.display()))?;
    manifest
        .check_references()
        .with_context(|| format!("manifest '{}' failed reference check", path.display()))?;

    println!(
        "[manifest] {} {}: {} images, references ok",
        manifest.name,
        manifest.version,
        manifest.images.len()
    );
    Ok(())
}
