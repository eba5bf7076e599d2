//! Installer manifest generation for FluidDial firmware releases.
//!
//! This crate implements the post-build packaging step that turns a set of
//! already-built firmware images into the declarative manifest the web
//! installer consumes:
//!
//! - **Content staging** - copy each environment's merged image into the
//!   versioned release layout
//! - **Signature computation** - SHA-256 digest and byte size per staged image
//! - **Image registry** - unique symbolic names for staged images
//! - **Choice tree** - dial-type groups holding concrete install actions
//! - **Assembly** - a validated, canonically serialized `manifest.json`
//!
//! It does not compile firmware, flash devices, or implement the installer
//! UI; it only packages what a build already produced. Every contract
//! violation (duplicate image name, missing referenced image, missing source
//! artifact) is fatal for the run: the whole process is re-run from scratch
//! on failure.
//!
//! # Example
//!
//! ```rust,ignore
//! use manifest_builder::assemble;
//! use manifest_builder::config::ReleaseConfig;
//! use std::path::Path;
//!
//! let config = ReleaseConfig::builtin()?;
//! let manifest = assemble::build_release(&config, "v1.0", Path::new("."), Path::new("release"))?;
//! println!("packaged {} images", manifest.images.len());
//! ```

pub mod assemble;
pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod preflight;
pub mod registry;
pub mod signature;
pub mod stage;
pub mod version;

pub use builder::{DialTypeId, ManifestBuilder, ProductHeader};
pub use error::ManifestError;
pub use model::{ChoiceEntry, ChoiceGroup, Installable, Manifest};
pub use registry::ImageRegistry;
pub use signature::{ImageDescriptor, Signature};
