//! Serializable manifest document.
//!
//! The shape mirrors what the web installer consumes: a product header, an
//! `images` map keyed by symbolic name, and an `installable` choice tree
//! whose outer choices are dial-type groups and whose leaves are concrete
//! install actions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ManifestError;
use crate::signature::ImageDescriptor;

/// Root manifest document written to `release/manifest.json`.
///
/// Invariant: every image name referenced anywhere in the choice tree exists
/// as a key in `images`. Builders enforce this while assembling; for
/// documents parsed back from disk, see [`Manifest::check_references`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub version: String,
    pub source_url: String,
    pub release_url: String,
    pub funding_url: String,
    pub images: BTreeMap<String, ImageDescriptor>,
    pub installable: ChoiceGroup,
}

/// A named, described selection point in the choice tree.
///
/// A group with a `choice-name` label presents its `choices` to the user; a
/// group without one is a leaf category with no further nested choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceGroup {
    pub name: String,
    pub description: String,
    #[serde(rename = "choice-name", skip_serializing_if = "Option::is_none")]
    pub choice_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<ChoiceEntry>,
}

/// Either a concrete installable or a nested group.
///
/// Installable is tried first: its required `erase` and `images` fields
/// disambiguate it from a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceEntry {
    Install(Installable),
    Group(ChoiceGroup),
}

/// A concrete, selectable installation action.
///
/// `erase` declares whether installation wipes prior persisted state before
/// writing. Images are referenced by name only, so one staged image can back
/// several installables. An empty `images` list is permitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installable {
    pub name: String,
    pub description: String,
    pub erase: bool,
    pub images: Vec<String>,
}

impl Manifest {
    /// Walk the choice tree and verify that every referenced image name is
    /// present in `images`.
    pub fn check_references(&self) -> Result<(), ManifestError> {
        check_group(&self.installable, &self.images)
    }
}

fn check_group(
    group: &ChoiceGroup,
    images: &BTreeMap<String, ImageDescriptor>,
) -> Result<(), ManifestError> {
    for entry in &group.choices {
        match entry {
            ChoiceEntry::Install(install) => {
                for image in &install.images {
                    if !images.contains_key(image) {
                        return Err(ManifestError::MissingImage {
                            installable: install.name.clone(),
                            image: image.clone(),
                        });
                    }
                }
            }
            ChoiceEntry::Group(nested) => check_group(nested, images)?,
        }
    }
    Ok(())
}
