//! Manifest assembly state.
//!
//! [`ManifestBuilder`] owns the image registry and the installable choice
//! tree for one build run: construct, populate, then [`finish`] into the
//! serializable [`Manifest`]. Referential integrity is enforced per call, so
//! a finished manifest never references an unregistered image.
//!
//! [`finish`]: ManifestBuilder::finish

use crate::error::ManifestError;
use crate::model::{ChoiceEntry, ChoiceGroup, Installable, Manifest};
use crate::registry::ImageRegistry;
use crate::signature::ImageDescriptor;

const INSTALLABLE_GROUP_NAME: &str = "installable";
const INSTALLABLE_GROUP_DESCRIPTION: &str = "Things you can install";
const INSTALLABLE_CHOICE_LABEL: &str = "Dial type";

/// Product identity for the manifest header.
#[derive(Debug, Clone)]
pub struct ProductHeader {
    pub name: String,
    pub source_url: String,
    pub release_url: String,
    pub funding_url: String,
}

/// Handle to a dial-type group, minted by [`ManifestBuilder::add_dial_type`].
///
/// Installables can only be attached through a handle, so a group always
/// exists before its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialTypeId(usize);

/// Accumulates images and installation choices for one manifest build.
#[derive(Debug)]
pub struct ManifestBuilder {
    header: ProductHeader,
    version: String,
    registry: ImageRegistry,
    dial_types: Vec<ChoiceGroup>,
}

impl ManifestBuilder {
    pub fn new(header: ProductHeader, version: &str) -> Self {
        Self {
            header,
            version: version.to_string(),
            registry: ImageRegistry::new(),
            dial_types: Vec::new(),
        }
    }

    /// Register a staged image under a symbolic name.
    ///
    /// Fails with [`ManifestError::DuplicateImage`] if the name is taken.
    pub fn register_image(
        &mut self,
        name: &str,
        descriptor: ImageDescriptor,
    ) -> Result<(), ManifestError> {
        self.registry.register(name, descriptor)
    }

    pub fn image_exists(&self, name: &str) -> bool {
        self.registry.exists(name)
    }

    /// Append a dial-type group to the installable choices and return its
    /// handle for attaching installables.
    pub fn add_dial_type(&mut self, name: &str, description: &str, choice_label: &str) -> DialTypeId {
        let id = DialTypeId(self.dial_types.len());
        self.dial_types.push(ChoiceGroup {
            name: name.to_string(),
            description: description.to_string(),
            choice_name: Some(choice_label.to_string()),
            choices: Vec::new(),
        });
        id
    }

    /// Append an installable to the given dial-type group.
    ///
    /// Every name in `images` must already be registered; on the first absent
    /// name this fails with [`ManifestError::MissingImage`] and the choice
    /// tree is left unchanged. An empty `images` slice is permitted.
    ///
    /// # Panics
    ///
    /// Panics if `group` was minted by a different builder.
    pub fn add_installable(
        &mut self,
        group: DialTypeId,
        name: &str,
        description: &str,
        erase: bool,
        images: &[String],
    ) -> Result<(), ManifestError> {
        for image in images {
            if !self.registry.exists(image) {
                return Err(ManifestError::MissingImage {
                    installable: name.to_string(),
                    image: image.clone(),
                });
            }
        }

        self.dial_types[group.0]
            .choices
            .push(ChoiceEntry::Install(Installable {
                name: name.to_string(),
                description: description.to_string(),
                erase,
                images: images.to_vec(),
            }));
        Ok(())
    }

    /// Consume the builder and produce the manifest document.
    pub fn finish(self) -> Manifest {
        Manifest {
            name: self.header.name,
            version: self.version,
            source_url: self.header.source_url,
            release_url: self.header.release_url,
            funding_url: self.header.funding_url,
            images: self.registry.into_map(),
            installable: ChoiceGroup {
                name: INSTALLABLE_GROUP_NAME.to_string(),
                description: INSTALLABLE_GROUP_DESCRIPTION.to_string(),
                choice_name: Some(INSTALLABLE_CHOICE_LABEL.to_string()),
                choices: self
                    .dial_types
                    .into_iter()
                    .map(ChoiceEntry::Group)
                    .collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{Signature, SIGNATURE_ALGORITHM};

    fn header() -> ProductHeader {
        ProductHeader {
            name: "FluidDial".to_string(),
            source_url: "https://example.com/tree/v1.0".to_string(),
            release_url: "https://example.com/releases/tag/v1.0".to_string(),
            funding_url: "https://example.com/donate".to_string(),
        }
    }

    fn descriptor(size: u64) -> ImageDescriptor {
        ImageDescriptor {
            size,
            offset: "0x1000".to_string(),
            path: "m5dial/merged-flash.bin".to_string(),
            signature: Signature {
                algorithm: SIGNATURE_ALGORITHM.to_string(),
                value: "cd".repeat(32),
            },
        }
    }

    #[test]
    fn installable_references_registered_image() {
        let mut builder = ManifestBuilder::new(header(), "v1.0");
        builder.register_image("m5dial", descriptor(100)).unwrap();

        let dial = builder.add_dial_type("FluidDial for M5Dial", "FluidDial for M5Dial", "FluidDial type");
        builder
            .add_installable(dial, "install", "Complete installation", true, &["m5dial".to_string()])
            .unwrap();

        let manifest = builder.finish();
        let ChoiceEntry::Group(group) = &manifest.installable.choices[0] else {
            panic!("expected dial-type group");
        };
        assert_eq!(group.choices.len(), 1);
        assert!(manifest.check_references().is_ok());
    }

    #[test]
    fn missing_image_fails_without_mutating_the_tree() {
        let mut builder = ManifestBuilder::new(header(), "v1.0");
        let dial = builder.add_dial_type("FluidDial for M5Dial", "FluidDial for M5Dial", "FluidDial type");

        let err = builder
            .add_installable(dial, "install", "Complete installation", true, &["gamma".to_string()])
            .unwrap_err();
        assert!(matches!(
            err,
            ManifestError::MissingImage { image, .. } if image == "gamma"
        ));

        let manifest = builder.finish();
        let ChoiceEntry::Group(group) = &manifest.installable.choices[0] else {
            panic!("expected dial-type group");
        };
        assert!(group.choices.is_empty());
    }

    #[test]
    fn duplicate_registration_is_fatal() {
        let mut builder = ManifestBuilder::new(header(), "v1.0");
        builder.register_image("m5dial", descriptor(100)).unwrap();
        let err = builder.register_image("m5dial", descriptor(200)).unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateImage(_)));
    }

    #[test]
    fn zero_image_installable_is_permitted() {
        let mut builder = ManifestBuilder::new(header(), "v1.0");
        let dial = builder.add_dial_type("Bare", "No images", "FluidDial type");
        builder
            .add_installable(dial, "install", "Writes nothing", false, &[])
            .unwrap();

        let manifest = builder.finish();
        assert!(manifest.check_references().is_ok());
    }

    #[test]
    fn dial_types_keep_declaration_order() {
        let mut builder = ManifestBuilder::new(header(), "v1.0");
        builder.add_dial_type("First", "First dial", "FluidDial type");
        builder.add_dial_type("Second", "Second dial", "FluidDial type");

        let manifest = builder.finish();
        let names: Vec<_> = manifest
            .installable
            .choices
            .iter()
            .map(|entry| match entry {
                ChoiceEntry::Group(g) => g.name.as_str(),
                ChoiceEntry::Install(i) => i.name.as_str(),
            })
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }
}
