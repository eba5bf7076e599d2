//! Image registry: symbolic image names mapped to staged descriptors.
//!
//! Names are unique for the lifetime of a build. Registering a name twice is
//! fatal, since a silent overwrite would corrupt the manifest's referential
//! integrity. The registry only grows during a single manifest-build run and
//! is discarded after serialization; there is no removal.

use std::collections::BTreeMap;

use crate::error::ManifestError;
use crate::signature::ImageDescriptor;

#[derive(Debug, Default)]
pub struct ImageRegistry {
    images: BTreeMap<String, ImageDescriptor>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `descriptor` under `name`.
    ///
    /// Fails with [`ManifestError::DuplicateImage`] if the name is already
    /// present; the first entry is retained.
    pub fn register(&mut self, name: &str, descriptor: ImageDescriptor) -> Result<(), ManifestError> {
        if self.images.contains_key(name) {
            return Err(ManifestError::DuplicateImage(name.to_string()));
        }
        self.images.insert(name.to_string(), descriptor);
        Ok(())
    }

    pub fn exists(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ImageDescriptor> {
        self.images.get(name)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Consume the registry, yielding the name-keyed map (sorted by name).
    pub fn into_map(self) -> BTreeMap<String, ImageDescriptor> {
        self.images
    }
}
