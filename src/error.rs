use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while assembling a release manifest.
///
/// Every variant is fatal for the build that raised it; the CLI converts
/// them into a message and a non-zero exit.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// An image name was registered twice. The first registration wins and
    /// the build stops, since silently overwriting a descriptor would break
    /// the manifest's referential integrity.
    #[error("duplicate image name '{0}'")]
    DuplicateImage(String),

    /// An installable referenced an image name absent from the registry.
    #[error("installable '{installable}' references missing image '{image}'")]
    MissingImage { installable: String, image: String },

    /// A staging source file does not exist.
    #[error("source artifact not found: {}", .0.display())]
    MissingArtifact(PathBuf),

    /// Directory creation, copy, read, or write failed.
    #[error("filesystem operation failed for '{}': {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ManifestError {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}
