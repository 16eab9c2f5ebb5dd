use std::path::PathBuf;
use thiserror::Error;

/// Result type for bundle operations
pub type Result<T> = std::result::Result<T, BundleError>;

/// Errors that abort a bundle run.
///
/// Everything else (unreadable files, missing archives, undocumented classes)
/// is absorbed where it happens and only shows up in logs or in the bundle text.
#[derive(Error, Debug)]
pub enum BundleError {
    /// The checkout does not look like a project we know how to read
    #[error("{0} is not a valid checkout")]
    NotACheckout(PathBuf),

    /// No source directory could be determined
    #[error("no source directory found in {0}")]
    SourceDirectory(PathBuf),

    /// The build tool refused to export a project property
    #[error("property export failed ({property}): {message}")]
    PropertyExport { property: String, message: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive could not be read
    #[error("ZIP error in {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl BundleError {
    /// Create a property export error
    pub fn export(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PropertyExport {
            property: property.into(),
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
