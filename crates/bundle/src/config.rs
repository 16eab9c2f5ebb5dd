use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{BundleError, Result};

/// Import prefixes that belong to the JDK itself.
pub const JDK_PREFIXES: &[&str] = &["java.", "javax.", "sun.", "com.sun."];

/// Configuration for one bundle run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Character ceiling for the whole bundle (soft while scanning, hard at the end)
    pub max_doc_chars: usize,

    /// Maximum number of Javadoc blocks quoted per class
    pub max_blocks_per_class: usize,

    /// How many unmentioned classes a wildcard import may contribute
    pub wildcard_limit: usize,

    /// Local dependency cache used to find `-sources` archives
    pub m2_repo: PathBuf,

    /// Resolve and unpack sources archives of classpath dependencies
    pub also_external: bool,

    /// Imports starting with any of these prefixes are left out of the bundle
    pub excluded_prefixes: Vec<String>,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            max_doc_chars: 20_000,
            max_blocks_per_class: 20,
            wildcard_limit: 5,
            m2_repo: default_m2_repo(),
            also_external: false,
            excluded_prefixes: Vec::new(),
        }
    }
}

impl BundleConfig {
    /// Settings used for batch runs over many checkouts (smaller bundles)
    pub fn for_batch() -> Self {
        Self {
            max_doc_chars: 15_000,
            max_blocks_per_class: 15,
            also_external: true,
            ..Default::default()
        }
    }

    /// Leave JDK classes out of the bundle
    pub fn skip_jdk(mut self) -> Self {
        for prefix in JDK_PREFIXES {
            if !self.excluded_prefixes.iter().any(|p| p == prefix) {
                self.excluded_prefixes.push((*prefix).to_string());
            }
        }
        self
    }

    pub fn is_excluded(&self, import: &str) -> bool {
        self.excluded_prefixes
            .iter()
            .any(|prefix| import.starts_with(prefix.as_str()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_doc_chars == 0 {
            return Err(BundleError::invalid_config("max_doc_chars must be > 0"));
        }
        if self.max_blocks_per_class == 0 {
            return Err(BundleError::invalid_config(
                "max_blocks_per_class must be > 0",
            ));
        }
        if self.excluded_prefixes.iter().any(|p| p.trim().is_empty()) {
            return Err(BundleError::invalid_config(
                "excluded prefixes must not be empty",
            ));
        }
        Ok(())
    }
}

/// `~/.m2/repository`, or a relative fallback when no home directory is known
pub fn default_m2_repo() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".m2")
        .join("repository")
}
