use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BundleError, Result};
use crate::resolver::parse_classpath;

/// Marker file present in every Defects4J working directory
pub const DEFECTS4J_CONFIG: &str = ".defects4j.config";

/// Source directories tried, in order, when no build tool is available
const DEFAULT_SOURCE_CANDIDATES: &[&str] = &["src/main/java", "src/java", "src"];

/// What the build tool tells us about a checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectLayout {
    /// Display name used in the bundle header
    pub name: String,

    /// Working checkout; scratch directories are created here
    pub root: PathBuf,

    /// Directory holding the project's main Java sources
    pub source_dir: PathBuf,

    /// Compile classpath in resolution order
    pub classpath: Vec<PathBuf>,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>, source_dir: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            name: project_name(&root),
            root,
            source_dir: source_dir.into(),
            classpath: Vec::new(),
        }
    }

    pub fn with_classpath(mut self, classpath: Vec<PathBuf>) -> Self {
        self.classpath = classpath;
        self
    }

    /// Accepts a raw classpath string as exported by the build tool
    pub fn with_classpath_str(self, raw: &str) -> Self {
        self.with_classpath(parse_classpath(raw))
    }
}

/// Last path component of the checkout, falling back to the full path
pub fn project_name(root: &Path) -> String {
    let absolute = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
    absolute
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| absolute.display().to_string())
}

pub fn is_defects4j_checkout(root: &Path) -> bool {
    root.join(DEFECTS4J_CONFIG).is_file()
}

/// Finds the source directory of a checkout by looking at well-known places
#[derive(Debug, Clone)]
pub struct LayoutProbe {
    candidates: Vec<PathBuf>,
}

impl Default for LayoutProbe {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_SOURCE_CANDIDATES
                .iter()
                .map(PathBuf::from)
                .collect(),
        }
    }
}

impl LayoutProbe {
    /// Try `relative` after the built-in candidates
    pub fn with_candidate(mut self, relative: impl Into<PathBuf>) -> Self {
        self.candidates.push(relative.into());
        self
    }

    pub fn probe(&self, root: &Path) -> Result<ProjectLayout> {
        if !root.is_dir() {
            return Err(BundleError::NotACheckout(root.to_path_buf()));
        }

        for candidate in &self.candidates {
            let dir = root.join(candidate);
            if dir.is_dir() {
                log::debug!("Source directory found: {}", dir.display());
                return Ok(ProjectLayout::new(root, dir));
            }
        }
        Err(BundleError::SourceDirectory(root.to_path_buf()))
    }
}

/// Title and description of a bug report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BugReport {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl BugReport {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| BundleError::Other(format!("invalid bug report: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path)?;
        Self::from_json_str(&String::from_utf8_lossy(&raw))
    }

    /// Title and description joined by a newline
    pub fn text(&self) -> String {
        format!("{}\n{}", self.title, self.description)
    }
}
