use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

static PACKAGE_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*package\s+([\w.]+)\s*;").expect("valid package regex"));

const JAVA_EXTENSION: &str = "java";

/// Raw imports and package declarations found under one source root
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Import declarations exactly as written, minus `import` and `;`
    pub imports: BTreeSet<String>,

    /// Declared package per file; files without a declaration are absent
    pub packages: BTreeMap<PathBuf, String>,

    /// Number of Java files visited (readable or not)
    pub files: usize,
}

/// Scanner for Java sources below a root directory
pub struct SourceScanner {
    root: PathBuf,
}

impl SourceScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// All `.java` files below the root, any depth, in file-name order
    pub fn java_files(&self) -> Vec<PathBuf> {
        java_files_under(&self.root)
    }

    /// Collect imports and package declarations from every Java file
    pub fn scan(&self) -> ScanResult {
        let mut result = ScanResult::default();

        for path in self.java_files() {
            result.files += 1;
            let Some(text) = read_text(&path) else {
                continue;
            };

            result.imports.extend(raw_imports(&text));
            if let Some(pkg) = package_of(&text) {
                result.packages.insert(path, pkg.to_string());
            }
        }

        log::debug!(
            "Scanned {} Java files under {}: {} raw imports, {} packages",
            result.files,
            self.root.display(),
            result.imports.len(),
            result.packages.len()
        );
        result
    }
}

pub(crate) fn java_files_under(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        match entry {
            Ok(entry) => {
                if !entry.file_type().is_file() {
                    continue;
                }
                if is_java_file(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => log::debug!("Failed to read entry: {e}"),
        }
    }
    files
}

fn is_java_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == JAVA_EXTENSION)
}

/// Read a file as text, replacing invalid UTF-8. `None` when unreadable.
pub fn read_text(path: &Path) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            log::debug!("Skipping unreadable file {}: {e}", path.display());
            None
        }
    }
}

/// The declared package of a compilation unit
pub fn package_of(text: &str) -> Option<&str> {
    PACKAGE_DECL
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Raw import declarations of one file, in source order
pub fn raw_imports(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines().filter_map(|line| {
        let rest = line.trim().strip_prefix("import ")?;
        let value = rest.trim().trim_end_matches(';').trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}
