use anyhow::{Context as AnyhowContext, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Checkout directories directly below `repos` whose name ends in `suffix`, sorted
pub(crate) fn representative_checkouts(repos: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(repos)
        .with_context(|| format!("Failed to read repos directory {}", repos.display()))?;

    let mut targets = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.ends_with(suffix));
        if matches {
            targets.push(path);
        }
    }
    targets.sort();
    Ok(targets)
}

/// Write `{project: bundle}` as pretty JSON
pub(crate) fn write_bundles(path: &Path, bundles: &BTreeMap<String, String>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(bundles)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
