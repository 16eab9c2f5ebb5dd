use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::scanner::{java_files_under, package_of, read_text};

/// Expand a wildcard package into concrete class names.
///
/// Classes whose simple name occurs in `bug_text` win outright; without any
/// such mention at most `limit` classes are returned. Class names come from
/// each file's own `package` declaration, never from its directory.
pub fn expand_wildcard(pkg: &str, src_root: &Path, bug_text: &str, limit: usize) -> Vec<String> {
    let base = package_dir(src_root, pkg);
    if !base.is_dir() {
        log::debug!("Wildcard package {pkg} has no directory under {}", src_root.display());
        return Vec::new();
    }

    let bug_lc = bug_text.to_lowercase();
    let mut mentioned = BTreeSet::new();
    let mut others = BTreeSet::new();

    for file in java_files_under(&base) {
        let Some(class) = file.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let text = read_text(&file).unwrap_or_default();
        let Some(declared) = package_of(&text) else {
            log::debug!("No package declaration in {}, skipping", file.display());
            continue;
        };

        let fqcn = format!("{declared}.{class}");
        if mentioned_in(class, &bug_lc) {
            mentioned.insert(fqcn);
        } else {
            others.insert(fqcn);
        }
    }

    if !mentioned.is_empty() {
        return mentioned.into_iter().collect();
    }
    others.into_iter().take(limit).collect()
}

fn mentioned_in(class: &str, bug_lc: &str) -> bool {
    !bug_lc.is_empty() && bug_lc.contains(&class.to_lowercase())
}

fn package_dir(src_root: &Path, pkg: &str) -> PathBuf {
    pkg.split('.')
        .fold(src_root.to_path_buf(), |dir, segment| dir.join(segment))
}
