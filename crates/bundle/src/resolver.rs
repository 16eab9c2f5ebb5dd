use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::ZipArchive;

use crate::error::{BundleError, Result};

const ARCHIVE_EXTENSION: &str = "jar";
const SOURCES_SUFFIX: &str = "-sources";
const SCRATCH_PREFIX: &str = ".libdocs-extracted-";

/// Split a classpath string on the platform path separator.
pub fn parse_classpath(raw: &str) -> Vec<PathBuf> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    std::env::split_paths(raw)
        .filter(|p| !p.as_os_str().is_empty())
        .collect()
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == ARCHIVE_EXTENSION)
}

fn is_sources_archive(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.ends_with(SOURCES_SUFFIX))
}

/// `foo-1.0-sources.jar` next to `foo-1.0.jar`, if it exists
pub fn sibling_sources_jar(jar: &Path) -> Option<PathBuf> {
    let stem = jar.file_stem()?.to_str()?;
    let candidate = jar.with_file_name(format!("{stem}{SOURCES_SUFFIX}.{ARCHIVE_EXTENSION}"));
    candidate.is_file().then_some(candidate)
}

/// Split `artifact-version.jar` at the last dash.
pub fn artifact_and_version(jar: &Path) -> Option<(String, String)> {
    let stem = jar.file_stem()?.to_str()?;
    let (artifact, version) = stem.rsplit_once('-')?;
    if artifact.is_empty() || version.is_empty() {
        return None;
    }
    Some((artifact.to_string(), version.to_string()))
}

/// Best-effort lookup of a sources archive in a Maven-style cache.
pub fn cached_sources_jar(jar: &Path, m2_repo: &Path) -> Option<PathBuf> {
    let (artifact, version) = artifact_and_version(jar)?;
    if !m2_repo.is_dir() {
        return None;
    }

    let pattern = format!(
        "{}/**/{}/{}/{}-{}{SOURCES_SUFFIX}.{ARCHIVE_EXTENSION}",
        glob::Pattern::escape(&m2_repo.to_string_lossy()),
        glob::Pattern::escape(&artifact),
        glob::Pattern::escape(&version),
        glob::Pattern::escape(&artifact),
        glob::Pattern::escape(&version),
    );
    let entries = match glob::glob(&pattern) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("Invalid cache pattern {pattern}: {e}");
            return None;
        }
    };

    let mut matches: Vec<PathBuf> = entries.filter_map(|entry| entry.ok()).collect();
    matches.sort();
    matches.into_iter().next()
}

/// Sibling archive first, dependency cache second.
pub fn resolve_sources_jar(jar: &Path, m2_repo: &Path) -> Option<PathBuf> {
    sibling_sources_jar(jar).or_else(|| cached_sources_jar(jar, m2_repo))
}

/// Scratch directory inside the checkout, removed when dropped
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    pub fn create_in(checkout: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(checkout)?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the directory now and report failures
    pub fn close(self) -> Result<()> {
        self.dir.close().map_err(BundleError::from)
    }
}

/// Unpack the `.java` entries of a sources archive into `dest`.
///
/// Entries whose names would escape `dest` are ignored.
pub fn unpack_sources(archive: &Path, dest: &Path) -> Result<usize> {
    let zip_err = |source| BundleError::Zip {
        path: archive.to_path_buf(),
        source,
    };

    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(BufReader::new(file)).map_err(zip_err)?;
    fs::create_dir_all(dest)?;

    let mut written = 0usize;
    for idx in 0..zip.len() {
        let mut entry = zip.by_index(idx).map_err(zip_err)?;
        if !entry.is_file() {
            continue;
        }
        let Some(relative) = entry.enclosed_name() else {
            log::debug!("Skipping unsafe entry {} in {}", entry.name(), archive.display());
            continue;
        };
        if relative.extension().and_then(|e| e.to_str()) != Some("java") {
            continue;
        }

        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
        written += 1;
    }
    Ok(written)
}

/// Source roots unpacked from the classpath's sources archives.
///
/// The roots live inside [`ScratchDir`]; dropping this value removes them.
pub struct ExternalSources {
    scratch: ScratchDir,
    roots: Vec<PathBuf>,
}

impl ExternalSources {
    /// Resolve and unpack sources for every archive on the classpath.
    ///
    /// Missing or broken archives are logged and skipped.
    pub fn resolve(classpath: &[PathBuf], m2_repo: &Path, checkout: &Path) -> Result<Self> {
        let scratch = ScratchDir::create_in(checkout)?;
        let mut roots = Vec::new();
        let mut seen = HashSet::new();

        for jar in classpath.iter().filter(|p| is_archive(p)) {
            if is_sources_archive(jar) {
                continue;
            }
            let Some(sources) = resolve_sources_jar(jar, m2_repo) else {
                log::debug!("No sources archive for {}", jar.display());
                continue;
            };
            if !seen.insert(sources.clone()) {
                continue;
            }

            let name = sources
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let dest = scratch.path().join(format!("{:03}-{name}", roots.len()));
            match unpack_sources(&sources, &dest) {
                Ok(count) => {
                    log::debug!("Unpacked {count} sources from {}", sources.display());
                    roots.push(dest);
                }
                Err(e) => {
                    log::warn!("Failed to unpack {}: {e}", sources.display());
                    let _ = fs::remove_dir_all(&dest);
                }
            }
        }

        log::info!("Resolved {} external source roots", roots.len());
        Ok(Self { scratch, roots })
    }

    /// Extracted roots in classpath order
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn scratch_path(&self) -> &Path {
        self.scratch.path()
    }

    pub fn close(self) -> Result<()> {
        self.scratch.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;

    fn write_jar(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for (name, body) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn parses_platform_classpath() {
        let joined = std::env::join_paths(["/a/x.jar", "/b/classes"]).unwrap();
        let parsed = parse_classpath(&joined.to_string_lossy());
        assert_eq!(parsed, vec![PathBuf::from("/a/x.jar"), PathBuf::from("/b/classes")]);
        assert!(parse_classpath("  ").is_empty());
    }

    #[test]
    fn splits_artifact_and_version() {
        assert_eq!(
            artifact_and_version(Path::new("/x/commons-lang3-3.12.0.jar")),
            Some(("commons-lang3".to_string(), "3.12.0".to_string()))
        );
        assert_eq!(artifact_and_version(Path::new("/x/plain.jar")), None);
    }

    #[test]
    fn sibling_wins_over_cache() {
        let temp = tempdir().unwrap();
        let lib = temp.path().join("lib");
        fs::create_dir_all(&lib).unwrap();
        let jar = lib.join("widget-1.0.jar");
        fs::write(&jar, b"").unwrap();
        fs::write(lib.join("widget-1.0-sources.jar"), b"").unwrap();

        let cache_dir = temp.path().join("m2").join("org").join("acme").join("widget").join("1.0");
        fs::create_dir_all(&cache_dir).unwrap();
        fs::write(cache_dir.join("widget-1.0-sources.jar"), b"").unwrap();

        let resolved = resolve_sources_jar(&jar, &temp.path().join("m2")).unwrap();
        assert_eq!(resolved, lib.join("widget-1.0-sources.jar"));
    }

    #[test]
    fn falls_back_to_cache_lookup() {
        let temp = tempdir().unwrap();
        let jar = temp.path().join("widget-1.0.jar");
        fs::write(&jar, b"").unwrap();
        let cache_dir = temp.path().join("m2").join("org").join("acme").join("widget").join("1.0");
        fs::create_dir_all(&cache_dir).unwrap();
        fs::write(cache_dir.join("widget-1.0-sources.jar"), b"").unwrap();

        let resolved = resolve_sources_jar(&jar, &temp.path().join("m2")).unwrap();
        assert_eq!(resolved, cache_dir.join("widget-1.0-sources.jar"));
        assert_eq!(
            resolve_sources_jar(&temp.path().join("other-2.0.jar"), &temp.path().join("m2")),
            None
        );
    }

    #[test]
    fn unpacks_only_java_entries() {
        let temp = tempdir().unwrap();
        let jar = temp.path().join("w-sources.jar");
        write_jar(
            &jar,
            &[
                ("com/acme/Widget.java", "package com.acme;\nclass Widget {}\n"),
                ("META-INF/MANIFEST.MF", "Manifest-Version: 1.0\n"),
            ],
        );

        let dest = temp.path().join("out");
        assert_eq!(unpack_sources(&jar, &dest).unwrap(), 1);
        assert!(dest.join("com/acme/Widget.java").is_file());
        assert!(!dest.join("META-INF").exists());
    }

    #[test]
    fn broken_archive_is_skipped_and_scratch_removed() {
        let temp = tempdir().unwrap();
        let lib = temp.path().join("lib");
        fs::create_dir_all(&lib).unwrap();
        fs::write(lib.join("broken-1.0.jar"), b"").unwrap();
        fs::write(lib.join("broken-1.0-sources.jar"), b"not a zip").unwrap();
        fs::write(lib.join("good-2.0.jar"), b"").unwrap();
        write_jar(
            &lib.join("good-2.0-sources.jar"),
            &[("org/good/Thing.java", "package org.good;\nclass Thing {}\n")],
        );

        let checkout = temp.path().join("checkout");
        fs::create_dir_all(&checkout).unwrap();
        let classpath = vec![
            lib.join("broken-1.0.jar"),
            lib.join("good-2.0.jar"),
            lib.join("classes"),
        ];

        let external =
            ExternalSources::resolve(&classpath, &temp.path().join("m2"), &checkout).unwrap();
        assert_eq!(external.roots().len(), 1);
        assert!(external.roots()[0].join("org/good/Thing.java").is_file());

        let scratch = external.scratch_path().to_path_buf();
        assert!(scratch.starts_with(&checkout));
        drop(external);
        assert!(!scratch.exists());
    }
}
