use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Instant;

use crate::assembler::BundleAssembler;
use crate::config::BundleConfig;
use crate::error::{BundleError, Result};
use crate::imports::classify_imports;
use crate::project::{BugReport, ProjectLayout};
use crate::rank::{rank_imports, root_package};
use crate::resolver::ExternalSources;
use crate::scanner::SourceScanner;
use crate::wildcard::expand_wildcard;

/// Statistics about one bundle run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundleSummary {
    pub project: String,
    pub source_files: usize,
    pub root_package: String,
    pub concrete_imports: usize,
    pub wildcard_packages: usize,
    pub ranked_imports: usize,
    pub sections: usize,
    pub documented: usize,
    pub undocumented: usize,
    pub external_roots: usize,
    pub truncated: bool,
    pub chars: usize,
    pub time_ms: u64,
}

/// A finished bundle
#[derive(Debug, Clone)]
pub struct Bundle {
    pub text: String,
    pub summary: BundleSummary,
}

/// Document returned instead of a bundle when a project cannot be processed
pub fn error_document(err: &BundleError) -> String {
    format!("# Error\n\n{err}")
}

/// Builds Javadoc bundles for Java checkouts
#[derive(Debug, Clone, Default)]
pub struct BundleBuilder {
    config: BundleConfig,
}

impl BundleBuilder {
    pub fn new(config: BundleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BundleConfig {
        &self.config
    }

    /// Build the bundle, or an error document when the project is unusable
    pub fn build_document(&self, layout: Result<ProjectLayout>, bug: Option<&BugReport>) -> String {
        match layout.and_then(|layout| self.build(&layout, bug)) {
            Ok(bundle) => bundle.text,
            Err(e) => {
                log::error!("Bundle failed: {e}");
                error_document(&e)
            }
        }
    }

    pub fn build(&self, layout: &ProjectLayout, bug: Option<&BugReport>) -> Result<Bundle> {
        self.config.validate()?;
        let started = Instant::now();

        if !layout.source_dir.is_dir() {
            return Err(BundleError::SourceDirectory(layout.source_dir.clone()));
        }

        let bug_text = bug.map(BugReport::text).unwrap_or_default();
        let scan = SourceScanner::new(&layout.source_dir).scan();
        let classified = classify_imports(&scan.imports);
        let root_pkg = root_package(scan.packages.values().map(String::as_str));
        log::info!(
            "{}: {} imports, {} wildcard packages, root package '{}'",
            layout.name,
            classified.concrete.len(),
            classified.wildcards.len(),
            root_pkg
        );

        let mut candidates: BTreeSet<String> = classified.concrete.iter().cloned().collect();
        for pkg in &classified.wildcards {
            candidates.extend(expand_wildcard(
                pkg,
                &layout.source_dir,
                &bug_text,
                self.config.wildcard_limit,
            ));
        }

        let ranked: Vec<String> = rank_imports(candidates, &bug_text, &root_pkg)
            .into_iter()
            .map(|ranked| ranked.import)
            .filter(|import| !self.config.is_excluded(import))
            .collect();

        let external = self.resolve_external(layout);
        let roots = external.as_ref().map(|e| e.roots()).unwrap_or(&[]);
        let assembly = BundleAssembler::new(&self.config, &layout.source_dir, roots)
            .assemble(&layout.name, &ranked);
        let external_roots = roots.len();

        if let Some(external) = external {
            if let Err(e) = external.close() {
                log::warn!("Failed to remove extracted sources: {e}");
            }
        }

        let summary = BundleSummary {
            project: layout.name.clone(),
            source_files: scan.files,
            root_package: root_pkg,
            concrete_imports: classified.concrete.len(),
            wildcard_packages: classified.wildcards.len(),
            ranked_imports: ranked.len(),
            sections: assembly.sections.len(),
            documented: assembly.documented,
            undocumented: assembly.undocumented,
            external_roots,
            truncated: assembly.truncated,
            chars: assembly.text.chars().count(),
            time_ms: started.elapsed().as_millis() as u64,
        };
        log::info!(
            "{}: {} sections ({} documented), {} chars{}",
            summary.project,
            summary.sections,
            summary.documented,
            summary.chars,
            if summary.truncated { ", truncated" } else { "" }
        );

        Ok(Bundle {
            text: assembly.text,
            summary,
        })
    }

    fn resolve_external(&self, layout: &ProjectLayout) -> Option<ExternalSources> {
        if !self.config.also_external || layout.classpath.is_empty() {
            return None;
        }
        match ExternalSources::resolve(&layout.classpath, &self.config.m2_repo, &layout.root) {
            Ok(external) => Some(external),
            Err(e) => {
                log::warn!("External sources unavailable for {}: {e}", layout.name);
                None
            }
        }
    }
}
