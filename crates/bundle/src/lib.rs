//! # Libdocs Bundle
//!
//! Compact, size-bounded Javadoc digests for Java checkouts, meant to be
//! pasted into an LLM prompt next to a bug report.
//!
//! ## Pipeline
//!
//! ```text
//! Source directory
//!     │
//!     ├──> Source Scanner
//!     │      └─> raw imports + package declarations
//!     │
//!     ├──> Import Classifier
//!     │      ├─> concrete imports
//!     │      └─> wildcard packages ──> Wildcard Expander (bug-text aware)
//!     │
//!     ├──> Relevance Ranker (own project +5, mentioned in bug +3)
//!     │
//!     └──> Bundle Assembler
//!            ├─> local sources
//!            └─> External Source Resolver (-sources archives, unpacked to scratch)
//!                   └─> Javadoc Extractor ──> Markdown bundle
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use libdocs_bundle::{BugReport, BundleBuilder, BundleConfig, LayoutProbe};
//!
//! let layout = LayoutProbe::default().probe(std::path::Path::new("/repos/Lang_1"));
//! let bug = BugReport {
//!     title: "StringUtils.abbreviate fails".into(),
//!     description: String::new(),
//! };
//! let text = BundleBuilder::new(BundleConfig::default()).build_document(layout, Some(&bug));
//! println!("{text}");
//! ```

mod assembler;
mod builder;
mod config;
mod error;
mod imports;
mod javadoc;
mod project;
mod rank;
mod resolver;
mod scanner;
mod test_methods;
mod wildcard;

pub use assembler::{
    bundle_header, import_source_path, Assembly, BundleAssembler, NOT_FOUND_MARKER,
    NO_IMPORTS_MARKER, TRUNCATION_MARKER,
};
pub use builder::{error_document, Bundle, BundleBuilder, BundleSummary};
pub use config::{default_m2_repo, BundleConfig, JDK_PREFIXES};
pub use error::{BundleError, Result};
pub use imports::{classify_imports, simple_name, ClassifiedImports};
pub use javadoc::{javadoc_blocks, quote_block};
pub use project::{
    is_defects4j_checkout, project_name, BugReport, LayoutProbe, ProjectLayout, DEFECTS4J_CONFIG,
};
pub use rank::{rank_imports, root_package, score_import, RankedImport};
pub use resolver::{
    artifact_and_version, cached_sources_jar, parse_classpath, resolve_sources_jar,
    sibling_sources_jar, unpack_sources, ExternalSources, ScratchDir,
};
pub use scanner::{package_of, raw_imports, read_text, ScanResult, SourceScanner};
pub use test_methods::extract_test_methods;
pub use wildcard::expand_wildcard;
