use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::BundleConfig;
use crate::javadoc::{javadoc_blocks, quote_block};
use crate::scanner::read_text;

pub const NOT_FOUND_MARKER: &str = "_No Javadoc found._";
pub const NO_IMPORTS_MARKER: &str = "_No imports found._";
pub const TRUNCATION_MARKER: &str = "\n[...truncated...]\n";

/// Assembled bundle text plus what went into it
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub text: String,
    /// Imports that got a section, in order
    pub sections: Vec<String>,
    pub documented: usize,
    pub undocumented: usize,
    /// The ceiling stopped the scan before the ranked list was exhausted
    pub stopped_early: bool,
    /// The final text was cut at the ceiling
    pub truncated: bool,
}

/// Markdown header line of a bundle
pub fn bundle_header(project_name: &str) -> String {
    format!("# Library Docs Bundle for {project_name}\n\n")
}

/// Path of the compilation unit for `import` below `root`
pub fn import_source_path(import: &str, root: &Path) -> PathBuf {
    let mut path = root.to_path_buf();
    let mut segments = import.split('.').peekable();
    while let Some(segment) = segments.next() {
        if segments.peek().is_some() {
            path.push(segment);
        } else {
            path.push(format!("{segment}.java"));
        }
    }
    path
}

/// Builds the Markdown bundle from a ranked import list.
///
/// Roots are searched in order: the project's own sources first, then every
/// extracted dependency root.
pub struct BundleAssembler<'a> {
    config: &'a BundleConfig,
    roots: Vec<&'a Path>,
}

impl<'a> BundleAssembler<'a> {
    pub fn new(config: &'a BundleConfig, primary: &'a Path, external: &'a [PathBuf]) -> Self {
        let mut roots = Vec::with_capacity(external.len() + 1);
        roots.push(primary);
        roots.extend(external.iter().map(PathBuf::as_path));
        Self { config, roots }
    }

    pub fn assemble<S: AsRef<str>>(&self, project_name: &str, ranked: &[S]) -> Assembly {
        let max_chars = self.config.max_doc_chars;
        let mut assembly = Assembly {
            text: bundle_header(project_name),
            ..Default::default()
        };

        if ranked.is_empty() {
            assembly.text.push_str(NO_IMPORTS_MARKER);
            assembly.text.push('\n');
            return finish(assembly, max_chars);
        }

        let mut used_chars = assembly.text.chars().count();
        let mut seen: HashSet<&str> = HashSet::new();

        for import in ranked {
            let import: &str = import.as_ref();
            if !seen.insert(import) {
                continue;
            }
            if used_chars >= max_chars {
                assembly.stopped_early = true;
                log::debug!("Character ceiling {max_chars} reached before {import}");
                break;
            }

            let section = self.render_section(import, &mut assembly);
            used_chars += section.chars().count();
            assembly.text.push_str(&section);
            assembly.sections.push(import.to_string());
        }

        finish(assembly, max_chars)
    }

    fn render_section(&self, import: &str, assembly: &mut Assembly) -> String {
        let mut section = format!("## {import}\n");
        match self.lookup(import) {
            Some(blocks) => {
                for block in blocks.iter().take(self.config.max_blocks_per_class) {
                    section.push_str(&quote_block(block));
                }
                assembly.documented += 1;
            }
            None => {
                section.push_str(NOT_FOUND_MARKER);
                section.push('\n');
                assembly.undocumented += 1;
            }
        }
        section.push('\n');
        section
    }

    /// Blocks from the first root whose copy of the class documents anything
    fn lookup(&self, import: &str) -> Option<Vec<String>> {
        self.roots.iter().find_map(|root| {
            let path = import_source_path(import, root);
            if !path.is_file() {
                return None;
            }
            let blocks = javadoc_blocks(&read_text(&path)?);
            (!blocks.is_empty()).then_some(blocks)
        })
    }
}

fn finish(mut assembly: Assembly, max_chars: usize) -> Assembly {
    if let Some((cut, _)) = assembly.text.char_indices().nth(max_chars) {
        assembly.text.truncate(cut);
        assembly.text.push_str(TRUNCATION_MARKER);
        assembly.truncated = true;
    }
    assembly
}
