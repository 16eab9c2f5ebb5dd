use std::collections::{BTreeMap, BTreeSet};

use crate::imports::simple_name;

const OWN_PROJECT_BONUS: u32 = 5;
const BUG_MENTION_BONUS: u32 = 3;

/// An import together with its relevance score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedImport {
    pub import: String,
    pub score: u32,
}

/// Most frequent two-segment package prefix; empty when there are no packages.
///
/// Ties go to the lexicographically smallest prefix.
pub fn root_package<'a, I>(packages: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for pkg in packages {
        let root = pkg.split('.').take(2).collect::<Vec<_>>().join(".");
        if root.is_empty() {
            continue;
        }
        *counts.entry(root).or_insert(0) += 1;
    }

    let mut best: Option<(&String, usize)> = None;
    for (root, &count) in &counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((root, count));
        }
    }
    best.map(|(root, _)| root.clone()).unwrap_or_default()
}

/// Relevance of one import to the project and the bug report
pub fn score_import(import: &str, bug_lc: &str, root_pkg: &str) -> u32 {
    let mut score = 0;
    if !root_pkg.is_empty()
        && import
            .strip_prefix(root_pkg)
            .is_some_and(|rest| rest.starts_with('.'))
    {
        score += OWN_PROJECT_BONUS;
    }

    let simple = simple_name(import).to_lowercase();
    if !simple.is_empty() && bug_lc.contains(&simple) {
        score += BUG_MENTION_BONUS;
    }
    score
}

/// Order imports by descending score, ties by ascending name.
pub fn rank_imports<I, S>(imports: I, bug_text: &str, root_pkg: &str) -> Vec<RankedImport>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let bug_lc = bug_text.to_lowercase();
    let unique: BTreeSet<String> = imports.into_iter().map(Into::into).collect();

    let mut ranked: Vec<RankedImport> = unique
        .into_iter()
        .map(|import| {
            let score = score_import(&import, &bug_lc, root_pkg);
            RankedImport { import, score }
        })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.import.cmp(&b.import)));
    ranked
}
