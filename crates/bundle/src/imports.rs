use std::collections::BTreeSet;

const WILDCARD_SUFFIX: &str = ".*";
const STATIC_PREFIX: &str = "static ";

/// Raw imports split into single-class imports and wildcard packages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedImports {
    /// Fully-qualified class names, sorted and deduplicated
    pub concrete: Vec<String>,

    /// Packages imported with `.*`, suffix stripped, sorted and deduplicated
    pub wildcards: Vec<String>,
}

impl ClassifiedImports {
    pub fn is_empty(&self) -> bool {
        self.concrete.is_empty() && self.wildcards.is_empty()
    }
}

/// Drop static and malformed entries and split the rest by kind.
pub fn classify_imports<I, S>(raw: I) -> ClassifiedImports
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut concrete = BTreeSet::new();
    let mut wildcards = BTreeSet::new();

    for entry in raw {
        let entry = entry.as_ref().trim();
        if entry.is_empty() || entry.starts_with(STATIC_PREFIX) || entry.ends_with('.') {
            continue;
        }

        match entry.strip_suffix(WILDCARD_SUFFIX) {
            Some(pkg) => {
                if !pkg.is_empty() && !pkg.ends_with('.') {
                    wildcards.insert(pkg.to_string());
                }
            }
            None => {
                concrete.insert(entry.to_string());
            }
        }
    }

    ClassifiedImports {
        concrete: concrete.into_iter().collect(),
        wildcards: wildcards.into_iter().collect(),
    }
}

/// Last dotted segment of an import
pub fn simple_name(import: &str) -> &str {
    import.rsplit('.').next().unwrap_or(import)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn splits_concrete_and_wildcard() {
        let classified = classify_imports([
            "java.util.List",
            "com.acme.util.*",
            "static org.junit.Assert.assertEquals",
            "static org.junit.Assert.*",
            "broken.",
            "",
            "java.util.List",
            "com.acme.util.*",
            "a.b.C",
        ]);
        assert_eq!(
            classified.concrete,
            vec!["a.b.C".to_string(), "java.util.List".to_string()]
        );
        assert_eq!(classified.wildcards, vec!["com.acme.util".to_string()]);
    }

    #[test]
    fn bare_wildcard_is_dropped() {
        let classified = classify_imports(["*", ".*", "a..*"]);
        assert!(classified.wildcards.is_empty());
        assert_eq!(classified.concrete, vec!["*".to_string()]);
    }

    #[test]
    fn simple_name_is_last_segment() {
        assert_eq!(simple_name("com.acme.Widget"), "Widget");
        assert_eq!(simple_name("Widget"), "Widget");
    }

    proptest! {
        #[test]
        fn proptest_classified_imports_are_clean(
            raw in proptest::collection::vec("(static )?[a-z]{0,4}(\\.[A-Za-z]{0,4}){0,3}(\\.\\*|\\.)?", 0..24)
        ) {
            let classified = classify_imports(&raw);
            for import in classified.concrete.iter().chain(classified.wildcards.iter()) {
                prop_assert!(!import.is_empty());
                prop_assert!(!import.ends_with('.'));
                prop_assert!(!import.starts_with("static "));
            }
            for import in &classified.concrete {
                prop_assert!(!import.ends_with(".*"));
            }
            prop_assert!(classified.concrete.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(classified.wildcards.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
