use once_cell::sync::Lazy;
use regex::Regex;

static TEST_METHOD_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(@Test\s+)?public\s+void\s+\w+\s*\([^)]*\)\s*(throws\s+[\w,\s]+)?\s*\{")
        .expect("valid test method regex")
});

/// Complete `public void` methods (optionally `@Test`-annotated) found in raw text.
///
/// The body ends at the brace that balances the first `{` after the signature.
/// Braces inside strings and comments are counted too; methods that never
/// balance are skipped.
pub fn extract_test_methods(text: &str) -> Vec<String> {
    let mut methods = Vec::new();
    for found in TEST_METHOD_START.find_iter(text) {
        let start = found.start();
        let Some(open) = text[start..].find('{').map(|offset| start + offset) else {
            continue;
        };

        let mut depth = 0usize;
        for (offset, ch) in text[open..].char_indices() {
            match ch {
                '{' => depth += 1,
                '}' => depth = depth.saturating_sub(1),
                _ => continue,
            }
            if depth == 0 {
                let end = open + offset + ch.len_utf8();
                methods.push(text[start..end].trim().to_string());
                break;
            }
        }
    }
    methods
}
