use once_cell::sync::Lazy;
use regex::Regex;

/// A doc comment followed by a token that starts a declaration. The body can
/// never contain `*/`, so a dangling comment does not swallow the next one.
static DOC_BEFORE_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"/\*\*((?:[^*]|\*+[^*/])*)\*+/\s*(?:public|protected|private|class|interface|enum|@)",
    )
    .expect("valid javadoc regex")
});

static LEADING_STAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*\*[ \t]?").expect("valid leading star regex"));

/// Javadoc blocks of one compilation unit, in source order.
///
/// Only comments directly in front of a modifier, a type keyword or an
/// annotation count. Each line loses its leading `*`; blank blocks are dropped.
pub fn javadoc_blocks(java_text: &str) -> Vec<String> {
    DOC_BEFORE_DECL
        .captures_iter(java_text)
        .filter_map(|caps| {
            let raw = caps.get(1)?.as_str();
            let block = LEADING_STAR.replace_all(raw, "");
            let block = block.trim();
            (!block.is_empty()).then(|| block.to_string())
        })
        .collect()
}

/// Render a block as a Markdown quote.
pub fn quote_block(block: &str) -> String {
    format!("> {}\n", block.replace('\n', "\n> "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
/*
 * License header, not Javadoc.
 */
package com.acme;

/**
 * A widget.
 *
 * @since 1.0
 */
public class Widget {

    /** The size. */
    private int size;

    /**
     * Resizes the widget.
     * @param size new size
     */
    @Deprecated
    void resize(int size) {}

    /** Dangling comment before a statement. */
    int x = 1;

    /**
     *
     */
    public void empty() {}
}
"#;

    #[test]
    fn extracts_blocks_before_declarations() {
        let blocks = javadoc_blocks(SAMPLE);
        assert_eq!(
            blocks,
            vec![
                "A widget.\n\n@since 1.0".to_string(),
                "The size.".to_string(),
                "Resizes the widget.\n@param size new size".to_string(),
            ]
        );
    }

    #[test]
    fn interface_and_enum_keywords_count() {
        let blocks = javadoc_blocks("/** Shape. */ interface Shape {}\n/** Color. */\nenum Color {}");
        assert_eq!(blocks, vec!["Shape.".to_string(), "Color.".to_string()]);
    }

    #[test]
    fn dangling_comment_does_not_reach_the_next_one() {
        let text = "/** dangling */ int x;\n/** kept */ public int y;";
        assert_eq!(javadoc_blocks(text), vec!["kept".to_string()]);
    }

    #[test]
    fn empty_text_has_no_blocks() {
        assert!(javadoc_blocks("").is_empty());
        assert!(javadoc_blocks("class A {}").is_empty());
    }

    #[test]
    fn quotes_every_line() {
        assert_eq!(quote_block("first\nsecond"), "> first\n> second\n");
    }
}
