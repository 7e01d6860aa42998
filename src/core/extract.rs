//! Field extraction from a saved results page.
//!
//! Entries are `li` nodes whose class contains `arxiv-result`. Inside each
//! entry the title is the direct text of the matching `p` nodes, and the
//! abstract is every text node under the matching `span` nodes.

use crate::domain::model::{ResultEntry, SelectorSet};
use crate::utils::error::Result;
use crate::utils::validation::validate_selector;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

pub struct EntryExtractor {
    entry: Selector,
    title: Selector,
    abstract_text: Selector,
}

impl EntryExtractor {
    pub fn new(selectors: &SelectorSet) -> Result<Self> {
        Ok(Self {
            entry: validate_selector("selectors.entry", &selectors.entry)?,
            title: validate_selector("selectors.title", &selectors.title)?,
            abstract_text: validate_selector("selectors.abstract", &selectors.abstract_text)?,
        })
    }

    pub fn extract(&self, markup: &str) -> Vec<ResultEntry> {
        let document = Html::parse_document(markup);
        document
            .select(&self.entry)
            .map(|entry| ResultEntry {
                title: self.title_of(entry),
                abstract_text: self.abstract_of(entry),
            })
            .collect()
    }

    fn title_of(&self, entry: ElementRef<'_>) -> String {
        let fragments = entry
            .select(&self.title)
            .flat_map(|p| p.children())
            .filter_map(|child| child.value().as_text())
            .map(|text| normalize_whitespace(text));
        join_fragments(fragments)
    }

    fn abstract_of(&self, entry: ElementRef<'_>) -> String {
        // 巢狀的 span 也會被選到，同一個文字節點只算一次
        let mut seen = HashSet::new();
        let mut fragments = Vec::new();
        for span in entry.select(&self.abstract_text) {
            for node in span.descendants() {
                if let Some(text) = node.value().as_text() {
                    if seen.insert(node.id()) {
                        fragments.push(normalize_whitespace(text));
                    }
                }
            }
        }
        join_fragments(fragments)
    }
}

/// Trims `text` and collapses inner whitespace runs to a single space.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn join_fragments(fragments: impl IntoIterator<Item = String>) -> String {
    fragments
        .into_iter()
        .filter(|f| !f.is_empty())
        .collect::<String>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> EntryExtractor {
        EntryExtractor::new(&SelectorSet::default()).unwrap()
    }

    fn result_item(title: &str, abstract_html: &str) -> String {
        format!(
            r#"<li class="arxiv-result">
                <p class="list-title is-inline-block"><a href="https://arxiv.org/abs/1">arXiv:1</a></p>
                <p class="title is-5 mathjax">
                    {}
                </p>
                <p class="authors">Someone</p>
                <p class="abstract mathjax">
                    <span class="abstract-short has-text-grey-dark mathjax">short</span>
                    {}
                </p>
            </li>"#,
            title, abstract_html
        )
    }

    #[test]
    fn test_counts_only_marked_list_items() {
        for (marked, unmarked) in [(0, 3), (2, 0), (3, 5)] {
            let mut body = String::from("<ol class=\"breathe-horizontal\">");
            for i in 0..marked {
                body.push_str(&result_item(&format!("Paper {}", i), ""));
            }
            for i in 0..unmarked {
                body.push_str(&format!("<li class=\"other\"><p class=\"title\">Noise {}</p></li>", i));
            }
            body.push_str("</ol>");

            let entries = extractor().extract(&format!("<html><body>{}</body></html>", body));
            assert_eq!(entries.len(), marked);
        }
    }

    #[test]
    fn test_extracts_title_and_full_abstract() {
        let html = result_item(
            "Deep   Learning\n for X",
            r#"<span class="abstract-full has-text-grey-dark mathjax" style="display: none;">
                We propose...
                <a class="is-size-7" href="javascript:void(0)">&#9651; Less</a>
            </span>"#,
        );

        let entries = extractor().extract(&html);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Deep Learning for X");
        assert_eq!(entries[0].abstract_text, "We propose...△ Less");
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let html = r#"<ul><li class="arxiv-result"><p class="authors">Nobody</p></li></ul>"#;

        let entries = extractor().extract(html);
        assert_eq!(entries, vec![ResultEntry::new("", "")]);
    }

    #[test]
    fn test_title_ignores_nested_elements() {
        let html = result_item(
            r#"Learning <span class="search-hit">Machine</span> Models"#,
            "",
        );

        let entries = extractor().extract(&html);
        assert_eq!(entries[0].title, "LearningModels");
    }

    #[test]
    fn test_nested_abstract_spans_are_not_duplicated() {
        let html = r#"<ol><li class="arxiv-result">
            <span class="abstract-full">Outer <span class="abstract-full-inner">inner</span> tail</span>
        </li></ol>"#;

        let entries = extractor().extract(html);
        assert_eq!(entries[0].abstract_text, "Outerinnertail");
    }

    #[test]
    fn test_custom_selectors() {
        let selectors = SelectorSet {
            entry: "article.paper".to_string(),
            title: "h2".to_string(),
            abstract_text: "div.summary".to_string(),
        };
        let extractor = EntryExtractor::new(&selectors).unwrap();
        let entries = extractor.extract(
            r#"<article class="paper"><h2>Custom</h2><div class="summary">Body</div></article>"#,
        );

        assert_eq!(entries, vec![ResultEntry::new("Custom", "Body")]);
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n\t b  "), "a b");
        assert_eq!(normalize_whitespace("\n  "), "");
    }
}
