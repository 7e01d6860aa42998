use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TITLE_MAX_CHARS: usize = 50;

const UNKNOWN_TITLE: &str = "Unknown title";
const NO_ABSTRACT: &str = "No abstract available";

/// One search result parsed out of the results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

impl ResultEntry {
    pub fn new(title: impl Into<String>, abstract_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            abstract_text: abstract_text.into(),
        }
    }
}

/// A text file ready to be written for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperFile {
    pub index: usize,
    pub file_name: String,
    pub content: String,
}

impl PaperFile {
    /// `index` is 1-based.
    pub fn from_entry(index: usize, entry: &ResultEntry, title_max_chars: usize) -> Self {
        Self {
            index,
            file_name: paper_file_name(index, &entry.title, title_max_chars),
            content: format!(
                "Title: {}\n\nAbstract: {}\n",
                entry.title, entry.abstract_text
            ),
        }
    }
}

/// Replaces spaces and path separators with underscores and keeps at most
/// `max_chars` characters.
pub fn sanitize_title(title: &str, max_chars: usize) -> String {
    title
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .take(max_chars)
        .collect()
}

pub fn paper_file_name(index: usize, title: &str, max_chars: usize) -> String {
    format!("{:03}_{}.txt", index, sanitize_title(title, max_chars))
}

/// A paper file read back from the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedPaper {
    pub file_name: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

impl SavedPaper {
    /// Title comes from the first `Title:` line anywhere in the file. The
    /// abstract starts at the `Abstract:` line and runs to the end of the
    /// file; every line is trimmed and joined with one space, so a blank line
    /// leaves a double space. The abstract default applies only when no
    /// `Abstract:` line exists.
    pub fn parse(file_name: impl Into<String>, content: &str) -> Self {
        let mut title = None;
        let mut abstract_parts: Option<Vec<&str>> = None;

        for line in content.lines() {
            if title.is_none() {
                if let Some(rest) = line.strip_prefix("Title:") {
                    title = Some(rest.trim().to_string());
                }
            }

            if let Some(rest) = line.strip_prefix("Abstract:") {
                abstract_parts.get_or_insert_with(Vec::new).push(rest.trim());
            } else if let Some(parts) = abstract_parts.as_mut() {
                parts.push(line.trim());
            }
        }

        Self {
            file_name: file_name.into(),
            title: title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            abstract_text: match abstract_parts {
                Some(parts) => parts.join(" ").trim().to_string(),
                None => NO_ABSTRACT.to_string(),
            },
        }
    }
}

/// CSS selectors used to locate entries and their fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorSet {
    pub entry: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

impl Default for SelectorSet {
    fn default() -> Self {
        Self {
            entry: r#"li[class*="arxiv-result"]"#.to_string(),
            title: r#"p[class*="title"]"#.to_string(),
            abstract_text: r#"span[class*="abstract-full"]"#.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPolicy {
    /// Wait between scrolling and re-reading the height.
    pub interval: Duration,
    /// Consecutive unchanged readings required to stop.
    pub stable_reads: usize,
    /// Upper bound on scroll rounds; `None` polls until stable.
    pub max_rounds: Option<usize>,
}

impl Default for ScrollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            stable_reads: 1,
            max_rounds: Some(50),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollOutcome {
    pub rounds: usize,
    pub final_height: u64,
    pub converged: bool,
}

/// The markup file written by the acquisition stage.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub markup_path: String,
    pub bytes: usize,
    /// `None` when an existing markup file was reused.
    pub scroll: Option<ScrollOutcome>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub entries: Vec<ResultEntry>,
    pub files: Vec<PaperFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub output_dir: String,
    pub files_written: usize,
    /// Files from an earlier run that held different content.
    pub overwritten: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub markup_path: String,
    pub scroll: Option<ScrollOutcome>,
    pub entries: usize,
    pub output_dir: String,
    pub files_written: usize,
    pub overwritten: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_paper_file_format() {
        let entry = ResultEntry::new("Deep Learning for X", "We propose...");
        let file = PaperFile::from_entry(1, &entry, DEFAULT_TITLE_MAX_CHARS);

        assert_eq!(file.file_name, "001_Deep_Learning_for_X.txt");
        assert_eq!(
            file.content,
            "Title: Deep Learning for X\n\nAbstract: We propose...\n"
        );
    }

    #[test]
    fn test_long_title_is_truncated_by_characters() {
        let title = "A".repeat(30) + " " + &"é".repeat(49);
        assert_eq!(title.chars().count(), 80);

        let name = paper_file_name(2, &title, DEFAULT_TITLE_MAX_CHARS);
        let expected = "A".repeat(30) + "_" + &"é".repeat(19);
        assert_eq!(name, format!("002_{}.txt", expected));
    }

    #[test]
    fn test_file_names_are_safe_for_every_index() {
        let pattern = Regex::new(r"^\d{3}_.{0,50}\.txt$").unwrap();
        let titles = [
            "",
            "Deep Learning for X",
            "Input/Output of a\\Windows path",
            "Attention Is All You Need: a very long title that keeps on going and going",
            "   leading spaces",
        ];

        for index in 1..=999 {
            let title = titles[index % titles.len()];
            let name = paper_file_name(index, title, DEFAULT_TITLE_MAX_CHARS);
            assert!(pattern.is_match(&name), "bad file name: {}", name);
            assert!(!name.contains(' '));
            assert!(!name.contains('/'));
            assert!(!name.contains('\\'));
        }
    }

    #[test]
    fn test_sanitize_keeps_other_characters() {
        assert_eq!(sanitize_title("a: \"b\"", 50), "a:_\"b\"");
        assert_eq!(sanitize_title("a/b c", 2), "a_");
    }

    #[test]
    fn test_saved_paper_parse() {
        let paper = SavedPaper::parse(
            "001_x.txt",
            "Title: Deep Learning for X\n\nAbstract: We propose\n a method.\n",
        );
        assert_eq!(paper.title, "Deep Learning for X");
        assert_eq!(paper.abstract_text, "We propose a method.");

        let paper = SavedPaper::parse("003_z.txt", "random notes\n");
        assert_eq!(paper.title, "Unknown title");
        assert_eq!(paper.abstract_text, "No abstract available");
    }

    #[test]
    fn test_saved_paper_empty_abstract_is_kept_empty() {
        let paper = SavedPaper::parse("002_y.txt", "Title: Only a title\n\nAbstract: \n");
        assert_eq!(paper.title, "Only a title");
        assert_eq!(paper.abstract_text, "");
    }

    #[test]
    fn test_saved_paper_title_after_abstract() {
        let paper = SavedPaper::parse("004_w.txt", "Abstract: a\nTitle: Late\n");
        assert_eq!(paper.title, "Late");
        assert_eq!(paper.abstract_text, "a Title: Late");
    }

    #[test]
    fn test_saved_paper_blank_line_inside_abstract() {
        let paper = SavedPaper::parse("005_v.txt", "Title: T\n\nAbstract: first\n\nsecond\n");
        assert_eq!(paper.abstract_text, "first  second");
    }

    #[test]
    fn test_default_scroll_policy() {
        let policy = ScrollPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(2));
        assert_eq!(policy.stable_reads, 1);
        assert_eq!(policy.max_rounds, Some(50));
    }
}
