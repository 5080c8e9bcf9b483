use crate::collectors::CommitSummary;
use crate::formatter::html_escape;
use crate::records::LineRecord;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Corpus-wide numbers shown above the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub commits: usize,
    pub files: usize,
    pub total_lines: usize,
    pub max_depth: Option<u32>,
    pub longest_line: Option<u32>,
    /// Largest number of lines in any single file.
    pub max_lines: Option<usize>,
}

pub fn summarize(records: &[LineRecord], commits: &[CommitSummary]) -> SummaryStats {
    let files: HashSet<&str> = records.iter().map(|r| r.file.as_str()).collect();
    let mut per_file: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *per_file.entry(record.file.as_str()).or_insert(0) += 1;
    }

    SummaryStats {
        commits: commits.len(),
        files: files.len(),
        total_lines: records.len(),
        max_depth: records.iter().map(|r| r.depth).max(),
        longest_line: records.iter().map(|r| r.length).max(),
        max_lines: per_file.into_values().max(),
    }
}

impl SummaryStats {
    /// Label/value pairs in display order. Missing maxima render as empty.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        fn opt<T: ToString>(v: Option<T>) -> String {
            v.map(|v| v.to_string()).unwrap_or_default()
        }
        vec![
            ("Commits", self.commits.to_string()),
            ("Files", self.files.to_string()),
            ("Total LOC", self.total_lines.to_string()),
            ("Max Depth", opt(self.max_depth)),
            ("Longest Line", opt(self.longest_line)),
            ("Max Lines", opt(self.max_lines)),
        ]
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from("<h2>Summary</h2>\n<dl class=\"stats\">\n");
        for (label, value) in self.entries() {
            html.push_str(&format!(
                "  <dt>{}</dt><dd>{}</dd>\n",
                html_escape(label),
                html_escape(&value)
            ));
        }
        html.push_str("</dl>\n");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::aggregate_commits;
    use crate::collectors::commits::tests::record;

    #[test]
    fn test_summary_reductions() {
        let mut deep = record("b", "b.css", 1, "css");
        deep.depth = 7;
        deep.length = 120;
        let records = vec![
            record("a", "a.js", 1, "js"),
            record("a", "a.js", 2, "js"),
            record("a", "a.js", 3, "js"),
            deep,
            record("b", "b.css", 2, "css"),
        ];
        let commits = aggregate_commits(&records);
        let stats = summarize(&records, &commits);
        assert_eq!(
            stats,
            SummaryStats {
                commits: 2,
                files: 2,
                total_lines: 5,
                max_depth: Some(7),
                longest_line: Some(120),
                max_lines: Some(3),
            }
        );
    }

    #[test]
    fn test_empty_dataset() {
        let stats = summarize(&[], &[]);
        assert_eq!(stats.total_lines, 0);
        assert_eq!(stats.max_depth, None);
        assert_eq!(stats.max_lines, None);
        assert_eq!(stats.entries()[3], ("Max Depth", String::new()));
    }

    #[test]
    fn test_html_lists_every_label() {
        let records = vec![record("a", "a.js", 1, "js")];
        let commits = aggregate_commits(&records);
        let html = summarize(&records, &commits).to_html();
        assert!(html.starts_with("<h2>Summary</h2>"));
        for label in ["Commits", "Files", "Total LOC", "Max Depth", "Longest Line", "Max Lines"] {
            assert!(html.contains(&format!("<dt>{label}</dt>")), "missing {label}");
        }
        assert!(html.contains("<dt>Total LOC</dt><dd>1</dd>"));
    }
}
