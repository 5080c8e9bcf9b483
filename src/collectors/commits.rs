use crate::dataset::Dataset;
use crate::records::LineRecord;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::collections::HashMap;

/// Per-commit rollup of the line records blamed to that commit.
/// Author and timestamp come from the commit's first line record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitSummary {
    pub id: String,
    pub author: String,
    pub datetime: DateTime<FixedOffset>,
    pub timezone: String,
    pub hour_fraction: f64,
    pub total_lines: usize,
    // Indices into the record slice the summary was built from, in load order.
    #[serde(skip)]
    lines: Vec<usize>,
}

impl CommitSummary {
    /// The commit's records, looked up in the slice it was aggregated from.
    /// Only `Dataset` pairs a summary with its slice.
    pub(crate) fn lines<'a>(&'a self, records: &'a [LineRecord]) -> impl Iterator<Item = &'a LineRecord> + 'a {
        self.lines.iter().map(move |&idx| &records[idx])
    }

    pub fn is_night(&self) -> bool {
        self.hour_fraction < 6.0 || self.hour_fraction > 18.0
    }
}

/// Groups records by commit id, keeping the order in which ids are first seen.
pub fn aggregate_commits(records: &[LineRecord]) -> Vec<CommitSummary> {
    let mut slot_of: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (idx, record) in records.iter().enumerate() {
        let slot = *slot_of.entry(record.commit_id.as_str()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(idx);
    }

    groups
        .into_iter()
        .map(|lines| {
            let first = &records[lines[0]];
            CommitSummary {
                id: first.commit_id.clone(),
                author: first.author.clone(),
                datetime: first.datetime,
                timezone: first.timezone.clone(),
                hour_fraction: crate::records::hour_fraction(&first.datetime),
                total_lines: lines.len(),
                lines,
            }
        })
        .collect()
}

/// A line record that disagrees with the first line of its commit.
#[derive(Debug, Clone, PartialEq)]
pub struct Inconsistency {
    pub commit_id: String,
    pub field: &'static str,
    pub expected: String,
    pub found: String,
}

/// Reports commits whose lines do not all share the first line's author,
/// timestamp and timezone. Aggregation itself never consults this.
pub fn check_consistency(dataset: &Dataset) -> Vec<Inconsistency> {
    let mut found = Vec::new();
    for commit in dataset.commits() {
        // One finding per field per commit is enough to flag it.
        let mut flagged: Vec<&'static str> = Vec::new();
        for record in dataset.lines_of(commit) {
            let checks = [
                ("author", commit.author.clone(), record.author.clone()),
                ("datetime", commit.datetime.to_rfc3339(), record.datetime.to_rfc3339()),
                ("timezone", commit.timezone.clone(), record.timezone.clone()),
            ];
            for (field, expected, actual) in checks {
                if expected != actual && !flagged.contains(&field) {
                    flagged.push(field);
                    found.push(Inconsistency {
                        commit_id: commit.id.clone(),
                        field,
                        expected,
                        found: actual,
                    });
                }
            }
        }
    }
    found
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    pub fn record(commit: &str, file: &str, line: u32, kind: &str) -> LineRecord {
        let datetime = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 2, 24, 14, 30, 0)
            .unwrap();
        LineRecord {
            commit_id: commit.to_string(),
            file: file.to_string(),
            line,
            depth: 0,
            length: 10,
            kind: kind.to_string(),
            author: "Ada".to_string(),
            datetime,
            timezone: "+00:00".to_string(),
            hour_fraction: 14.5,
        }
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let records = vec![
            record("b", "x.js", 1, "js"),
            record("a", "x.js", 2, "js"),
            record("b", "y.css", 1, "css"),
        ];
        let commits = aggregate_commits(&records);
        let ids: Vec<&str> = commits.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(commits[0].total_lines, 2);
        let files: Vec<&str> = commits[0].lines(&records).map(|r| r.file.as_str()).collect();
        assert_eq!(files, vec!["x.js", "y.css"]);
        assert_eq!(commits[0].hour_fraction, 14.5);
    }

    #[test]
    fn test_empty_input_has_no_commits() {
        assert!(aggregate_commits(&[]).is_empty());
    }

    #[test]
    fn test_consistency_check_reports_author_mismatch_once() {
        let mut odd = record("a", "x.js", 2, "js");
        odd.author = "Grace".to_string();
        let mut odder = record("a", "x.js", 3, "js");
        odder.author = "Linus".to_string();
        let dataset = Dataset::from_records(vec![record("a", "x.js", 1, "js"), odd, odder]);
        let issues = check_consistency(&dataset);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "author");
        assert_eq!(issues[0].expected, "Ada");
        assert_eq!(issues[0].found, "Grace");
        // The aggregate still trusts the first line.
        assert_eq!(dataset.commits()[0].author, "Ada");
    }

    #[test]
    fn test_consistency_check_reports_datetime_and_timezone() {
        let first = record("a", "x.js", 1, "js");
        let mut shifted = record("a", "x.js", 2, "js");
        shifted.datetime = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 2, 25, 9, 0, 0)
            .unwrap();
        shifted.timezone = "+02:00".to_string();
        let mut shifted_again = shifted.clone();
        shifted_again.line = 3;
        let dataset = Dataset::from_records(vec![
            first.clone(),
            shifted,
            shifted_again,
            record("b", "y.js", 1, "js"),
        ]);

        let issues = check_consistency(&dataset);
        let fields: Vec<&str> = issues.iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["datetime", "timezone"]);
        assert!(issues.iter().all(|i| i.commit_id == "a"));
        assert_eq!(issues[0].expected, "2025-02-24T14:30:00+00:00");
        assert_eq!(issues[0].found, "2025-02-25T09:00:00+02:00");
        assert_eq!(issues[1].expected, "+00:00");
        assert_eq!(issues[1].found, "+02:00");

        let commit = &dataset.commits()[0];
        assert_eq!(commit.datetime, first.datetime);
        assert_eq!(commit.timezone, "+00:00");
        assert_eq!(commit.hour_fraction, 14.5);
    }

    #[test]
    fn test_consistent_commits_report_nothing() {
        let dataset =
            Dataset::from_records(vec![record("a", "x.js", 1, "js"), record("a", "x.js", 2, "js")]);
        assert!(check_consistency(&dataset).is_empty());
    }

    proptest! {
        #[test]
        fn pbt_one_summary_per_commit_id(ids in proptest::collection::vec(0u8..6, 0..200)) {
            let records: Vec<LineRecord> = ids
                .iter()
                .enumerate()
                .map(|(i, id)| record(&format!("c{id}"), "f.rs", i as u32 + 1, "rs"))
                .collect();
            let commits = aggregate_commits(&records);

            let mut distinct: Vec<u8> = ids.clone();
            distinct.sort();
            distinct.dedup();
            prop_assert_eq!(commits.len(), distinct.len());

            for commit in &commits {
                let expected = records.iter().filter(|r| r.commit_id == commit.id).count();
                prop_assert_eq!(commit.total_lines, expected);
                prop_assert_eq!(commit.lines(&records).count(), commit.total_lines);
            }
            let total: usize = commits.iter().map(|c| c.total_lines).sum();
            prop_assert_eq!(total, records.len());
        }
    }
}
