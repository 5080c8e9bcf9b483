use crate::collectors::{CommitSummary, aggregate_commits};
use crate::records::{LineRecord, LoadError, load_records};
use std::path::Path;

/// Everything derived from one load of the per-line CSV. Immutable; a
/// reload builds a fresh `Dataset`.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<LineRecord>,
    commits: Vec<CommitSummary>,
}

impl Dataset {
    pub fn from_records(records: Vec<LineRecord>) -> Self {
        let commits = aggregate_commits(&records);
        log::debug!(
            "aggregated {} line records into {} commits",
            records.len(),
            commits.len()
        );
        Self { records, commits }
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        Ok(Self::from_records(load_records(path)?))
    }

    pub fn records(&self) -> &[LineRecord] {
        &self.records
    }

    pub fn commits(&self) -> &[CommitSummary] {
        &self.commits
    }

    pub fn commit(&self, idx: usize) -> Option<&CommitSummary> {
        self.commits.get(idx)
    }

    pub fn commit_index(&self, id: &str) -> Option<usize> {
        self.commits.iter().position(|c| c.id == id)
    }

    pub fn lines_of<'a>(&'a self, commit: &'a CommitSummary) -> impl Iterator<Item = &'a LineRecord> + 'a {
        commit.lines(&self.records)
    }
}
