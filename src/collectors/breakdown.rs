use crate::dataset::Dataset;
use crate::formatter::format_percent;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    pub kind: String,
    pub lines: usize,
    pub share: f64,
    pub percent: String,
}

/// Line counts per language over every line of the selected commits
/// (indices into `dataset.commits()`), in order of first appearance.
/// Unknown indices are skipped. `None` when no lines are selected: there is
/// nothing to show, not a table of zeroes.
pub fn language_breakdown(dataset: &Dataset, selected: &[usize]) -> Option<Vec<BreakdownRow>> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut total = 0usize;
    for commit in selected.iter().filter_map(|&idx| dataset.commit(idx)) {
        for record in dataset.lines_of(commit) {
            match counts.iter_mut().find(|(kind, _)| *kind == record.kind) {
                Some((_, n)) => *n += 1,
                None => counts.push((record.kind.as_str(), 1)),
            }
            total += 1;
        }
    }
    if total == 0 {
        return None;
    }

    Some(
        counts
            .into_iter()
            .map(|(kind, lines)| {
                let share = lines as f64 / total as f64;
                BreakdownRow {
                    kind: kind.to_string(),
                    lines,
                    share,
                    percent: format_percent(share),
                }
            })
            .collect(),
    )
}
