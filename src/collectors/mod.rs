// Reductions over the loaded line records: per-commit rollups and the
// per-language breakdown of a selection.
pub mod breakdown;
pub mod commits;

pub use breakdown::{BreakdownRow, language_breakdown};
pub use commits::{CommitSummary, Inconsistency, aggregate_commits, check_consistency};
