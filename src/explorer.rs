use crate::actions::Action;
use crate::collectors::{BreakdownRow, CommitSummary, language_breakdown};
use crate::config::ChartConfig;
use crate::dataset::Dataset;
use crate::formatter::format_selection_count;
use crate::plot::{MarkerState, Scatterplot};
use crate::selection::{Region, SelectionChange, SelectionTracker, selected_commits};
use crate::summary::{SummaryStats, summarize};
use crate::tooltip::{Size, Tooltip, TooltipContent};

/// Everything the page displays that interaction can change. Each field
/// stands in for one mount point on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Indexed by commit.
    pub markers: Vec<MarkerState>,
    pub tooltip: Tooltip,
    pub selection_count: String,
    /// `None` removes the breakdown from the page.
    pub breakdown: Option<Vec<BreakdownRow>>,
}

/// Owns a loaded dataset and all interaction state for the commit chart.
/// Feed it `Action`s; read the results from `view()`.
#[derive(Debug, Clone)]
pub struct Explorer {
    dataset: Dataset,
    summary: SummaryStats,
    plot: Scatterplot,
    tracker: SelectionTracker,
    selected: Vec<usize>,
    hovered: Option<usize>,
    view: ViewState,
}

impl Explorer {
    pub fn new(dataset: Dataset, config: &ChartConfig) -> Self {
        let summary = summarize(dataset.records(), dataset.commits());
        let plot = Scatterplot::build(dataset.commits(), config);
        let view = ViewState {
            markers: vec![MarkerState::default(); dataset.commits().len()],
            tooltip: Tooltip::default(),
            selection_count: format_selection_count(0),
            breakdown: None,
        };
        Self {
            dataset,
            summary,
            plot,
            tracker: SelectionTracker::new(),
            selected: Vec::new(),
            hovered: None,
            view,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn summary(&self) -> &SummaryStats {
        &self.summary
    }

    pub fn plot(&self) -> &Scatterplot {
        &self.plot
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn region(&self) -> Option<Region> {
        self.tracker.region()
    }

    pub fn tracker(&self) -> &SelectionTracker {
        &self.tracker
    }

    /// Indices of the selected commits, in commit order.
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    pub fn selected_commits(&self) -> impl Iterator<Item = &CommitSummary> + '_ {
        self.selected
            .iter()
            .filter_map(|&idx| self.dataset.commit(idx))
    }

    pub fn dispatch(&mut self, action: Action) {
        log::debug!("dispatch {action:?}");
        let change = match action {
            Action::GestureStart(at) => self.tracker.start(at),
            Action::GestureMove(to) => self.tracker.drag_to(to),
            Action::GestureEnd => self.tracker.end(),
            Action::ClearSelection => self.tracker.clear(),
            Action::PointerEnter { commit, cursor } => {
                self.hover(commit, cursor);
                SelectionChange::Unchanged
            }
            Action::PointerMove(cursor) => {
                if self.view.tooltip.visible {
                    self.view.tooltip.move_to(cursor, self.viewport());
                }
                SelectionChange::Unchanged
            }
            Action::PointerLeave => {
                self.unhover();
                SelectionChange::Unchanged
            }
        };

        match change {
            SelectionChange::Unchanged => {}
            SelectionChange::Updated(region) => self.apply_region(Some(region)),
            SelectionChange::Cleared => self.apply_region(None),
        }
    }

    pub fn dispatch_all(&mut self, actions: impl IntoIterator<Item = Action>) {
        for action in actions {
            self.dispatch(action);
        }
    }

    fn viewport(&self) -> Size {
        Size {
            width: self.plot.config.viewport_width,
            height: self.plot.config.viewport_height,
        }
    }

    fn hover(&mut self, commit: usize, cursor: crate::selection::Point) {
        let Some(summary) = self.dataset.commit(commit) else {
            log::warn!("pointer entered unknown commit index {commit}");
            return;
        };
        let content = TooltipContent::for_commit(summary, &self.plot.config);
        self.unhover();
        self.view.markers[commit].hovered = true;
        self.hovered = Some(commit);
        self.view.tooltip.show(content);
        self.view.tooltip.move_to(cursor, self.viewport());
    }

    fn unhover(&mut self) {
        if let Some(prev) = self.hovered.take() {
            self.view.markers[prev].hovered = false;
        }
        self.view.tooltip.hide();
    }

    // Recomputes everything that depends on the brush. `None` is the idle
    // state: flags off and no breakdown at all.
    fn apply_region(&mut self, region: Option<Region>) {
        self.selected = selected_commits(&self.plot.markers, region.as_ref());
        for state in &mut self.view.markers {
            state.selected = false;
        }
        for &idx in &self.selected {
            self.view.markers[idx].selected = true;
        }
        self.view.selection_count = format_selection_count(self.selected.len());
        self.view.breakdown = match region {
            Some(_) => language_breakdown(&self.dataset, &self.selected),
            None => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::commits::tests::record;
    use crate::selection::{Point, SelectionState};

    // Commit A: 3 js lines at 14:30 on day 1. Commit B: 2 css lines at 14:30
    // on day 2. Both land on the same row; A at the left edge, B at the right.
    fn explorer() -> Explorer {
        let mut records = vec![
            record("A", "a.js", 1, "js"),
            record("A", "a.js", 2, "js"),
            record("A", "a.js", 3, "js"),
        ];
        for line in 1..=2 {
            let mut r = record("B", "b.css", line, "css");
            r.datetime = r.datetime + chrono::Duration::days(1);
            records.push(r);
        }
        Explorer::new(Dataset::from_records(records), &ChartConfig::default())
    }

    fn marker_pos(ex: &Explorer, id: &str) -> Point {
        let idx = ex.dataset().commit_index(id).unwrap();
        let m = ex.plot().marker_for_commit(idx).unwrap();
        Point::new(m.cx, m.cy)
    }

    fn brush(ex: &mut Explorer, a: Point, b: Point) {
        ex.dispatch_all([Action::GestureStart(a), Action::GestureMove(b), Action::GestureEnd]);
    }

    #[test]
    fn test_selecting_one_commit() {
        let mut ex = explorer();
        let a = marker_pos(&ex, "A");
        brush(&mut ex, Point::new(a.x - 5.0, a.y - 5.0), Point::new(a.x + 5.0, a.y + 5.0));

        assert_eq!(ex.selected(), &[0]);
        assert_eq!(ex.view().selection_count, "1 commits selected");
        let rows = ex.view().breakdown.as_ref().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!((rows[0].kind.as_str(), rows[0].lines, rows[0].percent.as_str()), ("js", 3, "100.0%"));
        assert!(ex.view().markers[0].selected);
        assert!(!ex.view().markers[1].selected);
    }

    #[test]
    fn test_selecting_both_commits() {
        let mut ex = explorer();
        brush(&mut ex, Point::new(0.0, 0.0), Point::new(1000.0, 600.0));

        assert_eq!(ex.view().selection_count, "2 commits selected");
        let rows = ex.view().breakdown.as_ref().unwrap();
        let total: usize = rows.iter().map(|r| r.lines).sum();
        assert_eq!(total, 5);
        let percents: Vec<&str> = rows.iter().map(|r| r.percent.as_str()).collect();
        assert_eq!(percents, vec!["60.0%", "40.0%"]);
    }

    #[test]
    fn test_region_exactly_on_marker_is_inclusive() {
        let mut ex = explorer();
        let b = marker_pos(&ex, "B");
        brush(&mut ex, b, b);
        assert_eq!(ex.selected(), &[1]);
    }

    #[test]
    fn test_intermediate_moves_update_views() {
        let mut ex = explorer();
        let a = marker_pos(&ex, "A");
        ex.dispatch(Action::GestureStart(Point::new(0.0, 0.0)));
        assert_eq!(ex.view().selection_count, "No commits selected");
        assert_eq!(ex.view().breakdown, None);

        ex.dispatch(Action::GestureMove(Point::new(a.x, a.y)));
        assert!(matches!(ex.tracker().state(), SelectionState::Dragging { .. }));
        assert_eq!(ex.view().selection_count, "1 commits selected");
        assert!(ex.view().breakdown.is_some());
    }

    #[test]
    fn test_clear_removes_breakdown() {
        let mut ex = explorer();
        brush(&mut ex, Point::new(0.0, 0.0), Point::new(1000.0, 600.0));
        ex.dispatch(Action::ClearSelection);

        assert_eq!(ex.region(), None);
        assert!(ex.selected().is_empty());
        assert_eq!(ex.view().breakdown, None);
        assert!(ex.view().markers.iter().all(|m| !m.selected));
        assert_eq!(ex.view().selection_count, "No commits selected");
    }

    #[test]
    fn test_hover_shows_and_hides_details() {
        let mut ex = explorer();
        ex.dispatch(Action::PointerEnter {
            commit: 1,
            cursor: Point::new(100.0, 100.0),
        });
        let tip = &ex.view().tooltip;
        assert!(tip.visible);
        assert_eq!(tip.position, Point::new(110.0, 110.0));
        let content = tip.content.as_ref().unwrap();
        assert_eq!(content.commit_id, "B");
        assert_eq!(content.lines, "2");
        assert_eq!(content.author, "Ada");
        assert_eq!(ex.view().markers[1].fill_opacity(), 1.0);

        ex.dispatch(Action::PointerMove(Point::new(1270.0, 790.0)));
        let pos = ex.view().tooltip.position;
        assert!(pos.x < 1270.0 && pos.y < 790.0);

        ex.dispatch(Action::PointerLeave);
        assert!(!ex.view().tooltip.visible);
        assert_eq!(ex.view().tooltip.content, None);
        assert_eq!(ex.view().markers[1].fill_opacity(), 0.7);
    }

    #[test]
    fn test_hovering_unknown_commit_is_ignored() {
        let mut ex = explorer();
        ex.dispatch(Action::PointerEnter {
            commit: 42,
            cursor: Point::new(1.0, 1.0),
        });
        assert!(!ex.view().tooltip.visible);
    }

    #[test]
    fn test_pointer_move_without_hover_keeps_panel_hidden() {
        let mut ex = explorer();
        ex.dispatch(Action::PointerMove(Point::new(10.0, 10.0)));
        assert!(!ex.view().tooltip.visible);
        assert_eq!(ex.view().tooltip.position, Point::new(0.0, 0.0));
    }
}
