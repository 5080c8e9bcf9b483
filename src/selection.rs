use crate::plot::Marker;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in chart pixels. `min` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Region {
    pub min: Point,
    pub max: Point,
}

impl Region {
    /// The rectangle with `a` and `b` as opposite corners, in any order.
    pub fn spanning(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Inclusive on every edge.
    pub fn contains(&self, p: Point) -> bool {
        self.min.x <= p.x && p.x <= self.max.x && self.min.y <= p.y && p.y <= self.max.y
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionState {
    Idle,
    Dragging { origin: Point, region: Region },
    Committed { region: Region },
}

/// What a gesture did to the selection, so the caller knows whether the
/// dependent views need recomputing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionChange {
    Unchanged,
    Updated(Region),
    Cleared,
}

/// Brush state machine: Idle -> Dragging -> Committed, back to Idle on clear.
/// Each move replaces the region; nothing is merged.
#[derive(Debug, Clone)]
pub struct SelectionTracker {
    state: SelectionState,
}

impl Default for SelectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self {
            state: SelectionState::Idle,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn region(&self) -> Option<Region> {
        match self.state {
            SelectionState::Idle => None,
            SelectionState::Dragging { region, .. } | SelectionState::Committed { region } => {
                Some(region)
            }
        }
    }

    pub fn start(&mut self, at: Point) -> SelectionChange {
        let region = Region::spanning(at, at);
        self.state = SelectionState::Dragging { origin: at, region };
        SelectionChange::Updated(region)
    }

    pub fn drag_to(&mut self, to: Point) -> SelectionChange {
        match self.state {
            SelectionState::Dragging { origin, .. } => {
                let region = Region::spanning(origin, to);
                self.state = SelectionState::Dragging { origin, region };
                SelectionChange::Updated(region)
            }
            _ => SelectionChange::Unchanged,
        }
    }

    /// Freezes the region. The final region is re-announced so the views
    /// end up consistent with what is committed.
    pub fn end(&mut self) -> SelectionChange {
        match self.state {
            SelectionState::Dragging { region, .. } => {
                self.state = SelectionState::Committed { region };
                SelectionChange::Updated(region)
            }
            _ => SelectionChange::Unchanged,
        }
    }

    pub fn clear(&mut self) -> SelectionChange {
        match self.state {
            SelectionState::Idle => SelectionChange::Unchanged,
            _ => {
                self.state = SelectionState::Idle;
                SelectionChange::Cleared
            }
        }
    }
}

/// Commits (by index) whose marker centre lies in `region`, in commit order.
/// Empty when there is no region.
pub fn selected_commits(markers: &[Marker], region: Option<&Region>) -> Vec<usize> {
    let Some(region) = region else {
        return Vec::new();
    };
    let mut selected: Vec<usize> = markers
        .iter()
        .filter(|m| region.contains(Point::new(m.cx, m.cy)))
        .map(|m| m.commit)
        .collect();
    selected.sort_unstable();
    selected
}
