use crate::collectors::CommitSummary;
use crate::config::ChartConfig;
use crate::formatter::{format_full_date, format_time, html_escape};
use crate::selection::Point;

/// Gap between the cursor and the panel's nearest corner.
const CURSOR_OFFSET: f64 = 10.0;

/// What the detail panel shows for a hovered commit.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub commit_id: String,
    pub url: String,
    pub date: String,
    pub time: String,
    pub author: String,
    pub lines: String,
}

impl TooltipContent {
    pub fn for_commit(commit: &CommitSummary, config: &ChartConfig) -> Self {
        Self {
            commit_id: commit.id.clone(),
            url: config.commit_url(&commit.id),
            date: format_full_date(&commit.datetime),
            time: format_time(&commit.datetime),
            author: commit.author.clone(),
            lines: commit.total_lines.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Top-left corner for a panel of `panel` size near `cursor`. Below-right of
/// the cursor by default; on each axis where that would run past the
/// viewport it goes to the other side instead.
pub fn place_panel(cursor: Point, panel: Size, viewport: Size) -> Point {
    let mut left = cursor.x + CURSOR_OFFSET;
    if left + panel.width > viewport.width {
        left = cursor.x - CURSOR_OFFSET - panel.width;
    }
    let mut top = cursor.y + CURSOR_OFFSET;
    if top + panel.height > viewport.height {
        top = cursor.y - CURSOR_OFFSET - panel.height;
    }
    Point::new(left.max(0.0), top.max(0.0))
}

/// The detail panel as the page sees it: hidden and empty until a marker is
/// hovered.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub content: Option<TooltipContent>,
    pub visible: bool,
    pub position: Point,
    /// Measured size used for placement; the page's CSS keeps it close.
    pub size: Size,
}

impl Default for Tooltip {
    fn default() -> Self {
        Self {
            content: None,
            visible: false,
            position: Point::new(0.0, 0.0),
            size: Size {
                width: 260.0,
                height: 120.0,
            },
        }
    }
}

impl Tooltip {
    pub fn show(&mut self, content: TooltipContent) {
        self.content = Some(content);
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.content = None;
        self.visible = false;
    }

    pub fn move_to(&mut self, cursor: Point, viewport: Size) {
        self.position = place_panel(cursor, self.size, viewport);
    }

    pub fn to_html(&self) -> String {
        let empty = TooltipContent {
            commit_id: String::new(),
            url: "#".to_string(),
            date: String::new(),
            time: String::new(),
            author: String::new(),
            lines: String::new(),
        };
        let c = self.content.as_ref().unwrap_or(&empty);
        format!(
            r#"<dl id="commit-tooltip" class="info tooltip"{hidden} style="left: {left}px; top: {top}px">
  <dt>Commit</dt><dd><a id="commit-link" href="{url}" target="_blank">{id}</a></dd>
  <dt>Date</dt><dd id="commit-date">{date}</dd>
  <dt>Time</dt><dd id="commit-time">{time}</dd>
  <dt>Author</dt><dd id="commit-author">{author}</dd>
  <dt>Lines</dt><dd id="commit-lines">{lines}</dd>
</dl>
"#,
            hidden = if self.visible { "" } else { " hidden" },
            left = self.position.x,
            top = self.position.y,
            url = html_escape(&c.url),
            id = html_escape(&c.commit_id),
            date = html_escape(&c.date),
            time = html_escape(&c.time),
            author = html_escape(&c.author),
            lines = html_escape(&c.lines),
        )
    }
}
