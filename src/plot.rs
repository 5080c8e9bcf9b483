use crate::collectors::CommitSummary;
use crate::config::{ChartConfig, UsableArea};
use crate::formatter::{fmt_coord, format_hour_label, html_escape};
use crate::scales::{LinearScale, SqrtScale, TimeScale};
use crate::selection::Region;

pub const DAY_COLOR: &str = "orange";
pub const NIGHT_COLOR: &str = "steelblue";
pub const DEFAULT_OPACITY: f64 = 0.7;
pub const HOVER_OPACITY: f64 = 1.0;

const HOUR_TICKS: usize = 10;
const TIME_TICKS: usize = 10;

/// A commit's circle on the chart, in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Index into the commit slice the plot was built from.
    pub commit: usize,
    pub id: String,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub fill: &'static str,
}

/// Per-marker styling that changes with interaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerState {
    pub hovered: bool,
    pub selected: bool,
}

impl MarkerState {
    pub fn fill_opacity(&self) -> f64 {
        if self.hovered { HOVER_OPACITY } else { DEFAULT_OPACITY }
    }
}

/// Scales and marker layout for the commit scatterplot: x is commit time,
/// y is hour of day, area is lines of code.
#[derive(Debug, Clone)]
pub struct Scatterplot {
    pub config: ChartConfig,
    pub area: UsableArea,
    /// `None` when there are no commits to take a time domain from.
    pub x: Option<TimeScale>,
    pub y: LinearScale,
    pub r: SqrtScale,
    /// Largest first so small markers stay on top and hoverable.
    pub markers: Vec<Marker>,
}

impl Scatterplot {
    pub fn build(commits: &[CommitSummary], config: &ChartConfig) -> Self {
        let area = config.usable_area();
        let y = LinearScale::new((0.0, 24.0), (area.bottom, area.top));

        let min_lines = commits.iter().map(|c| c.total_lines).min().unwrap_or(0);
        let max_lines = commits.iter().map(|c| c.total_lines).max().unwrap_or(0);
        let r = SqrtScale::new(
            (min_lines as f64, max_lines as f64),
            (config.min_radius, config.max_radius),
        );

        let first = commits.iter().map(|c| c.datetime).min();
        let last = commits.iter().map(|c| c.datetime).max();
        let x = first
            .zip(last)
            .map(|(first, last)| TimeScale::new(&first, &last, (area.left, area.right)));

        let mut order: Vec<usize> = (0..commits.len()).collect();
        order.sort_by(|&a, &b| commits[b].total_lines.cmp(&commits[a].total_lines));

        let markers = match &x {
            Some(x) => order
                .into_iter()
                .map(|idx| {
                    let commit = &commits[idx];
                    Marker {
                        commit: idx,
                        id: commit.id.clone(),
                        cx: x.apply(&commit.datetime),
                        cy: y.apply(commit.hour_fraction),
                        r: r.apply(commit.total_lines as f64),
                        fill: if commit.is_night() { NIGHT_COLOR } else { DAY_COLOR },
                    }
                })
                .collect(),
            None => Vec::new(),
        };

        Self {
            config: config.clone(),
            area,
            x,
            y,
            r,
            markers,
        }
    }

    pub fn marker_for_commit(&self, commit: usize) -> Option<&Marker> {
        self.markers.iter().find(|m| m.commit == commit)
    }

    /// The chart as an SVG document. `states` is indexed by commit, the same
    /// indexing as `Marker::commit`; missing entries draw with defaults.
    pub fn render_svg(&self, states: &[MarkerState], region: Option<&Region>) -> String {
        let mut svg = format!(
            "<svg viewBox=\"0 0 {} {}\" style=\"overflow: visible\">\n",
            fmt_coord(self.config.width),
            fmt_coord(self.config.height)
        );
        svg.push_str(&self.render_gridlines());
        svg.push_str(&self.render_time_axis());
        svg.push_str(&self.render_hour_axis());

        svg.push_str("  <g class=\"dots\">\n");
        for marker in &self.markers {
            let state = states.get(marker.commit).copied().unwrap_or_default();
            let class = if state.selected { " class=\"selected\"" } else { "" };
            svg.push_str(&format!(
                "    <circle{} data-commit=\"{}\" cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" style=\"fill-opacity: {}\"><title>{}</title></circle>\n",
                class,
                html_escape(&marker.id),
                fmt_coord(marker.cx),
                fmt_coord(marker.cy),
                fmt_coord(marker.r),
                marker.fill,
                state.fill_opacity(),
                html_escape(&marker.id),
            ));
        }
        svg.push_str("  </g>\n");

        if let Some(region) = region {
            svg.push_str(&format!(
                "  <rect class=\"selection\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#777\" fill-opacity=\"0.3\" stroke=\"#fff\"/>\n",
                fmt_coord(region.min.x),
                fmt_coord(region.min.y),
                fmt_coord(region.width()),
                fmt_coord(region.height()),
            ));
        }
        svg.push_str("</svg>\n");
        svg
    }

    // Horizontal lines at each hour tick, spanning the drawing area, drawn
    // under everything else.
    fn render_gridlines(&self) -> String {
        let mut out = format!(
            "  <g class=\"gridlines\" transform=\"translate({}, 0)\">\n",
            fmt_coord(self.area.left)
        );
        for tick in self.y.ticks(HOUR_TICKS) {
            out.push_str(&format!(
                "    <line x1=\"0\" x2=\"{}\" y1=\"{y}\" y2=\"{y}\" stroke=\"lightgray\" stroke-opacity=\"0.5\" shape-rendering=\"crispEdges\"/>\n",
                fmt_coord(self.area.width),
                y = fmt_coord(self.y.apply(tick)),
            ));
        }
        out.push_str("  </g>\n");
        out
    }

    fn render_time_axis(&self) -> String {
        let mut out = format!(
            "  <g class=\"x-axis\" transform=\"translate(0, {})\">\n    <path d=\"M{},0H{}\" stroke=\"currentColor\"/>\n",
            fmt_coord(self.area.bottom),
            fmt_coord(self.area.left),
            fmt_coord(self.area.right),
        );
        if let Some(x) = &self.x {
            for (instant, label) in x.ticks(TIME_TICKS) {
                out.push_str(&format!(
                    "    <g class=\"tick\" transform=\"translate({}, 0)\"><line y2=\"6\" stroke=\"currentColor\"/><text y=\"9\" dy=\"0.71em\" text-anchor=\"middle\">{}</text></g>\n",
                    fmt_coord(x.apply(&instant)),
                    html_escape(&label),
                ));
            }
        }
        out.push_str("  </g>\n");
        out
    }

    fn render_hour_axis(&self) -> String {
        let mut out = format!(
            "  <g class=\"y-axis\" transform=\"translate({}, 0)\">\n    <path d=\"M0,{}V{}\" stroke=\"currentColor\"/>\n",
            fmt_coord(self.area.left),
            fmt_coord(self.area.bottom),
            fmt_coord(self.area.top),
        );
        for tick in self.y.ticks(HOUR_TICKS) {
            out.push_str(&format!(
                "    <g class=\"tick\" transform=\"translate(0, {})\"><line x2=\"-6\" stroke=\"currentColor\"/><text x=\"-9\" dy=\"0.32em\" text-anchor=\"end\">{}</text></g>\n",
                fmt_coord(self.y.apply(tick)),
                format_hour_label(tick),
            ));
        }
        out.push_str("  </g>\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::aggregate_commits;
    use crate::records::LineRecord;
    use crate::selection::Point;
    use chrono::{FixedOffset, TimeZone};

    fn lines(commit: &str, count: usize, day: u32, hour: u32, minute: u32) -> Vec<LineRecord> {
        let datetime = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 3, day, hour, minute, 0)
            .unwrap();
        (0..count)
            .map(|i| LineRecord {
                commit_id: commit.to_string(),
                file: "f.js".to_string(),
                line: i as u32 + 1,
                depth: 0,
                length: 1,
                kind: "js".to_string(),
                author: "Ada".to_string(),
                datetime,
                timezone: "+00:00".to_string(),
                hour_fraction: hour as f64 + minute as f64 / 60.0,
            })
            .collect()
    }

    fn sample() -> Vec<LineRecord> {
        let mut records = lines("small", 1, 1, 3, 0);
        records.extend(lines("big", 100, 10, 12, 0));
        records.extend(lines("mid", 25, 5, 20, 30));
        records
    }

    #[test]
    fn test_markers_drawn_largest_first() {
        let records = sample();
        let commits = aggregate_commits(&records);
        let plot = Scatterplot::build(&commits, &ChartConfig::default());
        let ids: Vec<&str> = plot.markers.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["big", "mid", "small"]);
    }

    #[test]
    fn test_marker_geometry() {
        let records = sample();
        let commits = aggregate_commits(&records);
        let plot = Scatterplot::build(&commits, &ChartConfig::default());

        let small = plot.markers.iter().find(|m| m.id == "small").unwrap();
        let big = plot.markers.iter().find(|m| m.id == "big").unwrap();
        // Earliest and latest commits sit on the ends of the time axis.
        assert_eq!(small.cx, 50.0);
        assert_eq!(big.cx, 990.0);
        // Noon is halfway up the drawing area.
        assert_eq!(big.cy, 290.0);
        assert_eq!(small.r, 2.0);
        assert_eq!(big.r, 30.0);
        assert_eq!(small.fill, NIGHT_COLOR);
        assert_eq!(big.fill, DAY_COLOR);
        let mid = plot.markers.iter().find(|m| m.id == "mid").unwrap();
        assert_eq!(mid.fill, NIGHT_COLOR);
    }

    #[test]
    fn test_empty_commits_have_no_markers() {
        let plot = Scatterplot::build(&[], &ChartConfig::default());
        assert!(plot.markers.is_empty());
        assert!(plot.x.is_none());
        let svg = plot.render_svg(&[], None);
        assert!(svg.contains("class=\"dots\""));
    }

    #[test]
    fn test_svg_reflects_marker_state() {
        let records = sample();
        let commits = aggregate_commits(&records);
        let plot = Scatterplot::build(&commits, &ChartConfig::default());
        let mut states = vec![MarkerState::default(); commits.len()];
        states[0] = MarkerState {
            hovered: true,
            selected: true,
        };
        let region = Region::spanning(Point::new(10.0, 10.0), Point::new(60.0, 600.0));
        let svg = plot.render_svg(&states, Some(&region));
        assert!(svg.contains(
            "<circle class=\"selected\" data-commit=\"small\" cx=\"50\""
        ));
        assert!(svg.contains("style=\"fill-opacity: 1\""));
        assert!(svg.contains("style=\"fill-opacity: 0.7\""));
        assert!(svg.contains("<rect class=\"selection\" x=\"10\" y=\"10\" width=\"50\" height=\"590\""));
        assert!(svg.contains(">00:00</text>"));
        assert!(svg.contains(">12:00</text>"));
    }
}
