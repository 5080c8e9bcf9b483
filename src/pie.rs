use crate::formatter::{fmt_coord, html_escape};
use crate::projects::{Project, filter_projects, projects_title, render_projects};
use std::f64::consts::TAU;

pub const OUTER_RADIUS: f64 = 50.0;

/// Tableau 10, indexed by slice.
pub const TABLEAU10: [&str; 10] = [
    "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

pub fn slice_color(idx: usize) -> &'static str {
    TABLEAU10[idx % TABLEAU10.len()]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice {
    pub label: String,
    pub value: usize,
}

/// Projects per year, in order of first appearance.
pub fn year_rollup(projects: &[&Project]) -> Vec<Slice> {
    let mut slices: Vec<Slice> = Vec::new();
    for project in projects {
        match slices.iter_mut().find(|s| s.label == project.year) {
            Some(slice) => slice.value += 1,
            None => slices.push(Slice {
                label: project.year.clone(),
                value: 1,
            }),
        }
    }
    slices
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub start_angle: f64,
    pub end_angle: f64,
}

/// Angles for each slice, returned in input order. Slices are laid out
/// clockwise from 12 o'clock largest first; equal values keep input order.
pub fn pie_layout(slices: &[Slice]) -> Vec<Arc> {
    let total: usize = slices.iter().map(|s| s.value).sum();
    let mut arcs = vec![
        Arc {
            start_angle: 0.0,
            end_angle: 0.0
        };
        slices.len()
    ];
    if total == 0 {
        return arcs;
    }
    let mut order: Vec<usize> = (0..slices.len()).collect();
    order.sort_by(|&a, &b| slices[b].value.cmp(&slices[a].value));

    let mut angle = 0.0;
    for idx in order {
        let sweep = slices[idx].value as f64 / total as f64 * TAU;
        arcs[idx] = Arc {
            start_angle: angle,
            end_angle: angle + sweep,
        };
        angle += sweep;
    }
    arcs
}

// Angle 0 points up and grows clockwise, matching SVG's downward y axis.
fn polar(radius: f64, angle: f64) -> (f64, f64) {
    (radius * angle.sin(), -radius * angle.cos())
}

/// SVG path data for a pie wedge centred on the origin.
pub fn arc_path(arc: &Arc, radius: f64) -> String {
    let sweep = arc.end_angle - arc.start_angle;
    if sweep <= 0.0 {
        return String::new();
    }
    let r = fmt_coord(radius);
    if sweep >= TAU - 1e-9 {
        // A lone slice: two half circles, since one arc cannot close on itself.
        return format!("M0,-{r}A{r},{r},0,1,1,0,{r}A{r},{r},0,1,1,0,-{r}Z");
    }
    let (x0, y0) = polar(radius, arc.start_angle);
    let (x1, y1) = polar(radius, arc.end_angle);
    let large = if sweep > std::f64::consts::PI { 1 } else { 0 };
    format!(
        "M{},{}A{r},{r},0,{large},1,{},{}L0,0Z",
        fmt_coord(x0),
        fmt_coord(y0),
        fmt_coord(x1),
        fmt_coord(y1),
    )
}

/// The projects page: a search box narrowing the list, and a pie of the
/// remaining projects by year whose slices can be clicked to narrow further.
#[derive(Debug, Clone)]
pub struct Gallery {
    projects: Vec<Project>,
    query: String,
    selected: Option<usize>,
}

impl Gallery {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects,
            query: String::new(),
            selected: None,
        }
    }

    /// Projects matching the search query, ignoring any slice selection.
    pub fn matching(&self) -> Vec<&Project> {
        filter_projects(&self.projects, &self.query)
    }

    pub fn slices(&self) -> Vec<Slice> {
        year_rollup(&self.matching())
    }

    /// A new query redraws the pie, which drops any slice selection.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.selected = None;
    }

    /// Clicking the selected slice deselects it; any other slice becomes
    /// the selection. Out-of-range indices are ignored.
    pub fn click_slice(&mut self, idx: usize) {
        if idx >= self.slices().len() {
            log::warn!("no pie slice at index {idx}");
            return;
        }
        self.selected = if self.selected == Some(idx) { None } else { Some(idx) };
    }

    /// Select a slice by its year label, if the pie has one.
    pub fn select_year(&mut self, year: &str) -> bool {
        match self.slices().iter().position(|s| s.label == year) {
            Some(idx) => {
                self.selected = Some(idx);
                true
            }
            None => false,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// What the project list shows: the search matches, narrowed to the
    /// selected year if there is one.
    pub fn visible(&self) -> Vec<&Project> {
        let matching = self.matching();
        match self.selected.and_then(|idx| self.slices().get(idx).cloned()) {
            Some(slice) => matching.into_iter().filter(|p| p.year == slice.label).collect(),
            None => matching,
        }
    }

    pub fn render_pie(&self) -> String {
        let slices = self.slices();
        let arcs = pie_layout(&slices);
        let mut svg = format!(
            "<svg id=\"projects-plot\" viewBox=\"-{r} -{r} {d} {d}\">\n",
            r = fmt_coord(OUTER_RADIUS),
            d = fmt_coord(OUTER_RADIUS * 2.0)
        );
        for (idx, (slice, arc)) in slices.iter().zip(&arcs).enumerate() {
            let class = if self.selected == Some(idx) { " class=\"selected\"" } else { "" };
            svg.push_str(&format!(
                "  <path{class} d=\"{}\" fill=\"{}\" data-year=\"{}\"/>\n",
                arc_path(arc, OUTER_RADIUS),
                slice_color(idx),
                html_escape(&slice.label),
            ));
        }
        svg.push_str("</svg>\n");
        svg
    }

    pub fn render_legend(&self) -> String {
        let mut html = String::from("<ul class=\"legend\">\n");
        for (idx, slice) in self.slices().iter().enumerate() {
            let class = if self.selected == Some(idx) { " class=\"selected\"" } else { "" };
            html.push_str(&format!(
                "  <li{class} style=\"--color:{}\"><span class=\"swatch\"></span> {} <em>({})</em></li>\n",
                slice_color(idx),
                html_escape(&slice.label),
                slice.value,
            ));
        }
        html.push_str("</ul>\n");
        html
    }

    pub fn render_page(&self, title: &str) -> String {
        let visible = self.visible();
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>{title}</title>
<style>
.container {{ display: flex; align-items: center; gap: 2em; }}
#projects-plot {{ max-width: 20em; }}
path.selected {{ fill: oklch(60% 45% 0) !important; }}
.legend {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(9em, 1fr)); border: 1px solid #ccc; padding: 1em; }}
.legend li {{ display: flex; align-items: center; gap: 0.5em; }}
.legend li.selected {{ font-weight: bold; }}
.swatch {{ width: 1em; height: 1em; border-radius: 50%; background: var(--color); display: inline-block; }}
</style>
</head>
<body>
<h1 class="projects-title">{count_title}</h1>
<input class="searchBar" type="search" value="{query}" placeholder="Search projects...">
<div class="container">
{pie}{legend}</div>
<div class="projects">
{list}</div>
</body>
</html>
"#,
            title = html_escape(title),
            count_title = projects_title(self.projects.len()),
            query = html_escape(&self.query),
            pie = self.render_pie(),
            legend = self.render_legend(),
            list = render_projects(&visible, 2),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projects::parse_projects;
    use crate::projects::tests::SAMPLE;

    fn gallery() -> Gallery {
        Gallery::new(parse_projects(SAMPLE).unwrap())
    }

    #[test]
    fn test_rollup_first_seen_order() {
        let g = gallery();
        let slices = g.slices();
        let pairs: Vec<(&str, usize)> = slices.iter().map(|s| (s.label.as_str(), s.value)).collect();
        assert_eq!(pairs, vec![("2024", 2), ("2023", 1), ("2022", 1)]);
    }

    #[test]
    fn test_layout_largest_first_covers_circle() {
        let slices = vec![
            Slice { label: "a".into(), value: 1 },
            Slice { label: "b".into(), value: 3 },
        ];
        let arcs = pie_layout(&slices);
        // "b" is bigger so it starts at 12 o'clock.
        assert_eq!(arcs[1].start_angle, 0.0);
        assert!((arcs[1].end_angle - TAU * 0.75).abs() < 1e-12);
        assert!((arcs[0].end_angle - TAU).abs() < 1e-12);
    }

    #[test]
    fn test_single_slice_is_full_circle() {
        let arcs = pie_layout(&[Slice { label: "x".into(), value: 4 }]);
        assert_eq!(arc_path(&arcs[0], 50.0), "M0,-50A50,50,0,1,1,0,50A50,50,0,1,1,0,-50Z");
    }

    #[test]
    fn test_quarter_arc_path() {
        let arc = Arc { start_angle: 0.0, end_angle: TAU / 4.0 };
        assert_eq!(arc_path(&arc, 50.0), "M0,-50A50,50,0,0,1,50,0L0,0Z");
    }

    #[test]
    fn test_click_toggles_year_filter() {
        let mut g = gallery();
        g.click_slice(0);
        assert_eq!(g.selected(), Some(0));
        let titles: Vec<&str> = g.visible().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Lorem Dashboard", "Dolor Game"]);
        assert!(g.render_legend().contains("<li class=\"selected\""));
        assert!(g.render_pie().contains("<path class=\"selected\""));

        g.click_slice(0);
        assert_eq!(g.selected(), None);
        assert_eq!(g.visible().len(), 4);

        g.click_slice(9);
        assert_eq!(g.selected(), None);
    }

    #[test]
    fn test_query_recomputes_pie_and_resets_selection() {
        let mut g = gallery();
        assert!(g.select_year("2022"));
        g.set_query("game");
        assert_eq!(g.selected(), None);
        assert_eq!(g.slices(), vec![Slice { label: "2024".into(), value: 1 }]);
        assert!(!g.select_year("2022"));
        let page = g.render_page("Projects");
        assert!(page.contains("<h1 class=\"projects-title\">4 Projects</h1>"));
        assert!(page.contains("value=\"game\""));
    }
}
