//! Self-contained HTML for the commit explorer. Every mount point is always
//! present; cleared state shows up as an empty element.

use crate::collectors::BreakdownRow;
use crate::explorer::Explorer;
use crate::formatter::html_escape;

const CSS: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 1100px; margin: 2em auto; color: #222; }
dl.stats { display: grid; grid-template-columns: repeat(6, 1fr); grid-auto-flow: column; }
dl.stats dt { grid-row: 1; font-size: 0.8em; text-transform: uppercase; color: #666; }
dl.stats dd { grid-row: 2; margin: 0; font-size: 1.6em; }
#chart svg { width: 100%; }
circle { transition: 200ms; transform-origin: center; transform-box: fill-box; }
circle:hover { transform: scale(1.5); }
circle.selected { fill: #ff6b6b; }
dl.info { display: grid; grid-template-columns: auto 1fr; gap: 0.25em 1em; margin: 0; }
dl.info dt { color: #666; }
dl.info dd { margin: 0; }
.tooltip { position: fixed; background: rgba(255, 255, 255, 0.9); box-shadow: 0 2px 8px rgba(0, 0, 0, 0.2);
           border-radius: 6px; padding: 0.75em; width: 260px; }
dl.info[hidden] { display: none; }
#language-breakdown dl { display: grid; grid-template-columns: auto 1fr; gap: 0.25em 1em; }
"#;

pub fn render_breakdown(rows: Option<&[BreakdownRow]>) -> String {
    let Some(rows) = rows else {
        return String::new();
    };
    let mut html = String::from("<dl>\n");
    for row in rows {
        html.push_str(&format!(
            "  <dt>{}</dt><dd>{} lines ({})</dd>\n",
            html_escape(&row.kind),
            row.lines,
            html_escape(&row.percent)
        ));
    }
    html.push_str("</dl>\n");
    html
}

pub fn render_page(explorer: &Explorer, title: &str) -> String {
    let view = explorer.view();
    let chart = explorer
        .plot()
        .render_svg(&view.markers, explorer.region().as_ref());
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{css}</style>
</head>
<body>
<h1>{title}</h1>
<div id="summary-stats">
{summary}</div>
<h2>Commits by time of day</h2>
<div id="chart">
{chart}</div>
{tooltip}<p id="selection-count">{count}</p>
<div id="language-breakdown">
{breakdown}</div>
</body>
</html>
"#,
        title = html_escape(title),
        css = CSS,
        summary = explorer.summary().to_html(),
        chart = chart,
        tooltip = view.tooltip.to_html(),
        count = html_escape(&view.selection_count),
        breakdown = render_breakdown(view.breakdown.as_deref()),
    )
}
