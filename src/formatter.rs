// Text formatting shared by the renderers: labels, percentages, dates.

use chrono::{DateTime, FixedOffset};

/// `0.6` -> `"60.0%"`
pub fn format_percent(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}

/// Hour-axis tick label; 24 wraps around to midnight.
pub fn format_hour_label(hour: f64) -> String {
    format!("{:02}:00", (hour.round() as i64).rem_euclid(24))
}

pub fn format_selection_count(count: usize) -> String {
    if count == 0 {
        "No commits selected".to_string()
    } else {
        format!("{count} commits selected")
    }
}

/// "Monday, February 24, 2025", in the commit's own offset.
pub fn format_full_date(datetime: &DateTime<FixedOffset>) -> String {
    datetime.format("%A, %B %-d, %Y").to_string()
}

/// "2:30:00 PM", in the commit's own offset.
pub fn format_time(datetime: &DateTime<FixedOffset>) -> String {
    datetime.format("%-I:%M:%S %p").to_string()
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Coordinates in SVG attributes: two decimals, trailing zeros dropped.
pub fn fmt_coord(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}
