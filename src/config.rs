use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Drawing area left once the margins are taken off the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsableArea {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// Geometry and presentation knobs for the commit scatterplot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub min_radius: f64,
    pub max_radius: f64,
    /// Size of the window the detail panel must stay inside.
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// e.g. `https://github.com/owner/repo`; commit links point at `{base}/commit/{id}`.
    pub commit_url_base: Option<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            margin: Margin {
                top: 10.0,
                right: 10.0,
                bottom: 30.0,
                left: 50.0,
            },
            min_radius: 2.0,
            max_radius: 30.0,
            viewport_width: 1280.0,
            viewport_height: 800.0,
            commit_url_base: None,
        }
    }
}

impl ChartConfig {
    pub fn usable_area(&self) -> UsableArea {
        UsableArea {
            top: self.margin.top,
            right: self.width - self.margin.right,
            bottom: self.height - self.margin.bottom,
            left: self.margin.left,
            width: self.width - self.margin.left - self.margin.right,
            height: self.height - self.margin.top - self.margin.bottom,
        }
    }

    pub fn commit_url(&self, id: &str) -> String {
        match &self.commit_url_base {
            Some(base) => format!("{}/commit/{}", base.trim_end_matches('/'), id),
            None => "#".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_usable_area() {
        let area = ChartConfig::default().usable_area();
        assert_eq!((area.left, area.right), (50.0, 990.0));
        assert_eq!((area.top, area.bottom), (10.0, 570.0));
        assert_eq!((area.width, area.height), (940.0, 560.0));
    }

    #[test]
    fn test_commit_url() {
        let mut config = ChartConfig::default();
        assert_eq!(config.commit_url("abc"), "#");
        config.commit_url_base = Some("https://github.com/me/site/".to_string());
        assert_eq!(config.commit_url("abc"), "https://github.com/me/site/commit/abc");
    }
}
