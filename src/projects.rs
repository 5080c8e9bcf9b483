use crate::formatter::html_escape;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "deserialize_year")]
    pub year: String,
}

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("could not read project list: {0}")]
    Io(#[from] std::io::Error),
    #[error("project list is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Years show up both as `"2024"` and `2024` in hand-edited lists.
fn deserialize_year<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("year must be a string or number, got {other}"))),
    }
}

pub fn parse_projects(json: &str) -> Result<Vec<Project>, ProjectError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_projects(path: &Path) -> Result<Vec<Project>, ProjectError> {
    let json = std::fs::read_to_string(path)?;
    let projects = parse_projects(&json)?;
    log::debug!("loaded {} projects from {}", projects.len(), path.display());
    Ok(projects)
}

impl Project {
    fn searchable_text(&self) -> String {
        [
            self.title.as_str(),
            self.image.as_str(),
            self.description.as_str(),
            self.year.as_str(),
        ]
        .join("\n")
        .to_lowercase()
    }
}

/// Case-insensitive substring search across every field of a project.
pub fn filter_projects<'a>(projects: &'a [Project], query: &str) -> Vec<&'a Project> {
    let query = query.to_lowercase();
    projects
        .iter()
        .filter(|p| p.searchable_text().contains(&query))
        .collect()
}

/// The first `n` projects, for a teaser list.
pub fn latest(projects: &[Project], n: usize) -> &[Project] {
    &projects[..n.min(projects.len())]
}

pub fn projects_title(count: usize) -> String {
    format!("{count} Projects")
}

/// One `<article>` per project. `heading_level` is clamped to h1..h6.
pub fn render_projects(projects: &[&Project], heading_level: u8) -> String {
    let h = heading_level.clamp(1, 6);
    let mut html = String::new();
    for project in projects {
        html.push_str(&format!(
            "<article>\n  <h{h}>{title}</h{h}>\n  <img src=\"{image}\" alt=\"{title}\">\n  <div>\n    <p>{description}</p>\n    <p class=\"year\">c. {year}</p>\n  </div>\n</article>\n",
            title = html_escape(&project.title),
            image = html_escape(&project.image),
            description = html_escape(&project.description),
            year = html_escape(&project.year),
        ));
    }
    html
}
