// Home page: a teaser of the newest projects and a GitHub stats card built
// from a saved `GET /users/{name}` response.

use crate::formatter::html_escape;
use crate::projects::{Project, latest, render_projects};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// How many projects the home page shows.
pub const TEASER_LEN: usize = 3;

/// The few fields of a GitHub user object the stats card shows. Every other
/// field of the API response is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub public_gists: u64,
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("could not read profile: {0}")]
    Io(#[from] std::io::Error),
    #[error("profile is not a valid GitHub user object: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn parse_profile(json: &str) -> Result<Profile, ProfileError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_profile(path: &Path) -> Result<Profile, ProfileError> {
    let profile = parse_profile(&std::fs::read_to_string(path)?)?;
    log::debug!("loaded GitHub profile {:?} from {}", profile.login, path.display());
    Ok(profile)
}

impl Profile {
    pub fn entries(&self) -> [(&'static str, u64); 4] {
        [
            ("Followers", self.followers),
            ("Following", self.following),
            ("Public Repos", self.public_repos),
            ("Public Gists", self.public_gists),
        ]
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from("<h2>My GitHub Stats</h2>\n<dl>\n");
        for (label, value) in self.entries() {
            html.push_str(&format!("  <dt>{label}</dt><dd>{value}</dd>\n"));
        }
        html.push_str("</dl>\n");
        html
    }
}

/// The home page. `#profile-stats` stays empty without a profile.
pub fn render_home(projects: &[Project], profile: Option<&Profile>, title: &str) -> String {
    let teaser: Vec<&Project> = latest(projects, TEASER_LEN).iter().collect();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>{title}</title>
</head>
<body>
<h1>{title}</h1>
<section id="profile-stats">
{stats}</section>
<h2>Latest Projects</h2>
<div class="projects">
{list}</div>
</body>
</html>
"#,
        title = html_escape(title),
        stats = profile.map(Profile::to_html).unwrap_or_default(),
        list = render_projects(&teaser, 2),
    )
}
