use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Config {
  pub theme_name: Option<String>,
  /// Catalog feed: a file path or an http(s) URL.
  pub feed: Option<String>,
}

impl Config {
  pub fn load() -> Self {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "reel") {
      let config_file = proj_dirs.config_dir().join("prefs.toml");
      if let Ok(content) = std::fs::read_to_string(&config_file) {
        return Self::parse(&content).unwrap_or_else(|| {
          warn!(path = %config_file.display(), "config: malformed prefs, using defaults");
          Self::default()
        });
      }
    }
    Self::default()
  }

  fn parse(content: &str) -> Option<Self> {
    toml::from_str(content).ok()
  }

  pub fn save(&self) -> Result<()> {
    let proj_dirs = ProjectDirs::from("", "", "reel").context("No home directory to store preferences in")?;
    self.save_to(&proj_dirs.config_dir().join("prefs.toml"))
  }

  fn save_to(&self, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
      std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let content = toml::to_string(self).context("Failed to serialise preferences")?;
    std::fs::write(path, content).with_context(|| format!("Failed to write preferences to {}", path.display()))
  }
}
