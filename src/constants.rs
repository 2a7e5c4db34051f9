//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!`, so there is
//! no runtime file I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

use crate::grid::CellBounds;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  pub default_feed: String,

  // Grid tiles
  pub show_cell: (f64, f64, f64, f64),
  pub episode_cell: (f64, f64, f64, f64),

  // Catalog
  pub new_episode_max_age_hours: u32,
  pub refresh_interval_mins: u64,
  pub default_category_image: String,
  pub default_video_image: String,

  // Status line
  pub error_dismiss_secs: u64,
  pub live_search_results: usize,
}

impl Constants {
  pub fn show_cell(&self) -> CellBounds {
    let (w, h, sx, sy) = self.show_cell;
    CellBounds::new(w, h, sx, sy)
  }

  pub fn episode_cell(&self) -> CellBounds {
    let (w, h, sx, sy) = self.episode_cell;
    CellBounds::new(w, h, sx, sy)
  }
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed this is a build-time error.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_constants_parse() {
    let c = constants();
    assert!(c.show_cell().width > 0.0);
    assert!(c.episode_cell().height > 0.0);
    assert_eq!(c.new_episode_max_age_hours, 7 * 24);
  }
}
