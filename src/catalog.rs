//! The show/episode catalog.
//!
//! Built from the JSON feed plus the user's stored state, then indexed by id
//! and by slug. Owned by the application and passed to whatever needs it.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::constants::constants;
use crate::search::{self, SearchResult};
use crate::text::slugify;
use crate::user::UserStore;

// --- Feed ---

/// Top-level shape of the catalog feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Feed {
  #[serde(default)]
  pub categories: Vec<CategoryData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryData {
  #[serde(deserialize_with = "string_or_number")]
  pub id: String,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub image_url: String,
  #[serde(default)]
  pub episodes: Vec<EpisodeData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EpisodeData {
  #[serde(deserialize_with = "string_or_number")]
  pub id: String,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub image_url: String,
  #[serde(default, deserialize_with = "airdate_millis")]
  pub airdate: i64,
  #[serde(default)]
  pub runtime: Option<String>,
  #[serde(default)]
  pub video_html: Option<String>,
  #[serde(default)]
  pub video_flash: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
  String(String),
  Int(i64),
  Float(f64),
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
  Ok(match StringOrNumber::deserialize(d)? {
    StringOrNumber::String(s) => s,
    StringOrNumber::Int(n) => n.to_string(),
    StringOrNumber::Float(n) => n.to_string(),
  })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAirdate {
  Millis(i64),
  /// Fractional or out-of-range millisecond values; truncated and saturated.
  FloatMillis(f64),
  Text(String),
}

fn airdate_millis<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
  Ok(match Option::<RawAirdate>::deserialize(d)? {
    None => 0,
    Some(RawAirdate::Millis(ms)) => ms,
    Some(RawAirdate::FloatMillis(ms)) => ms as i64,
    Some(RawAirdate::Text(s)) => parse_airdate(&s).unwrap_or_else(|| {
      warn!(airdate = %s, "catalog: unparseable airdate, treating as epoch");
      0
    }),
  })
}

/// Parse an airdate string (RFC 3339, `YYYY-MM-DD HH:MM:SS`, or `YYYY-MM-DD`,
/// the latter two taken as UTC) into milliseconds since the epoch.
pub fn parse_airdate(s: &str) -> Option<i64> {
  let s = s.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.timestamp_millis());
  }
  if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
    return Some(dt.and_utc().timestamp_millis());
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0)).map(|dt| dt.and_utc().timestamp_millis())
}

// --- Catalog entries ---

#[derive(Debug, Clone, Default)]
pub struct Show {
  pub id: String,
  pub title: String,
  pub description: String,
  pub image_url: String,
  pub slug: String,
  pub video_count: usize,
  /// Airdate of the newest episode, if the show has any.
  pub latest_airdate: Option<i64>,
  pub subscribed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Episode {
  pub id: String,
  pub title: String,
  /// Description body (may contain markup).
  pub text: String,
  pub image_url: String,
  /// Milliseconds since the epoch.
  pub airdate: i64,
  pub runtime: Option<String>,
  pub video_html: Option<String>,
  pub video_flash: Option<String>,
  pub show_id: String,
  pub show_title: String,
  pub slug: String,
  pub watched: bool,
  pub is_new: bool,
}

// --- Catalog ---

#[derive(Debug, Default)]
pub struct Catalog {
  shows: Vec<Show>,
  episodes: Vec<Episode>,
  show_by_id: HashMap<String, usize>,
  show_by_slug: HashMap<String, usize>,
  episode_by_id: HashMap<String, usize>,
  episode_by_slug: HashMap<String, usize>,
}

impl Catalog {
  /// Flatten the feed into shows and episodes and apply the user's state.
  /// `now_millis` decides which episodes count as new.
  pub fn from_feed(feed: Feed, user: &UserStore, now_millis: i64) -> Self {
    let c = constants();
    let new_max_age = c.new_episode_max_age_hours as i64 * 60 * 60 * 1000;
    let mut shows = Vec::with_capacity(feed.categories.len());
    let mut episodes = Vec::new();

    for category in feed.categories {
      let mut latest: Option<i64> = None;
      let video_count = category.episodes.len();

      for ep in category.episodes {
        latest = Some(latest.map_or(ep.airdate, |l| l.max(ep.airdate)));
        episodes.push(Episode {
          slug: slugify(&ep.title),
          watched: user.is_watched(&ep.id),
          is_new: now_millis.saturating_sub(ep.airdate) < new_max_age,
          image_url: if ep.image_url.is_empty() { c.default_video_image.clone() } else { ep.image_url },
          id: ep.id,
          title: ep.title,
          text: ep.description,
          airdate: ep.airdate,
          runtime: ep.runtime,
          video_html: ep.video_html,
          video_flash: ep.video_flash,
          show_id: category.id.clone(),
          show_title: category.title.clone(),
        });
      }

      shows.push(Show {
        slug: slugify(&category.title),
        subscribed: user.is_subscribed(&category.id),
        image_url: if category.image_url.is_empty() { c.default_category_image.clone() } else { category.image_url },
        id: category.id,
        title: category.title,
        description: category.description,
        video_count,
        latest_airdate: latest,
      });
    }

    let show_by_id = shows.iter().enumerate().map(|(i, s)| (s.id.clone(), i)).collect();
    let show_by_slug = shows.iter().enumerate().map(|(i, s)| (s.slug.clone(), i)).collect();
    let episode_by_id = episodes.iter().enumerate().map(|(i, e)| (e.id.clone(), i)).collect();
    let episode_by_slug = episodes.iter().enumerate().map(|(i, e)| (e.slug.clone(), i)).collect();

    info!(shows = shows.len(), episodes = episodes.len(), "catalog: indexed");
    Self { shows, episodes, show_by_id, show_by_slug, episode_by_id, episode_by_slug }
  }

  pub fn shows(&self) -> &[Show] {
    &self.shows
  }

  pub fn episodes(&self) -> &[Episode] {
    &self.episodes
  }

  pub fn is_empty(&self) -> bool {
    self.shows.is_empty() && self.episodes.is_empty()
  }

  pub fn show_by_id(&self, id: &str) -> Option<&Show> {
    self.show_by_id.get(id).map(|&i| &self.shows[i])
  }

  pub fn show_by_slug(&self, slug: &str) -> Option<&Show> {
    self.show_by_slug.get(slug).map(|&i| &self.shows[i])
  }

  pub fn episode_by_id(&self, id: &str) -> Option<&Episode> {
    self.episode_by_id.get(id).map(|&i| &self.episodes[i])
  }

  pub fn episode_by_slug(&self, slug: &str) -> Option<&Episode> {
    self.episode_by_slug.get(slug).map(|&i| &self.episodes[i])
  }

  /// Episodes of one show in feed order, optionally only the unwatched ones.
  pub fn episodes_by_show(&self, show_id: &str, unwatched_only: bool) -> Vec<&Episode> {
    self.episodes.iter().filter(|e| e.show_id == show_id && !(unwatched_only && e.watched)).collect()
  }

  pub fn unwatched_count(&self, show_id: &str) -> usize {
    self.episodes.iter().filter(|e| e.show_id == show_id && !e.watched).count()
  }

  /// All episodes, newest first.
  pub fn latest_episodes(&self) -> Vec<&Episode> {
    let mut all: Vec<&Episode> = self.episodes.iter().collect();
    all.sort_by(|a, b| b.airdate.cmp(&a.airdate));
    all
  }

  pub fn subscribed_shows(&self) -> Vec<&Show> {
    self.shows.iter().filter(|s| s.subscribed).collect()
  }

  pub fn search(&self, query: &str) -> Vec<SearchResult<'_>> {
    search::search(query, &self.episodes)
  }

  pub fn search_by_timestamp(&self, after_millis: i64) -> Vec<&Episode> {
    search::search_by_timestamp(after_millis, &self.episodes)
  }

  pub fn set_subscribed(&mut self, show_id: &str, subscribed: bool) {
    if let Some(&i) = self.show_by_id.get(show_id) {
      self.shows[i].subscribed = subscribed;
    }
  }

  pub fn set_watched(&mut self, episode_id: &str) {
    if let Some(&i) = self.episode_by_id.get(episode_id) {
      self.episodes[i].watched = true;
    }
  }
}
