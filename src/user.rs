//! Per-user state: subscriptions, watched episodes and the last new-episode
//! check. Every change is written through to `user.toml` immediately and
//! announced to subscribers as a [`UserEvent`].

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Changes to user state that other parts of the app react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {
  SubscriptionAdded(String),
  SubscriptionRemoved(String),
  EpisodeWatched(String),
}

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
struct UserData {
  #[serde(default)]
  subscriptions: Vec<String>,
  #[serde(default)]
  watched_episodes: Vec<String>,
  /// Milliseconds since the epoch.
  last_episode_check: Option<i64>,
}

#[derive(Debug, Default)]
pub struct UserStore {
  data: UserData,
  /// `None` keeps everything in memory.
  path: Option<PathBuf>,
  listeners: Vec<mpsc::UnboundedSender<UserEvent>>,
}

impl UserStore {
  /// Open the store in the platform data directory. Falls back to an
  /// in-memory store when no home directory can be determined.
  pub fn load() -> Result<Self> {
    match ProjectDirs::from("", "", "reel") {
      Some(dirs) => Self::load_from(dirs.data_dir().join("user.toml")),
      None => {
        warn!("user: no data directory, keeping state in memory");
        Ok(Self::in_memory())
      }
    }
  }

  /// Open the store at `path`. A missing file starts empty.
  pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
    let path = path.into();
    let data = if path.exists() {
      let content =
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read user state from {}", path.display()))?;
      toml::from_str(&content).with_context(|| format!("Malformed user state in {}", path.display()))?
    } else {
      UserData::default()
    };
    debug!(path = %path.display(), subscriptions = data.subscriptions.len(), "user: loaded");
    Ok(Self { data, path: Some(path), listeners: Vec::new() })
  }

  pub fn in_memory() -> Self {
    Self::default()
  }

  pub fn path(&self) -> Option<&Path> {
    self.path.as_deref()
  }

  /// Register for change events. Dropped receivers are pruned on the next send.
  pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<UserEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    self.listeners.push(tx);
    rx
  }

  fn emit(&mut self, event: UserEvent) {
    self.listeners.retain(|tx| tx.send(event.clone()).is_ok());
  }

  fn save(&self) -> Result<()> {
    let Some(ref path) = self.path else { return Ok(()) };
    if let Some(dir) = path.parent() {
      std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let content = toml::to_string(&self.data).context("Failed to serialise user state")?;
    std::fs::write(path, content).with_context(|| format!("Failed to write user state to {}", path.display()))
  }

  // --- Subscriptions ---

  pub fn subscriptions(&self) -> &[String] {
    &self.data.subscriptions
  }

  pub fn is_subscribed(&self, show_id: &str) -> bool {
    self.data.subscriptions.iter().any(|s| s == show_id)
  }

  /// Subscribe to `show_id`. Already subscribed is a no-op and sends no event.
  pub fn add_subscription(&mut self, show_id: &str) -> Result<()> {
    if self.is_subscribed(show_id) {
      return Ok(());
    }
    self.data.subscriptions.push(show_id.to_string());
    self.save()?;
    info!(show_id, "user: subscribed");
    self.emit(UserEvent::SubscriptionAdded(show_id.to_string()));
    Ok(())
  }

  /// Unsubscribe from `show_id`. Not subscribed is a no-op and sends no event.
  pub fn remove_subscription(&mut self, show_id: &str) -> Result<()> {
    if !self.is_subscribed(show_id) {
      return Ok(());
    }
    self.data.subscriptions.retain(|s| s != show_id);
    self.save()?;
    info!(show_id, "user: unsubscribed");
    self.emit(UserEvent::SubscriptionRemoved(show_id.to_string()));
    Ok(())
  }

  /// Flip the subscription for `show_id`; returns the new state.
  pub fn toggle_subscription(&mut self, show_id: &str) -> Result<bool> {
    if self.is_subscribed(show_id) {
      self.remove_subscription(show_id)?;
      Ok(false)
    } else {
      self.add_subscription(show_id)?;
      Ok(true)
    }
  }

  // --- Watched episodes ---

  pub fn watched_episodes(&self) -> &[String] {
    &self.data.watched_episodes
  }

  pub fn is_watched(&self, episode_id: &str) -> bool {
    self.data.watched_episodes.iter().any(|e| e == episode_id)
  }

  pub fn set_watched_episode(&mut self, episode_id: &str) -> Result<()> {
    if self.is_watched(episode_id) {
      return Ok(());
    }
    self.data.watched_episodes.push(episode_id.to_string());
    self.save()?;
    debug!(episode_id, "user: watched");
    self.emit(UserEvent::EpisodeWatched(episode_id.to_string()));
    Ok(())
  }

  // --- New-episode check ---

  pub fn last_episode_check(&self) -> Option<i64> {
    self.data.last_episode_check
  }

  pub fn update_last_episode_check(&mut self, now_millis: i64) -> Result<()> {
    self.data.last_episode_check = Some(now_millis);
    self.save()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn missing_file_starts_empty() {
    let dir = TempDir::new().unwrap();
    let store = UserStore::load_from(dir.path().join("user.toml")).unwrap();
    assert!(store.subscriptions().is_empty());
    assert!(store.watched_episodes().is_empty());
    assert_eq!(store.last_episode_check(), None);
  }

  #[test]
  fn changes_are_written_through() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("user.toml");
    {
      let mut store = UserStore::load_from(&path).unwrap();
      store.add_subscription("show-1").unwrap();
      store.set_watched_episode("ep-1").unwrap();
      store.update_last_episode_check(1234).unwrap();
    }
    let reloaded = UserStore::load_from(&path).unwrap();
    assert!(reloaded.is_subscribed("show-1"));
    assert!(reloaded.is_watched("ep-1"));
    assert_eq!(reloaded.last_episode_check(), Some(1234));
  }

  #[test]
  fn adding_twice_keeps_one_entry() {
    let mut store = UserStore::in_memory();
    store.add_subscription("a").unwrap();
    store.add_subscription("a").unwrap();
    assert_eq!(store.subscriptions(), &["a".to_string()]);
  }

  #[test]
  fn removing_missing_is_noop() {
    let mut store = UserStore::in_memory();
    store.add_subscription("a").unwrap();
    store.remove_subscription("b").unwrap();
    assert_eq!(store.subscriptions().len(), 1);
  }

  #[test]
  fn toggle_flips_state() {
    let mut store = UserStore::in_memory();
    assert!(store.toggle_subscription("a").unwrap());
    assert!(store.is_subscribed("a"));
    assert!(!store.toggle_subscription("a").unwrap());
    assert!(!store.is_subscribed("a"));
  }

  #[test]
  fn events_reach_every_subscriber() {
    let mut store = UserStore::in_memory();
    let mut first = store.subscribe();
    let mut second = store.subscribe();
    store.add_subscription("a").unwrap();
    store.set_watched_episode("e").unwrap();
    store.remove_subscription("a").unwrap();
    for rx in [&mut first, &mut second] {
      assert_eq!(rx.try_recv().unwrap(), UserEvent::SubscriptionAdded("a".into()));
      assert_eq!(rx.try_recv().unwrap(), UserEvent::EpisodeWatched("e".into()));
      assert_eq!(rx.try_recv().unwrap(), UserEvent::SubscriptionRemoved("a".into()));
      assert!(rx.try_recv().is_err());
    }
  }

  #[test]
  fn rewatching_sends_no_event() {
    let mut store = UserStore::in_memory();
    let mut rx = store.subscribe();
    store.set_watched_episode("e").unwrap();
    store.set_watched_episode("e").unwrap();
    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_err());
  }

  #[test]
  fn unchanged_subscriptions_send_no_event() {
    let mut store = UserStore::in_memory();
    store.add_subscription("a").unwrap();
    let mut rx = store.subscribe();
    store.add_subscription("a").unwrap();
    store.remove_subscription("b").unwrap();
    assert!(rx.try_recv().is_err());
    store.remove_subscription("a").unwrap();
    assert_eq!(rx.try_recv().unwrap(), UserEvent::SubscriptionRemoved("a".into()));
    store.remove_subscription("a").unwrap();
    assert!(rx.try_recv().is_err());
  }

  #[test]
  fn dropped_receivers_are_pruned() {
    let mut store = UserStore::in_memory();
    drop(store.subscribe());
    store.add_subscription("a").unwrap();
    assert!(store.listeners.is_empty());
  }

  #[test]
  fn malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("user.toml");
    std::fs::write(&path, "subscriptions = 3").unwrap();
    assert!(UserStore::load_from(&path).is_err());
  }
}
