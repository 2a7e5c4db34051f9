//! The channel: a play queue built from the unwatched episodes of subscribed
//! shows, with a now-playing marker that advances through it.

use tracing::debug;

use crate::catalog::{Catalog, Episode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
  Ascending,
  /// Newest first.
  #[default]
  Descending,
}

impl SortOrder {
  pub fn label(self) -> &'static str {
    match self {
      SortOrder::Ascending => "oldest first",
      SortOrder::Descending => "newest first",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEntry {
  pub episode_id: String,
  pub show_id: String,
  pub show_title: String,
  pub airdate: i64,
}

impl From<&Episode> for ChannelEntry {
  fn from(ep: &Episode) -> Self {
    Self { episode_id: ep.id.clone(), show_id: ep.show_id.clone(), show_title: ep.show_title.clone(), airdate: ep.airdate }
  }
}

#[derive(Debug, Clone)]
pub struct Channel {
  entries: Vec<ChannelEntry>,
  now_playing: Option<String>,
  order: SortOrder,
  grouped_by_show: bool,
}

impl Default for Channel {
  fn default() -> Self {
    Self { entries: Vec::new(), now_playing: None, order: SortOrder::default(), grouped_by_show: true }
  }
}

impl Channel {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn entries(&self) -> &[ChannelEntry] {
    &self.entries
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn contains(&self, episode_id: &str) -> bool {
    self.position(episode_id).is_some()
  }

  fn position(&self, episode_id: &str) -> Option<usize> {
    self.entries.iter().position(|e| e.episode_id == episode_id)
  }

  pub fn now_playing(&self) -> Option<&str> {
    self.now_playing.as_deref()
  }

  pub fn order(&self) -> SortOrder {
    self.order
  }

  pub fn grouped_by_show(&self) -> bool {
    self.grouped_by_show
  }

  /// Rebuild the queue from the unwatched episodes of `subscriptions`, in
  /// subscription order. The now-playing marker survives if its episode is
  /// still queued.
  pub fn refresh(&mut self, catalog: &Catalog, subscriptions: &[String]) {
    self.entries = subscriptions
      .iter()
      .flat_map(|show_id| catalog.episodes_by_show(show_id, true))
      .map(ChannelEntry::from)
      .collect();
    if self.now_playing.as_deref().is_some_and(|id| !self.contains(id)) {
      self.now_playing = None;
    }
    self.sort();
    debug!(entries = self.entries.len(), "channel: refreshed");
  }

  /// Queue an episode unless it is already there. Returns whether it was added.
  pub fn add(&mut self, episode: &Episode) -> bool {
    if self.contains(&episode.id) {
      return false;
    }
    self.entries.push(ChannelEntry::from(episode));
    self.sort();
    true
  }

  /// Drop an episode from the queue. Returns whether it was queued.
  pub fn remove(&mut self, episode_id: &str) -> bool {
    let Some(pos) = self.position(episode_id) else { return false };
    self.entries.remove(pos);
    if self.now_playing.as_deref() == Some(episode_id) {
      self.now_playing = None;
    }
    true
  }

  /// Make `episode` the now-playing entry, queueing it first if needed.
  pub fn play(&mut self, episode: &Episode) {
    self.add(episode);
    self.now_playing = Some(episode.id.clone());
  }

  /// Advance to the entry after the now-playing one, wrapping to the start
  /// after the last. With nothing playing, starts at the first entry.
  pub fn next(&mut self) -> Option<&ChannelEntry> {
    if self.entries.is_empty() {
      self.now_playing = None;
      return None;
    }
    let next = match self.now_playing.as_deref().and_then(|id| self.position(id)) {
      Some(i) if i + 1 < self.entries.len() => i + 1,
      _ => 0,
    };
    self.now_playing = Some(self.entries[next].episode_id.clone());
    self.entries.get(next)
  }

  pub fn set_order(&mut self, order: SortOrder) {
    self.order = order;
    self.sort();
  }

  pub fn toggle_order(&mut self) {
    let order = match self.order {
      SortOrder::Ascending => SortOrder::Descending,
      SortOrder::Descending => SortOrder::Ascending,
    };
    self.set_order(order);
  }

  pub fn set_grouped_by_show(&mut self, grouped: bool) {
    self.grouped_by_show = grouped;
    self.sort();
  }

  /// Order by airdate. When grouped, shows keep the order they first appear
  /// in and each show's episodes are sorted within the group.
  fn sort(&mut self) {
    let order = self.order;
    let by_airdate = |a: &ChannelEntry, b: &ChannelEntry| match order {
      SortOrder::Ascending => a.airdate.cmp(&b.airdate),
      SortOrder::Descending => b.airdate.cmp(&a.airdate),
    };

    if !self.grouped_by_show {
      self.entries.sort_by(by_airdate);
      return;
    }

    let mut shows: Vec<String> = Vec::new();
    for e in &self.entries {
      if !shows.contains(&e.show_id) {
        shows.push(e.show_id.clone());
      }
    }
    self.entries.sort_by(|a, b| {
      let group = |e: &ChannelEntry| shows.iter().position(|s| *s == e.show_id);
      group(a).cmp(&group(b)).then_with(|| by_airdate(a, b))
    });
  }
}
