use anyhow::Result;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::catalog::{Catalog, Episode, Feed, Show};
use crate::channel::Channel;
use crate::config::Config;
use crate::constants::constants;
use crate::feed::{FeedSource, load_feed};
use crate::flex_grid::FlexibleGrid;
use crate::grid::CellBounds;
use crate::search::SearchResult;
use crate::theme::THEMES;
use crate::user::{UserEvent, UserStore};

// --- Types ---

/// A browsable section of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
  Shows,
  /// Episodes of one show.
  Show(String),
  Latest,
  Subscriptions,
  /// The play queue built from subscriptions.
  Channel,
  Search(String),
}

impl Route {
  pub fn title(&self, catalog: &Catalog) -> String {
    match self {
      Route::Shows => "Shows".to_string(),
      Route::Show(id) => catalog.show_by_id(id).map_or_else(|| "Show".to_string(), |s| s.title.clone()),
      Route::Latest => "Latest".to_string(),
      Route::Subscriptions => "Subscriptions".to_string(),
      Route::Channel => "Channel".to_string(),
      Route::Search(q) => format!("Search: {}", q),
    }
  }

  fn cell_bounds(&self) -> CellBounds {
    match self {
      Route::Shows | Route::Subscriptions => constants().show_cell(),
      Route::Show(_) | Route::Latest | Route::Channel | Route::Search(_) => constants().episode_cell(),
    }
  }
}

/// What a grid cell shows; ids resolve against the catalog at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tile {
  Show(String),
  Episode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
  Browse,
  /// Typing a search query; results update live.
  Search,
  /// Episode detail panel open.
  Detail,
}

/// In-flight async task receivers.
#[derive(Default)]
pub(crate) struct AsyncTasks {
  pub(crate) load_rx: Option<oneshot::Receiver<Result<Feed>>>,
}

fn now_millis() -> i64 {
  chrono::Utc::now().timestamp_millis()
}

pub struct App {
  pub mode: AppMode,
  pub theme_index: usize,
  pub route: Route,
  history: Vec<Route>,
  pub grid: FlexibleGrid<Tile>,
  pub catalog: Catalog,
  pub channel: Channel,
  pub user: UserStore,
  user_rx: mpsc::UnboundedReceiver<UserEvent>,
  pub feed_source: FeedSource,
  http_client: Client,
  pub input: String,
  pub cursor_position: usize,
  pub input_scroll: usize,
  /// Episode id shown in the detail panel.
  pub detail: Option<String>,
  pub last_error: Option<String>,
  pub status_message: Option<String>,
  /// Informational message, lower priority than status and error.
  pub info_message: Option<String>,
  pub should_quit: bool,
  pub(crate) tasks: AsyncTasks,
  /// When the feed was last requested, for periodic refresh.
  last_fetch: Option<Instant>,
  /// When the last error was set, for auto-dismiss.
  error_time: Option<Instant>,
  /// Show or episode slug to jump to once the catalog arrives.
  pending_open: Option<String>,
}

impl App {
  pub fn new(feed_source: FeedSource, mut user: UserStore) -> Self {
    let config = Config::load();
    let theme_index =
      if let Some(ref name) = config.theme_name { THEMES.iter().position(|t| t.name == name).unwrap_or(0) } else { 0 };
    let user_rx = user.subscribe();
    let route = Route::Shows;

    Self {
      mode: AppMode::Browse,
      theme_index,
      grid: FlexibleGrid::new(route.cell_bounds()),
      route,
      history: Vec::new(),
      catalog: Catalog::default(),
      channel: Channel::new(),
      user,
      user_rx,
      feed_source,
      http_client: Client::new(),
      input: String::new(),
      cursor_position: 0,
      input_scroll: 0,
      detail: None,
      last_error: None,
      status_message: None,
      info_message: None,
      should_quit: false,
      tasks: AsyncTasks::default(),
      last_fetch: None,
      error_time: None,
      pending_open: None,
    }
  }

  /// Jump to a show or episode by slug after the next catalog load.
  pub fn open_slug_on_load(&mut self, slug: String) {
    self.pending_open = Some(slug);
  }

  pub fn theme(&self) -> &'static crate::theme::Theme {
    // Safety: theme_index is always bounded by modular arithmetic in next_theme()
    // and clamped to THEMES.len() - 1 on initialization.
    &THEMES[self.theme_index]
  }

  /// Set an error message with auto-dismiss tracking.
  pub fn set_error(&mut self, msg: String) {
    self.last_error = Some(msg);
    self.error_time = Some(Instant::now());
  }

  /// Clear the current error message and its expiry timer.
  pub fn clear_error(&mut self) {
    self.last_error = None;
    self.error_time = None;
  }

  /// Clear stale error messages after the configured delay.
  pub fn expire_error(&mut self) {
    if let Some(t) = self.error_time
      && t.elapsed() >= Duration::from_secs(constants().error_dismiss_secs)
    {
      self.last_error = None;
      self.error_time = None;
    }
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    let mut config = Config::load();
    config.theme_name = Some(self.theme().name.to_string());
    if let Err(e) = config.save() {
      warn!(err = %format!("{:#}", e), "config: could not save theme");
      self.set_error(format!("Could not save theme: {:#}", e));
    }
  }

  // --- Feed loading ---

  /// Fetch the catalog feed in the background.
  pub fn trigger_load(&mut self) {
    if self.tasks.load_rx.is_some() {
      return;
    }
    info!(source = %self.feed_source.label(), "feed: fetching");
    if self.catalog.is_empty() {
      self.status_message = Some("Loading catalog…".to_string());
    }
    self.last_fetch = Some(Instant::now());

    let client = self.http_client.clone();
    let source = self.feed_source.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(load_feed(&client, &source).await);
    });
    self.tasks.load_rx = Some(rx);
  }

  /// Re-fetch the feed once the refresh interval has passed.
  pub fn maybe_refresh(&mut self) {
    let interval = Duration::from_secs(constants().refresh_interval_mins * 60);
    if self.last_fetch.is_some_and(|t| t.elapsed() >= interval) {
      debug!("feed: refresh interval elapsed");
      self.trigger_load();
    }
  }

  pub fn check_pending(&mut self) {
    if let Some(mut rx) = self.tasks.load_rx.take() {
      match rx.try_recv() {
        Ok(result) => {
          self.status_message = None;
          match result {
            Ok(feed) => self.apply_feed(feed, now_millis()),
            Err(e) => {
              error!(err = %format!("{:#}", e), "feed: load failed");
              self.set_error(format!("Failed to load catalog: {:#}", e));
            }
          }
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.load_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_message = None;
          self.set_error("Catalog load task failed.".to_string());
        }
      }
    }

    // Keep catalog flags and the channel in step with user state changes.
    let mut subscriptions_changed = false;
    while let Ok(event) = self.user_rx.try_recv() {
      match event {
        UserEvent::SubscriptionAdded(id) => {
          self.catalog.set_subscribed(&id, true);
          subscriptions_changed = true;
        }
        UserEvent::SubscriptionRemoved(id) => {
          self.catalog.set_subscribed(&id, false);
          subscriptions_changed = true;
        }
        UserEvent::EpisodeWatched(id) => self.catalog.set_watched(&id),
      }
    }
    if subscriptions_changed {
      self.channel.refresh(&self.catalog, self.user.subscriptions());
      if matches!(self.route, Route::Subscriptions | Route::Channel) {
        self.rebuild_keep_selection();
      }
    }
  }

  /// Swap in a freshly loaded feed and announce episodes that aired since the
  /// previous check.
  pub fn apply_feed(&mut self, feed: Feed, now: i64) {
    self.catalog = Catalog::from_feed(feed, &self.user, now);
    self.check_new_episodes(now);
    self.channel.refresh(&self.catalog, self.user.subscriptions());
    self.rebuild_keep_selection();
    if let Some(slug) = self.pending_open.take() {
      self.open_slug(&slug);
    }
  }

  /// Open the show with this slug, or the episode with this slug inside its show.
  pub fn open_slug(&mut self, slug: &str) {
    if let Some(id) = self.catalog.show_by_slug(slug).map(|s| s.id.clone()) {
      self.navigate(Route::Show(id));
    } else if let Some((id, show_id)) = self.catalog.episode_by_slug(slug).map(|e| (e.id.clone(), e.show_id.clone())) {
      self.navigate(Route::Show(show_id));
      if let Some(pos) = self.grid.items().iter().position(|t| *t == Tile::Episode(id.clone())) {
        self.grid.select(pos);
      }
      self.open_selected();
    } else {
      warn!(slug, "open: no show or episode with this slug");
      self.set_error(format!("Nothing found for '{}'", slug));
    }
  }

  fn check_new_episodes(&mut self, now: i64) {
    if let Some(last) = self.user.last_episode_check() {
      let fresh = self.catalog.search_by_timestamp(last);
      if !fresh.is_empty() {
        info!(count = fresh.len(), "catalog: new episodes since last check");
        self.info_message = Some(match fresh.as_slice() {
          [one] => format!("New episode: {}: {}", one.show_title, one.title),
          many => format!("{} new episodes since your last visit", many.len()),
        });
      }
    }
    if let Err(e) = self.user.update_last_episode_check(now) {
      warn!(err = %format!("{:#}", e), "user: could not store last check");
      self.set_error(format!("Could not save user state: {:#}", e));
    }
  }

  // --- Routing ---

  pub fn navigate(&mut self, route: Route) {
    if route == self.route {
      return;
    }
    debug!(?route, "navigate");
    let previous = std::mem::replace(&mut self.route, route);
    self.history.push(previous);
    self.rebuild();
  }

  /// Return to the previous route. Returns false when there is nothing to go back to.
  pub fn back(&mut self) -> bool {
    match self.history.pop() {
      Some(route) => {
        self.route = route;
        self.rebuild();
        true
      }
      None => false,
    }
  }

  pub fn can_go_back(&self) -> bool {
    !self.history.is_empty()
  }

  /// Tiles for the current route, in display order.
  pub fn tiles(&self) -> Vec<Tile> {
    let shows = |list: Vec<&Show>| -> Vec<Tile> { list.into_iter().map(|s| Tile::Show(s.id.clone())).collect() };
    let episodes = |list: Vec<&Episode>| -> Vec<Tile> { list.into_iter().map(|e| Tile::Episode(e.id.clone())).collect() };
    match &self.route {
      Route::Shows => shows(self.catalog.shows().iter().collect()),
      Route::Subscriptions => shows(self.catalog.subscribed_shows()),
      Route::Show(id) => episodes(self.catalog.episodes_by_show(id, false)),
      Route::Latest => episodes(self.catalog.latest_episodes()),
      Route::Channel => self.channel.entries().iter().map(|e| Tile::Episode(e.episode_id.clone())).collect(),
      Route::Search(q) => episodes(self.catalog.search(q).into_iter().map(|r| r.episode).collect()),
    }
  }

  fn rebuild(&mut self) {
    self.grid.set_cell_bounds(self.route.cell_bounds());
    self.grid.set_items(self.tiles());
  }

  /// Rebuild the grid but keep the same tile selected if it is still there.
  fn rebuild_keep_selection(&mut self) {
    let selected = self.grid.selected_item().cloned();
    self.rebuild();
    if let Some(tile) = selected
      && let Some(pos) = self.grid.items().iter().position(|t| *t == tile)
    {
      self.grid.select(pos);
    }
  }

  // --- Search ---

  /// Ranked results for the query being typed, capped for the live dropdown.
  pub fn live_results(&self) -> Vec<SearchResult<'_>> {
    if self.input.trim().is_empty() {
      return Vec::new();
    }
    let mut results = self.catalog.search(&self.input);
    results.truncate(constants().live_search_results);
    results
  }

  pub fn live_result_count(&self) -> usize {
    if self.input.trim().is_empty() { 0 } else { self.catalog.search(&self.input).len() }
  }

  pub fn start_search(&mut self) {
    self.mode = AppMode::Search;
  }

  /// Turn the typed query into a search results route.
  pub fn commit_search(&mut self) {
    let query = self.input.trim().to_string();
    if query.is_empty() {
      self.set_error("Enter a search term.".to_string());
      return;
    }
    info!(query = %query, "search committed");
    self.clear_error();
    self.mode = AppMode::Browse;
    self.navigate(Route::Search(query));
  }

  // --- Selection actions ---

  /// Open the selected tile: a show opens its episode list, an episode is
  /// played (see [`App::play_episode`]).
  pub fn open_selected(&mut self) {
    let Some(tile) = self.grid.selected_item().cloned() else { return };
    match tile {
      Tile::Show(id) => self.navigate(Route::Show(id)),
      Tile::Episode(id) => self.play_episode(&id),
    }
  }

  /// Open the detail panel for an episode, make it the channel's now-playing
  /// entry (queueing it if absent) and count it as watched.
  pub fn play_episode(&mut self, episode_id: &str) {
    let Some(ep) = self.catalog.episode_by_id(episode_id) else { return };
    let queued = !self.channel.contains(episode_id);
    self.channel.play(ep);
    if queued && self.route == Route::Channel {
      self.rebuild_keep_selection();
    }
    if let Err(e) = self.user.set_watched_episode(episode_id) {
      self.set_error(format!("Could not save watched state: {:#}", e));
    }
    self.detail = Some(episode_id.to_string());
    self.mode = AppMode::Detail;
  }

  // --- Channel ---

  /// Finish the now-playing episode and play the next one in the channel,
  /// wrapping to the first after the last.
  pub fn channel_next(&mut self) {
    if let Some(current) = self.channel.now_playing().map(str::to_string)
      && let Err(e) = self.user.set_watched_episode(&current)
    {
      self.set_error(format!("Could not save watched state: {:#}", e));
    }
    let Some(next) = self.channel.next().map(|e| e.episode_id.clone()) else {
      self.info_message = Some("The channel is empty. Subscribe to shows to fill it.".to_string());
      return;
    };
    debug!(episode_id = %next, "channel: next");
    if self.route == Route::Channel
      && let Some(pos) = self.grid.items().iter().position(|t| *t == Tile::Episode(next.clone()))
    {
      self.grid.select(pos);
    }
    self.play_episode(&next);
  }

  /// Take the selected episode out of the channel; it counts as watched.
  pub fn channel_remove_selected(&mut self) {
    if self.route != Route::Channel {
      return;
    }
    let Some(Tile::Episode(id)) = self.grid.selected_item().cloned() else { return };
    let index = self.grid.selected().unwrap_or(0);
    if !self.channel.remove(&id) {
      return;
    }
    if let Err(e) = self.user.set_watched_episode(&id) {
      self.set_error(format!("Could not save watched state: {:#}", e));
    }
    if self.detail.as_deref() == Some(id.as_str()) {
      self.close_detail();
    }
    self.rebuild();
    self.grid.select(index);
  }

  pub fn toggle_channel_order(&mut self) {
    self.channel.toggle_order();
    if self.route == Route::Channel {
      self.rebuild_keep_selection();
    }
  }

  pub fn toggle_channel_grouping(&mut self) {
    let grouped = !self.channel.grouped_by_show();
    self.channel.set_grouped_by_show(grouped);
    if self.route == Route::Channel {
      self.rebuild_keep_selection();
    }
  }

  pub fn close_detail(&mut self) {
    self.detail = None;
    self.mode = AppMode::Browse;
  }

  pub fn detail_episode(&self) -> Option<&Episode> {
    self.detail.as_deref().and_then(|id| self.catalog.episode_by_id(id))
  }

  /// The show an action like "subscribe" applies to: the open episode's show,
  /// the show being browsed, or the selected tile's show.
  pub fn focused_show_id(&self) -> Option<String> {
    if let Some(ep) = self.detail_episode() {
      return Some(ep.show_id.clone());
    }
    if let Route::Show(ref id) = self.route {
      return Some(id.clone());
    }
    match self.grid.selected_item()? {
      Tile::Show(id) => Some(id.clone()),
      Tile::Episode(id) => self.catalog.episode_by_id(id).map(|e| e.show_id.clone()),
    }
  }

  pub fn toggle_subscription(&mut self) {
    let Some(show_id) = self.focused_show_id() else { return };
    let title = self.catalog.show_by_id(&show_id).map(|s| s.title.clone()).unwrap_or_else(|| show_id.clone());
    match self.user.toggle_subscription(&show_id) {
      Ok(true) => self.info_message = Some(format!("Subscribed to {}", title)),
      Ok(false) => self.info_message = Some(format!("Unsubscribed from {}", title)),
      Err(e) => self.set_error(format!("Could not save subscription: {:#}", e)),
    }
  }
}
