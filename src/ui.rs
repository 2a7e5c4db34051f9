use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, BorderType, Clear, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::{App, AppMode, Route, Tile};
use crate::catalog::{Episode, Show};
use crate::text::{format_airdate, single_sentence, strip_tags};
use crate::theme::Theme;

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

fn rounded(theme: &Theme) -> Block<'static> {
  Block::bordered().border_type(BorderType::Rounded).border_style(Style::default().fg(theme.border))
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();
  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, main_area, status_area, input_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Min(5),
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, app, header_area);
  render_main(frame, app, main_area);
  if app.mode == AppMode::Search {
    render_live_results(frame, app, main_area);
  }
  render_status(frame, app, status_area);
  render_input(frame, app, input_area);
  render_footer(frame, app, footer_area);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let sections = [
    ("1", "Shows", Route::Shows),
    ("2", "Latest", Route::Latest),
    ("3", "Subscriptions", Route::Subscriptions),
    ("4", "Channel", Route::Channel),
  ];

  let mut spans = vec![Span::styled(" ▶ reel ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))];
  for (key, label, route) in sections {
    let active = app.route == route;
    let style = if active {
      Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(theme.muted)
    };
    spans.push(Span::raw(" "));
    spans.push(Span::styled(format!(" {} {} ", key, label), style));
  }
  frame.render_widget(Line::from(spans), area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

fn render_main(frame: &mut Frame, app: &mut App, area: Rect) {
  let (grid_area, detail_area) = if app.mode == AppMode::Detail {
    let [g, d] = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area);
    (g, Some(d))
  } else {
    (area, None)
  };

  render_grid(frame, app, grid_area);
  if let Some(d) = detail_area {
    render_detail(frame, app, d);
  }
}

/// The page indicator shown under the grid: `◀ Page 2/5 ▶`, arrows dimmed
/// when that direction is unavailable.
fn pager_line<'a>(app: &App, theme: &Theme) -> Line<'a> {
  let arrow = |enabled: bool, s: &'a str| {
    Span::styled(s, if enabled { Style::default().fg(theme.accent) } else { Style::default().fg(theme.border) })
  };
  Line::from(vec![
    Span::raw(" "),
    arrow(app.grid.has_prev(), "◀"),
    Span::styled(
      format!(" Page {}/{} ", app.grid.current_page(), app.grid.total_pages()),
      Style::default().fg(theme.muted),
    ),
    arrow(app.grid.has_next(), "▶"),
    Span::raw(" "),
  ])
}

fn render_grid(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let mut block = rounded(theme)
    .title(format!(" {} ", app.route.title(&app.catalog)))
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD));
  if let Route::Show(ref id) = app.route
    && let Some(show) = app.catalog.show_by_id(id)
    && !show.description.is_empty()
  {
    let blurb = single_sentence(&strip_tags(&show.description), 15, Some(60));
    block = block.title_bottom(Line::from(Span::styled(format!(" {} ", blurb), Style::default().fg(theme.muted))));
  }
  if app.route == Route::Channel {
    block = block.title_bottom(Line::from(Span::styled(channel_label(app), Style::default().fg(theme.muted))));
  }
  if app.grid.total_pages() > 1 {
    block = block.title_bottom(pager_line(app, theme).alignment(Alignment::Right));
  }
  let inner = block.inner(area);
  frame.render_widget(block, area);

  app.grid.resize(inner.width as f64, inner.height as f64);

  if app.grid.is_empty() {
    let msg = if app.catalog.is_empty() {
      "Loading catalog…"
    } else {
      match app.route {
        Route::Subscriptions => "No subscriptions yet. Press s on a show to subscribe.",
        Route::Channel => "The channel is empty. Subscribe to shows to fill it.",
        Route::Search(_) => "No episodes match your search.",
        _ => "Nothing to show here.",
      }
    };
    let text = vec![Line::from(""), Line::from(Span::styled(msg, Style::default().fg(theme.muted)))];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
    return;
  }

  let cell = app.grid.layout().cell_bounds();
  let selected = app.grid.selected();
  let playing = app.channel.now_playing();
  for p in app.grid.placements() {
    let x = inner.x + p.coord.x.max(0.0) as u16;
    let y = inner.y + p.coord.y.max(0.0) as u16;
    let tile_area = Rect {
      x,
      y,
      width: (cell.width as u16).min(inner.right().saturating_sub(x)),
      height: (cell.height as u16).min(inner.bottom().saturating_sub(y)),
    };
    if tile_area.width == 0 || tile_area.height == 0 {
      continue;
    }
    let is_selected = selected == Some(p.index);
    match p.item {
      Tile::Show(id) => {
        if let Some(show) = app.catalog.show_by_id(id) {
          render_show_tile(frame, app, show, is_selected, tile_area);
        }
      }
      Tile::Episode(id) => {
        if let Some(ep) = app.catalog.episode_by_id(id) {
          render_episode_tile(frame, theme, ep, is_selected, playing == Some(id.as_str()), tile_area);
        }
      }
    }
  }
}

/// Channel state for the grid's bottom border: ` 5 queued · newest first · by show `.
fn channel_label(app: &App) -> String {
  let channel = &app.channel;
  let grouping = if channel.grouped_by_show() { " · by show" } else { "" };
  format!(" {} queued · {}{} ", channel.len(), channel.order().label(), grouping)
}

fn tile_block(theme: &Theme, selected: bool) -> Block<'static> {
  let (border, bg) = if selected { (theme.accent, theme.highlight_bg) } else { (theme.border, theme.tile_bg) };
  Block::bordered()
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(border))
    .style(Style::default().bg(bg))
    .padding(Padding::horizontal(1))
}

fn render_show_tile(frame: &mut Frame, app: &App, show: &Show, selected: bool, area: Rect) {
  let theme = app.theme();
  let inner_w = area.width.saturating_sub(4) as usize;
  let title_fg = if selected { theme.highlight_fg } else { theme.fg };

  let mut lines = vec![Line::from(Span::styled(
    truncate_str(&show.title, inner_w),
    Style::default().fg(title_fg).add_modifier(Modifier::BOLD),
  ))];
  let videos = if show.video_count == 1 { "1 video".to_string() } else { format!("{} videos", show.video_count) };
  lines.push(Line::from(Span::styled(videos, Style::default().fg(theme.muted))));
  if let Some(latest) = show.latest_airdate {
    lines.push(Line::from(Span::styled(
      truncate_str(&format!("Latest {}", format_airdate(latest)), inner_w),
      Style::default().fg(theme.muted),
    )));
  }
  if show.subscribed {
    let unwatched = app.catalog.unwatched_count(&show.id);
    let label = if unwatched > 0 { format!("★ {} unwatched", unwatched) } else { "★ subscribed".to_string() };
    lines.push(Line::from(Span::styled(label, Style::default().fg(theme.new_badge))));
  }

  frame.render_widget(Clear, area);
  frame.render_widget(Paragraph::new(lines).block(tile_block(theme, selected)), area);
}

fn render_episode_tile(frame: &mut Frame, theme: &Theme, ep: &Episode, selected: bool, playing: bool, area: Rect) {
  let inner_w = area.width.saturating_sub(4) as usize;
  let title_fg = if selected { theme.highlight_fg } else { theme.fg };

  let mut title_spans = Vec::new();
  let mut title_w = inner_w;
  if playing {
    title_spans.push(Span::styled("▶ ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)));
    title_w = title_w.saturating_sub(2);
  }
  if ep.is_new {
    title_spans.push(Span::styled("NEW ", Style::default().fg(theme.new_badge).add_modifier(Modifier::BOLD)));
    title_w = title_w.saturating_sub(4);
  }
  title_spans.push(Span::styled(truncate_str(&ep.title, title_w), Style::default().fg(title_fg).add_modifier(Modifier::BOLD)));

  let mut meta = format_airdate(ep.airdate);
  if let Some(ref runtime) = ep.runtime {
    meta = format!("{}  {}", meta, runtime);
  }
  if ep.watched {
    meta = format!("{}  ✓", meta);
  }

  let lines = vec![
    Line::from(Span::styled(truncate_str(&ep.show_title, inner_w), Style::default().fg(theme.muted))),
    Line::from(title_spans),
    Line::from(Span::styled(truncate_str(&meta, inner_w), Style::default().fg(theme.muted))),
  ];

  frame.render_widget(Clear, area);
  frame.render_widget(Paragraph::new(lines).block(tile_block(theme, selected)), area);
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let block = rounded(theme)
    .title(" Episode ")
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .padding(Padding::horizontal(1));

  let Some(ep) = app.detail_episode() else {
    frame.render_widget(block, area);
    return;
  };

  let body = strip_tags(&ep.text);
  let subscribed = app.catalog.show_by_id(&ep.show_id).is_some_and(|s| s.subscribed);
  let mut lines = vec![
    Line::from(Span::styled(ep.title.clone(), Style::default().fg(theme.fg).add_modifier(Modifier::BOLD))),
    Line::from(vec![
      Span::styled(ep.show_title.clone(), Style::default().fg(theme.accent)),
      Span::styled(if subscribed { "  ★" } else { "" }, Style::default().fg(theme.new_badge)),
    ]),
    Line::from(""),
    Line::from(vec![
      Span::styled("Aired     ", Style::default().fg(theme.muted)),
      Span::styled(format_airdate(ep.airdate), Style::default().fg(theme.fg)),
    ]),
  ];
  if let Some(ref runtime) = ep.runtime {
    lines.push(Line::from(vec![
      Span::styled("Runtime   ", Style::default().fg(theme.muted)),
      Span::styled(runtime.clone(), Style::default().fg(theme.fg)),
    ]));
  }
  let format = match (&ep.video_html, &ep.video_flash) {
    (Some(_), _) => Some("HTML5 video"),
    (None, Some(_)) => Some("Flash video"),
    (None, None) => None,
  };
  if let Some(format) = format {
    lines.push(Line::from(vec![
      Span::styled("Format    ", Style::default().fg(theme.muted)),
      Span::styled(format, Style::default().fg(theme.fg)),
    ]));
  }
  lines.push(Line::from(vec![
    Span::styled("Artwork   ", Style::default().fg(theme.muted)),
    Span::styled(ep.image_url.clone(), Style::default().fg(theme.accent).add_modifier(Modifier::UNDERLINED)),
  ]));
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    single_sentence(&body, 15, Some(60)),
    Style::default().fg(theme.fg).add_modifier(Modifier::ITALIC),
  )));
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(body, Style::default().fg(theme.muted))));

  frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), area);
}

/// Dropdown of ranked matches above the search box while typing.
fn render_live_results(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let results = app.live_results();
  if results.is_empty() {
    return;
  }
  let total = app.live_result_count();
  let more = total > results.len();
  let rows = results.len() as u16 + u16::from(more) + 2;
  let height = rows.min(area.height);
  let width = area.width.min(72);
  let popup = Rect { x: area.x + 1, y: area.bottom().saturating_sub(height), width, height };
  let inner_w = width.saturating_sub(4) as usize;

  let mut items: Vec<ListItem> = results
    .iter()
    .map(|r| {
      let show = format!("  {}", r.episode.show_title);
      let title = truncate_str(&r.episode.title, inner_w.saturating_sub(show.chars().count()));
      ListItem::new(Line::from(vec![
        Span::styled(title, Style::default().fg(theme.fg)),
        Span::styled(show, Style::default().fg(theme.muted)),
      ]))
    })
    .collect();
  if more {
    items.push(ListItem::new(Line::from(Span::styled(
      format!("More… ({} results, Enter)", total),
      Style::default().fg(theme.accent),
    ))));
  }

  let list = List::new(items).block(
    rounded(theme).title(" Matches ").title_style(Style::default().fg(theme.accent)).padding(Padding::horizontal(1)),
  );
  frame.render_widget(Clear, popup);
  frame.render_widget(list, popup);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if let Some(msg) = &app.status_message {
    (format!(" ⏳ {}", msg), Style::default().fg(theme.status))
  } else if let Some(err) = &app.last_error {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else if let Some(info) = &app.info_message {
    (format!(" ℹ  {}", info), Style::default().fg(theme.status))
  } else {
    let summary = format!(
      " {} shows · {} episodes · {}",
      app.catalog.shows().len(),
      app.catalog.episodes().len(),
      app.feed_source.label()
    );
    (summary, Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let active = app.mode == AppMode::Search;
  let border_color = if active { theme.accent } else { theme.border };
  let input_block = Block::bordered()
    .title(" Search episodes ")
    .title_style(Style::default().fg(border_color))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1));

  let inner_w = area.width.saturating_sub(4) as usize;
  let cursor_col = display_width(&app.input, app.cursor_position);

  if cursor_col < app.input_scroll {
    app.input_scroll = cursor_col;
  } else if cursor_col >= app.input_scroll + inner_w {
    app.input_scroll = cursor_col.saturating_sub(inner_w) + 1;
  }

  let visible: String = app
    .input
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= app.input_scroll)
    .take_while(|(start, _, _)| *start < app.input_scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  let paragraph = Paragraph::new(visible).style(Style::default().fg(theme.fg)).block(input_block);
  frame.render_widget(paragraph, area);

  if active {
    let cursor_x = area.x + 2 + (cursor_col - app.input_scroll) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
  }
}

fn footer_keys(app: &App) -> Vec<(&'static str, &'static str)> {
  match app.mode {
    AppMode::Search => vec![("Enter", "Search"), ("Esc", "Clear/Close"), ("^t", "Theme")],
    AppMode::Detail => vec![("Esc", "Close"), ("s", "Subscribe"), ("n", "Next"), ("^t", "Theme"), ("q", "Quit")],
    AppMode::Browse => {
      let mut k = vec![("←↑↓→", "Select"), ("Enter", "Open")];
      if app.grid.total_pages() > 1 {
        k.push(("[ ]", "Page"));
      }
      k.push(("/", "Search"));
      if app.route == Route::Channel {
        k.push(("n", "Next"));
        k.push(("x", "Remove"));
        k.push(("o", "Order"));
        k.push(("g", "Group"));
      } else {
        k.push(("s", "Subscribe"));
      }
      if app.can_go_back() {
        k.push(("Esc", "Back"));
      }
      k.push(("^r", "Reload"));
      k.push(("q", "Quit"));
      k
    }
  }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let keys = footer_keys(app);

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw(" "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", theme.name);
  let right = Line::from(Span::styled(&theme_label, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(theme_label.len() as u16), width: theme_label.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn truncate_short_is_unchanged() {
    assert_eq!(truncate_str("Pilot", 10), "Pilot");
  }

  #[test]
  fn truncate_long_appends_ellipsis() {
    assert_eq!(truncate_str("The Finale Episode", 8), "The Fin…");
  }

  #[test]
  fn display_width_counts_wide_chars() {
    assert_eq!(display_width("ab", 2), 2);
    assert_eq!(display_width("日本", 2), 4);
    assert_eq!(display_width("日本", 1), 2);
  }

  #[test]
  fn channel_label_shows_order_and_grouping() {
    let mut app = App::new(crate::feed::FeedSource::Path("unused.json".into()), crate::user::UserStore::in_memory());
    assert_eq!(channel_label(&app), " 0 queued · newest first · by show ");
    app.toggle_channel_order();
    app.toggle_channel_grouping();
    assert_eq!(channel_label(&app), " 0 queued · oldest first ");
  }
}
