use ratatui::crossterm::event::{self, KeyCode, KeyModifiers};

use crate::app::{App, AppMode, Route};

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

// --- Event Handling ---

pub fn handle_key_event(app: &mut App, key: event::KeyEvent) {
  if key.modifiers.contains(KeyModifiers::CONTROL) {
    match key.code {
      KeyCode::Char('c') => {
        app.should_quit = true;
        return;
      }
      KeyCode::Char('t') => {
        app.next_theme();
        return;
      }
      KeyCode::Char('r') => {
        app.trigger_load();
        return;
      }
      _ => {}
    }
  }

  match app.mode {
    AppMode::Browse => handle_browse_key(app, key),
    AppMode::Search => handle_search_key(app, key),
    AppMode::Detail => handle_detail_key(app, key),
  }
}

fn handle_browse_key(app: &mut App, key: event::KeyEvent) {
  app.info_message = None;
  match key.code {
    KeyCode::Left | KeyCode::Char('h') => app.grid.select_offset(-1),
    KeyCode::Right | KeyCode::Char('l') => app.grid.select_offset(1),
    KeyCode::Up | KeyCode::Char('k') => app.grid.select_row(-1),
    KeyCode::Down | KeyCode::Char('j') => app.grid.select_row(1),
    KeyCode::PageDown | KeyCode::Char(']') => {
      app.grid.next_page();
    }
    KeyCode::PageUp | KeyCode::Char('[') => {
      app.grid.prev_page();
    }
    KeyCode::Enter => app.open_selected(),
    KeyCode::Esc | KeyCode::Backspace => {
      app.back();
    }
    KeyCode::Char('/') => app.start_search(),
    KeyCode::Char('1') => app.navigate(Route::Shows),
    KeyCode::Char('2') => app.navigate(Route::Latest),
    KeyCode::Char('3') => app.navigate(Route::Subscriptions),
    KeyCode::Char('4') => app.navigate(Route::Channel),
    KeyCode::Char('s') => app.toggle_subscription(),
    KeyCode::Char('n') => app.channel_next(),
    KeyCode::Char('x') | KeyCode::Delete => app.channel_remove_selected(),
    KeyCode::Char('o') if app.route == Route::Channel => app.toggle_channel_order(),
    KeyCode::Char('g') if app.route == Route::Channel => app.toggle_channel_grouping(),
    KeyCode::Char('q') => app.should_quit = true,
    _ => {}
  }
}

fn handle_detail_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Esc | KeyCode::Backspace | KeyCode::Enter => app.close_detail(),
    KeyCode::Char('s') => app.toggle_subscription(),
    KeyCode::Char('n') => app.channel_next(),
    KeyCode::Char('q') => app.should_quit = true,
    _ => {}
  }
}

fn handle_search_key(app: &mut App, key: event::KeyEvent) {
  app.clear_error();
  match key.code {
    KeyCode::Enter => {
      app.commit_search();
    }
    KeyCode::Char(c) => {
      let byte_idx = char_to_byte_index(&app.input, app.cursor_position);
      app.input.insert(byte_idx, c);
      app.cursor_position += 1;
    }
    KeyCode::Backspace => {
      if app.cursor_position > 0 {
        app.cursor_position -= 1;
        let byte_idx = char_to_byte_index(&app.input, app.cursor_position);
        app.input.remove(byte_idx);
      }
    }
    KeyCode::Delete => {
      if app.cursor_position < app.input.chars().count() {
        let byte_idx = char_to_byte_index(&app.input, app.cursor_position);
        app.input.remove(byte_idx);
      }
    }
    KeyCode::Left => {
      app.cursor_position = app.cursor_position.saturating_sub(1);
    }
    KeyCode::Right => {
      if app.cursor_position < app.input.chars().count() {
        app.cursor_position += 1;
      }
    }
    KeyCode::Home => {
      app.cursor_position = 0;
    }
    KeyCode::End => {
      app.cursor_position = app.input.chars().count();
    }
    KeyCode::Esc => {
      if !app.input.is_empty() {
        app.input.clear();
        app.cursor_position = 0;
        app.input_scroll = 0;
      } else {
        app.mode = AppMode::Browse;
      }
    }
    _ => {}
  }
}
