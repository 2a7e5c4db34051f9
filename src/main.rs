mod app;
mod catalog;
mod channel;
mod config;
mod constants;
mod feed;
mod flex_grid;
mod grid;
mod input;
mod paginator;
mod search;
mod text;
mod theme;
mod ui;
mod user;

use anyhow::Result;
use clap::Parser;
use directories::ProjectDirs;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use app::App;
use config::Config;
use constants::constants;
use feed::FeedSource;
use input::handle_key_event;
use user::UserStore;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Catalog feed: a JSON file path or an http(s) URL (default: prefs.toml, then catalog.json)
  #[arg(short, long)]
  feed: Option<String>,

  /// Open a show or episode by its slug once the catalog has loaded
  #[arg(short, long)]
  open: Option<String>,

  /// Log filter, e.g. 'debug' or 'reel=trace' (overrides RUST_LOG)
  #[arg(long)]
  log_level: Option<String>,
}

// --- Logging ---

/// Log to `reel.log` in the data directory; the terminal belongs to the UI.
/// The returned guard flushes pending lines when dropped.
fn init_logging(level: Option<&str>) -> Option<WorkerGuard> {
  let dirs = ProjectDirs::from("", "", "reel")?;
  let log_dir = dirs.data_dir();
  std::fs::create_dir_all(log_dir).ok()?;

  let filter = match level {
    Some(l) => EnvFilter::new(l),
    None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("reel=info")),
  };
  let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, "reel.log"));
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();
  Some(guard)
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let _log_guard = init_logging(args.log_level.as_deref());
  info!(version = env!("CARGO_PKG_VERSION"), "starting reel");

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, args).await;
  ratatui::restore();
  result
}

async fn run(terminal: &mut DefaultTerminal, args: Args) -> Result<()> {
  let feed = args.feed.or_else(|| Config::load().feed).unwrap_or_else(|| constants().default_feed.clone());

  let (user, user_error) = match UserStore::load() {
    Ok(user) => {
      info!(path = ?user.path(), subscriptions = user.subscriptions().len(), "user: state ready");
      (user, None)
    }
    Err(e) => {
      warn!(err = %format!("{:#}", e), "user: falling back to in-memory state");
      (UserStore::in_memory(), Some(format!("User state not loaded: {:#}", e)))
    }
  };

  let mut app = App::new(FeedSource::parse(&feed), user);
  if let Some(msg) = user_error {
    app.set_error(msg);
  }
  if let Some(slug) = args.open {
    app.open_slug_on_load(slug);
  }
  app.trigger_load();

  loop {
    app.check_pending();
    app.maybe_refresh();
    app.expire_error();

    terminal.draw(|frame| ui::ui(frame, &mut app))?;

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          handle_key_event(&mut app, key);
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }

  info!("exiting");
  Ok(())
}
