use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use std::path::PathBuf;
use tracing::info;

use crate::catalog::Feed;

/// Where the catalog feed comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
  Url(String),
  Path(PathBuf),
}

impl FeedSource {
  pub fn parse(s: &str) -> Self {
    let s = s.trim();
    if s.starts_with("http://") || s.starts_with("https://") { Self::Url(s.to_string()) } else { Self::Path(PathBuf::from(s)) }
  }

  pub fn label(&self) -> String {
    match self {
      FeedSource::Url(url) => url.clone(),
      FeedSource::Path(path) => path.display().to_string(),
    }
  }
}

/// Append a cache-busting `v=<millis>` parameter so proxies never serve a
/// stale feed.
fn cache_busted(url: &str, now_millis: i64) -> String {
  let sep = if url.contains('?') { '&' } else { '?' };
  format!("{}{}v={}", url, sep, now_millis)
}

pub fn parse_feed(json: &str) -> Result<Feed> {
  serde_json::from_str(json).context("Feed is not valid catalog JSON")
}

pub async fn load_feed(client: &Client, source: &FeedSource) -> Result<Feed> {
  let body = match source {
    FeedSource::Url(url) => {
      let url = cache_busted(url, chrono::Utc::now().timestamp_millis());
      let response = client.get(&url).send().await.with_context(|| format!("Failed to request {}", url))?;
      if !response.status().is_success() {
        return Err(anyhow!("Feed request failed: HTTP {}", response.status()));
      }
      response.text().await.with_context(|| format!("Failed to read feed body from {}", url))?
    }
    FeedSource::Path(path) => tokio::fs::read_to_string(path)
      .await
      .with_context(|| format!("Failed to read feed file {}", path.display()))?,
  };
  let feed = parse_feed(&body)?;
  info!(source = %source.label(), categories = feed.categories.len(), "feed: loaded");
  Ok(feed)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_source_kinds() {
    assert_eq!(FeedSource::parse("https://x.test/data.json"), FeedSource::Url("https://x.test/data.json".into()));
    assert_eq!(FeedSource::parse(" http://x.test "), FeedSource::Url("http://x.test".into()));
    assert_eq!(FeedSource::parse("data/catalog.json"), FeedSource::Path(PathBuf::from("data/catalog.json")));
  }

  #[test]
  fn cache_busting_respects_existing_query() {
    assert_eq!(cache_busted("http://x.test/d.json", 5), "http://x.test/d.json?v=5");
    assert_eq!(cache_busted("http://x.test/d?a=1", 5), "http://x.test/d?a=1&v=5");
  }

  #[test]
  fn parse_feed_rejects_garbage() {
    assert!(parse_feed("not json").is_err());
    assert!(parse_feed("{}").unwrap().categories.is_empty());
  }

  #[tokio::test]
  async fn load_from_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, r#"{"categories":[{"id":"1","title":"Show","episodes":[{"id":"e","title":"Ep"}]}]}"#)
      .unwrap();
    let feed = load_feed(&Client::new(), &FeedSource::Path(path)).await.unwrap();
    assert_eq!(feed.categories.len(), 1);
    assert_eq!(feed.categories[0].episodes[0].title, "Ep");
  }

  #[tokio::test]
  async fn load_missing_file_errors() {
    let err = load_feed(&Client::new(), &FeedSource::Path(PathBuf::from("/nonexistent/catalog.json"))).await;
    assert!(err.is_err());
  }
}
