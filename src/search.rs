//! Free-text episode search.
//!
//! Matching is a case-insensitive OR of the query words against title, show
//! title and description, tried in that order. The first field that matches
//! decides the episode's score: edit distance between the query and the whole
//! field, divided by the field length. Lower scores rank first.

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::catalog::Episode;
use crate::text::levenshtein;

static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s\-]").expect("static regex"));

/// A query reduced to word characters, whitespace and hyphens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedQuery {
  /// Words joined by `|`, used as the match pattern.
  pub pattern: String,
  /// Words joined by single spaces, used for scoring.
  pub text: String,
}

impl SanitizedQuery {
  /// Returns `None` when nothing searchable is left.
  pub fn parse(raw: &str) -> Option<Self> {
    let cleaned = DISALLOWED.replace_all(raw, "");
    let words: Vec<&str> = cleaned.split_whitespace().collect();
    if words.is_empty() {
      return None;
    }
    Some(Self { pattern: words.join("|"), text: words.join(" ") })
  }

  fn matcher(&self) -> Option<Regex> {
    match RegexBuilder::new(&self.pattern).case_insensitive(true).build() {
      Ok(re) => Some(re),
      Err(e) => {
        warn!(pattern = %self.pattern, err = %e, "search: could not build matcher");
        None
      }
    }
  }
}

/// One ranked hit.
#[derive(Debug, Clone, Copy)]
pub struct SearchResult<'a> {
  pub episode: &'a Episode,
  pub distance: f64,
}

/// Edit distance normalised by the field length. Compared case-insensitively,
/// like the matcher, so an exact title scores zero regardless of case.
fn score(query: &str, field: &str) -> f64 {
  let len = field.chars().count().max(1);
  levenshtein(&query.to_lowercase(), &field.to_lowercase()) as f64 / len as f64
}

/// Rank `episodes` against `query`. Empty or all-punctuation queries return
/// nothing.
pub fn search<'a>(query: &str, episodes: &'a [Episode]) -> Vec<SearchResult<'a>> {
  let Some(query) = SanitizedQuery::parse(query) else { return Vec::new() };
  let Some(re) = query.matcher() else { return Vec::new() };

  let mut results: Vec<SearchResult<'a>> = episodes
    .iter()
    .filter_map(|episode| {
      [episode.title.as_str(), episode.show_title.as_str(), episode.text.as_str()]
        .into_iter()
        .find(|field| re.is_match(field))
        .map(|field| SearchResult { episode, distance: score(&query.text, field) })
    })
    .collect();

  // Stable, so equal scores keep catalog order.
  results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
  debug!(query = %query.text, hits = results.len(), "search: ranked");
  results
}

/// Episodes that aired strictly after `after_millis`, in catalog order.
pub fn search_by_timestamp(after_millis: i64, episodes: &[Episode]) -> Vec<&Episode> {
  episodes.iter().filter(|e| e.airdate > after_millis).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn episode(title: &str, show_title: &str, text: &str, airdate: i64) -> Episode {
    Episode {
      id: title.to_lowercase(),
      title: title.to_string(),
      show_title: show_title.to_string(),
      text: text.to_string(),
      airdate,
      ..Episode::default()
    }
  }

  fn demo() -> Vec<Episode> {
    vec![
      episode("Pilot", "Demo Show", "First episode.", 100),
      episode("Finale", "Demo Show", "Last episode ever.", 200),
    ]
  }

  fn titles(results: &[SearchResult<'_>]) -> Vec<String> {
    results.iter().map(|r| r.episode.title.clone()).collect()
  }

  // --- SanitizedQuery ---

  #[test]
  fn sanitize_strips_punctuation_and_joins_words() {
    let q = SanitizedQuery::parse("  hello,   world! ").unwrap();
    assert_eq!(q.pattern, "hello|world");
    assert_eq!(q.text, "hello world");
  }

  #[test]
  fn sanitize_keeps_hyphens_and_underscores() {
    let q = SanitizedQuery::parse("co-op my_show").unwrap();
    assert_eq!(q.pattern, "co-op|my_show");
  }

  #[test]
  fn sanitize_rejects_empty() {
    assert_eq!(SanitizedQuery::parse(""), None);
    assert_eq!(SanitizedQuery::parse("   "), None);
    assert_eq!(SanitizedQuery::parse("?!*"), None);
  }

  // --- search ---

  #[test]
  fn empty_query_returns_nothing() {
    assert!(search("", &demo()).is_empty());
  }

  #[test]
  fn regex_metacharacters_are_not_special() {
    assert!(search(".*", &demo()).is_empty());
  }

  #[test]
  fn title_match_is_case_insensitive() {
    let episodes = demo();
    let results = search("pilot", &episodes);
    assert_eq!(titles(&results), vec!["Pilot"]);
    assert_eq!(results[0].distance, 0.0);
  }

  #[test]
  fn exact_title_ranks_before_partial_match() {
    let episodes = vec![
      episode("Pilot Season Special", "Other", "", 1),
      episode("Pilot", "Demo Show", "", 2),
    ];
    let results = search("Pilot", &episodes);
    assert_eq!(titles(&results), vec!["Pilot", "Pilot Season Special"]);
    assert_eq!(results[0].distance, 0.0);
  }

  #[test]
  fn show_title_match_when_title_misses() {
    let episodes = demo();
    let results = search("demo", &episodes);
    assert_eq!(results.len(), 2);
    // Same show title, same score: catalog order is kept.
    assert_eq!(titles(&results), vec!["Pilot", "Finale"]);
  }

  #[test]
  fn description_match_is_last_resort() {
    let episodes = demo();
    let results = search("ever", &episodes);
    assert_eq!(titles(&results), vec!["Finale"]);
    let field = "Last episode ever.";
    let expected = levenshtein("ever", &field.to_lowercase()) as f64 / field.chars().count() as f64;
    assert!((results[0].distance - expected).abs() < 1e-12);
  }

  #[test]
  fn first_matching_field_wins() {
    // Title matches, so the (closer) show title is never scored.
    let title = "Pilot of the long running series";
    let episodes = vec![episode(title, "Pilot", "", 1)];
    let results = search("pilot", &episodes);
    let expected = levenshtein("pilot", &title.to_lowercase()) as f64 / title.chars().count() as f64;
    assert!((results[0].distance - expected).abs() < 1e-12);
  }

  #[test]
  fn any_word_matches() {
    let episodes = demo();
    let results = search("finale nothing", &episodes);
    assert_eq!(titles(&results), vec!["Finale"]);
  }

  #[test]
  fn no_match_is_empty() {
    assert!(search("zebra", &demo()).is_empty());
  }

  #[test]
  fn no_episodes_is_empty() {
    assert!(search("pilot", &[]).is_empty());
  }

  // --- search_by_timestamp ---

  #[test]
  fn by_timestamp_is_strict_and_ordered() {
    let episodes =
      vec![episode("A", "S", "", 100), episode("B", "S", "", 200), episode("C", "S", "", 300)];
    let found: Vec<&str> = search_by_timestamp(150, &episodes).iter().map(|e| e.title.as_str()).collect();
    assert_eq!(found, vec!["B", "C"]);
    assert!(search_by_timestamp(300, &episodes).is_empty());
  }
}
