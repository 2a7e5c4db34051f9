use chrono::DateTime;
use regex::Regex;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("static regex"));

/// Classic edit distance (insert, delete, substitute all cost 1), over chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
  let a: Vec<char> = a.chars().collect();
  let b: Vec<char> = b.chars().collect();
  if a.is_empty() {
    return b.len();
  }
  if b.is_empty() {
    return a.len();
  }

  // Two rolling rows of the DP table.
  let mut prev: Vec<usize> = (0..=b.len()).collect();
  let mut curr = vec![0; b.len() + 1];
  for (i, ca) in a.iter().enumerate() {
    curr[0] = i + 1;
    for (j, cb) in b.iter().enumerate() {
      let substitution = prev[j] + usize::from(ca != cb);
      curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(substitution);
    }
    std::mem::swap(&mut prev, &mut curr);
  }
  prev[b.len()]
}

/// URL-safe identifier from a title: `"Page Title!"` → `"page-title"`.
pub fn slugify(s: &str) -> String {
  let kept: String = s.trim().chars().filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace()).collect();
  kept.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase()
}

/// Remove any `<...>` markup.
pub fn strip_tags(s: &str) -> String {
  TAG_RE.replace_all(s, "").into_owned()
}

/// Shorten a description for a summary line.
///
/// Cuts at the first period when it appears at or after `min_len` chars, then,
/// if still longer than `max_len`, cuts at the last word boundary before
/// `max_len` and appends `...`.
pub fn single_sentence(s: &str, min_len: usize, max_len: Option<usize>) -> String {
  let mut out: String = match s.chars().position(|c| c == '.') {
    Some(pos) if pos >= min_len => s.chars().take(pos + 1).collect(),
    _ => s.to_string(),
  };
  if let Some(max) = max_len
    && out.chars().count() > max
  {
    let head: String = out.chars().take(max).collect();
    let cut = head.rfind(' ').unwrap_or(0);
    out = format!("{}...", &head[..cut]);
  }
  out
}

/// Render a millisecond timestamp as `Mon D, YYYY` (e.g. `May 4, 2011`).
pub fn format_airdate(millis: i64) -> String {
  DateTime::from_timestamp_millis(millis).map(|d| d.format("%b %-d, %Y").to_string()).unwrap_or_default()
}
