//! Paper records as they travel through search, recommendation, and chat.
//!
//! A [`Paper`] is created from caller-supplied JSON (or from a search provider), lives
//! for a single request, and is never mutated by the recommendation pipeline. Any JSON
//! members beyond the known ones are kept in [`Paper::extra`] and written back out
//! unchanged, so front ends can attach whatever they need.
//!
//! # Examples
//!
//! ```
//! use paperchat::paper::{Paper, PaperId};
//!
//! let paper: Paper = serde_json::from_str(
//!   r#"{"id": 7, "title": "Attention Is All You Need", "summary": "", "venue": "NeurIPS"}"#,
//! )
//! .unwrap();
//!
//! assert_eq!(paper.id, PaperId::from(7));
//! assert_eq!(paper.extra["venue"], "NeurIPS");
//! assert_eq!(paper.text(), "Attention Is All You Need ");
//! assert_eq!(paper.link(), None);
//! ```

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::*;

/// Opaque identifier of a paper within one result set.
///
/// Search providers number their results (`1`, `2`, ...) while other callers may use
/// strings. The two representations never compare equal: `1` and `"1"` are different
/// papers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaperId {
  /// Numeric identifier, as produced by the search endpoints
  Int(i64),
  /// Free-form string identifier
  Text(String),
}

impl std::fmt::Display for PaperId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      PaperId::Int(id) => write!(f, "{id}"),
      PaperId::Text(id) => write!(f, "{id}"),
    }
  }
}

impl From<i64> for PaperId {
  fn from(id: i64) -> Self { PaperId::Int(id) }
}

impl From<i32> for PaperId {
  fn from(id: i32) -> Self { PaperId::Int(i64::from(id)) }
}

impl From<usize> for PaperId {
  fn from(id: usize) -> Self { PaperId::Int(id as i64) }
}

impl From<&str> for PaperId {
  fn from(id: &str) -> Self { PaperId::Text(id.to_owned()) }
}

impl From<String> for PaperId {
  fn from(id: String) -> Self { PaperId::Text(id) }
}

/// Member holding the provider-side identifier (Scholar result id, arXiv abs URL).
pub const PAPER_ID: &str = "paper_id";
/// Member holding the link to the paper's landing page or PDF.
pub const LINK: &str = "link";
/// Member holding the publication timestamp, RFC 3339 when a provider sets it.
pub const PUBLISHED: &str = "published";

/// A research paper as exchanged with the front end.
///
/// Only `id`, `title` and `summary` take part in recommendation. Everything else,
/// including the `paper_id`, `link` and `published` members the search providers fill
/// in, lives in [`Paper::extra`] untyped, so callers may send any JSON there (numbers,
/// plain dates, `null`) and get it back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
  /// Identifier, unique within one result set
  pub id:      PaperId,
  /// The paper's title
  pub title:   String,
  /// Abstract or search snippet, may be empty
  #[serde(default)]
  pub summary: String,
  /// Any other members of the JSON object, preserved verbatim
  #[serde(flatten)]
  pub extra:   Map<String, Value>,
}

impl Paper {
  /// Creates a paper with only the fields recommendation looks at.
  pub fn new(id: impl Into<PaperId>, title: impl Into<String>, summary: impl Into<String>) -> Self {
    Self { id: id.into(), title: title.into(), summary: summary.into(), extra: Map::new() }
  }

  /// Sets the provider-side identifier.
  pub fn with_paper_id(mut self, paper_id: impl Into<String>) -> Self {
    self.extra.insert(PAPER_ID.to_owned(), Value::String(paper_id.into()));
    self
  }

  /// Sets the landing page or PDF link.
  pub fn with_link(mut self, link: impl Into<String>) -> Self {
    self.extra.insert(LINK.to_owned(), Value::String(link.into()));
    self
  }

  /// Sets the publication timestamp, stored as an RFC 3339 string.
  pub fn with_published(mut self, published: DateTime<Utc>) -> Self {
    self.extra.insert(PUBLISHED.to_owned(), Value::String(published.to_rfc3339()));
    self
  }

  /// The provider-side identifier, when it is a string.
  pub fn paper_id(&self) -> Option<&str> { self.extra.get(PAPER_ID).and_then(Value::as_str) }

  /// The landing page or PDF link, when it is a string.
  pub fn link(&self) -> Option<&str> { self.extra.get(LINK).and_then(Value::as_str) }

  /// The publication date, when `published` holds an RFC 3339 timestamp or a plain
  /// `YYYY-MM-DD` date (read as midnight UTC).
  pub fn published(&self) -> Option<DateTime<Utc>> {
    let published = self.extra.get(PUBLISHED).and_then(Value::as_str)?;
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(published) {
      return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(published, "%Y-%m-%d")
      .ok()
      .and_then(|date| date.and_hms_opt(0, 0, 0))
      .map(|midnight| midnight.and_utc())
  }

  /// The text the recommender compares: title and summary joined by a single space.
  pub fn text(&self) -> String { format!("{} {}", self.title, self.summary) }
}
