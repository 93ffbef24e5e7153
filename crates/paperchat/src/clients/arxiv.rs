//! Client for searching and resolving papers on arXiv.org.
//!
//! The client talks to arXiv's Atom feed API (`http://export.arxiv.org/api/query`) and
//! converts each feed entry into a [`Paper`]:
//! - `id` is the entry's position in the result set, starting at `1`,
//! - `paper_id` is the entry's abs URL (e.g. `http://arxiv.org/abs/2301.07041v2`),
//! - `link` is the PDF URL,
//! - `published` is the submission timestamp.
//!
//! Identifiers come in the new style (`2301.07041`, optionally with a version suffix such
//! as `v2`) and the old style (`math.AG/0601001`). [`extract_arxiv_id`] also accepts abs
//! and PDF URLs.
//!
//! # Examples
//!
//! ```no_run
//! use paperchat::clients::{ArxivClient, SearchProvider};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ArxivClient::new();
//!
//! for paper in client.search("homomorphic encryption").await? {
//!   println!("{}: {}", paper.id, paper.title);
//! }
//!
//! let paper = client.fetch_paper("2301.07041").await?;
//! println!("PDF at {:?}", paper.link());
//! # Ok(())
//! # }
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use super::*;
use crate::format::collapse_whitespace;

/// Base URL of the arXiv query API.
pub const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";

/// Number of results requested per search.
pub const ARXIV_MAX_RESULTS: usize = 10;

lazy_static! {
  static ref ARXIV_NEW: Regex = Regex::new(r"^\d{4}\.\d{4,5}(v\d+)?$").unwrap();
  static ref ARXIV_OLD: Regex = Regex::new(r"^[a-zA-Z-]+(\.[a-zA-Z]{2})?/\d{7}(v\d+)?$").unwrap();
  static ref ARXIV_URL_PATH: Regex = Regex::new(r"^/(?:abs|pdf)/(.+?)(?:\.pdf)?/?$").unwrap();
}

/// Internal representation of the arXiv API's Atom feed response.
#[derive(Debug, Deserialize)]
struct Feed {
  /// Matching entries; absent when nothing matched
  #[serde(rename = "entry", default)]
  entries: Vec<Entry>,
}

/// Internal representation of one paper entry of the feed.
#[derive(Debug, Deserialize)]
struct Entry {
  /// Abs URL, or an `api/errors` URL when the entry reports an error
  id:        String,
  /// Paper title, wrapped across lines
  title:     String,
  /// Abstract, or the error message for error entries
  #[serde(default)]
  summary:   String,
  /// Submission timestamp
  published: Option<DateTime<Utc>>,
  /// Alternate and related links, including the PDF
  #[serde(rename = "link", default)]
  links:     Vec<Link>,
}

/// A `<link>` element of an entry.
#[derive(Debug, Deserialize)]
struct Link {
  /// Target URL
  #[serde(rename = "@href")]
  href:  String,
  /// Link title, `pdf` for the PDF link
  #[serde(rename = "@title", default)]
  title: Option<String>,
}

impl Entry {
  /// Whether arXiv used this entry to report a malformed query.
  fn is_error(&self) -> bool { self.id.contains("/api/errors") }

  /// The PDF link, or the abs URL rewritten to its PDF form.
  fn pdf_url(&self) -> String {
    self
      .links
      .iter()
      .find(|link| link.title.as_deref() == Some("pdf"))
      .map(|link| link.href.clone())
      .unwrap_or_else(|| self.id.replace("/abs/", "/pdf/"))
  }

  /// Converts the entry into the `index`-th paper of a result set.
  fn into_paper(self, index: usize) -> Paper {
    let link = self.pdf_url();
    let paper = Paper::new(index + 1, collapse_whitespace(&self.title), self.summary.trim())
      .with_paper_id(self.id)
      .with_link(link);
    match self.published {
      Some(published) => paper.with_published(published),
      None => paper,
    }
  }
}

/// Parses an Atom feed into papers numbered from `1`.
///
/// # Errors
///
/// Returns [`PaperchatError::ApiError`] when the body is not a feed or when arXiv reports
/// a malformed query inside the feed.
pub fn parse_feed(xml: &str) -> Result<Vec<Paper>, PaperchatError> {
  let feed: Feed = from_str(xml)
    .map_err(|e| PaperchatError::ApiError(format!("Failed to parse arXiv XML: {e}")))?;

  if let Some(error) = feed.entries.iter().find(|entry| entry.is_error()) {
    return Err(PaperchatError::ApiError(collapse_whitespace(&error.summary)));
  }

  Ok(feed.entries.into_iter().enumerate().map(|(index, entry)| entry.into_paper(index)).collect())
}

/// Checks that `id` is a well-formed arXiv identifier and returns it trimmed.
///
/// # Examples
///
/// ```
/// use paperchat::clients::arxiv::validate_arxiv_id;
///
/// assert!(validate_arxiv_id("2301.07041").is_ok());
/// assert!(validate_arxiv_id("2301.07041v3").is_ok());
/// assert!(validate_arxiv_id("math.AG/0601001").is_ok());
/// assert!(validate_arxiv_id("../../etc/passwd").is_err());
/// ```
pub fn validate_arxiv_id(id: &str) -> Result<String, PaperchatError> {
  let id = id.trim();
  if ARXIV_NEW.is_match(id) || ARXIV_OLD.is_match(id) {
    Ok(id.to_owned())
  } else {
    Err(PaperchatError::InvalidIdentifier)
  }
}

/// Extracts an arXiv identifier from a bare id or an arxiv.org abs/PDF URL.
///
/// # Examples
///
/// ```
/// use paperchat::clients::arxiv::extract_arxiv_id;
///
/// assert_eq!(extract_arxiv_id("https://arxiv.org/abs/2301.07041").unwrap(), "2301.07041");
/// assert_eq!(extract_arxiv_id("https://arxiv.org/pdf/2301.07041v2.pdf").unwrap(), "2301.07041v2");
/// assert_eq!(extract_arxiv_id("2301.07041").unwrap(), "2301.07041");
/// ```
pub fn extract_arxiv_id(input: &str) -> Result<String, PaperchatError> {
  let input = input.trim();
  let Ok(url) = Url::parse(input) else {
    return validate_arxiv_id(input);
  };

  match url.host_str() {
    Some("arxiv.org" | "www.arxiv.org" | "export.arxiv.org") => {
      let id = ARXIV_URL_PATH
        .captures(url.path())
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_owned())
        .ok_or(PaperchatError::InvalidIdentifier)?;
      validate_arxiv_id(&id)
    },
    _ => Err(PaperchatError::InvalidIdentifier),
  }
}

/// Client for the arXiv API.
///
/// The inner HTTP client is reused across requests, so one instance should be shared
/// rather than built per query.
#[derive(Debug, Clone)]
pub struct ArxivClient {
  /// Internal web client used to connect to the API.
  client:   reqwest::Client,
  /// Query endpoint, [`ARXIV_API_URL`] unless overridden
  base_url: String,
}

impl ArxivClient {
  /// Creates a client for the public arXiv API.
  pub fn new() -> Self { Self::with_base_url(ARXIV_API_URL) }

  /// Creates a client for an API-compatible endpoint, such as a mirror.
  pub fn with_base_url(base_url: impl Into<String>) -> Self {
    Self { client: reqwest::Client::new(), base_url: base_url.into() }
  }

  /// The URL [`SearchProvider::search`] and [`FeedProvider::feed`] request for `query`:
  /// ten results, newest submissions first.
  pub fn search_url(&self, query: &str) -> Result<Url, PaperchatError> {
    let mut url = Url::parse(&self.base_url)?;
    url
      .query_pairs_mut()
      .append_pair("search_query", &format!("all:{query}"))
      .append_pair("start", "0")
      .append_pair("max_results", &ARXIV_MAX_RESULTS.to_string())
      .append_pair("sortBy", "submittedDate")
      .append_pair("sortOrder", "descending");
    Ok(url)
  }

  /// Fetches the metadata of one paper by identifier or arxiv.org URL.
  ///
  /// The returned paper has id `1`, like the first result of a search.
  ///
  /// # Errors
  ///
  /// - [`PaperchatError::InvalidIdentifier`] for malformed identifiers
  /// - [`PaperchatError::NotFound`] when arXiv knows no such paper
  /// - network and parsing errors otherwise
  pub async fn fetch_paper(&self, identifier: &str) -> Result<Paper, PaperchatError> {
    let id = extract_arxiv_id(identifier)?;
    let mut url = Url::parse(&self.base_url)?;
    url.query_pairs_mut().append_pair("id_list", &id).append_pair("max_results", "1");

    let body = self.get(url).await?;
    parse_feed(&body)?.into_iter().next().ok_or(PaperchatError::NotFound)
  }

  /// Sends a GET request and returns the body of a successful response.
  async fn get(&self, url: Url) -> Result<String, PaperchatError> {
    debug!("Fetching from arXiv via: {url}");

    let response = self.client.get(url).send().await?;
    let status = response.status();
    let body = response.text().await?;
    trace!("arXiv response ({status}): {body}");

    if !status.is_success() {
      warn!("arXiv answered with status {status}");
      return Err(PaperchatError::ApiError(format!("arXiv returned {status}")));
    }
    Ok(body)
  }
}

impl Default for ArxivClient {
  fn default() -> Self { Self::new() }
}

#[async_trait]
impl FeedProvider for ArxivClient {
  async fn feed(&self, query: &str) -> Result<String, PaperchatError> {
    self.get(self.search_url(query)?).await
  }
}

#[async_trait]
impl SearchProvider for ArxivClient {
  fn name(&self) -> &'static str { "arXiv" }

  async fn search(&self, query: &str) -> Result<Vec<Paper>, PaperchatError> {
    let papers = parse_feed(&self.feed(query).await?)?;
    debug!("arXiv returned {} papers for {query:?}", papers.len());
    Ok(papers)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <id>http://arxiv.org/api/5iG1sFB3mHFhzYQuSrHxBlHCRDg</id>
  <title>arXiv Query: search_query=all:homomorphic&amp;id_list=&amp;start=0&amp;max_results=10</title>
  <updated>2024-11-20T00:00:00-05:00</updated>
  <opensearch:totalResults>2</opensearch:totalResults>
  <entry>
    <id>http://arxiv.org/abs/2301.07041v2</id>
    <updated>2023-06-01T12:00:00Z</updated>
    <published>2023-01-17T16:21:04Z</published>
    <title>Verifiable Fully Homomorphic
  Encryption</title>
    <summary>  Fully Homomorphic Encryption (FHE) is seeing increasing real-world deployment.
</summary>
    <author>
      <name>Alexander Viand</name>
    </author>
    <author>
      <name>Christian Knabenhans</name>
    </author>
    <link href="http://arxiv.org/abs/2301.07041v2" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2301.07041v2" rel="related" type="application/pdf"/>
    <arxiv:primary_category term="cs.CR" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.CR" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/math/0601001v1</id>
    <published>2006-01-01T00:00:00Z</published>
    <title>An Old Style Paper</title>
    <summary>Abstract.</summary>
    <author><name>Someone</name></author>
  </entry>
</feed>"#;

  const EMPTY_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <id>http://arxiv.org/api/empty</id>
  <title>arXiv Query: nothing</title>
</feed>"#;

  const ERROR_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <id>http://arxiv.org/api/errors#incorrect_id_format_for_1234</id>
    <title>Error</title>
    <summary>incorrect id format for 1234</summary>
  </entry>
</feed>"#;

  #[test]
  fn test_parse_feed() -> anyhow::Result<()> {
    let papers = parse_feed(FEED)?;
    assert_eq!(papers.len(), 2);

    let first = &papers[0];
    assert_eq!(first.id, PaperId::from(1));
    assert_eq!(first.title, "Verifiable Fully Homomorphic Encryption");
    assert!(first.summary.starts_with("Fully Homomorphic Encryption"));
    assert!(!first.summary.ends_with('\n'));
    assert_eq!(first.paper_id(), Some("http://arxiv.org/abs/2301.07041v2"));
    assert_eq!(first.link(), Some("http://arxiv.org/pdf/2301.07041v2"));
    let published = first.published().map(|date| date.to_rfc3339());
    assert_eq!(published.as_deref(), Some("2023-01-17T16:21:04+00:00"));

    let second = &papers[1];
    assert_eq!(second.id, PaperId::from(2));
    assert_eq!(second.link(), Some("http://arxiv.org/pdf/math/0601001v1"));
    Ok(())
  }

  #[test]
  fn test_parse_empty_and_error_feeds() {
    assert!(parse_feed(EMPTY_FEED).unwrap().is_empty());
    match parse_feed(ERROR_FEED) {
      Err(PaperchatError::ApiError(message)) => assert_eq!(message, "incorrect id format for 1234"),
      other => panic!("expected an API error, got {other:?}"),
    }
    assert!(matches!(parse_feed("not xml at all"), Err(PaperchatError::ApiError(_))));
  }

  #[test]
  fn test_validate_arxiv_id() {
    for id in ["2301.07041", "0704.0001", "2301.07041v12", "math.AG/0601001", "hep-th/9901001v2"] {
      assert_eq!(validate_arxiv_id(id).unwrap(), id);
    }
    for id in ["", "2301", "2301.070", "abc", "2301.07041.pdf", "math/06", "../2301.07041"] {
      assert!(matches!(validate_arxiv_id(id), Err(PaperchatError::InvalidIdentifier)), "{id}");
    }
  }

  #[test]
  fn test_extract_arxiv_id() {
    assert_eq!(extract_arxiv_id("https://arxiv.org/abs/2301.07041").unwrap(), "2301.07041");
    assert_eq!(
      extract_arxiv_id("http://arxiv.org/abs/math.AG/0601001").unwrap(),
      "math.AG/0601001"
    );
    assert_eq!(extract_arxiv_id("https://arxiv.org/pdf/2301.07041").unwrap(), "2301.07041");
    assert_eq!(extract_arxiv_id(" 2301.07041 ").unwrap(), "2301.07041");
    assert!(extract_arxiv_id("https://eprint.iacr.org/2016/260").is_err());
    assert!(extract_arxiv_id("https://arxiv.org/list/cs.CR").is_err());
  }

  #[test]
  fn test_search_url() -> anyhow::Result<()> {
    let url = ArxivClient::new().search_url("graph networks")?;
    let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();
    assert_eq!(pairs[0], ("search_query".to_owned(), "all:graph networks".to_owned()));
    assert!(pairs.contains(&("max_results".to_owned(), "10".to_owned())));
    assert!(pairs.contains(&("sortBy".to_owned(), "submittedDate".to_owned())));
    assert!(pairs.contains(&("sortOrder".to_owned(), "descending".to_owned())));
    Ok(())
  }

  #[ignore = "hits the live arXiv API"]
  #[traced_test]
  #[tokio::test]
  async fn test_arxiv_search() -> anyhow::Result<()> {
    let papers = ArxivClient::new().search("homomorphic encryption").await?;
    assert!(!papers.is_empty());
    assert!(papers.len() <= ARXIV_MAX_RESULTS);
    Ok(())
  }

  #[ignore = "hits the live arXiv API"]
  #[traced_test]
  #[tokio::test]
  async fn test_arxiv_fetch_paper() -> anyhow::Result<()> {
    let paper = ArxivClient::new().fetch_paper("https://arxiv.org/abs/2301.07041").await?;
    assert!(paper.title.contains("Homomorphic"));
    Ok(())
  }
}
