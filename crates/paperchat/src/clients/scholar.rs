//! Client for Google Scholar results via SerpApi.
//!
//! SerpApi's `google_scholar` engine answers with JSON whose `organic_results` become
//! papers:
//! - `id` is the result's position, starting at `1`,
//! - `summary` is the result snippet,
//! - `paper_id` is SerpApi's `result_id`,
//! - `link` is the result link.
//!
//! Missing strings are reported as empty strings rather than dropped, so every paper
//! carries the same set of members.
//!
//! The API key is read from `SERPAPI_API_KEY` by [`ScholarClient::from_env`]. A client
//! without a key can be constructed; its searches fail with
//! [`PaperchatError::MissingApiKey`].

use super::*;

/// SerpApi search endpoint.
pub const SERPAPI_URL: &str = "https://serpapi.com/search.json";

/// Environment variable holding the SerpApi key.
pub const SERPAPI_KEY_VAR: &str = "SERPAPI_API_KEY";

/// Internal representation of a SerpApi response.
#[derive(Debug, Deserialize)]
struct SearchResponse {
  /// Error reported by SerpApi, such as an invalid key
  error:           Option<String>,
  /// Scholar hits
  #[serde(default)]
  organic_results: Vec<OrganicResult>,
}

/// One Scholar hit.
#[derive(Debug, Deserialize)]
struct OrganicResult {
  /// Result title
  #[serde(default)]
  title:     String,
  /// Text snippet
  #[serde(default)]
  snippet:   String,
  /// SerpApi result identifier
  #[serde(default)]
  result_id: String,
  /// Link to the result
  #[serde(default)]
  link:      String,
}

/// Parses a SerpApi JSON body into papers numbered from `1`.
///
/// # Errors
///
/// Returns [`PaperchatError::ApiError`] when SerpApi reports an error in the body, and
/// [`PaperchatError::Json`] when the body is not the expected JSON.
pub fn parse_results(body: &str) -> Result<Vec<Paper>, PaperchatError> {
  let response: SearchResponse = serde_json::from_str(body)?;
  if let Some(error) = response.error {
    return Err(PaperchatError::ApiError(error));
  }

  Ok(
    response
      .organic_results
      .into_iter()
      .enumerate()
      .map(|(index, result)| {
        Paper::new(index + 1, result.title, result.snippet)
          .with_paper_id(result.result_id)
          .with_link(result.link)
      })
      .collect(),
  )
}

/// Client for Google Scholar searches through SerpApi.
#[derive(Clone)]
pub struct ScholarClient {
  /// Internal web client used to connect to the API.
  client:   reqwest::Client,
  /// SerpApi key, if configured
  api_key:  Option<String>,
  /// Search endpoint, [`SERPAPI_URL`] unless overridden
  base_url: String,
}

impl std::fmt::Debug for ScholarClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ScholarClient")
      .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
      .field("base_url", &self.base_url)
      .finish()
  }
}

impl ScholarClient {
  /// Creates a client with an explicit API key.
  pub fn new(api_key: Option<String>) -> Self {
    Self {
      client:   reqwest::Client::new(),
      api_key:  api_key.filter(|key| !key.trim().is_empty()),
      base_url: SERPAPI_URL.to_owned(),
    }
  }

  /// Creates a client whose key comes from `SERPAPI_API_KEY`.
  pub fn from_env() -> Self { Self::new(std::env::var(SERPAPI_KEY_VAR).ok()) }

  /// Points the client at an API-compatible endpoint.
  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }

  /// Whether an API key is configured.
  pub fn has_api_key(&self) -> bool { self.api_key.is_some() }
}

#[async_trait]
impl SearchProvider for ScholarClient {
  fn name(&self) -> &'static str { "Google Scholar" }

  async fn search(&self, query: &str) -> Result<Vec<Paper>, PaperchatError> {
    let api_key = self.api_key.as_deref().ok_or(PaperchatError::MissingApiKey(SERPAPI_KEY_VAR))?;

    let mut url = url::Url::parse(&self.base_url)?;
    debug!("Searching Google Scholar via: {url} for {query:?}");
    url
      .query_pairs_mut()
      .append_pair("engine", "google_scholar")
      .append_pair("q", query)
      .append_pair("api_key", api_key);

    let response = self.client.get(url).send().await?;
    let status = response.status();
    let body = response.text().await?;
    trace!("SerpApi response ({status}): {body}");

    let papers = match parse_results(&body) {
      Ok(papers) if status.is_success() => papers,
      Ok(_) => return Err(PaperchatError::ApiError(format!("SerpApi returned {status}"))),
      Err(e) => {
        warn!("SerpApi answered {status} with an unusable body: {e}");
        return Err(e);
      },
    };
    debug!("Google Scholar returned {} papers for {query:?}", papers.len());
    Ok(papers)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const RESPONSE: &str = r#"{
    "search_metadata": {"id": "abc", "status": "Success"},
    "organic_results": [
      {
        "position": 0,
        "title": "Attention is all you need",
        "result_id": "5Gohgn6QFikJ",
        "link": "https://proceedings.neurips.cc/paper/2017/hash/3f5ee243.html",
        "snippet": "The dominant sequence transduction models are based on complex recurrent…",
        "publication_info": {"summary": "A Vaswani, N Shazeer - NeurIPS, 2017"}
      },
      {
        "position": 1,
        "title": "A survey without a link",
        "result_id": "xyz"
      }
    ]
  }"#;

  #[test]
  fn test_parse_results() -> anyhow::Result<()> {
    let papers = parse_results(RESPONSE)?;
    assert_eq!(papers.len(), 2);
    assert_eq!(papers[0].id, PaperId::from(1));
    assert_eq!(papers[0].title, "Attention is all you need");
    assert!(papers[0].summary.starts_with("The dominant sequence"));
    assert_eq!(papers[0].paper_id(), Some("5Gohgn6QFikJ"));

    assert_eq!(papers[1].id, PaperId::from(2));
    assert_eq!(papers[1].summary, "");
    assert_eq!(papers[1].link(), Some(""));
    Ok(())
  }

  #[test]
  fn test_parse_error_and_empty_results() {
    match parse_results(r#"{"error": "Invalid API key."}"#) {
      Err(PaperchatError::ApiError(message)) => assert_eq!(message, "Invalid API key."),
      other => panic!("expected an API error, got {other:?}"),
    }
    assert!(parse_results(r#"{"search_metadata": {}}"#).unwrap().is_empty());
    assert!(matches!(parse_results("<html>"), Err(PaperchatError::Json(_))));
  }

  #[tokio::test]
  async fn test_search_without_key() {
    let client = ScholarClient::new(Some("   ".into()));
    assert!(!client.has_api_key());
    let result = client.search("graph networks").await;
    assert!(matches!(result, Err(PaperchatError::MissingApiKey(SERPAPI_KEY_VAR))));
  }

  #[test]
  fn test_debug_redacts_key() {
    let client = ScholarClient::new(Some("secret".into()));
    assert!(!format!("{client:?}").contains("secret"));
  }

  #[ignore = "needs SERPAPI_API_KEY and network access"]
  #[traced_test]
  #[tokio::test]
  async fn test_scholar_search() -> anyhow::Result<()> {
    let papers = ScholarClient::from_env().search("attention is all you need").await?;
    assert!(!papers.is_empty());
    Ok(())
  }
}
