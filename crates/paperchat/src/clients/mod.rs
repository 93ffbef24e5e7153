//! Search providers that turn a free-text query into a list of [`Paper`]s.
//!
//! Each provider numbers its results from `1` so the ids are unique within one result set,
//! which is all the [`recommend`](crate::recommend) module requires of them.
//!
//! # Supported Sources
//!
//! - [`arxiv`] - the arXiv.org Atom API, also used to resolve single identifiers
//! - [`scholar`] - Google Scholar through SerpApi, which needs an API key
//!
//! # Examples
//!
//! ```no_run
//! use paperchat::clients::{ArxivClient, ScholarClient, SearchProvider};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let arxiv = ArxivClient::new();
//! let papers = arxiv.search("graph neural networks").await?;
//!
//! let scholar = ScholarClient::from_env();
//! let papers = scholar.search("graph neural networks").await?;
//! # Ok(())
//! # }
//! ```

use quick_xml::de::from_str;

pub mod arxiv;
pub mod scholar;

pub use arxiv::ArxivClient;
pub use scholar::ScholarClient;

use super::*;

/// A service that answers free-text queries with papers.
#[async_trait]
pub trait SearchProvider: Send + Sync {
  /// Short human-readable provider name, used in logs and CLI output.
  fn name(&self) -> &'static str;

  /// Searches for papers matching `query`.
  ///
  /// # Errors
  ///
  /// Fails when the provider is unreachable, rejects the request, or answers with a body
  /// that cannot be parsed.
  async fn search(&self, query: &str) -> Result<Vec<Paper>, PaperchatError>;
}

/// A service that answers free-text queries with an unparsed Atom feed.
///
/// Browser front ends that read the feed themselves get it byte for byte.
#[async_trait]
pub trait FeedProvider: Send + Sync {
  /// Fetches the Atom feed of results for `query`.
  ///
  /// # Errors
  ///
  /// Fails when the provider is unreachable or answers with a non-success status.
  async fn feed(&self, query: &str) -> Result<String, PaperchatError>;
}

/// The search providers the library ships with.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
  /// arXiv.org
  Arxiv,
  /// Google Scholar via SerpApi
  Scholar,
}

impl std::fmt::Display for Source {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Source::Arxiv => write!(f, "arXiv"),
      Source::Scholar => write!(f, "Google Scholar"),
    }
  }
}

impl FromStr for Source {
  type Err = PaperchatError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match &s.to_lowercase() as &str {
      "arxiv" => Ok(Source::Arxiv),
      "scholar" | "google_scholar" => Ok(Source::Scholar),
      s => Err(PaperchatError::InvalidInput(format!("unknown search source `{s}`"))),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_source_from_str() {
    assert_eq!("arxiv".parse::<Source>().unwrap(), Source::Arxiv);
    assert_eq!("ArXiv".parse::<Source>().unwrap(), Source::Arxiv);
    assert_eq!("scholar".parse::<Source>().unwrap(), Source::Scholar);
    assert!(matches!("iacr".parse::<Source>(), Err(PaperchatError::InvalidInput(_))));
  }
}
