//! Fetching paper PDFs and saving them to disk.
//!
//! [`PdfFetcher`] is the boundary the HTTP host and the CLI talk to. [`ArxivPdfFetcher`]
//! implements it for arXiv, downloading `https://arxiv.org/pdf/<id>.pdf` straight over
//! HTTP.
//!
//! # Examples
//!
//! ```no_run
//! use paperchat::{
//!   download::{ArxivPdfFetcher, PdfFetcher},
//!   format::pdf_filename,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = paperchat::download::default_download_dir();
//! let path = ArxivPdfFetcher::new()
//!   .fetch_and_save("2301.07041", &dir, &pdf_filename("Verifiable Fully Homomorphic Encryption"))
//!   .await?;
//! println!("Saved to {}", path.display());
//! # Ok(())
//! # }
//! ```

use super::*;
use crate::clients::arxiv::validate_arxiv_id;

/// Base URL PDFs are downloaded from.
pub const ARXIV_PDF_URL: &str = "https://arxiv.org/pdf";

/// Fetches a remote document and stores it locally.
#[async_trait]
pub trait PdfFetcher: Send + Sync {
  /// Downloads the document `remote_id` into `dir` as `filename` and returns the path
  /// written. `dir` is created if needed.
  ///
  /// # Errors
  ///
  /// Fails on malformed identifiers, unsafe filenames, network or HTTP errors, and
  /// filesystem errors.
  async fn fetch_and_save(
    &self,
    remote_id: &str,
    dir: &Path,
    filename: &str,
  ) -> Result<PathBuf, PaperchatError>;
}

/// The user's download directory, falling back to `~/Downloads`.
pub fn default_download_dir() -> PathBuf {
  dirs::download_dir()
    .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
    .unwrap_or_else(|| PathBuf::from("Downloads"))
}

/// Downloads PDFs from arXiv.
#[derive(Debug, Clone)]
pub struct ArxivPdfFetcher {
  /// Internal web client used to download PDFs.
  client:   reqwest::Client,
  /// Base URL the `<id>.pdf` path is appended to
  base_url: String,
}

impl ArxivPdfFetcher {
  /// Creates a fetcher for arxiv.org.
  pub fn new() -> Self { Self::with_base_url(ARXIV_PDF_URL) }

  /// Creates a fetcher for an arXiv mirror.
  pub fn with_base_url(base_url: impl Into<String>) -> Self {
    Self { client: reqwest::Client::new(), base_url: base_url.into() }
  }

  /// The PDF URL for a validated identifier.
  pub fn pdf_url(&self, arxiv_id: &str) -> Result<String, PaperchatError> {
    let id = validate_arxiv_id(arxiv_id)?;
    Ok(format!("{}/{id}.pdf", self.base_url.trim_end_matches('/')))
  }
}

impl Default for ArxivPdfFetcher {
  fn default() -> Self { Self::new() }
}

/// Rejects filenames that would escape the target directory.
fn check_filename(filename: &str) -> Result<(), PaperchatError> {
  let path = Path::new(filename);
  let single_component = path.components().count() == 1
    && matches!(path.components().next(), Some(std::path::Component::Normal(_)));
  if filename.is_empty() || !single_component {
    return Err(PaperchatError::InvalidInput(format!("unsafe filename `{filename}`")));
  }
  Ok(())
}

#[async_trait]
impl PdfFetcher for ArxivPdfFetcher {
  async fn fetch_and_save(
    &self,
    remote_id: &str,
    dir: &Path,
    filename: &str,
  ) -> Result<PathBuf, PaperchatError> {
    check_filename(filename)?;
    let url = self.pdf_url(remote_id)?;
    debug!("Downloading PDF from: {url}");

    let response = self.client.get(&url).send().await?;
    let status = response.status();
    trace!("PDF response: {response:?}");
    if status == reqwest::StatusCode::NOT_FOUND {
      return Err(PaperchatError::NotFound);
    }
    if !status.is_success() {
      warn!("PDF download from {url} failed with status {status}");
      return Err(PaperchatError::ApiError(format!("arXiv returned {status} for {url}")));
    }
    let bytes = response.bytes().await?;

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(filename);
    debug!("Writing {} bytes to path: {path:?}", bytes.len());
    tokio::fs::write(&path, &bytes).await?;
    Ok(path)
  }
}
