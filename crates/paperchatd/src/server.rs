//! HTTP host for the browser front end.
//!
//! Every route is a thin adapter: it validates the request body or query, hands the work to
//! a library collaborator held in [`AppState`], and maps the outcome to JSON. The one
//! exception is `/arxiv-results`, which relays arXiv's Atom feed for the front end to parse.
//! Collaborators are trait objects so the routes can be exercised against fakes.

use std::{path::PathBuf, sync::Arc};

use axum::{
  extract::{rejection::JsonRejection, Query, State},
  http::{header, StatusCode},
  response::{IntoResponse, Response},
  routing::{get, post},
  Json, Router,
};
use paperchat::{
  chat::{ChatMessage, PaperChat, PaperInfo},
  clients::{arxiv::extract_arxiv_id, FeedProvider, SearchProvider},
  download::PdfFetcher,
  format::pdf_filename,
  paper::Paper,
  recommend::{Recommender, DEFAULT_RECOMMENDATIONS},
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info};

use crate::errors::ApiError;

/// Content type of the relayed arXiv feed.
pub const ATOM_CONTENT_TYPE: &str = "application/atom+xml; charset=utf-8";

/// Reply sent in place of the model's answer when the chat provider fails.
pub const CHAT_FAILURE_REPLY: &str =
  "I'm sorry, I encountered an error while processing your request.";

/// Shared collaborators of all routes.
pub struct AppState {
  /// Ranks candidate papers
  pub recommender:  Recommender,
  /// arXiv search, relayed as Atom
  pub arxiv:        Arc<dyn FeedProvider>,
  /// Google Scholar search
  pub scholar:      Arc<dyn SearchProvider>,
  /// Stores PDFs
  pub fetcher:      Arc<dyn PdfFetcher>,
  /// Answers questions about a paper
  pub chat:         PaperChat,
  /// Where downloaded PDFs go
  pub download_dir: PathBuf,
}

/// Builds the router with permissive CORS and request tracing.
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/recommend-papers", post(recommend_papers))
    .route("/scholar-results", get(scholar_results))
    .route("/arxiv-results", get(arxiv_results))
    .route("/download-arxiv-pdf", post(download_arxiv_pdf))
    .route("/chat", post(chat))
    .route("/health", get(health))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
    .with_state(Arc::new(state))
}

/// Serves `router` on `listener` until ctrl-c.
pub async fn serve(listener: tokio::net::TcpListener, router: Router) -> std::io::Result<()> {
  info!("Listening on {}", listener.local_addr()?);
  axum::serve(listener, router)
    .with_graceful_shutdown(async {
      if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
      }
      info!("Shutting down");
    })
    .await
}

/// Body of `POST /recommend-papers`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendRequest {
  /// Paper to find neighbours for
  target_paper: Paper,
  /// Candidate pool, possibly containing the target
  all_papers:   Vec<Paper>,
}

async fn recommend_papers(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<Vec<Paper>>, ApiError> {
  let Json(request) = payload?;
  debug!(
    "Recommending for paper {} among {} candidates",
    request.target_paper.id,
    request.all_papers.len()
  );
  Ok(Json(state.recommender.recommend(
    &request.target_paper,
    &request.all_papers,
    DEFAULT_RECOMMENDATIONS,
  )))
}

/// Query of the search routes.
#[derive(Debug, Deserialize)]
struct SearchParams {
  /// Search terms
  q: Option<String>,
}

impl SearchParams {
  /// The non-blank query, or a `400`.
  fn query(&self) -> Result<&str, ApiError> {
    self
      .q
      .as_deref()
      .map(str::trim)
      .filter(|q| !q.is_empty())
      .ok_or_else(|| ApiError::bad_request("Missing search query"))
  }
}

async fn scholar_results(
  State(state): State<Arc<AppState>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Paper>>, ApiError> {
  let query = params.query()?;
  let papers = state
    .scholar
    .search(query)
    .await
    .map_err(|e| ApiError::from_library(e, "Failed to fetch Google Scholar results"))?;
  Ok(Json(papers))
}

async fn arxiv_results(
  State(state): State<Arc<AppState>>,
  Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
  let query = params.query()?;
  let feed = state
    .arxiv
    .feed(query)
    .await
    .map_err(|e| ApiError::from_library(e, "Failed to fetch arXiv results"))?;
  Ok(([(header::CONTENT_TYPE, ATOM_CONTENT_TYPE)], feed).into_response())
}

/// Body of `POST /download-arxiv-pdf`.
#[derive(Debug, Deserialize)]
struct DownloadRequest {
  /// arXiv identifier or abs URL
  #[serde(rename = "arXiv_id")]
  arxiv_id:    Option<String>,
  /// Title the file is named after
  paper_title: Option<String>,
}

async fn download_arxiv_pdf(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
  let Json(request) = payload?;
  let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
  let (Some(arxiv_id), Some(title)) = (present(request.arxiv_id), present(request.paper_title))
  else {
    return Err(ApiError::bad_request("Missing required parameters: arXiv_id or paper_title"));
  };

  let arxiv_id = extract_arxiv_id(&arxiv_id)?;
  let path = state
    .fetcher
    .fetch_and_save(&arxiv_id, &state.download_dir, &pdf_filename(&title))
    .await
    .map_err(|e| ApiError::from_library(e, "Error occurred while downloading the PDF."))?;

  info!("Saved {arxiv_id} to {}", path.display());
  Ok(Json(json!({ "message": format!("PDF downloaded successfully to {}", path.display()) })))
}

/// Body of `POST /chat`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest {
  /// Conversation so far, oldest first
  #[serde(default)]
  chat_history: Vec<ChatMessage>,
  /// Paper under discussion
  paper_info:   PaperInfo,
}

async fn chat(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
  let request = match payload {
    Ok(Json(request)) => request,
    Err(rejection) => return ApiError::from(rejection).into_response(),
  };

  match state.chat.reply(&request.paper_info, &request.chat_history).await {
    Ok(reply) => Json(reply).into_response(),
    Err(e) => {
      error!("Chat about {:?} failed: {e}", request.paper_info.title);
      (StatusCode::INTERNAL_SERVER_ERROR, Json(ChatMessage::assistant(CHAT_FAILURE_REPLY)))
        .into_response()
    },
  }
}

async fn health() -> Json<Value> {
  Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}
