//! A library for searching research papers on arXiv and Google Scholar, downloading their
//! PDFs, recommending similar papers by content, and chatting with an LLM about a paper.
//!
//! The recommendation engine is a small pipeline:
//! 1. [`normalize`] reduces title and summary to a stream of lemmas,
//! 2. [`similarity`] scores two normalized texts with TF-IDF and cosine similarity,
//! 3. [`recommend`] ranks a candidate pool against a target paper.
//!
//! # Example
//! ```rust
//! use std::sync::Arc;
//!
//! use paperchat::{normalize::LexicalNormalizer, paper::Paper, recommend::Recommender};
//!
//! let recommender = Recommender::new(Arc::new(LexicalNormalizer::new()));
//!
//! let target = Paper::new(1, "Deep Learning for NLP", "transformers attention");
//! let candidates = vec![
//!   Paper::new(2, "Attention Mechanisms", "transformer models"),
//!   Paper::new(3, "Cooking Recipes", "pasta sauce"),
//! ];
//!
//! let ranked = recommender.recommend(&target, &candidates, 5);
//! assert_eq!(ranked[0].title, "Attention Mechanisms");
//! ```

#![warn(missing_docs, clippy::missing_docs_in_private_items)]
use std::{
  path::{Path, PathBuf},
  str::FromStr,
  sync::Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
#[cfg(test)] use tracing_test::traced_test;

pub mod chat;
pub mod clients;
pub mod download;
pub mod errors;
pub mod format;
pub mod normalize;
pub mod paper;
pub mod recommend;
pub mod similarity;
#[cfg(test)] mod tests;

use errors::PaperchatError;
use normalize::Normalizer;
use paper::Paper;
#[cfg(test)] use paper::PaperId;
