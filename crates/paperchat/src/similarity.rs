//! TF-IDF vectors and cosine similarity between two normalized texts.
//!
//! [`similarity`] fits a fresh [`TfidfVectorizer`] on exactly the two texts it compares,
//! so inverse document frequencies come from a corpus of size two. A term that appears in
//! both texts gets the lowest weight, a term that appears in only one gets the highest.
//! Scores are therefore meant for ranking candidates against one target within a single
//! recommendation, not for comparing across unrelated pairs.
//!
//! The vectorizer follows the conventions of the usual scientific toolkits:
//! - lowercase the text, keep tokens of two or more word characters,
//! - raw term counts, vocabulary sorted alphabetically,
//! - smoothed IDF, `ln((1 + n) / (1 + df)) + 1`,
//! - every row scaled to unit L2 norm.
//!
//! # Examples
//!
//! ```
//! use paperchat::similarity::similarity;
//!
//! let score = similarity("attention transformer model", "transformer attention layer");
//! assert!(score > 0.0 && score < 1.0);
//!
//! assert_eq!(similarity("graph network", "pasta sauce"), 0.0);
//! assert_eq!(similarity("", ""), 0.0);
//! ```

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
  static ref TERM: Regex = Regex::new(r"(?u)\b\w\w+\b").unwrap();
}

/// Cosine similarity of the TF-IDF vectors of `a` and `b`, fitted on the two texts alone.
///
/// Always within `[0, 1]` and symmetric in its arguments. Texts without terms, or without
/// a term in common, score 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
  let matrix = TfidfVectorizer::new().fit_transform(&[a, b]);
  cosine_similarity(&matrix.rows[0], &matrix.rows[1])
}

/// Cosine of the angle between two vectors of equal length.
///
/// Returns 0.0 when either vector is all zeros, and clamps rounding noise into `[0, 1]`
/// for the non-negative vectors TF-IDF produces.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
  debug_assert_eq!(a.len(), b.len());
  let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
  let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
  if norm_a == 0.0 || norm_b == 0.0 {
    return 0.0;
  }
  let dot = a.iter().zip(b).map(|(x, y)| x * y).sum::<f64>();
  let score = dot / (norm_a * norm_b);
  if score.is_nan() {
    0.0
  } else {
    score.clamp(0.0, 1.0)
  }
}

/// Term-frequency / inverse-document-frequency vectorizer.
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
  /// Term to column index, in alphabetical order
  vocabulary: BTreeMap<String, usize>,
  /// Smoothed inverse document frequency per column
  idf:        Vec<f64>,
}

/// Result of [`TfidfVectorizer::fit_transform`]: one L2-normalized row per document.
#[derive(Debug, Clone, PartialEq)]
pub struct TfidfMatrix {
  /// Document rows, each as long as the vocabulary
  pub rows: Vec<Vec<f64>>,
}

impl TfidfVectorizer {
  /// Creates an unfitted vectorizer.
  pub fn new() -> Self { Self::default() }

  /// Vocabulary learned by the last fit, term to column index.
  pub fn vocabulary(&self) -> &BTreeMap<String, usize> { &self.vocabulary }

  /// Inverse document frequencies learned by the last fit, by column.
  pub fn idf(&self) -> &[f64] { &self.idf }

  /// Learns vocabulary and IDF from `documents` and returns their TF-IDF rows.
  ///
  /// A document without any term yields an all-zero row.
  pub fn fit_transform(&mut self, documents: &[&str]) -> TfidfMatrix {
    let counts = documents.iter().map(|doc| term_counts(doc)).collect::<Vec<_>>();

    self.vocabulary = counts
      .iter()
      .flat_map(|doc| doc.keys().cloned())
      .collect::<std::collections::BTreeSet<_>>()
      .into_iter()
      .enumerate()
      .map(|(column, term)| (term, column))
      .collect();

    let n = documents.len() as f64;
    self.idf = self
      .vocabulary
      .keys()
      .map(|term| {
        let df = counts.iter().filter(|doc| doc.contains_key(term)).count() as f64;
        ((1.0 + n) / (1.0 + df)).ln() + 1.0
      })
      .collect();

    let rows = counts
      .iter()
      .map(|doc| {
        let mut row = vec![0.0; self.vocabulary.len()];
        for (term, count) in doc {
          let column = self.vocabulary[term];
          row[column] = *count as f64 * self.idf[column];
        }
        let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
          row.iter_mut().for_each(|x| *x /= norm);
        }
        row
      })
      .collect();

    TfidfMatrix { rows }
  }
}

/// Counts the terms of one document.
fn term_counts(document: &str) -> BTreeMap<String, usize> {
  let lowered = document.to_lowercase();
  let mut counts = BTreeMap::new();
  for term in TERM.find_iter(&lowered) {
    *counts.entry(term.as_str().to_owned()).or_insert(0) += 1;
  }
  counts
}
