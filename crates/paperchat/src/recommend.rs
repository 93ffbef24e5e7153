//! Content-based paper recommendation.
//!
//! A [`Recommender`] ranks a pool of candidate papers by how similar their title and summary
//! are to a target paper's. Each candidate is scored independently against the target with
//! [`similarity`](crate::similarity::similarity), the pool is sorted by descending score, and
//! the top `n` papers are returned.
//!
//! Ranking is deterministic: the sort is stable, so candidates with equal scores keep the
//! order in which they were supplied. The target itself, recognised by its
//! [`id`](crate::paper::Paper::id), is never recommended.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use paperchat::{
//!   normalize::LexicalNormalizer,
//!   paper::Paper,
//!   recommend::{Recommender, DEFAULT_RECOMMENDATIONS},
//! };
//!
//! let recommender = Recommender::new(Arc::new(LexicalNormalizer::new()));
//! let target = Paper::new(1, "Deep Learning for NLP", "transformers attention");
//! let pool = vec![
//!   target.clone(),
//!   Paper::new(2, "Attention Mechanisms", "transformer models"),
//!   Paper::new(3, "Cooking Recipes", "pasta sauce"),
//! ];
//!
//! let ranked = recommender.recommend(&target, &pool, DEFAULT_RECOMMENDATIONS);
//! let ids = ranked.iter().map(|paper| paper.id.to_string()).collect::<Vec<_>>();
//! assert_eq!(ids, ["2", "3"]);
//! ```

use super::*;
use crate::similarity::similarity;

/// Number of papers returned when the caller does not ask for a specific count.
pub const DEFAULT_RECOMMENDATIONS: usize = 5;

/// A candidate paper together with its similarity to the target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
  /// The recommended paper
  pub paper: Paper,
  /// Cosine similarity to the target, in `[0, 1]`
  pub score: f64,
}

/// Ranks candidate papers against a target paper.
///
/// The [`Normalizer`] is injected at construction and only read afterwards, so a single
/// recommender can serve concurrent requests.
#[derive(Clone)]
pub struct Recommender {
  /// Text normalization backend
  normalizer: Arc<dyn Normalizer>,
}

impl std::fmt::Debug for Recommender {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Recommender").finish_non_exhaustive()
  }
}

impl Recommender {
  /// Creates a recommender that normalizes text with `normalizer`.
  pub fn new(normalizer: Arc<dyn Normalizer>) -> Self { Self { normalizer } }

  /// The normalizer this recommender uses.
  pub fn normalizer(&self) -> &Arc<dyn Normalizer> { &self.normalizer }

  /// Scores every eligible candidate and returns them sorted by descending score.
  ///
  /// Candidates sharing the target's id are skipped. Ties keep their input order.
  pub fn rank(&self, target: &Paper, candidates: &[Paper]) -> Vec<Recommendation> {
    let target_text = self.normalizer.normalize(&target.text());
    trace!("Target {} normalized to {target_text:?}", target.id);

    let mut ranked = candidates
      .iter()
      .filter(|candidate| candidate.id != target.id)
      .map(|candidate| {
        let text = self.normalizer.normalize(&candidate.text());
        let score = similarity(&target_text, &text);
        trace!("Candidate {} scored {score}", candidate.id);
        Recommendation { paper: candidate.clone(), score }
      })
      .collect::<Vec<_>>();

    // `sort_by` is stable, which keeps ties in input order
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    debug!(
      "Ranked {} of {} candidates against paper {}",
      ranked.len(),
      candidates.len(),
      target.id
    );
    ranked
  }

  /// Returns up to `n` candidates most similar to `target`, best first.
  ///
  /// Returns fewer than `n` papers when fewer eligible candidates exist, and an empty
  /// vector when `n` is zero or the pool holds nothing but the target.
  pub fn recommend(&self, target: &Paper, candidates: &[Paper], n: usize) -> Vec<Paper> {
    if n == 0 {
      return Vec::new();
    }
    self.rank(target, candidates).into_iter().take(n).map(|rec| rec.paper).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::normalize::LexicalNormalizer;

  /// Splits on whitespace and nothing else, so tests control the normalized text exactly.
  struct WhitespaceNormalizer;

  impl Normalizer for WhitespaceNormalizer {
    fn normalize(&self, text: &str) -> String {
      text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
    }
  }

  fn recommender() -> Recommender { Recommender::new(Arc::new(LexicalNormalizer::new())) }

  fn ids(papers: &[Paper]) -> Vec<PaperId> { papers.iter().map(|paper| paper.id.clone()).collect() }

  #[test]
  fn test_related_paper_ranks_first() {
    let target = Paper::new(1, "Deep Learning for NLP", "transformers attention");
    let pool = vec![
      Paper::new(1, "Deep Learning for NLP", "transformers attention"),
      Paper::new(2, "Attention Mechanisms", "transformer models"),
      Paper::new(3, "Cooking Recipes", "pasta sauce"),
    ];
    let ranked = recommender().recommend(&target, &pool, 5);
    assert_eq!(ids(&ranked), vec![PaperId::from(2), PaperId::from(3)]);
  }

  #[test]
  fn test_unrelated_candidate_is_still_included() {
    let target = Paper::new(1, "Graph Neural Networks", "message passing");
    let pool = vec![Paper::new(2, "Cooking Recipes", "pasta sauce")];
    let ranked = recommender().rank(&target, &pool);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].score, 0.0);
  }

  #[test]
  fn test_empty_pool_and_zero_n() {
    let target = Paper::new(1, "Graph Neural Networks", "message passing");
    assert!(recommender().recommend(&target, &[], 5).is_empty());

    let pool = vec![Paper::new(2, "Graph Attention Networks", "attention on graphs")];
    assert!(recommender().recommend(&target, &pool, 0).is_empty());
  }

  #[test]
  fn test_pool_with_only_the_target() {
    let target = Paper::new("abc", "Graph Neural Networks", "message passing");
    let pool = vec![target.clone(), target.clone()];
    assert!(recommender().recommend(&target, &pool, 5).is_empty());
  }

  #[test]
  fn test_identical_candidates_keep_input_order() {
    let target = Paper::new(0, "sparse attention", "kernels");
    let pool = vec![
      Paper::new(7, "dense layers", "matrices"),
      Paper::new(5, "sparse attention", "kernels fused"),
      Paper::new(9, "sparse attention", "kernels fused"),
      Paper::new(4, "sparse attention", "kernels fused"),
    ];
    let ranked = recommender().recommend(&target, &pool, 5);
    assert_eq!(ids(&ranked), vec![
      PaperId::from(5),
      PaperId::from(9),
      PaperId::from(4),
      PaperId::from(7)
    ]);
  }

  #[test]
  fn test_output_is_bounded_monotone_and_excludes_target() {
    let recommender = Recommender::new(Arc::new(WhitespaceNormalizer));
    let words = ["alpha", "beta", "gamma", "delta", "epsilon"];
    let pool = (0..20)
      .map(|i| {
        let title = format!("{} {}", words[i % 5], words[(i * 3) % 5]);
        Paper::new(i, title, words[(i * 7) % 5])
      })
      .collect::<Vec<_>>();
    let target = pool[4].clone();

    for n in [0, 1, 3, 5, 19, 25] {
      let ranked = recommender.recommend(&target, &pool, n);
      assert_eq!(ranked.len(), n.min(pool.len() - 1));
      assert!(ranked.iter().all(|paper| paper.id != target.id));
    }

    let ranked = recommender.rank(&target, &pool);
    assert!(ranked.windows(2).all(|pair| pair[0].score >= pair[1].score));
  }

  #[test]
  fn test_string_and_numeric_ids_are_distinct() {
    let target = Paper::new(1, "graph networks", "");
    let pool = vec![Paper::new("1", "graph networks", ""), Paper::new(1, "graph networks", "")];
    let ranked = recommender().recommend(&target, &pool, 5);
    assert_eq!(ids(&ranked), vec![PaperId::from("1")]);
  }
}
