use super::*;
use crate::{normalize::LexicalNormalizer, recommend::Recommender};

fn recommender() -> Recommender { Recommender::new(Arc::new(LexicalNormalizer::new())) }

fn ids(papers: &[Paper]) -> Vec<String> {
  papers.iter().map(|paper| paper.id.to_string()).collect()
}

#[traced_test]
#[test]
fn test_target_is_excluded_and_related_paper_wins() {
  let target = Paper::new(1, "Deep Learning for NLP", "transformers attention");
  let pool = vec![
    Paper::new(1, "Deep Learning for NLP", "transformers attention"),
    Paper::new(2, "Attention Mechanisms", "transformer models"),
    Paper::new(3, "Cooking Recipes", "pasta sauce"),
  ];
  assert_eq!(ids(&recommender().recommend(&target, &pool, 5)), ["2", "3"]);
}

#[test]
fn test_zero_overlap_candidate_is_kept() {
  let target = Paper::new(1, "Quantum Error Correction", "surface codes");
  let pool = vec![Paper::new(2, "Sourdough Baking", "wild yeast")];
  let ranked = recommender().rank(&target, &pool);
  assert_eq!(ranked.len(), 1);
  assert_eq!(ranked[0].score, 0.0);
}

#[test]
fn test_empty_pool() {
  let target = Paper::new(1, "Quantum Error Correction", "surface codes");
  assert!(recommender().recommend(&target, &[], 5).is_empty());
}

#[test]
fn test_zero_recommendations() {
  let target = Paper::new(1, "Quantum Error Correction", "surface codes");
  let pool = vec![
    Paper::new(2, "Surface Codes", "quantum error correction thresholds"),
    Paper::new(3, "Topological Codes", "anyons"),
  ];
  assert!(recommender().recommend(&target, &pool, 0).is_empty());
}

#[test]
fn test_identical_candidates_tie_in_input_order() {
  let target = Paper::new(1, "Graph Neural Networks", "message passing");
  let pool = vec![
    Paper::new("b", "Message Passing Networks", "graphs"),
    Paper::new("a", "Message Passing Networks", "graphs"),
  ];
  assert_eq!(ids(&recommender().recommend(&target, &pool, 5)), ["b", "a"]);
}

#[test]
fn test_request_body_shape() -> anyhow::Result<()> {
  #[derive(Deserialize)]
  #[serde(rename_all = "camelCase")]
  struct Body {
    target_paper: Paper,
    all_papers:   Vec<Paper>,
  }

  let body: Body = serde_json::from_value(serde_json::json!({
    "targetPaper": {"id": 1, "title": "Deep Learning for NLP", "summary": "transformers attention"},
    "allPapers": [
      {"id": 2, "title": "Attention Mechanisms", "summary": "transformer models", "link": "x"},
      {"id": 3, "title": "Cooking Recipes", "summary": "pasta sauce"}
    ]
  }))?;
  let ranked = recommender().recommend(&body.target_paper, &body.all_papers, 5);
  let json = serde_json::to_value(&ranked)?;
  assert_eq!(json[0]["link"], "x");
  assert_eq!(json[1]["id"], 3);
  Ok(())
}
