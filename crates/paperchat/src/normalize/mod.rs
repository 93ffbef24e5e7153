//! Text normalization for content-based recommendation.
//!
//! A [`Normalizer`] reduces free text (a paper's title and summary) to the lemmas of its
//! content words: nouns, proper nouns, adjectives and verbs. Everything else is dropped,
//! including stopwords and punctuation. The output is a single space-joined string that
//! the [`similarity`](crate::similarity) scorer consumes.
//!
//! The linguistic backend sits behind the [`Normalizer`] trait so it can be swapped
//! without touching the scorer or the recommender. [`LexicalNormalizer`] is the bundled
//! backend: a rule-based English pipeline made of
//! - [`tokenize`], which splits text into word and punctuation tokens,
//! - [`stopwords`], the stopword table,
//! - [`tagger`], which assigns a [`PartOfSpeech`] to each token,
//! - [`lemma`], which maps a tagged token to its dictionary form.
//!
//! # Examples
//!
//! ```
//! use paperchat::normalize::{LexicalNormalizer, Normalizer};
//!
//! let normalizer = LexicalNormalizer::new();
//!
//! assert_eq!(
//!   normalizer.normalize("The models are running quickly on large clusters!"),
//!   "model run large cluster"
//! );
//! assert_eq!(normalizer.normalize("it is what it is"), "");
//! ```

use super::*;

pub mod lemma;
pub mod stopwords;
pub mod tagger;
pub mod tokenize;

use lemma::Lemmatizer;
use stopwords::Stopwords;
use tagger::Tagger;

/// Reduces text to a normalized stream of content-word lemmas.
///
/// Implementations must be deterministic, must never fail, and must be safe to share
/// between concurrently handled requests.
pub trait Normalizer: Send + Sync {
  /// Normalizes `text` into space-joined lemmas, in their original order.
  ///
  /// An empty string is a valid result, for instance when every token is a stopword.
  fn normalize(&self, text: &str) -> String;

  /// Returns the first `n` tokens of the normalized `text`.
  ///
  /// These are the paper's leading content words, which front ends show as keywords.
  fn keywords(&self, text: &str, n: usize) -> Vec<String> {
    tokenize::tokenize(&self.normalize(text)).into_iter().take(n).collect()
  }
}

/// Coarse part-of-speech categories assigned by the [`tagger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
  /// Common noun
  Noun,
  /// Proper noun, including identifiers such as `gpt4`
  ProperNoun,
  /// Adjective
  Adjective,
  /// Verb, including participles and gerunds
  Verb,
  /// Adverb
  Adverb,
  /// Number written with digits
  Numeral,
  /// Contraction fragment or particle such as `'s` or `n't`
  Particle,
  /// Interjection
  Interjection,
  /// Punctuation mark
  Punctuation,
  /// Symbol such as `+` or `%`
  Symbol,
}

impl PartOfSpeech {
  /// Whether tokens of this category survive normalization.
  pub fn is_content(self) -> bool {
    matches!(
      self,
      PartOfSpeech::Noun | PartOfSpeech::ProperNoun | PartOfSpeech::Adjective | PartOfSpeech::Verb
    )
  }
}

impl std::fmt::Display for PartOfSpeech {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let tag = match self {
      PartOfSpeech::Noun => "NOUN",
      PartOfSpeech::ProperNoun => "PROPN",
      PartOfSpeech::Adjective => "ADJ",
      PartOfSpeech::Verb => "VERB",
      PartOfSpeech::Adverb => "ADV",
      PartOfSpeech::Numeral => "NUM",
      PartOfSpeech::Particle => "PART",
      PartOfSpeech::Interjection => "INTJ",
      PartOfSpeech::Punctuation => "PUNCT",
      PartOfSpeech::Symbol => "SYM",
    };
    write!(f, "{tag}")
  }
}

/// A token after tagging and lemmatization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedToken {
  /// The token as it appeared in the lowercased text
  pub text:    String,
  /// Assigned part of speech
  pub pos:     PartOfSpeech,
  /// Dictionary form of the token
  pub lemma:   String,
  /// Whether the token is a stopword
  pub is_stop: bool,
}

impl AnalyzedToken {
  /// Whether the token is made of punctuation only.
  pub fn is_punct(&self) -> bool { self.pos == PartOfSpeech::Punctuation }
}

/// Rule-based English normalizer.
///
/// The lexicon tables are built once in [`LexicalNormalizer::new`] and only read
/// afterwards, so one instance can be wrapped in an [`Arc`] and shared by every request.
#[derive(Debug, Clone)]
pub struct LexicalNormalizer {
  /// Stopword table
  stopwords:  Stopwords,
  /// Part-of-speech tagger
  tagger:     Tagger,
  /// Lemma lookup and suffix rules
  lemmatizer: Lemmatizer,
}

impl LexicalNormalizer {
  /// Builds the lexicon tables.
  pub fn new() -> Self {
    Self { stopwords: Stopwords::english(), tagger: Tagger::new(), lemmatizer: Lemmatizer::new() }
  }

  /// Runs the full pipeline and returns every token, including the ones that
  /// normalization would discard.
  ///
  /// # Examples
  ///
  /// ```
  /// use paperchat::normalize::{LexicalNormalizer, PartOfSpeech};
  ///
  /// let tokens = LexicalNormalizer::new().analyze("Studies show");
  /// assert_eq!(tokens[0].lemma, "study");
  /// assert_eq!(tokens[1].pos, PartOfSpeech::Noun);
  /// ```
  pub fn analyze(&self, text: &str) -> Vec<AnalyzedToken> {
    tokenize::tokenize(&text.to_lowercase())
      .into_iter()
      .map(|text| {
        let pos = self.tagger.tag(&text);
        let lemma = self.lemmatizer.lemmatize(&text, pos);
        let is_stop = self.stopwords.contains(&text);
        AnalyzedToken { text, pos, lemma, is_stop }
      })
      .collect()
  }
}

impl Default for LexicalNormalizer {
  fn default() -> Self { Self::new() }
}

impl Normalizer for LexicalNormalizer {
  fn normalize(&self, text: &str) -> String {
    let lemmas = self
      .analyze(text)
      .into_iter()
      .filter(|token| !token.is_stop && !token.is_punct() && token.pos.is_content())
      .map(|token| token.lemma)
      .collect::<Vec<_>>();
    trace!("Normalized {text:?} into {} lemmas", lemmas.len());
    lemmas.join(" ")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_normalize_keeps_content_lemmas_in_order() {
    let normalizer = LexicalNormalizer::new();
    assert_eq!(
      normalizer.normalize("Deep Learning for NLP transformers attention"),
      "deep learn nlp transformer attention"
    );
    assert_eq!(
      normalizer.normalize("Attention Mechanisms transformer models"),
      "attention mechanism transformer model"
    );
  }

  #[test]
  fn test_normalize_drops_stopwords_and_punctuation() {
    let normalizer = LexicalNormalizer::new();
    assert_eq!(normalizer.normalize("The, and; of -- is!"), "");
    assert_eq!(normalizer.normalize("We don't use the model's weights."), "use model weight");
  }

  #[test]
  fn test_normalize_drops_adverbs_numbers_and_symbols() {
    let normalizer = LexicalNormalizer::new();
    assert_eq!(normalizer.normalize("rapidly trained 3 networks + 42%"), "train network");
  }

  #[test]
  fn test_normalize_keeps_words_with_combining_marks() {
    let normalizer = LexicalNormalizer::new();
    assert_eq!(
      normalizer.normalize("Schro\u{308}dinger equation"),
      "schro\u{308}dinger equation"
    );
    assert_eq!(
      normalizer.normalize("\u{130}stanbul\u{2019}s na\u{ef}ve caf\u{e9}s running"),
      "i\u{307}stanbul na\u{ef}ve caf\u{e9} run"
    );
    assert!(!normalizer.normalize("e\u{301}ed").is_empty());
  }

  #[test]
  fn test_normalize_drops_bare_negation() {
    assert_eq!(LexicalNormalizer::new().normalize("n't"), "");
  }

  #[test]
  fn test_normalize_empty_input() {
    let normalizer = LexicalNormalizer::new();
    assert_eq!(normalizer.normalize(""), "");
    assert_eq!(normalizer.normalize("   "), "");
  }

  #[test]
  fn test_normalize_is_deterministic() {
    let normalizer = LexicalNormalizer::new();
    let text = "Graph neural networks learn representations of molecules.";
    assert_eq!(normalizer.normalize(text), normalizer.normalize(text));
  }

  #[test]
  fn test_keywords_take_leading_lemmas() {
    let normalizer = LexicalNormalizer::new();
    let keywords = normalizer.keywords("Graph neural networks learn representations", 3);
    assert_eq!(keywords, vec!["graph", "neural", "network"]);
    assert!(normalizer.keywords("graph", 0).is_empty());
  }

  #[test]
  fn test_analyze_reports_discarded_tokens() {
    let tokens = LexicalNormalizer::new().analyze("The cat.");
    assert_eq!(tokens.len(), 3);
    assert!(tokens[0].is_stop);
    assert_eq!(tokens[1].pos, PartOfSpeech::Noun);
    assert!(tokens[2].is_punct());
  }

  #[test]
  fn test_normalizer_is_shareable() {
    let normalizer: Arc<dyn Normalizer> = Arc::new(LexicalNormalizer::new());
    let handles = (0..4)
      .map(|_| {
        let normalizer = Arc::clone(&normalizer);
        std::thread::spawn(move || normalizer.normalize("sparse attention kernels"))
      })
      .collect::<Vec<_>>();
    for handle in handles {
      assert_eq!(handle.join().unwrap(), "sparse attention kernel");
    }
  }
}
