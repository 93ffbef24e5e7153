//! Rule-based part-of-speech tagging for single tokens.
//!
//! The tagger looks at one lowercased token at a time and applies, in order:
//! 1. character classes: punctuation, symbols, digits, contraction fragments,
//! 2. closed word lists: interjections, irregular verb forms, `-ly` words that are not
//!    adverbs,
//! 3. suffix rules: `-ly` adverbs, `-ing` and `-ed` verb inflections, derivational
//!    adjective suffixes,
//! 4. everything left over is a noun.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;

use super::{lemma::IRREGULAR_VERBS, PartOfSpeech};

lazy_static! {
  static ref PUNCTUATION: Regex = Regex::new(r"^\p{P}+$").unwrap();
  static ref WORD: Regex = Regex::new(r"^[\p{L}\p{M}\p{N}]+$").unwrap();
}

/// Interjections, which never carry content.
const INTERJECTIONS: &[&str] = &[
  "ah", "aha", "alas", "hello", "hey", "hi", "hmm", "oh", "ok", "okay", "oops", "uh", "um", "wow",
];

/// Words ending in `-ly` that are not adverbs.
const LY_WORDS: &[(&str, PartOfSpeech)] = &[
  ("ally", PartOfSpeech::Noun),
  ("anomaly", PartOfSpeech::Noun),
  ("assembly", PartOfSpeech::Noun),
  ("bully", PartOfSpeech::Noun),
  ("family", PartOfSpeech::Noun),
  ("italy", PartOfSpeech::ProperNoun),
  ("july", PartOfSpeech::ProperNoun),
  ("monopoly", PartOfSpeech::Noun),
  ("poly", PartOfSpeech::Noun),
  ("apply", PartOfSpeech::Verb),
  ("comply", PartOfSpeech::Verb),
  ("fly", PartOfSpeech::Verb),
  ("imply", PartOfSpeech::Verb),
  ("multiply", PartOfSpeech::Verb),
  ("rely", PartOfSpeech::Verb),
  ("reply", PartOfSpeech::Verb),
  ("supply", PartOfSpeech::Verb),
  ("costly", PartOfSpeech::Adjective),
  ("daily", PartOfSpeech::Adjective),
  ("deadly", PartOfSpeech::Adjective),
  ("early", PartOfSpeech::Adjective),
  ("elderly", PartOfSpeech::Adjective),
  ("friendly", PartOfSpeech::Adjective),
  ("likely", PartOfSpeech::Adjective),
  ("lonely", PartOfSpeech::Adjective),
  ("monthly", PartOfSpeech::Adjective),
  ("timely", PartOfSpeech::Adjective),
  ("ugly", PartOfSpeech::Adjective),
  ("unlikely", PartOfSpeech::Adjective),
  ("weekly", PartOfSpeech::Adjective),
  ("yearly", PartOfSpeech::Adjective),
];

/// Words that end in `-ing` or `-ed` without being verb inflections.
const NOT_INFLECTED: &[&str] = &[
  "bed", "breed", "ceiling", "darling", "embed", "evening", "exceed", "feed", "hatred", "kindred",
  "morning", "naked", "need", "proceed", "pudding", "sacred", "seed", "shed", "sibling", "speed",
  "succeed", "wedding", "wicked",
];

/// Derivational suffixes that mark adjectives.
const ADJECTIVE_SUFFIXES: &[&str] =
  &["able", "ible", "al", "ful", "ic", "ical", "ive", "less", "ous", "ish", "ary"];

/// Words carrying an adjective suffix that are nearly always nouns.
const SUFFIX_NOUNS: &[&str] = &[
  "animal", "approval", "arrival", "capital", "clinic", "dictionary", "festival", "hospital",
  "interval", "journal", "library", "logic", "magic", "mechanic", "metal", "music", "objective",
  "portal", "proposal", "rival", "signal", "summary", "table", "terminal", "topic", "total",
  "traffic", "vocabulary",
];

/// Assigns a [`PartOfSpeech`] to single tokens.
#[derive(Debug, Clone)]
pub struct Tagger {
  /// Interjections
  interjections: HashSet<&'static str>,
  /// Irregular verb forms
  verb_forms:    HashSet<&'static str>,
  /// Fixed categories for `-ly` words that are not adverbs
  ly_words:      HashMap<&'static str, PartOfSpeech>,
  /// `-ing`/`-ed` words that are not inflections
  not_inflected: HashSet<&'static str>,
  /// Nouns that look like adjectives
  suffix_nouns:  HashSet<&'static str>,
}

impl Tagger {
  /// Builds the word lists.
  pub fn new() -> Self {
    Self {
      interjections: INTERJECTIONS.iter().copied().collect(),
      verb_forms:    IRREGULAR_VERBS.iter().map(|(form, _)| *form).collect(),
      ly_words:      LY_WORDS.iter().copied().collect(),
      not_inflected: NOT_INFLECTED.iter().copied().collect(),
      suffix_nouns:  SUFFIX_NOUNS.iter().copied().collect(),
    }
  }

  /// Tags one lowercased token.
  ///
  /// # Examples
  ///
  /// ```
  /// use paperchat::normalize::{tagger::Tagger, PartOfSpeech};
  ///
  /// let tagger = Tagger::new();
  /// assert_eq!(tagger.tag("transformers"), PartOfSpeech::Noun);
  /// assert_eq!(tagger.tag("running"), PartOfSpeech::Verb);
  /// assert_eq!(tagger.tag("quickly"), PartOfSpeech::Adverb);
  /// assert_eq!(tagger.tag(","), PartOfSpeech::Punctuation);
  /// ```
  pub fn tag(&self, token: &str) -> PartOfSpeech {
    if PUNCTUATION.is_match(token) {
      return PartOfSpeech::Punctuation;
    }
    if token.starts_with('\'') || token == "n't" {
      return PartOfSpeech::Particle;
    }
    if !WORD.is_match(token) {
      return PartOfSpeech::Symbol;
    }
    let has_digit = token.chars().any(|c| c.is_numeric());
    if has_digit {
      return if token.chars().all(char::is_numeric) {
        PartOfSpeech::Numeral
      } else {
        PartOfSpeech::ProperNoun
      };
    }
    if self.interjections.contains(token) {
      return PartOfSpeech::Interjection;
    }
    if self.verb_forms.contains(token) {
      return PartOfSpeech::Verb;
    }
    if let Some(pos) = self.ly_words.get(token) {
      return *pos;
    }
    if token.ends_with("ly") && token.chars().count() > 4 {
      return PartOfSpeech::Adverb;
    }
    if self.is_inflected(token) {
      return PartOfSpeech::Verb;
    }
    if !self.suffix_nouns.contains(token)
      && ADJECTIVE_SUFFIXES
        .iter()
        .any(|suffix| token.ends_with(suffix) && token.len() > suffix.len() + 2)
    {
      return PartOfSpeech::Adjective;
    }
    PartOfSpeech::Noun
  }

  /// Whether `token` is an `-ing` or `-ed` form of a regular verb.
  fn is_inflected(&self, token: &str) -> bool {
    if self.not_inflected.contains(token) || token.ends_with("eed") {
      return false;
    }
    let stem = token.strip_suffix("ing").or_else(|| token.strip_suffix("ed"));
    stem.is_some_and(|stem| {
      stem.chars().count() >= 3
        && stem.chars().any(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y'))
    })
  }
}

impl Default for Tagger {
  fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_character_classes() {
    let tagger = Tagger::new();
    assert_eq!(tagger.tag("!"), PartOfSpeech::Punctuation);
    assert_eq!(tagger.tag("-"), PartOfSpeech::Punctuation);
    assert_eq!(tagger.tag("+"), PartOfSpeech::Symbol);
    assert_eq!(tagger.tag("%"), PartOfSpeech::Punctuation);
    assert_eq!(tagger.tag("42"), PartOfSpeech::Numeral);
    assert_eq!(tagger.tag("gpt4"), PartOfSpeech::ProperNoun);
    assert_eq!(tagger.tag("'s"), PartOfSpeech::Particle);
    assert_eq!(tagger.tag("n't"), PartOfSpeech::Particle);
  }

  #[test]
  fn test_combining_marks_are_word_characters() {
    let tagger = Tagger::new();
    assert_eq!(tagger.tag("schro\u{308}dinger"), PartOfSpeech::Noun);
    assert_eq!(tagger.tag("i\u{307}stanbul"), PartOfSpeech::Noun);
    assert_eq!(tagger.tag("\u{301}"), PartOfSpeech::Noun);
    assert_eq!(tagger.tag("2\u{20dd}"), PartOfSpeech::ProperNoun);
  }

  #[test]
  fn test_verbs() {
    let tagger = Tagger::new();
    for token in ["learning", "trained", "ran", "written", "applied", "optimizing"] {
      assert_eq!(tagger.tag(token), PartOfSpeech::Verb, "{token}");
    }
  }

  #[test]
  fn test_words_that_only_look_inflected() {
    let tagger = Tagger::new();
    for token in ["thing", "string", "need", "speed", "red", "morning"] {
      assert_eq!(tagger.tag(token), PartOfSpeech::Noun, "{token}");
    }
  }

  #[test]
  fn test_ly_words() {
    let tagger = Tagger::new();
    assert_eq!(tagger.tag("rapidly"), PartOfSpeech::Adverb);
    assert_eq!(tagger.tag("family"), PartOfSpeech::Noun);
    assert_eq!(tagger.tag("early"), PartOfSpeech::Adjective);
    assert_eq!(tagger.tag("supply"), PartOfSpeech::Verb);
  }

  #[test]
  fn test_adjectives_and_nouns() {
    let tagger = Tagger::new();
    for token in ["neural", "scalable", "generative", "robust"] {
      let expected =
        if token == "robust" { PartOfSpeech::Noun } else { PartOfSpeech::Adjective };
      assert_eq!(tagger.tag(token), expected, "{token}");
    }
    assert_eq!(tagger.tag("proposal"), PartOfSpeech::Noun);
    assert_eq!(tagger.tag("topic"), PartOfSpeech::Noun);
  }

  #[test]
  fn test_interjections() {
    assert_eq!(Tagger::new().tag("wow"), PartOfSpeech::Interjection);
  }
}
