//! Splits lowercased text into word and punctuation tokens.
//!
//! Words are runs of letters, marks, and digits. Contractions are split the way
//! English tokenizers usually do it: `don't` becomes `do` + `n't` and `model's`
//! becomes `model` + `'s`, so the fragments can be dropped as stopwords. Every other
//! non-space character is its own token.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
  static ref TOKEN: Regex =
    Regex::new(r"[\p{L}\p{M}\p{N}]+(?:'[\p{L}]+)?|[^\s\p{L}\p{M}\p{N}]").unwrap();
}

/// Tokenizes `text`, returning owned tokens in their original order.
///
/// Curly apostrophes are folded to `'` first so both spellings of a contraction
/// produce the same fragments.
pub fn tokenize(text: &str) -> Vec<String> {
  let text = text.replace('\u{2019}', "'");
  let mut tokens = Vec::new();
  for m in TOKEN.find_iter(&text) {
    let token = m.as_str();
    match token.find('\'') {
      Some(_) if token.ends_with("n't") => {
        let split = token.len() - 3;
        if split > 0 {
          tokens.push(token[..split].to_owned());
        }
        tokens.push(token[split..].to_owned());
      },
      Some(idx) if idx > 0 => {
        tokens.push(token[..idx].to_owned());
        tokens.push(token[idx..].to_owned());
      },
      _ => tokens.push(token.to_owned()),
    }
  }
  tokens
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_words_and_punctuation() {
    assert_eq!(tokenize("deep learning, for nlp!"), vec![
      "deep", "learning", ",", "for", "nlp", "!"
    ]);
  }

  #[test]
  fn test_contractions_are_split() {
    assert_eq!(tokenize("don't stop"), vec!["do", "n't", "stop"]);
    assert_eq!(tokenize("the model\u{2019}s output"), vec!["the", "model", "'s", "output"]);
  }

  #[test]
  fn test_bare_negation_stays_whole() {
    assert_eq!(tokenize("n't"), vec!["n't"]);
    assert_eq!(tokenize("isn\u{2019}t"), vec!["is", "n't"]);
  }

  #[test]
  fn test_hyphens_and_digits() {
    assert_eq!(tokenize("state-of-the-art gpt4 3.5"), vec![
      "state", "-", "of", "-", "the", "-", "art", "gpt4", "3", ".", "5"
    ]);
  }

  #[test]
  fn test_empty_input() {
    assert!(tokenize("").is_empty());
    assert!(tokenize("   \n\t").is_empty());
  }
}
