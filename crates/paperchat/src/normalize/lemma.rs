//! Maps tagged tokens to their dictionary form.
//!
//! Lookup tables cover irregular verbs and nouns. Everything else goes through suffix
//! rules chosen by part of speech:
//! - nouns lose their plural ending (`studies` -> `study`, `boxes` -> `box`),
//! - verbs lose `-ing`, `-ed`, and `-s`, with doubled consonants undone (`running` -> `run`)
//!   and a silent `e` put back where the stem needs one (`making` -> `make`),
//! - every other category is left as it is.

use std::collections::{HashMap, HashSet};

use super::PartOfSpeech;

/// Irregular verb forms and their lemmas.
pub(crate) const IRREGULAR_VERBS: &[(&str, &str)] = &[
  ("ate", "eat"),
  ("began", "begin"),
  ("begun", "begin"),
  ("bent", "bend"),
  ("bore", "bear"),
  ("borne", "bear"),
  ("bought", "buy"),
  ("broke", "break"),
  ("broken", "break"),
  ("brought", "bring"),
  ("built", "build"),
  ("caught", "catch"),
  ("chose", "choose"),
  ("chosen", "choose"),
  ("came", "come"),
  ("dealt", "deal"),
  ("drawn", "draw"),
  ("drew", "draw"),
  ("driven", "drive"),
  ("drove", "drive"),
  ("dying", "die"),
  ("eaten", "eat"),
  ("fallen", "fall"),
  ("fed", "feed"),
  ("fell", "fall"),
  ("felt", "feel"),
  ("flew", "fly"),
  ("flown", "fly"),
  ("forgot", "forget"),
  ("forgotten", "forget"),
  ("found", "find"),
  ("froze", "freeze"),
  ("frozen", "freeze"),
  ("gave", "give"),
  ("given", "give"),
  ("gone", "go"),
  ("grew", "grow"),
  ("grown", "grow"),
  ("held", "hold"),
  ("hidden", "hide"),
  ("kept", "keep"),
  ("knew", "know"),
  ("known", "know"),
  ("learnt", "learn"),
  ("led", "lead"),
  ("left", "leave"),
  ("lost", "lose"),
  ("lying", "lie"),
  ("meant", "mean"),
  ("met", "meet"),
  ("paid", "pay"),
  ("proven", "prove"),
  ("ran", "run"),
  ("risen", "rise"),
  ("rose", "rise"),
  ("said", "say"),
  ("saw", "see"),
  ("seen", "see"),
  ("sent", "send"),
  ("shown", "show"),
  ("sold", "sell"),
  ("sought", "seek"),
  ("spent", "spend"),
  ("spoke", "speak"),
  ("spoken", "speak"),
  ("stood", "stand"),
  ("struck", "strike"),
  ("taken", "take"),
  ("taught", "teach"),
  ("thought", "think"),
  ("threw", "throw"),
  ("thrown", "throw"),
  ("told", "tell"),
  ("took", "take"),
  ("tying", "tie"),
  ("understood", "understand"),
  ("went", "go"),
  ("woke", "wake"),
  ("won", "win"),
  ("wore", "wear"),
  ("worn", "wear"),
  ("written", "write"),
  ("wrote", "write"),
];

/// Irregular noun plurals and their singular forms.
const IRREGULAR_NOUNS: &[(&str, &str)] = &[
  ("analyses", "analysis"),
  ("axes", "axis"),
  ("bases", "basis"),
  ("children", "child"),
  ("criteria", "criterion"),
  ("crises", "crisis"),
  ("diagnoses", "diagnosis"),
  ("feet", "foot"),
  ("geese", "goose"),
  ("halves", "half"),
  ("hypotheses", "hypothesis"),
  ("indices", "index"),
  ("knives", "knife"),
  ("leaves", "leaf"),
  ("lives", "life"),
  ("matrices", "matrix"),
  ("men", "man"),
  ("mice", "mouse"),
  ("people", "person"),
  ("phenomena", "phenomenon"),
  ("selves", "self"),
  ("syntheses", "synthesis"),
  ("teeth", "tooth"),
  ("theses", "thesis"),
  ("vertices", "vertex"),
  ("wives", "wife"),
  ("wolves", "wolf"),
  ("women", "woman"),
];

/// Nouns ending in `s` that are not plurals.
const UNINFLECTED_NOUNS: &[&str] = &[
  "bias",
  "economics",
  "ethics",
  "genetics",
  "linguistics",
  "mathematics",
  "means",
  "news",
  "physics",
  "robotics",
  "series",
  "species",
  "statistics",
];

/// Verb stems whose silent `e` no suffix rule restores.
const E_STEMS: &[&str] = &["creat", "hang", "sing", "bring", "spring", "string", "swing"];

/// Stem endings after which a verb's silent `e` was dropped.
const E_SUFFIXES: &[&str] = &[
  "v", "iz", "yz", "ys", "uc", "ac", "ic", "nc", "rc", "rg", "dg", "ang", "eng", "bl", "pl", "gl",
  "dl", "tl", "kl", "cl", "fl", "zl", "ib", "eas", "aus", "ais", "oos",
];

/// Lemma lookup and suffix rules.
#[derive(Debug, Clone)]
pub struct Lemmatizer {
  /// Irregular verb form to lemma
  verbs:       HashMap<&'static str, &'static str>,
  /// Irregular noun plural to singular
  nouns:       HashMap<&'static str, &'static str>,
  /// Nouns that keep their trailing `s`
  uninflected: HashSet<&'static str>,
}

impl Lemmatizer {
  /// Builds the lookup tables.
  pub fn new() -> Self {
    Self {
      verbs:       IRREGULAR_VERBS.iter().copied().collect(),
      nouns:       IRREGULAR_NOUNS.iter().copied().collect(),
      uninflected: UNINFLECTED_NOUNS.iter().copied().collect(),
    }
  }

  /// Returns the dictionary form of `token` read as `pos`.
  ///
  /// # Examples
  ///
  /// ```
  /// use paperchat::normalize::{lemma::Lemmatizer, PartOfSpeech};
  ///
  /// let lemmatizer = Lemmatizer::new();
  /// assert_eq!(lemmatizer.lemmatize("running", PartOfSpeech::Verb), "run");
  /// assert_eq!(lemmatizer.lemmatize("studies", PartOfSpeech::Noun), "study");
  /// assert_eq!(lemmatizer.lemmatize("gpt4", PartOfSpeech::ProperNoun), "gpt4");
  /// ```
  pub fn lemmatize(&self, token: &str, pos: PartOfSpeech) -> String {
    match pos {
      PartOfSpeech::Verb => self.verb(token),
      PartOfSpeech::Noun => self.noun(token),
      _ => token.to_owned(),
    }
  }

  /// Verb lemma.
  fn verb(&self, token: &str) -> String {
    if let Some(lemma) = self.verbs.get(token) {
      return (*lemma).to_owned();
    }
    if let Some(stem) = token.strip_suffix("ied") {
      return format!("{stem}y");
    }
    if let Some(stem) = token.strip_suffix("ing") {
      return restore_stem(stem);
    }
    if let Some(stem) = token.strip_suffix("ed") {
      return restore_stem(stem);
    }
    if let Some(stem) = token.strip_suffix("ies") {
      return format!("{stem}y");
    }
    if let Some(stem) = token.strip_suffix("es") {
      if ["s", "x", "z", "ch", "sh"].iter().any(|end| stem.ends_with(end)) {
        return stem.to_owned();
      }
    }
    match token.strip_suffix('s') {
      Some(stem) if !stem.ends_with('s') && !stem.is_empty() => stem.to_owned(),
      _ => token.to_owned(),
    }
  }

  /// Noun lemma.
  fn noun(&self, token: &str) -> String {
    if let Some(lemma) = self.nouns.get(token) {
      return (*lemma).to_owned();
    }
    if self.uninflected.contains(token)
      || token.chars().count() <= 3
      || !token.ends_with('s')
      || ["ss", "us", "is"].iter().any(|end| token.ends_with(end))
    {
      return token.to_owned();
    }
    if let Some(stem) = token.strip_suffix("ies") {
      return format!("{stem}y");
    }
    if ["sses", "xes", "ches", "shes", "zzes"].iter().any(|end| token.ends_with(end)) {
      return token[..token.len() - 2].to_owned();
    }
    token[..token.len() - 1].to_owned()
  }
}

impl Default for Lemmatizer {
  fn default() -> Self { Self::new() }
}

/// Repairs a verb stem left behind by stripping `-ing` or `-ed`.
///
/// A doubled final consonant is undone (`stopp` -> `stop`). Otherwise a silent `e` is
/// appended when the stem's ending calls for one (`mak` -> `make`, `solv` -> `solve`).
fn restore_stem(stem: &str) -> String {
  let chars = stem.chars().collect::<Vec<_>>();
  let n = chars.len();
  if n > 3 && chars[n - 1] == chars[n - 2] && is_consonant(chars[n - 1]) {
    if !matches!(chars[n - 1], 'l' | 's' | 'z' | 'f') {
      return chars[..n - 1].iter().collect();
    }
    return stem.to_owned();
  }
  if needs_silent_e(stem, &chars) {
    return format!("{stem}e");
  }
  stem.to_owned()
}

/// Whether a verb stem lost a silent `e`.
fn needs_silent_e(stem: &str, chars: &[char]) -> bool {
  if E_STEMS.contains(&stem) {
    return stem == "creat";
  }
  if E_SUFFIXES.iter().any(|end| stem.ends_with(end)) {
    return true;
  }
  let groups = vowel_groups(chars);
  if groups >= 2 {
    if stem.ends_with("at") && !stem.ends_with("eat") && !stem.ends_with("oat") {
      return true;
    }
    if stem.ends_with("ag") {
      return true;
    }
  }
  if stem.ends_with("ut") && !stem.ends_with("out") {
    return true;
  }
  for (end, excluded) in [("ur", "our"), ("ir", "air"), ("id", "aid"), ("od", "ood"), ("ok", "ook")]
  {
    if stem.ends_with(end) && !stem.ends_with(excluded) && groups >= 2 {
      return !stem.ends_with("oid") && !stem.ends_with("eid");
    }
  }
  if (stem.ends_with("os") || stem.ends_with("ar")) && groups >= 2 {
    return chars.len() > 2 && is_consonant(chars[chars.len() - 3]);
  }
  is_short_closed_syllable(chars)
}

/// Matches a single syllable of the form (consonants) vowel consonant, such as `mak`, `bas`,
/// or `us`, where the final consonant is not `w`, `x`, or `y`.
fn is_short_closed_syllable(chars: &[char]) -> bool {
  let n = chars.len();
  if n < 2 || vowel_groups(chars) != 1 {
    return false;
  }
  let last = chars[n - 1];
  let vowel = chars[n - 2];
  let before = if n > 2 { Some(chars[n - 3]) } else { None };
  is_consonant(last)
    && !matches!(last, 'w' | 'x' | 'y')
    && !is_consonant(vowel)
    && before.map_or(true, is_consonant)
}

/// Counts maximal runs of vowels.
fn vowel_groups(chars: &[char]) -> usize {
  let mut groups = 0;
  let mut in_group = false;
  for &c in chars {
    let vowel = !is_consonant(c);
    if vowel && !in_group {
      groups += 1;
    }
    in_group = vowel;
  }
  groups
}

/// ASCII consonant test; `y` counts as a consonant.
fn is_consonant(c: char) -> bool {
  c.is_ascii_alphabetic() && !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

#[cfg(test)]
mod tests {
  use super::*;

  fn verb(token: &str) -> String { Lemmatizer::new().lemmatize(token, PartOfSpeech::Verb) }

  fn noun(token: &str) -> String { Lemmatizer::new().lemmatize(token, PartOfSpeech::Noun) }

  #[test]
  fn test_irregular_verbs() {
    assert_eq!(verb("ran"), "run");
    assert_eq!(verb("written"), "write");
    assert_eq!(verb("brought"), "bring");
  }

  #[test]
  fn test_verb_suffixes() {
    assert_eq!(verb("learning"), "learn");
    assert_eq!(verb("trained"), "train");
    assert_eq!(verb("applied"), "apply");
    assert_eq!(verb("running"), "run");
    assert_eq!(verb("stopped"), "stop");
    assert_eq!(verb("falling"), "fall");
    assert_eq!(verb("passing"), "pass");
  }

  #[test]
  fn test_silent_e_is_restored() {
    assert_eq!(verb("making"), "make");
    assert_eq!(verb("based"), "base");
    assert_eq!(verb("solving"), "solve");
    assert_eq!(verb("generated"), "generate");
    assert_eq!(verb("computing"), "compute");
    assert_eq!(verb("optimizing"), "optimize");
    assert_eq!(verb("enabled"), "enable");
    assert_eq!(verb("proposed"), "propose");
    assert_eq!(verb("producing"), "produce");
    assert_eq!(verb("creating"), "create");
    assert_eq!(verb("increasing"), "increase");
  }

  #[test]
  fn test_silent_e_is_not_invented() {
    assert_eq!(verb("opening"), "open");
    assert_eq!(verb("developed"), "develop");
    assert_eq!(verb("showing"), "show");
    assert_eq!(verb("repeated"), "repeat");
    assert_eq!(verb("bringing"), "bring");
    assert_eq!(verb("avoided"), "avoid");
  }

  #[test]
  fn test_noun_plurals() {
    assert_eq!(noun("networks"), "network");
    assert_eq!(noun("studies"), "study");
    assert_eq!(noun("boxes"), "box");
    assert_eq!(noun("approaches"), "approach");
    assert_eq!(noun("responses"), "response");
    assert_eq!(noun("children"), "child");
    assert_eq!(noun("hypotheses"), "hypothesis");
  }

  #[test]
  fn test_nouns_that_are_not_plurals() {
    for token in ["class", "corpus", "analysis", "physics", "series", "gas", "attention"] {
      assert_eq!(noun(token), token);
    }
  }

  #[test]
  fn test_other_categories_are_untouched() {
    let lemmatizer = Lemmatizer::new();
    assert_eq!(lemmatizer.lemmatize("neural", PartOfSpeech::Adjective), "neural");
    assert_eq!(lemmatizer.lemmatize("quickly", PartOfSpeech::Adverb), "quickly");
  }
}
