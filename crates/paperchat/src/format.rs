//! Text cleanup for paper titles and the filenames derived from them.
//!
//! Titles coming back from search providers are wrapped across lines and may contain
//! characters that are not allowed in filenames (`/`, `:`, ...). These helpers collapse the
//! whitespace and turn a title into a safe, bounded-length file stem.
//!
//! # Examples
//!
//! ```
//! use paperchat::format;
//!
//! let title = "Attention Is All\n   You Need";
//! assert_eq!(format::collapse_whitespace(title), "Attention Is All You Need");
//! assert_eq!(format::format_title(title, None), "attention_is_all_you_need");
//! assert_eq!(format::pdf_filename("BERT: Pre-training"), "bert_pre-training.pdf");
//! ```

/// Default upper bound on the length of a formatted title.
pub const MAX_TITLE_LENGTH: usize = 50;

/// Replaces every run of whitespace with a single space and trims both ends.
pub fn collapse_whitespace(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Formats a title for use as a file stem.
///
/// The title is lowercased, characters other than letters, digits, `-`, `_` and `.` are
/// dropped, and words are joined with underscores. When the result is longer than
/// `max_length` bytes (default [`MAX_TITLE_LENGTH`]) it is cut at the last word that fits.
/// A first word longer than the limit is cut at a character boundary instead.
///
/// # Examples
///
/// ```
/// use paperchat::format::format_title;
///
/// assert_eq!(format_title("No    Extra    Spaces", None), "no_extra_spaces");
/// assert_eq!(format_title("This Is A Very Long Title Indeed", Some(20)), "this_is_a_very_long");
/// assert_eq!(format_title("Graphs / Networks: a survey?", None), "graphs_networks_a_survey");
/// ```
pub fn format_title(title: &str, max_length: Option<usize>) -> String {
  let max_length = max_length.unwrap_or(MAX_TITLE_LENGTH);

  let words = title
    .to_lowercase()
    .split_whitespace()
    .map(|word| {
      word
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect::<String>()
    })
    .filter(|word| !word.is_empty())
    .collect::<Vec<_>>();

  let mut result = String::new();
  for word in &words {
    let needed = if result.is_empty() { word.len() } else { result.len() + 1 + word.len() };
    if needed > max_length {
      break;
    }
    if !result.is_empty() {
      result.push('_');
    }
    result.push_str(word);
  }

  if result.is_empty() {
    if let Some(first) = words.first() {
      for c in first.chars() {
        if result.len() + c.len_utf8() > max_length {
          break;
        }
        result.push(c);
      }
    }
  }
  result
}

/// Filename under which a paper's PDF is saved: the formatted title plus `.pdf`.
///
/// Falls back to `paper.pdf` when nothing of the title survives formatting.
pub fn pdf_filename(title: &str) -> String {
  let stem = format_title(title, None);
  let stem = stem.trim_matches('.');
  if stem.is_empty() {
    "paper.pdf".to_owned()
  } else {
    format!("{stem}.pdf")
  }
}
