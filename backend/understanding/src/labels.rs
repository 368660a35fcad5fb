//! Label clean-up shared by every classifier.

/// Answers a vision model gives when it sees nothing it can name.
const NON_ANSWERS: &[&str] = &["none", "unknown", "nothing", "n/a", "no object", "unclear"];

/// Normalise a raw classifier label into a child-friendly word.
///
/// ImageNet-style labels list synonyms ("Granny Smith, apple"); only the first
/// is kept. Underscores become spaces, surrounding quotes and punctuation are
/// dropped and the result is lowercased. Returns `None` for empty or
/// non-answers.
pub fn normalize_label(raw: &str) -> Option<String> {
    let first = raw.split(',').next().unwrap_or("");
    let cleaned: String = first
        .replace('_', " ")
        .trim()
        .trim_matches(|c: char| c.is_ascii_punctuation() || matches!(c, '“' | '”' | '‘' | '’'))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    if cleaned.is_empty() || NON_ANSWERS.contains(&cleaned.as_str()) {
        None
    } else {
        Some(cleaned)
    }
}
