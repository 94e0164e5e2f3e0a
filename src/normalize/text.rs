use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Fold free text to plain ASCII.
///
/// Accented letters decompose to their base letter (NFKD) and any remaining
/// non-ASCII characters are dropped. Empty or whitespace-only input yields
/// an empty string.
pub fn clean_text(text: &str) -> String {
    ascii_fold(text).trim().to_string()
}

/// Fold a facility name to an ASCII identifier.
///
/// On top of [`clean_text`] folding, everything except word characters and
/// whitespace is removed, and each remaining run of whitespace becomes a
/// single underscore.
pub fn clean_name(text: &str) -> String {
    let folded = ascii_fold(text);
    let stripped = NON_WORD.replace_all(&folded, "");
    WHITESPACE.replace_all(stripped.trim(), "_").into_owned()
}

fn ascii_fold(text: &str) -> String {
    text.nfkd().filter(char::is_ascii).collect()
}
