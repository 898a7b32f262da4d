use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Letters, any numeric character (including superscripts and fractions) and
    // underscore. Combining marks are separators.
    static ref RE: Regex = Regex::new(r"[\p{L}\p{N}_]+").expect("valid regex");
}

/// Tokenize text into lower-cased runs of word characters, in order.
///
/// Used for both indexing and querying; anything that is not a word
/// character is a separator and never produces a token.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    RE.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}

/// Number of tokens `tokenize` would produce, without allocating them.
pub fn token_count(text: &str) -> usize {
    RE.find_iter(&text.to_lowercase()).count()
}
