//! Line tokenization
//!
//! Splits a line into normalized words. Normalization is byte-level ASCII:
//! ASCII punctuation is removed and ASCII letters are lowercased. Characters
//! outside ASCII pass through unchanged, so `Éclair` and `éclair` count as
//! different words.

/// Turns a line into an ordered sequence of normalized words
///
/// Implementations must be pure: the same line always yields the same tokens.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, line: &str) -> Vec<String>;
}

/// Default tokenizer: whitespace split, ASCII punctuation strip, ASCII lowercase
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiTokenizer;

impl Tokenizer for AsciiTokenizer {
    fn tokenize(&self, line: &str) -> Vec<String> {
        tokenize(line)
    }
}

/// Word separators (the C locale whitespace set, vertical tab included)
///
/// Unicode whitespace such as U+00A0 or U+2003 is not a separator and stays
/// part of the word. The table codec relies on this same set.
#[inline]
pub(crate) fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

/// Tokenize a line with the default rules
pub fn tokenize(line: &str) -> Vec<String> {
    line.split(is_separator)
        .filter_map(normalize)
        .collect()
}

/// Normalize one raw word; `None` if nothing is left
fn normalize(raw: &str) -> Option<String> {
    let word: String = raw
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if word.is_empty() {
        None
    } else {
        Some(word)
    }
}
