//! Metadata normalization for title and abstract text.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// A word broken with a hyphen at the end of a line.
static LINE_HYPHENATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\p{L})-[ \t]*\r?\n\s*(\p{Ll})").unwrap());

/// A compound broken after its hyphen; the hyphen is kept.
static LINE_COMPOUND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\p{L})-[ \t]*\r?\n\s*(\p{Lu})").unwrap());

const LIGATURES: &[(char, &str)] = &[
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"),
    ('\u{FB06}', "st"),
];

const SOFT_HYPHEN: char = '\u{00AD}';

/// Clean the raw title and abstract delivered by a paper source.
pub fn normalize(raw_title: &str, raw_abstract: &str) -> (String, String) {
    (clean_text(raw_title), clean_text(raw_abstract))
}

/// Clean a piece of wrapped text.
///
/// Applies NFC normalization, expands ligatures, drops soft hyphens, joins
/// words hyphenated across a line break, collapses whitespace and trims.
/// When nothing would remain, the input is returned unchanged.
pub fn clean_text(raw: &str) -> String {
    let mut text: String = raw.nfc().collect();

    if text.chars().any(|c| LIGATURES.iter().any(|(l, _)| *l == c)) {
        for (ligature, replacement) in LIGATURES {
            text = text.replace(*ligature, replacement);
        }
    }

    text.retain(|c| c != SOFT_HYPHEN);

    let text = LINE_HYPHENATION.replace_all(&text, "$1$2");
    let text = LINE_COMPOUND.replace_all(&text, "$1-$2");
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if cleaned.is_empty() {
        raw.to_string()
    } else {
        cleaned
    }
}

/// Key under which two headings count as near-duplicates.
pub(crate) fn comparison_key(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
