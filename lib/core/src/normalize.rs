//! Diacritic folding for the Interslavic source-language column.
//!
//! Every character is looked up independently in a static table and either
//! replaced by its plain Latin equivalent (a digraph for `đ`) or passed
//! through. The table never produces a character that is itself a key, so
//! folding twice is the same as folding once.

use phf::{phf_map, Map};
use std::borrow::Cow;

/// Flavoured and hacek letters mapped to their plain form.
static FOLD_TABLE: Map<char, &'static str> = phf_map! {
    // nasal and dotted vowels
    'ę' => "e", 'ą' => "a", 'ų' => "u", 'ȯ' => "o", 'ė' => "e", 'å' => "a",
    // soft consonants
    'ń' => "n", 'ť' => "t", 'ľ' => "l", 'ŕ' => "r", 'ď' => "d",
    'ś' => "s", 'ź' => "z", 'ć' => "c", 'đ' => "dj",
    // standard hacek letters
    'č' => "c", 'š' => "s", 'ž' => "z", 'ě' => "e",
    // uppercase
    'Č' => "C", 'Š' => "S", 'Ž' => "Z", 'Ę' => "E", 'Ą' => "A", 'Ų' => "U",
    'Ń' => "N", 'Ť' => "T", 'Ľ' => "L", 'Ŕ' => "R", 'Ď' => "D",
    'Ś' => "S", 'Ź' => "Z", 'Ć' => "C", 'Đ' => "DJ",
};

/// Returns true if `text` contains at least one foldable character.
#[inline]
#[must_use]
pub fn needs_normalization(text: &str) -> bool {
    text.chars().any(|c| FOLD_TABLE.contains_key(&c))
}

/// Fold diacritics to their ASCII equivalents. Case is left untouched.
#[must_use]
pub fn normalize(text: &str) -> Cow<'_, str> {
    if !needs_normalization(text) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match FOLD_TABLE.get(&c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Lowercase then fold; the form compared against the shadow field.
#[inline]
#[must_use]
pub fn normalize_term(term: &str) -> String {
    normalize(&term.to_lowercase()).into_owned()
}
