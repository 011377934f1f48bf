use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Display-name ordering for effect names.
///
/// Compared level by level, the way a dictionary orders words:
/// 1. base letters, ignoring accents and case, so "Éclair" sorts beside "eclair" and before "Zeal";
/// 2. accents, unaccented first ("e" before "é");
/// 3. case, lowercase first ("alpha" before "Alpha");
/// 4. the raw strings, which keeps the order total.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented(a).cmp(accented(b)))
        .then_with(|| case_ranks(a).cmp(case_ranks(b)))
        .then_with(|| a.cmp(b))
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn accented(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn case_ranks(s: &str) -> impl Iterator<Item = u8> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| u8::from(c.is_uppercase()))
}
