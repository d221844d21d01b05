//! Chapter-name normalization

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normalize a chapter name into a URL-safe slug.
///
/// Trims, lowercases, strips diacritics, turns whitespace runs into single
/// hyphens and drops every remaining character outside `[a-z0-9-]`:
/// `"Suites Numériques"` becomes `"suites-numeriques"`.
///
/// Total and idempotent: slugifying a slug returns it unchanged, and the
/// result may be empty when the input has no usable characters.
pub fn slugify(chapter: &str) -> String {
    // NFD-decompose so accented letters split into base letter + mark
    let stripped: String = chapter
        .trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    let mut slug = String::with_capacity(stripped.len());
    let mut in_whitespace = false;
    for c in stripped.chars() {
        if c.is_whitespace() {
            in_whitespace = true;
            continue;
        }
        if in_whitespace {
            slug.push('-');
            in_whitespace = false;
        }
        if matches!(c, 'a'..='z' | '0'..='9' | '-') {
            slug.push(c);
        }
    }

    slug
}
