//! Pattern building for case-insensitive substring search.
//!
//! Search terms are matched with SQL `ILIKE`. The LIKE metacharacters `%`
//! and `_` (and the escape character `\` itself) are escaped so a caller's
//! term always matches as a literal substring.

/// Escape character used in the generated pattern. Queries must declare it
/// with `ESCAPE '\'`.
pub const LIKE_ESCAPE: char = '\\';

/// Escape LIKE metacharacters in `term`.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

/// Build a "contains" pattern: `%<escaped term>%`.
pub fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_term_is_wrapped() {
        assert_eq!(contains_pattern("flu"), "%flu%");
    }

    #[test]
    fn wildcards_are_escaped() {
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
    }

    #[test]
    fn backslash_is_escaped() {
        assert_eq!(escape_like("c:\\temp"), "c:\\\\temp");
    }

    #[test]
    fn unicode_passes_through() {
        assert_eq!(escape_like("fièvre"), "fièvre");
    }
}
