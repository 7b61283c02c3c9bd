//! Ingredient list normalization.
//!
//! Free-text ingredient lists are canonicalized into a deduplicated,
//! lexicographically sorted, lowercase token list joined with `", "`.
//! Normalization is idempotent: applying it to an already-canonical string
//! returns the identical string.

use std::collections::BTreeSet;

/// Separator used for the canonical storage form.
const CANONICAL_SEPARATOR: &str = ", ";

/// Canonicalizes a comma-separated ingredient list.
pub fn normalize(raw: &str) -> String {
    ingredient_set(raw)
        .into_iter()
        .collect::<Vec<_>>()
        .join(CANONICAL_SEPARATOR)
}

/// Canonicalizes an ingredient list that may also use newlines or semicolons
/// as separators.
///
/// Only the bulk maintenance path accepts the extra separators; the
/// per-recipe path splits on commas alone.
pub fn normalize_relaxed(raw: &str) -> String {
    normalize(&raw.replace(['\n', ';'], ","))
}

/// Splits a comma-separated ingredient list into its normalized token set:
/// trimmed, lowercased, empty pieces dropped.
pub fn ingredient_set(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|piece| piece.trim().to_lowercase())
        .filter(|piece| !piece.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_sorts_dedupes_and_lowercases() {
        assert_eq!(
            normalize("Tomato, onion ,GARLIC, tomato"),
            "garlic, onion, tomato"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize("Basil, olive oil,  salt");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_normalize_drops_empty_pieces() {
        assert_eq!(normalize(",, tomato, ,"), "tomato");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_relaxed_accepts_newlines_and_semicolons() {
        assert_eq!(
            normalize_relaxed("tomato\nonion; garlic"),
            "garlic, onion, tomato"
        );
    }

    #[test]
    fn test_plain_normalize_splits_on_commas_only() {
        // A newline is not a separator outside the bulk path; the whole
        // string stays one token.
        assert_eq!(normalize("tomato\nonion"), "tomato\nonion");
    }

    #[test]
    fn test_ingredient_set() {
        let set = ingredient_set("Tomato , onion, tomato");
        assert_eq!(set.len(), 2);
        assert!(set.contains("tomato"));
        assert!(set.contains("onion"));
    }
}
