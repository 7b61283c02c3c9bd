//! User matching strategies.
//!
//! A strategy decides, for a user's ingredient set and the pool of other
//! users' recipes, which recipe authors count as similar. Strategies are a
//! closed set of variants resolved by name through [`MatchStrategy::from_name`];
//! unrecognized names fall back to the default instead of failing.

use std::collections::{BTreeSet, HashSet};

use entities::Recipe;
use uuid::Uuid;

use crate::normalize::ingredient_set;

/// Number of shared ingredients required for a match by default.
pub const DEFAULT_MIN_COMMON_INGREDIENTS: usize = 2;

/// A substitutable similarity-matching algorithm.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchStrategy {
    /// Matches authors of recipes sharing at least `min_common` ingredients
    /// with the caller. A threshold of 0 matches every candidate author.
    IngredientOverlap { min_common: usize },
    /// Matches every author publishing in a category the caller's
    /// ingredients appear in (any recipe in the pool sharing at least one
    /// ingredient token contributes its category).
    CategoryOverlap,
    /// Union of ingredient overlap at threshold 1 and category overlap.
    /// The weights are accepted but currently unused; the result is a plain
    /// union, not a blend.
    Hybrid {
        ingredient_weight: f64,
        category_weight: f64,
    },
}

impl Default for MatchStrategy {
    fn default() -> Self {
        Self::IngredientOverlap {
            min_common: DEFAULT_MIN_COMMON_INGREDIENTS,
        }
    }
}

impl MatchStrategy {
    /// Resolves a strategy from its configured name.
    ///
    /// `min_common` applies to the ingredient-overlap strategy only. Unknown
    /// names yield the default strategy with the default threshold.
    pub fn from_name(name: &str, min_common: usize) -> Self {
        match name {
            "ingredient_overlap" => Self::IngredientOverlap { min_common },
            "category_matching" => Self::CategoryOverlap,
            "hybrid" => Self::Hybrid {
                ingredient_weight: 0.7,
                category_weight: 0.3,
            },
            _ => Self::default(),
        }
    }

    /// Computes the set of similar user ids for the given ingredient set
    /// against the candidate recipes (the other users' recipes).
    pub fn find_similar_users(
        &self,
        own_ingredients: &BTreeSet<String>,
        candidates: &[Recipe],
    ) -> HashSet<Uuid> {
        match self {
            Self::IngredientOverlap { min_common } => {
                ingredient_overlap(own_ingredients, candidates, *min_common)
            }
            Self::CategoryOverlap => category_overlap(own_ingredients, candidates),
            Self::Hybrid { .. } => {
                let mut matched = ingredient_overlap(own_ingredients, candidates, 1);
                matched.extend(category_overlap(own_ingredients, candidates));
                matched
            }
        }
    }
}

/// Authors of candidate recipes whose ingredient sets share at least
/// `min_common` tokens with the caller's set.
fn ingredient_overlap(
    own_ingredients: &BTreeSet<String>,
    candidates: &[Recipe],
    min_common: usize,
) -> HashSet<Uuid> {
    let mut matched = HashSet::new();
    for recipe in candidates {
        let theirs = ingredient_set(&recipe.ingredients);
        let common = own_ingredients.intersection(&theirs).count();
        if common >= min_common {
            matched.insert(recipe.author_id);
        }
    }
    matched
}

/// Authors of candidate recipes in any category the caller's ingredients
/// appear in.
///
/// Ingredients are compared as normalized tokens, so "pea" does not match
/// "peanut".
fn category_overlap(own_ingredients: &BTreeSet<String>, candidates: &[Recipe]) -> HashSet<Uuid> {
    let shared_categories: HashSet<&str> = candidates
        .iter()
        .filter(|recipe| {
            let theirs = ingredient_set(&recipe.ingredients);
            own_ingredients.iter().any(|token| theirs.contains(token))
        })
        .map(|recipe| recipe.category.as_str())
        .collect();

    candidates
        .iter()
        .filter(|recipe| shared_categories.contains(recipe.category.as_str()))
        .map(|recipe| recipe.author_id)
        .collect()
}
