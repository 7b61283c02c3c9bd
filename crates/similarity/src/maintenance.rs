//! Bulk normalization and similarity rebuild.

use std::collections::BTreeSet;

use recipe_store::{RecipeFilter, RecipeStore, RecipeStoreResult};
use uuid::Uuid;

use crate::normalize::{ingredient_set, normalize_relaxed};

/// Shared-ingredient threshold used by the bulk rebuild.
const REBUILD_MIN_COMMON_INGREDIENTS: usize = 2;

/// Counters reported by [`rebuild_all`].
#[derive(Debug, Clone, Copy)]
pub struct RebuildSummary {
    /// Recipes examined.
    pub recipes: usize,
    /// Recipes whose ingredient text was rewritten.
    pub normalized: usize,
    /// User pairs linked after the rebuild.
    pub pairs: usize,
}

/// Re-normalizes every recipe's ingredient list and rebuilds the entire
/// similarity store from scratch.
///
/// Recipes written before canonicalization may separate ingredients with
/// newlines or semicolons, so the relaxed separator set is accepted here and
/// nowhere else. Matching is full pairwise intersection of each user's
/// combined ingredient set at a fixed threshold; every discovered pair is
/// stored in both directions, same as the per-recipe path. The wipe and
/// reinsert happen in one transaction, so no reader observes a
/// wiped-but-not-rebuilt store. Run this from the maintenance binary only,
/// never on the request path.
pub async fn rebuild_all(store: &dyn RecipeStore) -> RecipeStoreResult<RebuildSummary> {
    let recipes = store.list_recipes(RecipeFilter::new()).await?;
    let mut normalized = 0usize;
    for recipe in &recipes {
        let canonical = normalize_relaxed(&recipe.ingredients);
        if canonical != recipe.ingredients {
            store
                .update_recipe_ingredients(recipe.id, &canonical)
                .await?;
            normalized += 1;
        }
    }

    let users = store.list_users().await?;
    let mut ingredient_sets: Vec<(Uuid, BTreeSet<String>)> = Vec::new();
    for user in &users {
        let own = store
            .list_recipes(RecipeFilter::new().by_author(user.id))
            .await?;
        let mut set = BTreeSet::new();
        for recipe in &own {
            set.extend(ingredient_set(&recipe.ingredients));
        }
        if !set.is_empty() {
            ingredient_sets.push((user.id, set));
        }
    }

    let mut pairs: Vec<(Uuid, Uuid)> = Vec::new();
    for (i, (user_a, set_a)) in ingredient_sets.iter().enumerate() {
        for (user_b, set_b) in ingredient_sets.iter().skip(i + 1) {
            let common = set_a.intersection(set_b).count();
            if common >= REBUILD_MIN_COMMON_INGREDIENTS {
                pairs.push((*user_a, *user_b));
            }
        }
    }

    store.rebuild_similar_users(&pairs).await?;

    tracing::info!(
        recipes = recipes.len(),
        normalized,
        pairs = pairs.len(),
        "similarity store rebuilt"
    );

    Ok(RebuildSummary {
        recipes: recipes.len(),
        normalized,
        pairs: pairs.len(),
    })
}

#[cfg(test)]
mod tests {
    use entities::{Recipe, User};
    use recipe_store::MemoryRecipeStore;

    use super::*;

    async fn seed_user_with_recipe(
        store: &MemoryRecipeStore,
        username: &str,
        ingredients: &str,
    ) -> User {
        let user = store.create_user(User::new(username)).await.unwrap();
        store
            .create_recipe(Recipe::new(user.id, "test").with_ingredients(ingredients))
            .await
            .unwrap();
        user
    }

    fn edge_pairs(edges: &[entities::SimilarUser]) -> Vec<(Uuid, Uuid)> {
        edges
            .iter()
            .map(|e| (e.user_id, e.similar_user_id))
            .collect()
    }

    #[tokio::test]
    async fn test_rebuild_normalizes_with_relaxed_separators() {
        let store = MemoryRecipeStore::new();
        let ana = store.create_user(User::new("ana")).await.unwrap();
        let recipe = store
            .create_recipe(
                Recipe::new(ana.id, "stew").with_ingredients("Tomato\nOnion; Garlic"),
            )
            .await
            .unwrap();

        let summary = rebuild_all(&store).await.unwrap();

        assert_eq!(summary.normalized, 1);
        let stored = store.get_recipe(recipe.id).await.unwrap().unwrap();
        assert_eq!(stored.ingredients, "garlic, onion, tomato");
    }

    #[tokio::test]
    async fn test_rebuild_links_users_sharing_two_ingredients() {
        let store = MemoryRecipeStore::new();
        let ana = seed_user_with_recipe(&store, "ana", "tomato, onion, garlic").await;
        let luis = seed_user_with_recipe(&store, "luis", "tomato, onion, basil").await;
        seed_user_with_recipe(&store, "pepe", "chocolate, flour").await;

        let summary = rebuild_all(&store).await.unwrap();

        assert_eq!(summary.pairs, 1);
        assert_eq!(store.similar_user_ids(ana.id).await.unwrap(), vec![luis.id]);
        assert_eq!(store.similar_user_ids(luis.id).await.unwrap(), vec![ana.id]);
    }

    #[tokio::test]
    async fn test_rebuild_combines_ingredients_across_a_users_recipes() {
        let store = MemoryRecipeStore::new();
        let ana = store.create_user(User::new("ana")).await.unwrap();
        store
            .create_recipe(Recipe::new(ana.id, "one").with_ingredients("tomato"))
            .await
            .unwrap();
        store
            .create_recipe(Recipe::new(ana.id, "two").with_ingredients("onion"))
            .await
            .unwrap();
        let luis = seed_user_with_recipe(&store, "luis", "tomato, onion").await;

        rebuild_all(&store).await.unwrap();

        // No single recipe of Ana's shares two ingredients with Luis, but
        // her combined set does.
        assert_eq!(store.similar_user_ids(ana.id).await.unwrap(), vec![luis.id]);
    }

    #[tokio::test]
    async fn test_rebuild_produces_mirrored_pairs() {
        let store = MemoryRecipeStore::new();
        seed_user_with_recipe(&store, "ana", "tomato, onion").await;
        seed_user_with_recipe(&store, "luis", "tomato, onion").await;

        rebuild_all(&store).await.unwrap();

        let edges = store.list_similarity_edges().await.unwrap();
        let pairs = edge_pairs(&edges);
        assert_eq!(edges.len(), 2);
        for (a, b) in &pairs {
            assert!(pairs.contains(&(*b, *a)));
        }
    }

    #[tokio::test]
    async fn test_rebuild_twice_yields_identical_edge_set() {
        let store = MemoryRecipeStore::new();
        seed_user_with_recipe(&store, "ana", "tomato, onion, garlic").await;
        seed_user_with_recipe(&store, "luis", "tomato, onion").await;
        seed_user_with_recipe(&store, "pepe", "onion, garlic, cumin").await;

        rebuild_all(&store).await.unwrap();
        let first = edge_pairs(&store.list_similarity_edges().await.unwrap());

        rebuild_all(&store).await.unwrap();
        let second = edge_pairs(&store.list_similarity_edges().await.unwrap());

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_rebuild_drops_edges_for_users_without_overlap() {
        let store = MemoryRecipeStore::new();
        let ana = seed_user_with_recipe(&store, "ana", "tomato, onion").await;
        let luis = seed_user_with_recipe(&store, "luis", "chocolate, flour").await;

        // A stale pair left over from earlier writes.
        store.replace_similar_users(ana.id, &[luis.id]).await.unwrap();

        rebuild_all(&store).await.unwrap();

        assert!(store.similar_user_ids(ana.id).await.unwrap().is_empty());
        assert!(store.similar_user_ids(luis.id).await.unwrap().is_empty());
    }
}
