//! Similarity edge reconciliation.
//!
//! Every recipe create or edit triggers a full recompute of the author's
//! outbound similarity edges against the freshly written ingredient list.

use entities::Recipe;
use recipe_store::{RecipeFilter, RecipeStore, RecipeStoreResult};
use uuid::Uuid;

use crate::normalize::ingredient_set;
use crate::strategy::MatchStrategy;

/// Rewrites a user's similarity edges after a recipe write.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    strategy: MatchStrategy,
}

impl Reconciler {
    /// Creates a reconciler running the given strategy.
    pub fn new(strategy: MatchStrategy) -> Self {
        Self { strategy }
    }

    /// Recomputes the author's similarity neighborhood from the written
    /// recipe and replaces the stored edges with the result.
    ///
    /// Candidates are every other user's recipes. The store rewrites the
    /// author's outbound edges and the mirrors in one transaction, so a
    /// failed recompute never leaves the author with a half-deleted edge
    /// set. Mirror edges previously inserted on behalf of other users are
    /// owned by those users' outbound sets and are left alone.
    pub async fn refresh_for_recipe(
        &self,
        store: &dyn RecipeStore,
        recipe: &Recipe,
    ) -> RecipeStoreResult<Vec<Uuid>> {
        let own_ingredients = ingredient_set(&recipe.ingredients);
        let candidates = store
            .list_recipes(RecipeFilter::new().excluding_author(recipe.author_id))
            .await?;

        let mut matched: Vec<Uuid> = self
            .strategy
            .find_similar_users(&own_ingredients, &candidates)
            .into_iter()
            .filter(|&id| id != recipe.author_id)
            .collect();
        matched.sort();

        store
            .replace_similar_users(recipe.author_id, &matched)
            .await?;

        tracing::debug!(
            author_id = %recipe.author_id,
            matches = matched.len(),
            "similarity edges rewritten"
        );
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use entities::User;
    use recipe_store::MemoryRecipeStore;

    use super::*;

    async fn seed_user_with_recipe(
        store: &MemoryRecipeStore,
        username: &str,
        ingredients: &str,
    ) -> (User, Recipe) {
        let user = store.create_user(User::new(username)).await.unwrap();
        let recipe = store
            .create_recipe(Recipe::new(user.id, "test").with_ingredients(ingredients))
            .await
            .unwrap();
        (user, recipe)
    }

    #[tokio::test]
    async fn test_matching_users_become_mutually_linked() {
        let store = MemoryRecipeStore::new();
        let (luis, _) = seed_user_with_recipe(&store, "luis", "tomato , onion , basil").await;
        let (ana, recipe) =
            seed_user_with_recipe(&store, "ana", "Tomato, Onion, Garlic").await;

        let reconciler = Reconciler::default();
        let matched = reconciler.refresh_for_recipe(&store, &recipe).await.unwrap();

        assert_eq!(matched, vec![luis.id]);
        assert_eq!(store.similar_user_ids(ana.id).await.unwrap(), vec![luis.id]);
        assert_eq!(store.similar_user_ids(luis.id).await.unwrap(), vec![ana.id]);
    }

    #[tokio::test]
    async fn test_single_shared_ingredient_links_only_at_threshold_one() {
        let store = MemoryRecipeStore::new();
        let (luis, _) = seed_user_with_recipe(&store, "luis", "tomato, basil").await;
        let (ana, recipe) =
            seed_user_with_recipe(&store, "ana", "Tomato, Onion, Garlic").await;

        let matched = Reconciler::default()
            .refresh_for_recipe(&store, &recipe)
            .await
            .unwrap();
        assert!(matched.is_empty());
        assert!(store.similar_user_ids(ana.id).await.unwrap().is_empty());

        let matched = Reconciler::new(MatchStrategy::IngredientOverlap { min_common: 1 })
            .refresh_for_recipe(&store, &recipe)
            .await
            .unwrap();
        assert_eq!(matched, vec![luis.id]);
    }

    #[tokio::test]
    async fn test_refresh_twice_leaves_edge_count_unchanged() {
        let store = MemoryRecipeStore::new();
        seed_user_with_recipe(&store, "luis", "tomato, onion, basil").await;
        let (_, recipe) = seed_user_with_recipe(&store, "ana", "tomato, onion").await;

        let reconciler = Reconciler::default();
        reconciler.refresh_for_recipe(&store, &recipe).await.unwrap();
        let edges_after_first = store.list_similarity_edges().await.unwrap().len();

        reconciler.refresh_for_recipe(&store, &recipe).await.unwrap();
        let edges_after_second = store.list_similarity_edges().await.unwrap().len();

        assert_eq!(edges_after_first, edges_after_second);
    }

    #[tokio::test]
    async fn test_refresh_replaces_outbound_edges_but_not_mirrors() {
        let store = MemoryRecipeStore::new();
        let (luis, _) = seed_user_with_recipe(&store, "luis", "tomato, onion").await;
        let (ana, recipe) = seed_user_with_recipe(&store, "ana", "tomato, onion").await;

        let reconciler = Reconciler::default();
        reconciler.refresh_for_recipe(&store, &recipe).await.unwrap();

        // Ana rewrites her recipe so nothing overlaps anymore.
        let mut edited = recipe.clone();
        edited.ingredients = "rice, beans".to_string();
        store.update_recipe(edited.clone()).await.unwrap();
        reconciler.refresh_for_recipe(&store, &edited).await.unwrap();

        // Her outbound edge is gone, but the mirror belongs to Luis's
        // outbound set and stays until Luis reconciles or a bulk rebuild
        // runs — so the lookup still reports the pair in both directions.
        let edges = store.list_similarity_edges().await.unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].user_id, luis.id);
        assert_eq!(store.similar_user_ids(ana.id).await.unwrap(), vec![luis.id]);
    }

    #[tokio::test]
    async fn test_no_overlap_yields_empty_neighborhood() {
        let store = MemoryRecipeStore::new();
        seed_user_with_recipe(&store, "luis", "chocolate, flour").await;
        let (ana, recipe) = seed_user_with_recipe(&store, "ana", "tomato, onion").await;

        let matched = Reconciler::default()
            .refresh_for_recipe(&store, &recipe)
            .await
            .unwrap();

        assert!(matched.is_empty());
        assert!(store.similar_user_ids(ana.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_author_never_appears_in_own_neighborhood() {
        let store = MemoryRecipeStore::new();
        let (ana, _) = seed_user_with_recipe(&store, "ana", "tomato, onion").await;
        // A second recipe by the same author with the same ingredients.
        let second = store
            .create_recipe(Recipe::new(ana.id, "again").with_ingredients("tomato, onion"))
            .await
            .unwrap();

        let matched = Reconciler::default()
            .refresh_for_recipe(&store, &second)
            .await
            .unwrap();

        assert!(matched.is_empty());
        assert!(store.similar_user_ids(ana.id).await.unwrap().is_empty());
    }
}
