//! In-memory recipe store implementation for testing.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use entities::{Recipe, SimilarUser, User};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{RecipeFilter, RecipeStore, RecipeStoreError, RecipeStoreResult};

/// In-memory recipe store for testing purposes.
///
/// Similarity edges are keyed by their ordered (source, target) pair, which
/// makes duplicate inserts naturally idempotent.
#[derive(Debug, Default)]
pub struct MemoryRecipeStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    recipes: Arc<RwLock<HashMap<Uuid, Recipe>>>,
    edges: Arc<RwLock<HashMap<(Uuid, Uuid), SimilarUser>>>,
}

impl MemoryRecipeStore {
    /// Creates a new in-memory recipe store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: User) -> RecipeStoreResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(RecipeStoreError::already_exists("User", user.id.to_string()));
        }
        if users.values().any(|u| u.username == user.username) {
            return Err(RecipeStoreError::already_exists("User", user.username.clone()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> RecipeStoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> RecipeStoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn list_users(&self) -> RecipeStoreResult<Vec<User>> {
        let users = self.users.read().await;
        let mut result: Vec<User> = users.values().cloned().collect();
        result.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(result)
    }

    // =========================================================================
    // Recipe operations
    // =========================================================================

    async fn create_recipe(&self, recipe: Recipe) -> RecipeStoreResult<Recipe> {
        let mut recipes = self.recipes.write().await;
        if recipes.contains_key(&recipe.id) {
            return Err(RecipeStoreError::already_exists(
                "Recipe",
                recipe.id.to_string(),
            ));
        }
        recipes.insert(recipe.id, recipe.clone());
        Ok(recipe)
    }

    async fn get_recipe(&self, id: Uuid) -> RecipeStoreResult<Option<Recipe>> {
        let recipes = self.recipes.read().await;
        Ok(recipes.get(&id).cloned())
    }

    async fn list_recipes(&self, filter: RecipeFilter) -> RecipeStoreResult<Vec<Recipe>> {
        let recipes = self.recipes.read().await;
        let mut result: Vec<Recipe> = recipes
            .values()
            .filter(|r| {
                filter.author_id.is_none_or(|id| r.author_id == id)
                    && filter.exclude_author_id.is_none_or(|id| r.author_id != id)
                    && filter
                        .category
                        .as_ref()
                        .is_none_or(|category| &r.category == category)
            })
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn update_recipe(&self, recipe: Recipe) -> RecipeStoreResult<Recipe> {
        let mut recipes = self.recipes.write().await;
        if !recipes.contains_key(&recipe.id) {
            return Err(RecipeStoreError::not_found("Recipe", recipe.id.to_string()));
        }
        recipes.insert(recipe.id, recipe.clone());
        Ok(recipe)
    }

    async fn update_recipe_ingredients(
        &self,
        id: Uuid,
        ingredients: &str,
    ) -> RecipeStoreResult<()> {
        let mut recipes = self.recipes.write().await;
        let recipe = recipes
            .get_mut(&id)
            .ok_or_else(|| RecipeStoreError::not_found("Recipe", id.to_string()))?;
        recipe.ingredients = ingredients.to_string();
        recipe.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn delete_recipe(&self, id: Uuid) -> RecipeStoreResult<()> {
        let mut recipes = self.recipes.write().await;
        if recipes.remove(&id).is_none() {
            return Err(RecipeStoreError::not_found("Recipe", id.to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // Similarity edge operations
    // =========================================================================

    async fn replace_similar_users(
        &self,
        user_id: Uuid,
        similar_ids: &[Uuid],
    ) -> RecipeStoreResult<()> {
        let mut edges = self.edges.write().await;
        edges.retain(|(source, _), _| *source != user_id);
        for &similar_id in similar_ids {
            if similar_id == user_id {
                continue;
            }
            edges
                .entry((user_id, similar_id))
                .or_insert_with(|| SimilarUser::new(user_id, similar_id));
            edges
                .entry((similar_id, user_id))
                .or_insert_with(|| SimilarUser::new(similar_id, user_id));
        }
        Ok(())
    }

    async fn rebuild_similar_users(&self, pairs: &[(Uuid, Uuid)]) -> RecipeStoreResult<()> {
        let mut edges = self.edges.write().await;
        edges.clear();
        for &(a, b) in pairs {
            if a == b {
                continue;
            }
            edges
                .entry((a, b))
                .or_insert_with(|| SimilarUser::new(a, b));
            edges
                .entry((b, a))
                .or_insert_with(|| SimilarUser::new(b, a));
        }
        Ok(())
    }

    async fn similar_user_ids(&self, user_id: Uuid) -> RecipeStoreResult<Vec<Uuid>> {
        let edges = self.edges.read().await;
        let mut ids: Vec<Uuid> = edges
            .keys()
            .filter_map(|&(source, target)| {
                if source == user_id {
                    Some(target)
                } else if target == user_id {
                    Some(source)
                } else {
                    None
                }
            })
            .filter(|&id| id != user_id)
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn list_similarity_edges(&self) -> RecipeStoreResult<Vec<SimilarUser>> {
        let edges = self.edges.read().await;
        let mut result: Vec<SimilarUser> = edges.values().cloned().collect();
        result.sort_by(|a, b| (a.user_id, a.similar_user_id).cmp(&(b.user_id, b.similar_user_id)));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = MemoryRecipeStore::new();
        store.create_user(User::new("ana")).await.unwrap();

        let result = store.create_user(User::new("ana")).await;
        assert!(matches!(
            result,
            Err(RecipeStoreError::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn test_recipe_filters() {
        let store = MemoryRecipeStore::new();
        let ana = store.create_user(User::new("ana")).await.unwrap();
        let luis = store.create_user(User::new("luis")).await.unwrap();

        store
            .create_recipe(Recipe::new(ana.id, "Flan").with_category("Dessert"))
            .await
            .unwrap();
        store
            .create_recipe(Recipe::new(luis.id, "Paella").with_category("Lunch"))
            .await
            .unwrap();

        let by_ana = store
            .list_recipes(RecipeFilter::new().by_author(ana.id))
            .await
            .unwrap();
        assert_eq!(by_ana.len(), 1);
        assert_eq!(by_ana[0].title, "Flan");

        let not_ana = store
            .list_recipes(RecipeFilter::new().excluding_author(ana.id))
            .await
            .unwrap();
        assert_eq!(not_ana.len(), 1);
        assert_eq!(not_ana[0].title, "Paella");

        let desserts = store
            .list_recipes(RecipeFilter::new().in_category("Dessert"))
            .await
            .unwrap();
        assert_eq!(desserts.len(), 1);
    }

    #[tokio::test]
    async fn test_replace_inserts_mirrored_pairs() {
        let store = MemoryRecipeStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        store.replace_similar_users(a, &[b]).await.unwrap();

        assert_eq!(store.similar_user_ids(a).await.unwrap(), vec![b]);
        assert_eq!(store.similar_user_ids(b).await.unwrap(), vec![a]);
        assert_eq!(store.list_similarity_edges().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_replace_is_idempotent() {
        let store = MemoryRecipeStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        store.replace_similar_users(a, &[b]).await.unwrap();
        store.replace_similar_users(a, &[b]).await.unwrap();

        assert_eq!(store.list_similarity_edges().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_replace_keeps_other_users_edges() {
        let store = MemoryRecipeStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();

        store.replace_similar_users(c, &[a]).await.unwrap();
        store.replace_similar_users(a, &[b]).await.unwrap();

        // c's outbound edge to a survives a's rewrite.
        let neighbors_of_a = store.similar_user_ids(a).await.unwrap();
        assert!(neighbors_of_a.contains(&b));
        assert!(neighbors_of_a.contains(&c));
    }

    #[tokio::test]
    async fn test_self_edges_are_skipped() {
        let store = MemoryRecipeStore::new();
        let a = Uuid::new_v4();

        store.replace_similar_users(a, &[a]).await.unwrap();

        assert!(store.similar_user_ids(a).await.unwrap().is_empty());
        assert!(store.list_similarity_edges().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rebuild_wipes_previous_edges() {
        let store = MemoryRecipeStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();

        store.replace_similar_users(a, &[b]).await.unwrap();
        store.rebuild_similar_users(&[(b, c)]).await.unwrap();

        assert!(store.similar_user_ids(a).await.unwrap().is_empty());
        assert_eq!(store.similar_user_ids(b).await.unwrap(), vec![c]);
    }
}
