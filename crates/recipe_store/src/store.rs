//! Recipe store trait definitions.

use async_trait::async_trait;
use entities::{Recipe, SimilarUser, User};
use uuid::Uuid;

use crate::RecipeStoreResult;

/// Filter options for listing recipes.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    /// Only recipes by this author.
    pub author_id: Option<Uuid>,
    /// Only recipes NOT by this author.
    pub exclude_author_id: Option<Uuid>,
    /// Only recipes in this category.
    pub category: Option<String>,
}

impl RecipeFilter {
    /// Creates an empty filter matching every recipe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the filter to recipes by the given author.
    pub fn by_author(mut self, author_id: Uuid) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// Restricts the filter to recipes NOT by the given author.
    pub fn excluding_author(mut self, author_id: Uuid) -> Self {
        self.exclude_author_id = Some(author_id);
        self
    }

    /// Restricts the filter to recipes in the given category.
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Trait for recipe storage operations.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Creates a new user. Fails if the username is already taken.
    async fn create_user(&self, user: User) -> RecipeStoreResult<User>;

    /// Gets a user by ID.
    async fn get_user(&self, id: Uuid) -> RecipeStoreResult<Option<User>>;

    /// Gets a user by username.
    async fn get_user_by_username(&self, username: &str) -> RecipeStoreResult<Option<User>>;

    /// Lists all users ordered by username.
    async fn list_users(&self) -> RecipeStoreResult<Vec<User>>;

    // =========================================================================
    // Recipe operations
    // =========================================================================

    /// Creates a new recipe.
    async fn create_recipe(&self, recipe: Recipe) -> RecipeStoreResult<Recipe>;

    /// Gets a recipe by ID.
    async fn get_recipe(&self, id: Uuid) -> RecipeStoreResult<Option<Recipe>>;

    /// Lists recipes matching the filter, newest first.
    async fn list_recipes(&self, filter: RecipeFilter) -> RecipeStoreResult<Vec<Recipe>>;

    /// Updates a recipe.
    async fn update_recipe(&self, recipe: Recipe) -> RecipeStoreResult<Recipe>;

    /// Overwrites a recipe's ingredient list, leaving other fields untouched.
    async fn update_recipe_ingredients(
        &self,
        id: Uuid,
        ingredients: &str,
    ) -> RecipeStoreResult<()>;

    /// Deletes a recipe.
    async fn delete_recipe(&self, id: Uuid) -> RecipeStoreResult<()>;

    // =========================================================================
    // Similarity edge operations
    // =========================================================================
    //
    // The mirrored-pair invariant lives here and nowhere else: both write
    // operations insert each edge in both directions and tolerate a pair
    // that is already present.

    /// Atomically replaces a user's outbound similarity edges.
    ///
    /// Every existing edge from `user_id` is deleted, then for each id in
    /// `similar_ids` both (user, similar) and (similar, user) are inserted,
    /// skipping any ordered pair that already exists. Self ids are ignored.
    /// Other users' outbound edges are untouched.
    async fn replace_similar_users(
        &self,
        user_id: Uuid,
        similar_ids: &[Uuid],
    ) -> RecipeStoreResult<()>;

    /// Atomically wipes the entire edge table and inserts the given pairs,
    /// each in both directions. Self pairs are ignored.
    async fn rebuild_similar_users(&self, pairs: &[(Uuid, Uuid)]) -> RecipeStoreResult<()>;

    /// Returns the ids of users linked to `user_id` in either direction,
    /// deduplicated, never containing `user_id` itself, sorted for
    /// determinism. Empty when no edges exist.
    async fn similar_user_ids(&self, user_id: Uuid) -> RecipeStoreResult<Vec<Uuid>>;

    /// Lists every stored similarity edge.
    async fn list_similarity_edges(&self) -> RecipeStoreResult<Vec<SimilarUser>>;
}
