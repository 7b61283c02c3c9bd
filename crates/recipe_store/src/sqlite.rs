//! SQLite recipe store implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entities::{Recipe, SimilarUser, User};
use sqlx::{sqlite::SqlitePoolOptions, FromRow, Pool, Sqlite, Transaction};
use uuid::Uuid;

use crate::{RecipeFilter, RecipeStore, RecipeStoreError, RecipeStoreResult};

/// Schema statements executed on every open. All DDL is idempotent.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS recipes (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        ingredients TEXT NOT NULL,
        steps TEXT NOT NULL,
        category TEXT NOT NULL,
        author_id TEXT NOT NULL REFERENCES users(id),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_recipes_author ON recipes(author_id)",
    "CREATE INDEX IF NOT EXISTS idx_recipes_category ON recipes(category)",
    "CREATE TABLE IF NOT EXISTS similar_users (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id),
        similar_user_id TEXT NOT NULL REFERENCES users(id),
        UNIQUE(user_id, similar_user_id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_similar_users_target ON similar_users(similar_user_id)",
];

/// Database row for User.
#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    username: String,
    created_at: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: parse_id(&row.id),
            username: row.username,
            created_at: parse_timestamp(&row.created_at),
        }
    }
}

/// Database row for Recipe.
#[derive(Debug, FromRow)]
struct RecipeRow {
    id: String,
    title: String,
    description: String,
    ingredients: String,
    steps: String,
    category: String,
    author_id: String,
    created_at: String,
    updated_at: String,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Recipe {
            id: parse_id(&row.id),
            title: row.title,
            description: row.description,
            ingredients: row.ingredients,
            steps: row.steps,
            category: row.category,
            author_id: parse_id(&row.author_id),
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
        }
    }
}

/// Database row for SimilarUser.
#[derive(Debug, FromRow)]
struct SimilarUserRow {
    id: String,
    user_id: String,
    similar_user_id: String,
}

impl From<SimilarUserRow> for SimilarUser {
    fn from(row: SimilarUserRow) -> Self {
        SimilarUser {
            id: parse_id(&row.id),
            user_id: parse_id(&row.user_id),
            similar_user_id: parse_id(&row.similar_user_id),
        }
    }
}

fn parse_id(value: &str) -> Uuid {
    Uuid::parse_str(value).unwrap_or_default()
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Inserts one directed edge, ignoring an already-present ordered pair.
async fn insert_edge(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: Uuid,
    similar_user_id: Uuid,
) -> RecipeStoreResult<()> {
    sqlx::query(
        "INSERT OR IGNORE INTO similar_users (id, user_id, similar_user_id) VALUES (?, ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id.to_string())
    .bind(similar_user_id.to_string())
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// SQLite-backed recipe store.
pub struct SqliteRecipeStore {
    pool: Pool<Sqlite>,
}

impl SqliteRecipeStore {
    /// Connects to the database and creates the schema if missing.
    pub async fn connect(database_url: &str) -> RecipeStoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl RecipeStore for SqliteRecipeStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: User) -> RecipeStoreResult<User> {
        sqlx::query("INSERT INTO users (id, username, created_at) VALUES (?, ?, ?)")
            .bind(user.id.to_string())
            .bind(&user.username)
            .bind(user.created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db) = &e {
                    if db.is_unique_violation() {
                        return RecipeStoreError::already_exists(
                            "User",
                            user.username.clone(),
                        );
                    }
                }
                RecipeStoreError::Database(e)
            })?;
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> RecipeStoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, username, created_at FROM users WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(User::from))
    }

    async fn get_user_by_username(&self, username: &str) -> RecipeStoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, username, created_at FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(User::from))
    }

    async fn list_users(&self) -> RecipeStoreResult<Vec<User>> {
        let rows: Vec<UserRow> =
            sqlx::query_as("SELECT id, username, created_at FROM users ORDER BY username ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    // =========================================================================
    // Recipe operations
    // =========================================================================

    async fn create_recipe(&self, recipe: Recipe) -> RecipeStoreResult<Recipe> {
        sqlx::query(
            "INSERT INTO recipes (id, title, description, ingredients, steps, category, \
             author_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(recipe.id.to_string())
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(&recipe.ingredients)
        .bind(&recipe.steps)
        .bind(&recipe.category)
        .bind(recipe.author_id.to_string())
        .bind(recipe.created_at.to_rfc3339())
        .bind(recipe.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(recipe)
    }

    async fn get_recipe(&self, id: Uuid) -> RecipeStoreResult<Option<Recipe>> {
        let row: Option<RecipeRow> = sqlx::query_as(
            "SELECT id, title, description, ingredients, steps, category, author_id, \
             created_at, updated_at
             FROM recipes
             WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Recipe::from))
    }

    async fn list_recipes(&self, filter: RecipeFilter) -> RecipeStoreResult<Vec<Recipe>> {
        let mut sql = String::from(
            "SELECT id, title, description, ingredients, steps, category, author_id, \
             created_at, updated_at FROM recipes",
        );
        let mut clauses: Vec<&str> = Vec::new();
        if filter.author_id.is_some() {
            clauses.push("author_id = ?");
        }
        if filter.exclude_author_id.is_some() {
            clauses.push("author_id != ?");
        }
        if filter.category.is_some() {
            clauses.push("category = ?");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query_as::<_, RecipeRow>(&sql);
        if let Some(author_id) = filter.author_id {
            query = query.bind(author_id.to_string());
        }
        if let Some(exclude_author_id) = filter.exclude_author_id {
            query = query.bind(exclude_author_id.to_string());
        }
        if let Some(category) = filter.category {
            query = query.bind(category);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    async fn update_recipe(&self, recipe: Recipe) -> RecipeStoreResult<Recipe> {
        let result = sqlx::query(
            "UPDATE recipes
             SET title = ?, description = ?, ingredients = ?, steps = ?, category = ?, \
             updated_at = ?
             WHERE id = ?",
        )
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(&recipe.ingredients)
        .bind(&recipe.steps)
        .bind(&recipe.category)
        .bind(recipe.updated_at.to_rfc3339())
        .bind(recipe.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RecipeStoreError::not_found("Recipe", recipe.id.to_string()));
        }
        Ok(recipe)
    }

    async fn update_recipe_ingredients(
        &self,
        id: Uuid,
        ingredients: &str,
    ) -> RecipeStoreResult<()> {
        let result = sqlx::query("UPDATE recipes SET ingredients = ?, updated_at = ? WHERE id = ?")
            .bind(ingredients)
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RecipeStoreError::not_found("Recipe", id.to_string()));
        }
        Ok(())
    }

    async fn delete_recipe(&self, id: Uuid) -> RecipeStoreResult<()> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
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
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM similar_users WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await?;

        for &similar_id in similar_ids {
            if similar_id == user_id {
                continue;
            }
            insert_edge(&mut tx, user_id, similar_id).await?;
            insert_edge(&mut tx, similar_id, user_id).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn rebuild_similar_users(&self, pairs: &[(Uuid, Uuid)]) -> RecipeStoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM similar_users")
            .execute(&mut *tx)
            .await?;

        for &(a, b) in pairs {
            if a == b {
                continue;
            }
            insert_edge(&mut tx, a, b).await?;
            insert_edge(&mut tx, b, a).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn similar_user_ids(&self, user_id: Uuid) -> RecipeStoreResult<Vec<Uuid>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT similar_user_id FROM similar_users WHERE user_id = ?
             UNION
             SELECT user_id FROM similar_users WHERE similar_user_id = ?",
        )
        .bind(user_id.to_string())
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        let mut ids: Vec<Uuid> = rows
            .into_iter()
            .map(|(id,)| parse_id(&id))
            .filter(|&id| id != user_id)
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn list_similarity_edges(&self) -> RecipeStoreResult<Vec<SimilarUser>> {
        let rows: Vec<SimilarUserRow> = sqlx::query_as(
            "SELECT id, user_id, similar_user_id FROM similar_users \
             ORDER BY user_id, similar_user_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(SimilarUser::from).collect())
    }
}
