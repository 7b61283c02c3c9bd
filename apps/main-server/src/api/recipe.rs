//! Recipe API endpoints.
//!
//! Recipe create and update are the two triggers of the similarity
//! machinery: the ingredient list is canonicalized before storage and the
//! author's similarity edges are rewritten afterwards.

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use entities::Recipe;
use recipe_store::{RecipeFilter, RecipeStore};
use serde::{Deserialize, Serialize};
use similarity::normalize;
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Recipe representation returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRecipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub steps: String,
    pub category: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Converts an entity Recipe to its API representation.
fn to_api_recipe(recipe: &Recipe) -> ApiRecipe {
    ApiRecipe {
        id: recipe.id.to_string(),
        title: recipe.title.clone(),
        description: recipe.description.clone(),
        ingredients: recipe.ingredients.clone(),
        steps: recipe.steps.clone(),
        category: recipe.category.clone(),
        author_id: recipe.author_id.to_string(),
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
    }
}

fn parse_uuid(value: &str, field: &str) -> ServerResult<Uuid> {
    value
        .parse()
        .map_err(|_| ServerError::InvalidRequest(format!("Invalid {field}")))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecipeRequest {
    pub author_id: String,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Option<String>,
    pub steps: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecipeResponse {
    pub recipe: ApiRecipe,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRecipeRequest {
    pub recipe_id: String,
    pub author_id: String,
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub steps: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRecipeResponse {
    pub recipe: ApiRecipe,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRecipeRequest {
    pub recipe_id: String,
    pub author_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRecipeResponse {
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetRecipeRequest {
    pub recipe_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetRecipeResponse {
    pub recipe: ApiRecipe,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRecipesRequest {
    pub author_id: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRecipesResponse {
    pub recipes: Vec<ApiRecipe>,
}

/// Creates a recipe, canonicalizes its ingredient list and rewrites the
/// author's similarity edges.
pub async fn create_recipe<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<CreateRecipeRequest>,
) -> ServerResult<Json<CreateRecipeResponse>> {
    let author_id = parse_uuid(&request.author_id, "author_id")?;
    state
        .store
        .get_user(author_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Author not found".to_string()))?;

    if request.title.trim().is_empty() {
        return Err(ServerError::InvalidRequest(
            "title must not be empty".to_string(),
        ));
    }

    let mut recipe = Recipe::new(author_id, request.title.trim())
        .with_description(request.description.unwrap_or_default())
        .with_ingredients(normalize(&request.ingredients.unwrap_or_default()))
        .with_steps(request.steps.unwrap_or_default());
    if let Some(category) = request.category.filter(|c| !c.trim().is_empty()) {
        recipe = recipe.with_category(category);
    }

    let recipe = state.store.create_recipe(recipe).await?;
    let matched = state
        .reconciler
        .refresh_for_recipe(&state.store, &recipe)
        .await?;

    tracing::info!(
        recipe_id = %recipe.id,
        author_id = %recipe.author_id,
        matches = matched.len(),
        "Recipe created"
    );

    Ok(Json(CreateRecipeResponse {
        recipe: to_api_recipe(&recipe),
    }))
}

/// Updates a recipe owned by the requesting user, then rewrites the
/// author's similarity edges.
pub async fn update_recipe<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<UpdateRecipeRequest>,
) -> ServerResult<Json<UpdateRecipeResponse>> {
    let recipe_id = parse_uuid(&request.recipe_id, "recipe_id")?;
    let author_id = parse_uuid(&request.author_id, "author_id")?;

    let mut recipe = state
        .store
        .get_recipe(recipe_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Recipe not found".to_string()))?;

    if recipe.author_id != author_id {
        return Err(ServerError::PermissionDenied(
            "only the author can edit a recipe".to_string(),
        ));
    }

    recipe.title = request.title;
    recipe.description = request.description;
    recipe.ingredients = normalize(&request.ingredients);
    recipe.steps = request.steps;
    recipe.category = request.category;
    recipe.updated_at = Utc::now();

    let recipe = state.store.update_recipe(recipe).await?;
    let matched = state
        .reconciler
        .refresh_for_recipe(&state.store, &recipe)
        .await?;

    tracing::info!(
        recipe_id = %recipe.id,
        author_id = %recipe.author_id,
        matches = matched.len(),
        "Recipe updated"
    );

    Ok(Json(UpdateRecipeResponse {
        recipe: to_api_recipe(&recipe),
    }))
}

/// Deletes a recipe owned by the requesting user.
///
/// Similarity edges are not recomputed on delete; the next write or bulk
/// rebuild converges them.
pub async fn delete_recipe<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<DeleteRecipeRequest>,
) -> ServerResult<Json<DeleteRecipeResponse>> {
    let recipe_id = parse_uuid(&request.recipe_id, "recipe_id")?;
    let author_id = parse_uuid(&request.author_id, "author_id")?;

    let recipe = state
        .store
        .get_recipe(recipe_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Recipe not found".to_string()))?;

    if recipe.author_id != author_id {
        return Err(ServerError::PermissionDenied(
            "only the author can delete a recipe".to_string(),
        ));
    }

    state.store.delete_recipe(recipe_id).await?;

    tracing::info!(recipe_id = %recipe_id, "Recipe deleted");

    Ok(Json(DeleteRecipeResponse { deleted: true }))
}

/// Gets a recipe by ID.
pub async fn get_recipe<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<GetRecipeRequest>,
) -> ServerResult<Json<GetRecipeResponse>> {
    let recipe_id = parse_uuid(&request.recipe_id, "recipe_id")?;

    let recipe = state
        .store
        .get_recipe(recipe_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Recipe not found".to_string()))?;

    Ok(Json(GetRecipeResponse {
        recipe: to_api_recipe(&recipe),
    }))
}

/// Lists recipes, newest first, optionally filtered by author or category.
pub async fn list_recipes<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<ListRecipesRequest>,
) -> ServerResult<Json<ListRecipesResponse>> {
    let mut filter = RecipeFilter::new();
    if let Some(author_id) = &request.author_id {
        filter = filter.by_author(parse_uuid(author_id, "author_id")?);
    }
    if let Some(category) = &request.category {
        filter = filter.in_category(category.clone());
    }

    let recipes = state.store.list_recipes(filter).await?;

    Ok(Json(ListRecipesResponse {
        recipes: recipes.iter().map(to_api_recipe).collect(),
    }))
}
