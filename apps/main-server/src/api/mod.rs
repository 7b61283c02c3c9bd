//! API endpoints.

pub mod recipe;
pub mod user;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use recipe_store::RecipeStore;

use crate::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router<S: RecipeStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        // User endpoints
        .route("/api/user/register", post(user::register))
        .route("/api/user/list", post(user::list_users))
        .route("/api/user/get", post(user::get_user))
        .route("/api/user/similar", post(user::similar_users))
        // Recipe endpoints
        .route("/api/recipe/create", post(recipe::create_recipe))
        .route("/api/recipe/update", post(recipe::update_recipe))
        .route("/api/recipe/delete", post(recipe::delete_recipe))
        .route("/api/recipe/get", post(recipe::get_recipe))
        .route("/api/recipe/list", post(recipe::list_recipes))
        // Health check
        .route("/health", get(health_check))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
