//! User API endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use entities::User;
use recipe_store::RecipeStore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// User representation returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiUser {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Converts an entity User to its API representation.
pub(crate) fn to_api_user(user: &User) -> ApiUser {
    ApiUser {
        id: user.id.to_string(),
        username: user.username.clone(),
        created_at: user.created_at,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserResponse {
    pub user: ApiUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserResponse {
    pub user: ApiUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<ApiUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetSimilarUsersRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetSimilarUsersResponse {
    pub users: Vec<ApiUser>,
}

/// Registers a new user.
pub async fn register<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<RegisterUserRequest>,
) -> ServerResult<Json<RegisterUserResponse>> {
    let username = request.username.trim();
    if username.is_empty() {
        return Err(ServerError::InvalidRequest(
            "username must not be empty".to_string(),
        ));
    }

    let user = state.store.create_user(User::new(username)).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok(Json(RegisterUserResponse {
        user: to_api_user(&user),
    }))
}

/// Lists all users ordered by username.
pub async fn list_users<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<ListUsersResponse>> {
    let users = state.store.list_users().await?;

    Ok(Json(ListUsersResponse {
        users: users.iter().map(to_api_user).collect(),
    }))
}

/// Gets a user by ID.
pub async fn get_user<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<GetUserRequest>,
) -> ServerResult<Json<GetUserResponse>> {
    let user_id: Uuid = request
        .user_id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid user_id".to_string()))?;

    let user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    Ok(Json(GetUserResponse {
        user: to_api_user(&user),
    }))
}

/// Gets the users similar to the given user.
///
/// Edges are followed in both directions; the result never contains the
/// user itself and is empty when no edges exist.
pub async fn similar_users<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<GetSimilarUsersRequest>,
) -> ServerResult<Json<GetSimilarUsersResponse>> {
    let user_id: Uuid = request
        .user_id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid user_id".to_string()))?;

    state
        .store
        .get_user(user_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    let mut users = Vec::new();
    for similar_id in state.store.similar_user_ids(user_id).await? {
        if let Some(user) = state.store.get_user(similar_id).await? {
            users.push(user);
        }
    }
    users.sort_by(|a, b| a.username.cmp(&b.username));

    Ok(Json(GetSimilarUsersResponse {
        users: users.iter().map(to_api_user).collect(),
    }))
}
