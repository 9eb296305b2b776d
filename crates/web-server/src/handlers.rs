use crate::{
    error::AppError,
    extract::Payload,
    response::{ApiResponse, HealthStatus},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use core_types::{Post, PostPayload, User, UserPayload};
use std::sync::Arc;

const USER_NOT_FOUND: &str = "User not found";

type IdPath = WithRejection<Path<String>, AppError>;

/// Parses a user id from the path.
///
/// A whole number outside the `i32` range cannot name a stored user, so it
/// is not found rather than malformed. Only non-numbers are bad requests.
fn user_id(raw: &str) -> Result<i32, AppError> {
    if let Ok(id) = raw.parse::<i32>() {
        return Ok(id);
    }
    let digits = raw.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Err(AppError::NotFound(USER_NOT_FOUND))
    } else {
        Err(AppError::Validation("Invalid id".to_string()))
    }
}

/// # GET /api/health
/// Liveness only; does not touch the database.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        message: "Backend is running",
    })
}

/// # GET /api/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<User>>>, AppError> {
    let users = state.store.list_users().await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// # GET /api/users/:id
pub async fn get_user(
    WithRejection(Path(raw_id), _): IdPath,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let id = user_id(&raw_id)?;
    let user = state
        .store
        .get_user(id)
        .await?
        .ok_or(AppError::NotFound(USER_NOT_FOUND))?;
    Ok(Json(ApiResponse::ok(user)))
}

/// # POST /api/users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Payload(payload): Payload<UserPayload>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    let new_user = payload.validate()?;
    let user = state.store.create_user(&new_user).await?;
    tracing::info!(user_id = user.id, "User created.");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

/// # PUT /api/users/:id
/// Full overwrite of `name`, `email` and `age`, validated like a create.
pub async fn update_user(
    WithRejection(Path(raw_id), _): IdPath,
    State(state): State<Arc<AppState>>,
    Payload(payload): Payload<UserPayload>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let id = user_id(&raw_id)?;
    let changes = payload.validate()?;
    let user = state
        .store
        .update_user(id, &changes)
        .await?
        .ok_or(AppError::NotFound(USER_NOT_FOUND))?;
    tracing::info!(user_id = user.id, "User updated.");
    Ok(Json(ApiResponse::ok(user)))
}

/// # DELETE /api/users/:id
/// The user's posts are kept; their author becomes unresolved.
pub async fn delete_user(
    WithRejection(Path(raw_id), _): IdPath,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let id = user_id(&raw_id)?;
    if !state.store.delete_user(id).await? {
        return Err(AppError::NotFound(USER_NOT_FOUND));
    }
    tracing::info!(user_id = id, "User deleted.");
    Ok(Json(ApiResponse::message("User deleted successfully")))
}

/// # GET /api/posts
/// Newest first, each with the author's name or `null` if the author is gone.
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Post>>>, AppError> {
    let posts = state.store.list_posts().await?;
    Ok(Json(ApiResponse::ok(posts)))
}

/// # POST /api/posts
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Payload(payload): Payload<PostPayload>,
) -> Result<(StatusCode, Json<ApiResponse<Post>>), AppError> {
    let new_post = payload.validate()?;
    let post = state.store.create_post(&new_post).await?;
    tracing::info!(post_id = post.id, user_id = new_post.user_id, "Post created.");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(post))))
}

pub async fn route_not_found() -> (StatusCode, Json<ApiResponse<()>>) {
    (StatusCode::NOT_FOUND, Json(ApiResponse::error("Route not found")))
}

pub async fn method_not_allowed() -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ApiResponse::error("Method not allowed")),
    )
}
