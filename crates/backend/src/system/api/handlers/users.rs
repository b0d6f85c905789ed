use axum::{
    extract::{Json, Path},
    http::StatusCode,
};
use contracts::system::users::{
    BulkDeleteRequest, BulkDeleteResponse, ChangePasswordDto, CreateUserDto, UpdateUserDto, User,
};

use super::{connection, reject};
use crate::system::auth::extractor::CurrentUser;
use crate::system::users::service;

/// List all users (staff only)
pub async fn list(CurrentUser(claims): CurrentUser) -> Result<Json<Vec<User>>, StatusCode> {
    let users = service::list_visible(connection()?, &claims.sub)
        .await
        .map_err(|e| reject("list users", e))?;

    Ok(Json(users))
}

/// Get user by ID (staff, or the user themselves)
pub async fn get_by_id(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<User>, StatusCode> {
    let user = service::get_visible(connection()?, &claims.sub, &id)
        .await
        .map_err(|e| reject("get user", e))?;

    Ok(Json(user))
}

pub async fn create(
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<CreateUserDto>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let user_id = service::create(connection()?, &claims.sub, dto)
        .await
        .map_err(|e| reject("create user", e))?;

    Ok(Json(serde_json::json!({"id": user_id})))
}

pub async fn update(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(mut dto): Json<UpdateUserDto>,
) -> Result<StatusCode, StatusCode> {
    // Ensure ID matches
    dto.id = id;

    service::update(connection()?, &claims.sub, dto)
        .await
        .map_err(|e| reject("update user", e))?;

    Ok(StatusCode::OK)
}

pub async fn delete(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    service::delete(connection()?, &claims.sub, &id)
        .await
        .map_err(|e| reject("delete user", e))?;

    Ok(StatusCode::OK)
}

pub async fn bulk_delete(
    CurrentUser(claims): CurrentUser,
    Json(request): Json<BulkDeleteRequest>,
) -> Result<Json<BulkDeleteResponse>, StatusCode> {
    let result = service::bulk_delete(connection()?, &claims.sub, &request.ids)
        .await
        .map_err(|e| reject("bulk delete users", e))?;

    Ok(Json(result))
}

pub async fn change_password(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(mut dto): Json<ChangePasswordDto>,
) -> Result<StatusCode, StatusCode> {
    // Ensure user_id matches
    dto.user_id = id;

    service::change_password(connection()?, &claims.sub, dto)
        .await
        .map_err(|e| reject("change password", e))?;

    Ok(StatusCode::OK)
}
