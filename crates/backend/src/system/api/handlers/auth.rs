use axum::{extract::Json, http::StatusCode};
use contracts::system::auth::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserInfo,
};
use contracts::system::users::User;

use super::{connection, reject};
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::{jwt, refresh_tokens};
use crate::system::users::service as user_service;

fn user_info(user: User) -> UserInfo {
    UserInfo {
        id: user.id,
        email: user.email,
        full_name: user.full_name,
        role: user.role,
    }
}

pub async fn login(Json(request): Json<LoginRequest>) -> Result<Json<LoginResponse>, StatusCode> {
    let conn = connection()?;

    let user = user_service::verify_credentials(conn, &request.email, &request.password)
        .await
        .map_err(|e| reject("log in", e))?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let access_token = jwt::generate_access_token(conn, &user.id, &user.email, &user.role)
        .await
        .map_err(|e| {
            tracing::error!("Failed to issue access token: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let refresh_token = jwt::generate_refresh_token();
    refresh_tokens::store(conn, &user.id, &refresh_token)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store refresh token: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    tracing::info!("User {} logged in", user.email);

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        user: user_info(user),
    }))
}

pub async fn refresh(
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, StatusCode> {
    let conn = connection()?;

    let user_id = refresh_tokens::validate(conn, &request.refresh_token)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let user = user_service::get_by_id(conn, &user_id)
        .await
        .map_err(|e| reject("refresh token", e))?
        .filter(|u| u.is_active)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // Role is read fresh, so a changed role shows up in the new token
    let access_token = jwt::generate_access_token(conn, &user.id, &user.email, &user.role)
        .await
        .map_err(|e| {
            tracing::error!("Failed to issue access token: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(RefreshResponse { access_token }))
}

pub async fn logout(Json(request): Json<RefreshRequest>) -> Result<StatusCode, StatusCode> {
    refresh_tokens::revoke(connection()?, &request.refresh_token)
        .await
        .map_err(|e| {
            tracing::error!("Failed to revoke refresh token: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(StatusCode::OK)
}

/// Get current user (protected by middleware)
pub async fn current_user(CurrentUser(claims): CurrentUser) -> Result<Json<UserInfo>, StatusCode> {
    let user = user_service::get_by_id(connection()?, &claims.sub)
        .await
        .map_err(|e| reject("load current user", e))?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(user_info(user)))
}
