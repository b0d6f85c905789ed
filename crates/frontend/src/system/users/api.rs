use contracts::system::users::{
    BulkDeleteRequest, BulkDeleteResponse, ChangePasswordDto, CreateUserDto, UpdateUserDto, User,
};
use gloo_net::http::{Request, Response};

use crate::shared::api_utils::{api_url, status_message};
use crate::system::auth::storage;

fn get_auth_header() -> Result<String, String> {
    storage::get_access_token()
        .map(|token| format!("Bearer {}", token))
        .ok_or_else(|| "Not authenticated".to_string())
}

fn ensure_ok(action: &str, response: &Response) -> Result<(), String> {
    if response.ok() {
        Ok(())
    } else {
        Err(status_message(action, response.status()))
    }
}

/// Fetch the user directory
pub async fn fetch_users() -> Result<Vec<User>, String> {
    let response = Request::get(&api_url("/api/system/users"))
        .header("Authorization", &get_auth_header()?)
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    ensure_ok("Load users", &response)?;

    response
        .json::<Vec<User>>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn fetch_user(id: &str) -> Result<User, String> {
    let response = Request::get(&api_url(&format!("/api/system/users/{}", id)))
        .header("Authorization", &get_auth_header()?)
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    ensure_ok("Load user", &response)?;

    response
        .json::<User>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Create new user, returns its id
pub async fn create_user(dto: CreateUserDto) -> Result<String, String> {
    let response = Request::post(&api_url("/api/system/users"))
        .header("Authorization", &get_auth_header()?)
        .json(&dto)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    ensure_ok("Create user", &response)?;

    let result: serde_json::Value = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    result["id"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| "Response has no user id".to_string())
}

pub async fn update_user(dto: UpdateUserDto) -> Result<(), String> {
    let response = Request::put(&api_url(&format!("/api/system/users/{}", dto.id)))
        .header("Authorization", &get_auth_header()?)
        .json(&dto)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    ensure_ok("Update user", &response)
}

pub async fn delete_user(id: &str) -> Result<(), String> {
    let response = Request::delete(&api_url(&format!("/api/system/users/{}", id)))
        .header("Authorization", &get_auth_header()?)
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    ensure_ok("Delete user", &response)
}

pub async fn bulk_delete_users(ids: Vec<String>) -> Result<BulkDeleteResponse, String> {
    let response = Request::post(&api_url("/api/system/users/bulk-delete"))
        .header("Authorization", &get_auth_header()?)
        .json(&BulkDeleteRequest { ids })
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    ensure_ok("Delete users", &response)?;

    response
        .json::<BulkDeleteResponse>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn change_password(dto: ChangePasswordDto) -> Result<(), String> {
    let response = Request::post(&api_url(&format!(
        "/api/system/users/{}/change-password",
        dto.user_id
    )))
    .header("Authorization", &get_auth_header()?)
    .json(&dto)
    .map_err(|e| format!("Failed to serialize request: {}", e))?
    .send()
    .await
    .map_err(|e| format!("Failed to send request: {}", e))?;

    ensure_ok("Change password", &response)
}
