//! User management with the access policy enforced on every mutation.
//!
//! The requester is re-loaded from storage on each call, so a role change or
//! deactivation takes effect before the requester's access token expires.

use chrono::Utc;
use contracts::enums::user_role::UserRole;
use contracts::system::access::{Actor, Target};
use contracts::system::users::{
    BulkDeleteResponse, ChangePasswordDto, CreateUserDto, UpdateUserDto, User,
};
use sea_orm::DatabaseConnection;

use super::error::{ServiceResult, UserServiceError};
use super::repository;
use crate::system::auth::{password, refresh_tokens};

/// Lowercased, trimmed email; rejects obviously malformed input
pub fn normalize_email(email: &str) -> ServiceResult<String> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(email)
        }
        _ => Err(UserServiceError::validation("Invalid email format")),
    }
}

fn clean_full_name(full_name: Option<String>) -> Option<String> {
    full_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Policy view of a stored account; unknown role codes yield no target
fn target_of(user: &User) -> ServiceResult<Target> {
    user.as_target().ok_or_else(|| {
        tracing::warn!("User {} has unknown role {:?}", user.id, user.role);
        UserServiceError::Forbidden
    })
}

/// Current state of the requester as a policy actor
pub async fn resolve_actor(conn: &DatabaseConnection, requester_id: &str) -> ServiceResult<Actor> {
    let requester = repository::get_by_id(conn, requester_id)
        .await?
        .ok_or(UserServiceError::Forbidden)?;
    if !requester.is_active {
        return Err(UserServiceError::Forbidden);
    }
    Actor::parse(&requester.email, &requester.role).ok_or(UserServiceError::Forbidden)
}

pub fn authorize_create(actor: &Actor, role: UserRole) -> ServiceResult<()> {
    if actor.can_create(role) {
        Ok(())
    } else {
        Err(UserServiceError::Forbidden)
    }
}

/// Edit rules on top of `can_edit`: nobody changes their own role or
/// deactivates themselves, and a role change must land on a role the actor
/// could have created.
pub fn authorize_update(
    actor: &Actor,
    target: &Target,
    new_role: UserRole,
    is_active: bool,
) -> ServiceResult<()> {
    if !actor.can_edit(target) {
        return Err(UserServiceError::Forbidden);
    }
    if actor.is_self(target) {
        if new_role != target.role {
            return Err(UserServiceError::Forbidden);
        }
        if !is_active {
            return Err(UserServiceError::validation(
                "You cannot deactivate your own account",
            ));
        }
        return Ok(());
    }
    if new_role != target.role && !actor.can_create(new_role) {
        return Err(UserServiceError::Forbidden);
    }
    Ok(())
}

pub fn authorize_delete(actor: &Actor, target: &Target) -> ServiceResult<()> {
    if actor.can_delete(target) {
        Ok(())
    } else {
        Err(UserServiceError::Forbidden)
    }
}

async fn insert_user(
    conn: &DatabaseConnection,
    dto: CreateUserDto,
    created_by: Option<String>,
) -> ServiceResult<String> {
    let email = normalize_email(&dto.email)?;

    if repository::get_by_email(conn, &email).await?.is_some() {
        return Err(UserServiceError::Conflict);
    }

    password::validate_password_strength(&dto.password)
        .map_err(|e| UserServiceError::validation(e.to_string()))?;
    let password_hash = password::hash_password(&dto.password)?;

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let user = User {
        id: user_id.clone(),
        email,
        full_name: clean_full_name(dto.full_name),
        role: dto.role.code().to_string(),
        is_active: true,
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
        created_by,
    };

    repository::create_with_password(conn, &user, &password_hash).await?;

    Ok(user_id)
}

/// Create a new user on behalf of `requester_id`
pub async fn create(
    conn: &DatabaseConnection,
    requester_id: &str,
    dto: CreateUserDto,
) -> ServiceResult<String> {
    let actor = resolve_actor(conn, requester_id).await?;
    authorize_create(&actor, dto.role)?;

    let role = dto.role;
    let user_id = insert_user(conn, dto, Some(requester_id.to_string())).await?;
    tracing::info!("{} created user {} with role {}", actor.email, user_id, role);
    Ok(user_id)
}

/// Seed the first administrator; bypasses the policy since there is no actor yet
pub async fn create_initial_admin(
    conn: &DatabaseConnection,
    email: &str,
    password: &str,
) -> ServiceResult<String> {
    let dto = CreateUserDto {
        email: email.to_string(),
        password: password.to_string(),
        full_name: Some("Administrator".to_string()),
        role: UserRole::Admin,
    };
    insert_user(conn, dto, None).await
}

pub async fn update(
    conn: &DatabaseConnection,
    requester_id: &str,
    dto: UpdateUserDto,
) -> ServiceResult<()> {
    let actor = resolve_actor(conn, requester_id).await?;
    let mut user = repository::get_by_id(conn, &dto.id)
        .await?
        .ok_or(UserServiceError::NotFound)?;
    let target = target_of(&user)?;

    authorize_update(&actor, &target, dto.role, dto.is_active)?;

    let deactivated = user.is_active && !dto.is_active;

    user.full_name = clean_full_name(dto.full_name);
    user.role = dto.role.code().to_string();
    user.is_active = dto.is_active;
    user.updated_at = Utc::now().to_rfc3339();

    repository::update(conn, &user).await?;

    if deactivated {
        refresh_tokens::revoke_all_for_user(conn, &user.id).await?;
    }
    Ok(())
}

pub async fn delete(conn: &DatabaseConnection, requester_id: &str, id: &str) -> ServiceResult<()> {
    let actor = resolve_actor(conn, requester_id).await?;
    let user = repository::get_by_id(conn, id)
        .await?
        .ok_or(UserServiceError::NotFound)?;
    authorize_delete(&actor, &target_of(&user)?)?;

    if !repository::delete(conn, id).await? {
        return Err(UserServiceError::NotFound);
    }
    tracing::info!("{} deleted user {} ({})", actor.email, user.id, user.email);
    Ok(())
}

/// Delete every listed account the requester may delete; the rest are skipped
pub async fn bulk_delete(
    conn: &DatabaseConnection,
    requester_id: &str,
    ids: &[String],
) -> ServiceResult<BulkDeleteResponse> {
    let actor = resolve_actor(conn, requester_id).await?;
    let mut result = BulkDeleteResponse::default();

    for id in ids {
        let allowed = match repository::get_by_id(conn, id).await? {
            Some(user) => target_of(&user)
                .map(|target| actor.can_delete(&target))
                .unwrap_or(false),
            None => false,
        };

        if allowed && repository::delete(conn, id).await? {
            result.deleted += 1;
        } else {
            result.skipped += 1;
        }
    }

    tracing::info!(
        "{} bulk delete: {} deleted, {} skipped",
        actor.email,
        result.deleted,
        result.skipped
    );
    Ok(result)
}

/// Staff may read any account; everyone else only their own
pub async fn get_visible(
    conn: &DatabaseConnection,
    requester_id: &str,
    id: &str,
) -> ServiceResult<User> {
    let actor = resolve_actor(conn, requester_id).await?;
    if requester_id != id && actor.assignable_roles().is_empty() {
        return Err(UserServiceError::Forbidden);
    }
    repository::get_by_id(conn, id)
        .await?
        .ok_or(UserServiceError::NotFound)
}

pub async fn get_by_id(conn: &DatabaseConnection, id: &str) -> ServiceResult<Option<User>> {
    Ok(repository::get_by_id(conn, id).await?)
}

/// Full directory for staff, checked against the requester's stored role
/// rather than the one in their token
pub async fn list_visible(conn: &DatabaseConnection, requester_id: &str) -> ServiceResult<Vec<User>> {
    let actor = resolve_actor(conn, requester_id).await?;
    if actor.assignable_roles().is_empty() {
        return Err(UserServiceError::Forbidden);
    }
    Ok(repository::list_all(conn).await?)
}

/// Change a password. Allowed wherever editing the account is allowed;
/// changing your own password requires the old one.
pub async fn change_password(
    conn: &DatabaseConnection,
    requester_id: &str,
    dto: ChangePasswordDto,
) -> ServiceResult<()> {
    let actor = resolve_actor(conn, requester_id).await?;
    let user = repository::get_by_id(conn, &dto.user_id)
        .await?
        .ok_or(UserServiceError::NotFound)?;
    let target = target_of(&user)?;

    if !actor.can_edit(&target) {
        return Err(UserServiceError::Forbidden);
    }

    if actor.is_self(&target) {
        let old_password = dto
            .old_password
            .as_deref()
            .ok_or_else(|| UserServiceError::validation("Old password is required"))?;
        let current_hash = repository::get_password_hash(conn, &user.id)
            .await?
            .ok_or(UserServiceError::NotFound)?;
        if !password::verify_password(old_password, &current_hash)? {
            return Err(UserServiceError::validation("Invalid old password"));
        }
    }

    password::validate_password_strength(&dto.new_password)
        .map_err(|e| UserServiceError::validation(e.to_string()))?;
    let new_hash = password::hash_password(&dto.new_password)?;

    repository::update_password(conn, &user.id, &new_hash).await?;

    Ok(())
}

/// Verify user credentials (for login)
pub async fn verify_credentials(
    conn: &DatabaseConnection,
    email: &str,
    password: &str,
) -> ServiceResult<Option<User>> {
    let user = match repository::get_by_email(conn, email).await? {
        Some(u) => u,
        None => return Ok(None),
    };

    let password_hash = repository::get_password_hash(conn, &user.id)
        .await?
        .ok_or(UserServiceError::NotFound)?;

    if !password::verify_password(password, &password_hash)? {
        return Ok(None);
    }

    if !user.is_active {
        return Err(UserServiceError::Forbidden);
    }

    if let Err(e) = repository::update_last_login(conn, &user.id).await {
        tracing::warn!("Failed to record login for {}: {}", user.id, e);
    }

    Ok(Some(user))
}
