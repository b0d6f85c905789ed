use serde::{Deserialize, Serialize};

use super::access::Target;
use crate::enums::user_role::UserRole;

/// User account as returned by the directory.
/// `role` stays a raw code so one unknown value cannot break a whole listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
    pub last_login_at: Option<String>,
    pub created_by: Option<String>,
}

impl User {
    /// Parsed role, `None` for unrecognized codes
    pub fn role(&self) -> Option<UserRole> {
        UserRole::from_code(&self.role)
    }

    pub fn as_target(&self) -> Option<Target> {
        Target::parse(&self.email, &self.role)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserDto {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserDto {
    pub id: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordDto {
    pub user_id: String,
    pub old_password: Option<String>, // required only when changing your own password
    pub new_password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDeleteResponse {
    pub deleted: usize,
    pub skipped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> User {
        User {
            id: "1".into(),
            email: "mgr@co".into(),
            full_name: None,
            role: role.into(),
            is_active: true,
            created_at: "2024-01-01T00:00:00Z".into(),
            updated_at: "2024-01-01T00:00:00Z".into(),
            last_login_at: None,
            created_by: None,
        }
    }

    #[test]
    fn test_known_role_becomes_target() {
        let target = user("MANAGER").as_target().unwrap();
        assert_eq!(target.role, UserRole::Manager);
        assert_eq!(target.email, "mgr@co");
    }

    #[test]
    fn test_unknown_role_has_no_target() {
        assert!(user("OWNER").role().is_none());
        assert!(user("OWNER").as_target().is_none());
    }

    #[test]
    fn test_create_dto_role_on_wire() {
        let json = r#"{"email":"u@co","password":"secret123","full_name":null,"role":"UTILIZATOR"}"#;
        let dto: CreateUserDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.role, UserRole::Utilizator);
        assert!(serde_json::from_str::<CreateUserDto>(&json.replace("UTILIZATOR", "ROOT")).is_err());
    }
}
