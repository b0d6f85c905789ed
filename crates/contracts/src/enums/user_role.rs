use serde::{Deserialize, Serialize};

/// Account role. Wire/storage codes are `ADMIN`, `MANAGER`, `UTILIZATOR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Manager,
    Utilizator,
}

impl UserRole {
    /// Code stored in the database and sent over the wire
    pub fn code(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Manager => "MANAGER",
            UserRole::Utilizator => "UTILIZATOR",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            UserRole::Admin => "Administrator",
            UserRole::Manager => "Manager",
            UserRole::Utilizator => "Utilizator",
        }
    }

    /// All roles, most privileged first
    pub fn all() -> Vec<UserRole> {
        vec![UserRole::Admin, UserRole::Manager, UserRole::Utilizator]
    }

    /// Strict parse: anything except the exact codes is unrecognized.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ADMIN" => Some(UserRole::Admin),
            "MANAGER" => Some(UserRole::Manager),
            "UTILIZATOR" => Some(UserRole::Utilizator),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        for role in UserRole::all() {
            assert_eq!(UserRole::from_code(role.code()), Some(role));
        }
        assert_eq!(
            serde_json::to_string(&UserRole::Utilizator).unwrap(),
            "\"UTILIZATOR\""
        );
    }

    #[test]
    fn test_unknown_codes_rejected() {
        assert_eq!(UserRole::from_code("admin"), None);
        assert_eq!(UserRole::from_code(" ADMIN"), None);
        assert_eq!(UserRole::from_code(""), None);
        assert_eq!(UserRole::from_code("SUPERUSER"), None);
    }
}
