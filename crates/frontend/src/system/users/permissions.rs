//! Which user-management controls to render for the current actor.
//! Unknown roles on either side render nothing.
use contracts::system::access::Actor;
use contracts::system::users::User;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowPermissions {
    pub can_edit: bool,
    pub can_delete: bool,
}

pub fn row_permissions(actor: Option<&Actor>, user: &User) -> RowPermissions {
    match (actor, user.as_target()) {
        (Some(actor), Some(target)) => RowPermissions {
            can_edit: actor.can_edit(&target),
            can_delete: actor.can_delete(&target),
        },
        _ => RowPermissions::default(),
    }
}

/// Whether the "New" button is shown at all
pub fn can_create_any(actor: Option<&Actor>) -> bool {
    actor.is_some_and(|a| !a.assignable_roles().is_empty())
}

/// Selected ids the actor may delete, in list order
pub fn deletable_ids(actor: Option<&Actor>, users: &[User], selected: &HashSet<String>) -> Vec<String> {
    users
        .iter()
        .filter(|u| selected.contains(&u.id))
        .filter(|u| row_permissions(actor, u).can_delete)
        .map(|u| u.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::enums::user_role::UserRole;

    fn user(id: &str, email: &str, role: &str) -> User {
        User {
            id: id.into(),
            email: email.into(),
            full_name: None,
            role: role.into(),
            is_active: true,
            created_at: String::new(),
            updated_at: String::new(),
            last_login_at: None,
            created_by: None,
        }
    }

    #[test]
    fn test_manager_rows() {
        let actor = Actor::new("mgr@co", UserRole::Manager);
        let me = row_permissions(Some(&actor), &user("1", "mgr@co", "MANAGER"));
        assert_eq!(me, RowPermissions { can_edit: true, can_delete: false });

        let peer = row_permissions(Some(&actor), &user("2", "mgr2@co", "MANAGER"));
        assert_eq!(peer, RowPermissions::default());

        let worker = row_permissions(Some(&actor), &user("3", "u@co", "UTILIZATOR"));
        assert_eq!(worker, RowPermissions { can_edit: true, can_delete: true });
    }

    #[test]
    fn test_unknown_role_row_is_locked() {
        let actor = Actor::new("admin@co", UserRole::Admin);
        assert_eq!(
            row_permissions(Some(&actor), &user("1", "x@co", "AUDITOR")),
            RowPermissions::default()
        );
        assert_eq!(
            row_permissions(None, &user("1", "x@co", "UTILIZATOR")),
            RowPermissions::default()
        );
    }

    #[test]
    fn test_can_create_any() {
        assert!(can_create_any(Some(&Actor::new("a@co", UserRole::Admin))));
        assert!(can_create_any(Some(&Actor::new("m@co", UserRole::Manager))));
        assert!(!can_create_any(Some(&Actor::new("u@co", UserRole::Utilizator))));
        assert!(!can_create_any(None));
    }

    #[test]
    fn test_deletable_ids_filters_selection() {
        let actor = Actor::new("admin@co", UserRole::Admin);
        let users = vec![
            user("1", "admin@co", "ADMIN"),
            user("2", "admin2@co", "ADMIN"),
            user("3", "mgr@co", "MANAGER"),
            user("4", "u@co", "UTILIZATOR"),
        ];
        let selected: HashSet<String> = ["1", "2", "3"].iter().map(|s| s.to_string()).collect();
        assert_eq!(deletable_ids(Some(&actor), &users, &selected), vec!["3".to_string()]);
    }
}
