//! Who may create, edit or delete which user accounts.
//!
//! Shared by the frontend (to decide which controls to render) and the
//! backend (to re-check every mutation). All functions are pure.
//!
//! Rules:
//! - ADMIN manages MANAGER and UTILIZATOR accounts, never other admins.
//! - MANAGER manages UTILIZATOR accounts only.
//! - UTILIZATOR manages nobody.
//! - Anyone may edit their own account; nobody may delete it.

use serde::{Deserialize, Serialize};

use crate::enums::user_role::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserAction {
    Create,
    Edit,
    Delete,
}

/// The authenticated principal performing an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub email: String,
    pub role: UserRole,
}

/// The account being created, edited or deleted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub email: String,
    pub role: UserRole,
}

/// Whether `actor_role` may create an account with role `target_role`
pub fn can_create(actor_role: UserRole, target_role: UserRole) -> bool {
    manages(actor_role, target_role)
}

/// Whether `actor_role` may edit the target. Self-edit is always allowed.
pub fn can_edit(
    actor_role: UserRole,
    target_role: UserRole,
    actor_email: &str,
    target_email: &str,
) -> bool {
    if actor_email == target_email {
        return true;
    }
    manages(actor_role, target_role)
}

/// Whether `actor_role` may delete the target. Self-delete is never allowed.
pub fn can_delete(
    actor_role: UserRole,
    target_role: UserRole,
    actor_email: &str,
    target_email: &str,
) -> bool {
    if actor_email == target_email {
        return false;
    }
    manages(actor_role, target_role)
}

fn manages(actor_role: UserRole, target_role: UserRole) -> bool {
    match (actor_role, target_role) {
        (UserRole::Admin, UserRole::Admin) => false,
        (UserRole::Admin, UserRole::Manager | UserRole::Utilizator) => true,
        (UserRole::Manager, UserRole::Utilizator) => true,
        (UserRole::Manager, UserRole::Admin | UserRole::Manager) => false,
        (UserRole::Utilizator, _) => false,
    }
}

/// Dispatch on `action`. For `Create` the target describes the account to be created.
pub fn is_allowed(action: UserAction, actor: &Actor, target: &Target) -> bool {
    match action {
        UserAction::Create => can_create(actor.role, target.role),
        UserAction::Edit => can_edit(actor.role, target.role, &actor.email, &target.email),
        UserAction::Delete => can_delete(actor.role, target.role, &actor.email, &target.email),
    }
}

/// Same as [`is_allowed`] for role codes that have not been parsed yet.
/// An unrecognized role denies every action, self-edit included.
pub fn is_allowed_raw(
    action: UserAction,
    actor_role: &str,
    actor_email: &str,
    target_role: &str,
    target_email: &str,
) -> bool {
    let (Some(actor_role), Some(target_role)) =
        (UserRole::from_code(actor_role), UserRole::from_code(target_role))
    else {
        return false;
    };
    match action {
        UserAction::Create => can_create(actor_role, target_role),
        UserAction::Edit => can_edit(actor_role, target_role, actor_email, target_email),
        UserAction::Delete => can_delete(actor_role, target_role, actor_email, target_email),
    }
}

/// Roles an actor may assign when creating an account, most privileged first
pub fn assignable_roles(actor_role: UserRole) -> Vec<UserRole> {
    UserRole::all()
        .into_iter()
        .filter(|role| can_create(actor_role, *role))
        .collect()
}

impl Actor {
    pub fn new(email: impl Into<String>, role: UserRole) -> Self {
        Self {
            email: email.into(),
            role,
        }
    }

    /// Builds an actor from an unparsed role code; `None` if the role is unknown
    pub fn parse(email: &str, role: &str) -> Option<Self> {
        UserRole::from_code(role).map(|role| Self::new(email, role))
    }

    pub fn can_create(&self, role: UserRole) -> bool {
        can_create(self.role, role)
    }

    pub fn can_edit(&self, target: &Target) -> bool {
        can_edit(self.role, target.role, &self.email, &target.email)
    }

    pub fn can_delete(&self, target: &Target) -> bool {
        can_delete(self.role, target.role, &self.email, &target.email)
    }

    pub fn assignable_roles(&self) -> Vec<UserRole> {
        assignable_roles(self.role)
    }

    pub fn is_self(&self, target: &Target) -> bool {
        self.email == target.email
    }
}

impl Target {
    pub fn new(email: impl Into<String>, role: UserRole) -> Self {
        Self {
            email: email.into(),
            role,
        }
    }

    pub fn parse(email: &str, role: &str) -> Option<Self> {
        UserRole::from_code(role).map(|role| Self::new(email, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use UserRole::{Admin, Manager, Utilizator};

    const A: &str = "a@x";
    const B: &str = "b@x";

    #[test]
    fn test_create_matrix() {
        assert!(can_create(Admin, Manager));
        assert!(can_create(Admin, Utilizator));
        assert!(!can_create(Admin, Admin));
        assert!(can_create(Manager, Utilizator));
        assert!(!can_create(Manager, Manager));
        assert!(!can_create(Manager, Admin));
        for role in UserRole::all() {
            assert!(!can_create(Utilizator, role));
        }
    }

    #[test]
    fn test_no_role_creates_own_role() {
        for role in UserRole::all() {
            assert!(!can_create(role, role), "{role} created its own role");
        }
    }

    #[test]
    fn test_edit_other_accounts() {
        assert!(can_edit(Admin, Manager, A, B));
        assert!(can_edit(Admin, Utilizator, A, B));
        assert!(!can_edit(Admin, Admin, A, B));
        assert!(can_edit(Manager, Utilizator, A, B));
        assert!(!can_edit(Manager, Manager, A, B));
        assert!(!can_edit(Manager, Admin, A, B));
        for role in UserRole::all() {
            assert!(!can_edit(Utilizator, role, A, B));
        }
    }

    #[test]
    fn test_delete_other_accounts() {
        assert!(can_delete(Admin, Utilizator, A, B));
        assert!(can_delete(Admin, Manager, A, B));
        assert!(!can_delete(Admin, Admin, A, B));
        assert!(can_delete(Manager, Utilizator, A, B));
        assert!(!can_delete(Manager, Manager, A, B));
        assert!(!can_delete(Manager, Admin, A, B));
        for role in UserRole::all() {
            assert!(!can_delete(Utilizator, role, A, B));
        }
    }

    #[test]
    fn test_self_edit_allowed_self_delete_forbidden() {
        for role in UserRole::all() {
            assert!(can_edit(role, role, A, A));
            assert!(!can_delete(role, role, A, A));
        }
    }

    #[test]
    fn test_edit_and_delete_agree_except_on_self() {
        for actor in UserRole::all() {
            for target in UserRole::all() {
                assert_eq!(can_edit(actor, target, A, B), can_delete(actor, target, A, B));
                assert_eq!(can_edit(actor, target, A, B), can_create(actor, target));
            }
        }
    }

    #[test]
    fn test_decisions_are_repeatable() {
        for actor in UserRole::all() {
            for target in UserRole::all() {
                for (ae, te) in [(A, A), (A, B)] {
                    assert_eq!(can_create(actor, target), can_create(actor, target));
                    assert_eq!(can_edit(actor, target, ae, te), can_edit(actor, target, ae, te));
                    assert_eq!(
                        can_delete(actor, target, ae, te),
                        can_delete(actor, target, ae, te)
                    );
                }
            }
        }
    }

    #[test]
    fn test_unknown_roles_fail_closed() {
        for action in [UserAction::Create, UserAction::Edit, UserAction::Delete] {
            assert!(!is_allowed_raw(action, "ROOT", A, "UTILIZATOR", B));
            assert!(!is_allowed_raw(action, "ADMIN", A, "guest", B));
            assert!(!is_allowed_raw(action, "", A, "", A));
            assert!(!is_allowed_raw(action, "admin", A, "ADMIN", A));
        }
        assert!(Actor::parse(A, "SUPERVISOR").is_none());
        assert!(Target::parse(B, "Manager").is_none());
    }

    #[test]
    fn test_raw_matches_typed() {
        assert!(is_allowed_raw(UserAction::Edit, "MANAGER", A, "UTILIZATOR", B));
        assert!(is_allowed_raw(UserAction::Edit, "UTILIZATOR", A, "UTILIZATOR", A));
        assert!(!is_allowed_raw(UserAction::Delete, "ADMIN", A, "ADMIN", A));
        assert!(is_allowed_raw(UserAction::Create, "ADMIN", A, "MANAGER", B));
    }

    #[test]
    fn test_assignable_roles() {
        assert_eq!(assignable_roles(Admin), vec![Manager, Utilizator]);
        assert_eq!(assignable_roles(Manager), vec![Utilizator]);
        assert!(assignable_roles(Utilizator).is_empty());
    }

    #[test]
    fn test_admin_on_manager_scenario() {
        let actor = Actor::new("admin@co", Admin);
        let target = Target::new("mgr@co", Manager);
        assert!(actor.can_edit(&target));
        assert!(actor.can_delete(&target));
        assert!(actor.can_create(Manager));
        assert!(is_allowed(UserAction::Create, &actor, &target));
    }

    #[test]
    fn test_manager_on_manager_scenario() {
        let actor = Actor::new("mgr@co", Manager);
        let target = Target::new("mgr2@co", Manager);
        assert!(!actor.can_edit(&target));
        assert!(!actor.can_delete(&target));
    }

    #[test]
    fn test_utilizator_on_self_scenario() {
        let actor = Actor::new("user@co", Utilizator);
        let target = Target::new("user@co", Utilizator);
        assert!(actor.is_self(&target));
        assert!(actor.can_edit(&target));
        assert!(!actor.can_delete(&target));
        for role in UserRole::all() {
            assert!(!actor.can_create(role));
        }
    }

    #[test]
    fn test_admin_on_admin_scenario() {
        let actor = Actor::new("admin@co", Admin);
        let target = Target::new("admin2@co", Admin);
        assert!(!is_allowed(UserAction::Edit, &actor, &target));
        assert!(!is_allowed(UserAction::Delete, &actor, &target));
    }
}
