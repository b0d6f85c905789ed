use contracts::system::access::Actor;
use contracts::system::auth::UserInfo;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{api, storage};

#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user_info: Option<UserInfo>,
}

impl AuthState {
    /// Policy principal of the session; `None` when logged out or the role is unknown
    pub fn actor(&self) -> Option<Actor> {
        self.user_info.as_ref().and_then(UserInfo::as_actor)
    }
}

/// Restore a session from localStorage: validate the stored access token,
/// fall back to the refresh token, clear everything if both fail.
async fn restore_session() -> Option<AuthState> {
    let access_token = storage::get_access_token()?;

    if let Ok(user_info) = api::get_current_user(&access_token).await {
        return Some(AuthState {
            access_token: Some(access_token),
            user_info: Some(user_info),
        });
    }

    let Some(refresh_token) = storage::get_refresh_token() else {
        storage::clear_tokens();
        return None;
    };

    match api::refresh_token(refresh_token).await {
        Ok(response) => {
            storage::save_access_token(&response.access_token);
            match api::get_current_user(&response.access_token).await {
                Ok(user_info) => Some(AuthState {
                    access_token: Some(response.access_token),
                    user_info: Some(user_info),
                }),
                Err(e) => {
                    log::warn!("Session restore failed after refresh: {}", e);
                    None
                }
            }
        }
        Err(e) => {
            log::info!("Stored session expired: {}", e);
            storage::clear_tokens();
            None
        }
    }
}

/// Auth context provider component
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let (auth_state, set_auth_state) = signal(AuthState::default());

    Effect::new(move |_| {
        spawn_local(async move {
            if let Some(state) = restore_session().await {
                set_auth_state.set(state);
            }
        });
    });

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

/// Hook to access auth state
pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

/// Reactive policy principal of the current session
pub fn use_current_actor() -> Signal<Option<Actor>> {
    let (auth_state, _) = use_auth();
    Signal::derive(move || auth_state.with(|s| s.actor()))
}

/// Helper: Perform logout
pub async fn do_logout(set_auth_state: WriteSignal<AuthState>) {
    if let Some(refresh_token) = storage::get_refresh_token() {
        if let Err(e) = api::logout(refresh_token).await {
            log::warn!("Logout request failed: {}", e);
        }
    }

    storage::clear_tokens();
    set_auth_state.set(AuthState::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(role: &str) -> AuthState {
        AuthState {
            access_token: Some("t".into()),
            user_info: Some(UserInfo {
                id: "1".into(),
                email: "mgr@co".into(),
                full_name: None,
                role: role.into(),
            }),
        }
    }

    #[test]
    fn test_actor_from_session() {
        let actor = state("MANAGER").actor().unwrap();
        assert_eq!(actor.email, "mgr@co");
        assert!(AuthState::default().actor().is_none());
    }

    #[test]
    fn test_unknown_role_has_no_actor() {
        assert!(state("OWNER").actor().is_none());
    }
}
