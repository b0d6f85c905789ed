use contracts::enums::user_role::UserRole;
use contracts::system::access::Actor;
use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::date_utils::format_timestamp_opt;
use crate::system::auth::context::{use_auth, use_current_actor};
use crate::system::users::api;

const MIN_PASSWORD_LENGTH: usize = 8;

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Passwords are sent exactly as typed; only an empty field means "not given"
fn password_input(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Role options offered in the edit form: the actor's assignable roles, plus the
/// target's current role so the select always shows what is stored
fn edit_role_options(actor: &Actor, current: UserRole, is_self: bool) -> Vec<UserRole> {
    if is_self {
        return vec![current];
    }
    let mut roles = actor.assignable_roles();
    if !roles.contains(&current) {
        roles.insert(0, current);
    }
    roles
}

fn role_options_view(roles: Vec<UserRole>) -> impl IntoView {
    roles
        .into_iter()
        .map(|role| view! { <option value=role.code()>{role.display_name()}</option> })
        .collect_view()
}

#[component]
pub fn CreateUserForm<F1, F2>(actor: Actor, on_close: F1, on_created: F2) -> impl IntoView
where
    F1: Fn() + 'static + Copy + Send + Sync,
    F2: Fn() + 'static + Copy + Send + Sync,
{
    let roles = actor.assignable_roles();
    let default_role = roles.last().copied().unwrap_or(UserRole::Utilizator);

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (full_name, set_full_name) = signal(String::new());
    let (role, set_role) = signal(default_role);
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_saving, set_is_saving) = signal(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let email_value = email.get_untracked().trim().to_lowercase();
        if email_value.is_empty() {
            set_error_message.set(Some("Email is required".to_string()));
            return;
        }
        if password.get_untracked().chars().count() < MIN_PASSWORD_LENGTH {
            set_error_message.set(Some(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
            return;
        }
        let role_value = role.get_untracked();
        if !actor.can_create(role_value) {
            set_error_message.set(Some(format!(
                "You cannot create users with role {}",
                role_value.display_name()
            )));
            return;
        }

        let dto = CreateUserDto {
            email: email_value,
            password: password.get_untracked(),
            full_name: optional(full_name.get_untracked()),
            role: role_value,
        };

        set_is_saving.set(true);
        set_error_message.set(None);

        spawn_local(async move {
            match api::create_user(dto).await {
                Ok(_) => on_created(),
                Err(e) => {
                    set_error_message.set(Some(format!("Failed to create user: {}", e)));
                    set_is_saving.set(false);
                }
            }
        });
    };

    view! {
        <div class="modal-overlay" on:click=move |_| on_close()>
            <div class="modal-content" on:click=move |ev| ev.stop_propagation()>
                <div class="modal-header">
                    <h3>"New user"</h3>
                    <button class="btn-close" on:click=move |_| on_close()>"×"</button>
                </div>

                <Show when=move || error_message.get().is_some()>
                    <div class="error-message">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <form on:submit=on_submit>
                    <div class="form-group">
                        <label for="email">"Email *"</label>
                        <input
                            type="email"
                            id="email"
                            prop:value=move || email.get()
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            required
                            disabled=move || is_saving.get()
                        />
                    </div>

                    <div class="form-group">
                        <label for="password">"Password *"</label>
                        <input
                            type="password"
                            id="password"
                            prop:value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            required
                            disabled=move || is_saving.get()
                        />
                    </div>

                    <div class="form-group">
                        <label for="full_name">"Full name"</label>
                        <input
                            type="text"
                            id="full_name"
                            prop:value=move || full_name.get()
                            on:input=move |ev| set_full_name.set(event_target_value(&ev))
                            disabled=move || is_saving.get()
                        />
                    </div>

                    <div class="form-group">
                        <label for="role">"Role"</label>
                        <select
                            id="role"
                            prop:value=move || role.get().code()
                            on:change=move |ev| {
                                if let Some(r) = UserRole::from_code(&event_target_value(&ev)) {
                                    set_role.set(r);
                                }
                            }
                            disabled=move || is_saving.get()
                        >
                            {role_options_view(roles.clone())}
                        </select>
                    </div>

                    <div class="form-actions">
                        <button
                            type="button"
                            class="btn-secondary"
                            on:click=move |_| on_close()
                            disabled=move || is_saving.get()
                        >
                            "Cancel"
                        </button>
                        <button
                            type="submit"
                            class="btn-primary"
                            disabled=move || is_saving.get()
                        >
                            {move || if is_saving.get() { "Saving..." } else { "Create" }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}

#[component]
pub fn EditUserForm<F1, F2>(actor: Actor, user: User, on_close: F1, on_saved: F2) -> impl IntoView
where
    F1: Fn() + 'static + Copy + Send + Sync,
    F2: Fn() + 'static + Copy + Send + Sync,
{
    let target = user.as_target();
    let is_self = target.as_ref().is_some_and(|t| actor.is_self(t));
    let allowed = target.as_ref().is_some_and(|t| actor.can_edit(t));
    let current_role = user.role();
    let role_options = current_role
        .map(|r| edit_role_options(&actor, r, is_self))
        .unwrap_or_default();

    let user_id = user.id.clone();
    let (full_name, set_full_name) = signal(user.full_name.clone().unwrap_or_default());
    let (role, set_role) = signal(current_role);
    let (is_active, set_is_active) = signal(user.is_active);
    let (old_password, set_old_password) = signal(String::new());
    let (new_password, set_new_password) = signal(String::new());
    let (error_message, set_error_message) = signal(if allowed {
        None
    } else {
        Some("You are not allowed to edit this user".to_string())
    });
    let (is_saving, set_is_saving) = signal(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if !allowed {
            return;
        }
        let Some(role_value) = role.get_untracked() else {
            set_error_message.set(Some("User has an unknown role".to_string()));
            return;
        };

        let new_password_value = new_password.get_untracked();
        if !new_password_value.is_empty()
            && new_password_value.chars().count() < MIN_PASSWORD_LENGTH
        {
            set_error_message.set(Some(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
            return;
        }
        let old_password_value = password_input(old_password.get_untracked());
        if is_self && !new_password_value.is_empty() && old_password_value.is_none() {
            set_error_message.set(Some("Current password is required".to_string()));
            return;
        }

        let dto = UpdateUserDto {
            id: user_id.clone(),
            full_name: optional(full_name.get_untracked()),
            role: role_value,
            is_active: if is_self { true } else { is_active.get_untracked() },
        };
        let password_dto = (!new_password_value.is_empty()).then(|| ChangePasswordDto {
            user_id: user_id.clone(),
            old_password: if is_self { old_password_value } else { None },
            new_password: new_password_value,
        });

        set_is_saving.set(true);
        set_error_message.set(None);

        spawn_local(async move {
            let result = match api::update_user(dto).await {
                Ok(()) => match password_dto {
                    Some(dto) => api::change_password(dto).await,
                    None => Ok(()),
                },
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => on_saved(),
                Err(e) => {
                    set_error_message.set(Some(format!("Failed to save user: {}", e)));
                    set_is_saving.set(false);
                }
            }
        });
    };

    let locked = move || is_saving.get() || !allowed;

    view! {
        <div class="modal-overlay" on:click=move |_| on_close()>
            <div class="modal-content" on:click=move |ev| ev.stop_propagation()>
                <div class="modal-header">
                    <h3>{format!("Edit {}", user.email)}</h3>
                    <button class="btn-close" on:click=move |_| on_close()>"×"</button>
                </div>

                <Show when=move || error_message.get().is_some()>
                    <div class="error-message">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <form on:submit=on_submit>
                    <div class="form-group">
                        <label for="full_name">"Full name"</label>
                        <input
                            type="text"
                            id="full_name"
                            prop:value=move || full_name.get()
                            on:input=move |ev| set_full_name.set(event_target_value(&ev))
                            disabled=locked
                        />
                    </div>

                    <div class="form-group">
                        <label for="role">"Role"</label>
                        <select
                            id="role"
                            prop:value=move || role.get().map(|r| r.code()).unwrap_or_default()
                            on:change=move |ev| {
                                if let Some(r) = UserRole::from_code(&event_target_value(&ev)) {
                                    set_role.set(Some(r));
                                }
                            }
                            disabled=move || locked() || is_self
                        >
                            {role_options_view(role_options.clone())}
                        </select>
                    </div>

                    <div class="form-group">
                        <label>
                            <input
                                type="checkbox"
                                prop:checked=move || is_active.get()
                                on:change=move |ev| set_is_active.set(event_target_checked(&ev))
                                disabled=move || locked() || is_self
                            />
                            " Active"
                        </label>
                    </div>

                    <Show when=move || is_self>
                        <div class="form-group">
                            <label for="old_password">"Current password"</label>
                            <input
                                type="password"
                                id="old_password"
                                prop:value=move || old_password.get()
                                on:input=move |ev| set_old_password.set(event_target_value(&ev))
                                disabled=locked
                            />
                        </div>
                    </Show>

                    <div class="form-group">
                        <label for="new_password">"New password"</label>
                        <input
                            type="password"
                            id="new_password"
                            placeholder="Leave empty to keep the current one"
                            prop:value=move || new_password.get()
                            on:input=move |ev| set_new_password.set(event_target_value(&ev))
                            disabled=locked
                        />
                    </div>

                    <div class="form-actions">
                        <button
                            type="button"
                            class="btn-secondary"
                            on:click=move |_| on_close()
                            disabled=move || is_saving.get()
                        >
                            "Cancel"
                        </button>
                        <button type="submit" class="btn-primary" disabled=locked>
                            {move || if is_saving.get() { "Saving..." } else { "Save" }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}

/// Own profile card for users without access to the user directory
#[component]
pub fn MyAccount() -> impl IntoView {
    let (auth_state, _) = use_auth();
    let actor = use_current_actor();
    let profile: RwSignal<Option<User>> = RwSignal::new(None);
    let (error, set_error) = signal::<Option<String>>(None);
    let (editing, set_editing) = signal(false);

    let load = move || {
        let Some(id) = auth_state.with_untracked(|s| s.user_info.as_ref().map(|u| u.id.clone()))
        else {
            return;
        };
        spawn_local(async move {
            match api::fetch_user(&id).await {
                Ok(user) => profile.set(Some(user)),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    Effect::new(move |_| load());

    view! {
        <div class="page">
            <div class="page__header">
                <h1 class="page__title">"My account"</h1>
            </div>
            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                {move || profile.get().map(|user| {
                    let role = user
                        .role()
                        .map(|r| r.display_name().to_string())
                        .unwrap_or_else(|| format!("Unknown ({})", user.role));
                    view! {
                        <dl class="details-list">
                            <dt>"Email"</dt>
                            <dd>{user.email.clone()}</dd>
                            <dt>"Name"</dt>
                            <dd>{user.full_name.clone().unwrap_or_default()}</dd>
                            <dt>"Role"</dt>
                            <dd>{role}</dd>
                            <dt>"Last login"</dt>
                            <dd>{format_timestamp_opt(user.last_login_at.as_deref())}</dd>
                        </dl>
                        <button class="btn-primary" on:click=move |_| set_editing.set(true)>
                            "Edit"
                        </button>
                    }
                })}
                {move || {
                    let actor = actor.get()?;
                    let user = profile.get()?;
                    editing.get().then(|| view! {
                        <EditUserForm
                            actor=actor
                            user=user
                            on_close=move || set_editing.set(false)
                            on_saved=move || {
                                set_editing.set(false);
                                load();
                            }
                        />
                    })
                }}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_role_options_for_self_is_fixed() {
        let admin = Actor::new("root@co", UserRole::Admin);
        assert_eq!(edit_role_options(&admin, UserRole::Admin, true), vec![UserRole::Admin]);
    }

    #[test]
    fn test_edit_role_options_for_others() {
        let admin = Actor::new("root@co", UserRole::Admin);
        assert_eq!(
            edit_role_options(&admin, UserRole::Utilizator, false),
            vec![UserRole::Manager, UserRole::Utilizator]
        );

        let manager = Actor::new("mgr@co", UserRole::Manager);
        assert_eq!(
            edit_role_options(&manager, UserRole::Utilizator, false),
            vec![UserRole::Utilizator]
        );
    }

    #[test]
    fn test_password_input_keeps_spaces() {
        assert_eq!(password_input(String::new()), None);
        assert_eq!(
            password_input("  padded-pass  ".to_string()),
            Some("  padded-pass  ".to_string())
        );
        assert_eq!(password_input("   ".to_string()), Some("   ".to_string()));
    }

    #[test]
    fn test_optional_trims_blank() {
        assert_eq!(optional("  ".to_string()), None);
        assert_eq!(optional(" Ana ".to_string()), Some("Ana".to_string()));
    }
}
