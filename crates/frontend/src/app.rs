use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::system::auth::context::{do_logout, use_auth, AuthProvider};
use crate::system::pages::login::LoginPage;
use crate::system::users::ui::list::UsersListPage;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <ConfigProvider>
            <AuthProvider>
                <Shell />
            </AuthProvider>
        </ConfigProvider>
    }
}

/// Login screen until a session exists, then the user-management console
#[component]
fn Shell() -> impl IntoView {
    let (auth_state, set_auth_state) = use_auth();
    let is_authenticated = move || auth_state.with(|s| s.access_token.is_some());

    let header_label = move || {
        auth_state.with(|s| {
            s.user_info
                .as_ref()
                .map(|u| {
                    let role = u
                        .as_actor()
                        .map(|a| a.role.display_name().to_string())
                        .unwrap_or_else(|| "no rights".to_string());
                    format!("{} ({})", u.email, role)
                })
                .unwrap_or_default()
        })
    };

    let on_logout = move |_| {
        spawn_local(async move {
            do_logout(set_auth_state).await;
        });
    };

    view! {
        <Show when=is_authenticated fallback=|| view! { <LoginPage /> }>
            <div class="app">
                <header class="app__header">
                    <span class="app__title">"Inventory"</span>
                    <Flex gap=FlexGap::Small align=FlexAlign::Center>
                        <span class="app__user">{header_label}</span>
                        <Button appearance=ButtonAppearance::Subtle on_click=on_logout>
                            "Log out"
                        </Button>
                    </Flex>
                </header>
                <main class="app__main">
                    <UsersListPage />
                </main>
            </div>
        </Show>
    }
}
