use contracts::enums::user_role::UserRole;
use contracts::system::users::User;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::HashSet;
use thaw::*;

use crate::shared::date_utils::{format_timestamp, format_timestamp_opt};
use crate::shared::list_utils::{
    filter_list, get_sort_indicator, paginate, sort_list, Page, Searchable, Sortable,
};
use crate::system::auth::context::use_current_actor;
use crate::system::auth::guard::RequireStaff;
use crate::system::users::api;
use crate::system::users::permissions::{can_create_any, deletable_ids, row_permissions};
use crate::system::users::ui::details::{CreateUserForm, EditUserForm, MyAccount};

/// Search/sort controls plus the page currently shown
#[derive(Clone, Debug)]
struct UsersListState {
    search_query: String,
    sort_field: String,
    sort_ascending: bool,
    page_size: usize,
    current: Page<User>,
    is_loaded: bool,
}

impl Default for UsersListState {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            sort_field: "email".to_string(),
            sort_ascending: true,
            page_size: 25,
            current: Page::default(),
            is_loaded: false,
        }
    }
}

impl Sortable for User {
    fn compare_by_field(&self, other: &Self, field: &str) -> std::cmp::Ordering {
        match field {
            "full_name" => self
                .full_name
                .as_deref()
                .unwrap_or("")
                .to_lowercase()
                .cmp(&other.full_name.as_deref().unwrap_or("").to_lowercase()),
            // Unknown roles sort last
            "role" => role_rank(self).cmp(&role_rank(other)),
            "is_active" => self.is_active.cmp(&other.is_active),
            "created_at" => self.created_at.cmp(&other.created_at),
            "last_login_at" => self
                .last_login_at
                .as_deref()
                .unwrap_or("")
                .cmp(other.last_login_at.as_deref().unwrap_or("")),
            _ => self.email.cmp(&other.email),
        }
    }
}

impl Searchable for User {
    fn matches_query(&self, query: &str) -> bool {
        self.email.to_lowercase().contains(query)
            || self
                .full_name
                .as_deref()
                .unwrap_or("")
                .to_lowercase()
                .contains(query)
            || self.role.to_lowercase().contains(query)
    }
}

fn role_rank(user: &User) -> usize {
    user.role()
        .and_then(|role| UserRole::all().iter().position(|r| *r == role))
        .unwrap_or(usize::MAX)
}

fn role_badge(user: &User) -> AnyView {
    match user.role() {
        Some(UserRole::Admin) => view! { <span class="badge badge--warning">"Administrator"</span> }.into_any(),
        Some(role) => view! { <span class="badge badge--neutral">{role.display_name()}</span> }.into_any(),
        None => view! { <span class="badge badge--error">{format!("Unknown ({})", user.role)}</span> }.into_any(),
    }
}

/// User directory for managers and admins; everyone else gets their own account card
#[component]
pub fn UsersListPage() -> impl IntoView {
    view! {
        <RequireStaff fallback=|| view! { <MyAccount /> }>
            <UsersList />
        </RequireStaff>
    }
}

fn refresh_view(state: RwSignal<UsersListState>, all_users: RwSignal<Vec<User>>) {
    let mut data = all_users.get_untracked();
    state.update(|s| {
        filter_list(&mut data, &s.search_query);
        sort_list(&mut data, &s.sort_field, s.sort_ascending);
        s.current = paginate(&data, s.current.page, s.page_size);
    });
}

#[component]
fn UsersList() -> impl IntoView {
    let actor = use_current_actor();
    let state = RwSignal::new(UsersListState::default());
    let all_users: RwSignal<Vec<User>> = RwSignal::new(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (notice, set_notice) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let (show_create_form, set_show_create_form) = signal(false);
    let editing_user: RwSignal<Option<User>> = RwSignal::new(None);
    let selected: RwSignal<HashSet<String>> = RwSignal::new(HashSet::new());

    let load_data = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::fetch_users().await {
                Ok(data) => {
                    all_users.set(data);
                    selected.set(HashSet::new());
                    state.update(|s| s.is_loaded = true);
                    refresh_view(state, all_users);
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        if !state.with_untracked(|s| s.is_loaded) {
            load_data();
        }
    });

    let search_signal = RwSignal::new(String::new());

    let apply_search = move || {
        state.update(|s| {
            s.search_query = search_signal.get_untracked();
            s.current.page = 0;
        });
        refresh_view(state, all_users);
    };

    let toggle_sort = move |field: &'static str| {
        move |_| {
            state.update(|s| {
                if s.sort_field == field {
                    s.sort_ascending = !s.sort_ascending;
                } else {
                    s.sort_field = field.to_string();
                    s.sort_ascending = true;
                }
            });
            refresh_view(state, all_users);
        }
    };

    let sort_header = move |field: &'static str, title: &'static str| {
        view! {
            <TableHeaderCell>
                <div class="table__sortable-header" style="cursor:pointer;" on:click=toggle_sort(field)>
                    {title}
                    <span>
                        {move || state.with(|s| get_sort_indicator(&s.sort_field, field, s.sort_ascending))}
                    </span>
                </div>
            </TableHeaderCell>
        }
    };

    let go_to_page = move |page: usize| {
        state.update(|s| s.current.page = page);
        refresh_view(state, all_users);
    };

    let delete_one = move |user: User| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message(&format!("Delete {}?", user.email)).ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            match api::delete_user(&user.id).await {
                Ok(()) => {
                    set_notice.set(Some(format!("{} deleted", user.email)));
                    load_data();
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    let deletable_selection = Signal::derive(move || {
        let actor = actor.get();
        all_users.with(|users| selected.with(|sel| deletable_ids(actor.as_ref(), users, sel)))
    });

    let delete_selected = move |_| {
        let ids = deletable_selection.get_untracked();
        if ids.is_empty() {
            return;
        }
        spawn_local(async move {
            match api::bulk_delete_users(ids).await {
                Ok(result) => {
                    set_notice.set(Some(format!(
                        "Deleted: {}, skipped: {}",
                        result.deleted, result.skipped
                    )));
                    load_data();
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Users"</h1>
                    <Badge>
                        {move || state.with(|s| s.current.total_count.to_string())}
                    </Badge>
                </div>
                <div class="page__header-right">
                    <Show when=move || actor.with(|a| can_create_any(a.as_ref()))>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| set_show_create_form.set(true)
                        >
                            "+ New"
                        </Button>
                    </Show>
                    <Show when=move || !deletable_selection.get().is_empty()>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=delete_selected
                        >
                            {move || format!("Delete selected ({})", deletable_selection.get().len())}
                        </Button>
                    </Show>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load_data()
                        disabled=Signal::derive(move || loading.get())
                    >
                        {move || if loading.get() { "Loading..." } else { "Refresh" }}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                {move || notice.get().map(|n| view! { <div class="alert alert--success">{n}</div> })}

                <div class="filter-panel">
                    <Flex gap=FlexGap::Small align=FlexAlign::End>
                        <div style="flex: 1; max-width: 320px;">
                            <Input value=search_signal placeholder="Email, name or role..." />
                        </div>
                        <Button appearance=ButtonAppearance::Primary on_click=move |_| apply_search()>
                            "Search"
                        </Button>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=move |_| {
                                search_signal.set(String::new());
                                apply_search();
                            }
                        >
                            "Reset"
                        </Button>
                    </Flex>
                </div>

                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>""</TableHeaderCell>
                            {sort_header("email", "Email")}
                            {sort_header("full_name", "Name")}
                            {sort_header("role", "Role")}
                            {sort_header("is_active", "Status")}
                            {sort_header("created_at", "Created")}
                            {sort_header("last_login_at", "Last login")}
                            <TableHeaderCell>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>

                    <TableBody>
                        <For
                            each=move || state.with(|s| s.current.items.clone())
                            key=|u| (u.id.clone(), u.updated_at.clone())
                            children=move |user| {
                                let perms = Signal::derive({
                                    let user = user.clone();
                                    move || actor.with(|a| row_permissions(a.as_ref(), &user))
                                });
                                let row_id = user.id.clone();
                                let checkbox_id = user.id.clone();
                                let user_for_edit = user.clone();
                                let user_for_delete = user.clone();
                                let created = format_timestamp(&user.created_at);
                                let last_login = format_timestamp_opt(user.last_login_at.as_deref());
                                let badge = role_badge(&user);
                                view! {
                                    <TableRow>
                                        <TableCell>
                                            <input
                                                type="checkbox"
                                                disabled=move || !perms.get().can_delete
                                                prop:checked=move || selected.with(|s| s.contains(&row_id))
                                                on:change=move |ev| {
                                                    let checked = event_target_checked(&ev);
                                                    let id = checkbox_id.clone();
                                                    selected.update(|s| {
                                                        if checked { s.insert(id); } else { s.remove(&id); }
                                                    });
                                                }
                                            />
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>
                                                <span style="font-weight: 500;">{user.email.clone()}</span>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>
                                                {user.full_name.clone().unwrap_or_default()}
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{badge}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                {if user.is_active {
                                                    view! { <span class="badge badge--success">"Active"</span> }.into_any()
                                                } else {
                                                    view! { <span class="badge badge--error">"Disabled"</span> }.into_any()
                                                }}
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{created}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{last_login}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            {move || perms.get().can_edit.then(|| {
                                                let user = user_for_edit.clone();
                                                view! {
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| editing_user.set(Some(user.clone()))
                                                    >
                                                        "Edit"
                                                    </Button>
                                                }
                                            })}
                                            {move || perms.get().can_delete.then(|| {
                                                let user = user_for_delete.clone();
                                                view! {
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| delete_one(user.clone())
                                                    >
                                                        "Delete"
                                                    </Button>
                                                }
                                            })}
                                        </TableCell>
                                    </TableRow>
                                }
                            }
                        />
                    </TableBody>
                </Table>

                <div class="pagination">
                    <Button
                        appearance=ButtonAppearance::Subtle
                        disabled=Signal::derive(move || state.with(|s| s.current.page == 0))
                        on_click=move |_| go_to_page(state.with_untracked(|s| s.current.page.saturating_sub(1)))
                    >
                        "‹ Prev"
                    </Button>
                    <span>
                        {move || state.with(|s| format!("Page {} of {}", s.current.page + 1, s.current.total_pages))}
                    </span>
                    <Button
                        appearance=ButtonAppearance::Subtle
                        disabled=Signal::derive(move || state.with(|s| s.current.page + 1 >= s.current.total_pages))
                        on_click=move |_| go_to_page(state.with_untracked(|s| s.current.page + 1))
                    >
                        "Next ›"
                    </Button>
                </div>

                {move || {
                    let actor = actor.get()?;
                    show_create_form.get().then(|| view! {
                        <CreateUserForm
                            actor=actor
                            on_close=move || set_show_create_form.set(false)
                            on_created=move || {
                                set_show_create_form.set(false);
                                load_data();
                            }
                        />
                    })
                }}

                {move || {
                    let actor = actor.get()?;
                    editing_user.get().map(|user| view! {
                        <EditUserForm
                            actor=actor
                            user=user
                            on_close=move || editing_user.set(None)
                            on_saved=move || {
                                editing_user.set(None);
                                load_data();
                            }
                        />
                    })
                }}
            </div>
        </div>
    }
}
