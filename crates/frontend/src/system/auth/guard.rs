use leptos::prelude::*;

use super::context::use_current_actor;

/// Renders children only for actors who manage other accounts (ADMIN, MANAGER)
#[component]
pub fn RequireStaff(#[prop(optional, into)] fallback: ViewFn, children: ChildrenFn) -> impl IntoView {
    let actor = use_current_actor();

    view! {
        <Show
            when=move || actor.with(|a| a.as_ref().is_some_and(|a| !a.assignable_roles().is_empty()))
            fallback=fallback
        >
            {children()}
        </Show>
    }
}
