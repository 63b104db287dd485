use leptos::prelude::*;
use leptos_router::components::A;
use zatca_shared::NAVIGATION;

use crate::auth::use_auth;

/// Landing page: one card per section the user may open.
#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let name = move || auth.session.with(|s| s.user.as_ref().map(|u| u.name.clone()));

    let entries = move || {
        auth.abilities()
            .visible(NAVIGATION)
            .filter(|entry| entry.path != "/")
            .copied()
            .collect::<Vec<_>>()
    };

    view! {
        <div class="space-y-6">
            <h1 class="text-3xl font-bold">
                "Welcome" {move || name().map(|n| format!(", {n}"))}
            </h1>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                <For
                    each=entries
                    key=|entry| entry.path
                    children=|entry| {
                        view! {
                            <A href=entry.path attr:class="card bg-base-100 shadow hover:shadow-lg">
                                <div class="card-body">
                                    <h2 class="card-title">{entry.title}</h2>
                                    <p class="text-base-content/70 text-sm">{entry.path}</p>
                                </div>
                            </A>
                        }
                    }
                />
            </div>
        </div>
    }
}
