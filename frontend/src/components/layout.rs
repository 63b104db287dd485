//! 侧边栏布局
//!
//! 侧边栏只显示当前用户有权限的导航项。

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use zatca_shared::{NAVIGATION, NavigationEntry};

use crate::api::{use_api, use_config};
use crate::auth::{logout, use_auth};

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let auth = use_auth();
    let client = use_api();
    let config = use_config();
    let navigate = use_navigate();

    let entries = move || {
        auth.abilities()
            .visible(NAVIGATION)
            .copied()
            .collect::<Vec<NavigationEntry>>()
    };
    let user_name = move || {
        auth.session
            .with(|s| s.user.as_ref().map(|u| u.name.clone()))
            .unwrap_or_default()
    };

    let on_logout = move |_| {
        logout(auth, &client, &config);
        navigate("/login", Default::default());
    };

    view! {
        <div class="drawer lg:drawer-open min-h-screen bg-base-200">
            <input id="sidebar" type="checkbox" class="drawer-toggle" />
            <div class="drawer-content flex flex-col">
                <div class="navbar bg-base-100 shadow">
                    <div class="flex-1">
                        <label for="sidebar" class="btn btn-ghost lg:hidden">"☰"</label>
                        <span class="text-xl font-bold px-2">"Zatca Admin"</span>
                    </div>
                    <div class="flex-none gap-2">
                        <span class="text-sm opacity-70">{user_name}</span>
                        <button on:click=on_logout class="btn btn-outline btn-error btn-sm">
                            "Log out"
                        </button>
                    </div>
                </div>
                <main class="p-4 md:p-8">{children()}</main>
            </div>
            <div class="drawer-side">
                <label for="sidebar" class="drawer-overlay"></label>
                <ul class="menu p-4 w-64 min-h-full bg-base-100">
                    <For
                        each=entries
                        key=|entry| entry.path
                        children=|entry| {
                            view! {
                                {entry.section_title.map(|title| view! { <li class="menu-title">{title}</li> })}
                                <li>
                                    <A href=entry.path>{entry.title}</A>
                                </li>
                            }
                        }
                    />
                </ul>
            </div>
        </div>
    }
}
