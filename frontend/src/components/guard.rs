//! 路由守卫组件
//!
//! 判定逻辑全部来自核心 crate（`auth_guard` / `guest_guard` /
//! `ability_guard`），组件只负责把判定结果渲染出来。

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::Redirect;
use zatca_admin::{AbilityDecision, AppRoute, GuardDecision, ability_guard, auth_guard, guest_guard};

use crate::auth::use_auth;
use crate::components::status::StatusPage;
use crate::use_app_location;

#[component]
pub fn Spinner() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

fn redirect(to: String) -> AnyView {
    view! {
        <Redirect
            path=to
            options=NavigateOptions {
                replace: true,
                ..Default::default()
            }
        />
    }
    .into_any()
}

/// Renders `children` only for a resolved session backed by a cookie.
///
/// The decision is memoized: a query change such as `?page=2` leaves it
/// at `Render` and must not rebuild the page below.
#[component]
pub fn AuthGuard(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let location = use_app_location();

    let decision = Memo::new(move |_| {
        auth.session.with(|session| {
            location.with(|loc| auth_guard(session, auth.has_cookie(), loc))
        })
    });

    move || match decision.get() {
        GuardDecision::Render => children().into_any(),
        GuardDecision::Fallback => view! { <Spinner /> }.into_any(),
        GuardDecision::Redirect(to) => redirect(to),
    }
}

/// Sends signed-in users home. Decided once on mount so a login in
/// progress can pick its own target.
#[component]
pub fn GuestGuard(children: Children) -> impl IntoView {
    match guest_guard(use_auth().has_cookie()) {
        GuardDecision::Redirect(to) => redirect(to),
        _ => children().into_any(),
    }
}

#[component]
pub fn AbilityGuard(route: AppRoute, children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let decision = Memo::new(move |_| ability_guard(&route, &auth.abilities()));

    move || match decision.get() {
        AbilityDecision::Allow => children().into_any(),
        AbilityDecision::Deny => view! { <StatusPage code=401 /> }.into_any(),
    }
}
