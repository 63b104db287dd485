//! Zatca 管理后台前端应用
//!
//! 采用 Context-Driven 的架构，业务逻辑全部位于 `zatca-admin` 核心 crate：
//! - `web`: 浏览器 API 适配（HTTP、cookie、文件、日志）
//! - `api`: 共享的 GraphQL 客户端与配置
//! - `auth`: 会话状态管理
//! - `toast`: 通知提示框
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod form_page;
    pub mod guard;
    pub mod home;
    pub mod layout;
    pub mod list_page;
    pub mod login;
    pub mod signup;
    pub mod status;
}
mod toast;
pub mod web;

use leptos::prelude::*;
use leptos_router::components::Router;
use leptos_router::hooks::use_location;
use tracing::{error, info};
use zatca_admin::form::FormMode;
use zatca_admin::{AppConfig, AppRoute, Location};
use zatca_shared::{
    City, Country, Currency, EntityKind, Equipment, Exercise, Invoice, Language, ManagedUser,
    MuscleGroup, ProgramDay, Promotion, Questionnaire, UserType, WorkoutCategory, WorkoutGroup,
};

use crate::auth::{AuthContext, init_auth};
use crate::components::form_page::form_page;
use crate::components::guard::{AbilityGuard, AuthGuard, GuestGuard};
use crate::components::home::HomePage;
use crate::components::layout::Layout;
use crate::components::list_page::list_page;
use crate::components::login::LoginPage;
use crate::components::signup::SignupPage;
use crate::components::status::StatusPage;
use crate::toast::{ToastContext, ToastHost};

/// Expands `$body` once per entity with `$ty` bound to its record type.
macro_rules! with_entity {
    ($kind:expr, $ty:ident => $body:expr) => {
        match $kind {
            EntityKind::Country => { type $ty = Country; $body }
            EntityKind::City => { type $ty = City; $body }
            EntityKind::Currency => { type $ty = Currency; $body }
            EntityKind::Language => { type $ty = Language; $body }
            EntityKind::User => { type $ty = ManagedUser; $body }
            EntityKind::UserType => { type $ty = UserType; $body }
            EntityKind::MuscleGroup => { type $ty = MuscleGroup; $body }
            EntityKind::Equipment => { type $ty = Equipment; $body }
            EntityKind::Exercise => { type $ty = Exercise; $body }
            EntityKind::WorkoutCategory => { type $ty = WorkoutCategory; $body }
            EntityKind::WorkoutGroup => { type $ty = WorkoutGroup; $body }
            EntityKind::ProgramDay => { type $ty = ProgramDay; $body }
            EntityKind::Promotion => { type $ty = Promotion; $body }
            EntityKind::Questionnaire => { type $ty = Questionnaire; $body }
            EntityKind::Invoice => { type $ty = Invoice; $body }
        }
    };
}

/// 当前 URL（路径 + 查询参数）
pub(crate) fn use_app_location() -> Memo<Location> {
    let location = use_location();
    Memo::new(move |_| {
        let path = location.pathname.get();
        let search = location.search.get();
        match search.trim_start_matches('?') {
            "" => Location::parse(&path),
            query => Location::parse(&format!("{path}?{query}")),
        }
    })
}

/// 受保护页面：认证守卫 -> 权限守卫 -> 布局
fn protected(route: AppRoute, page: impl Fn() -> AnyView + Send + Sync + 'static) -> AnyView {
    let page = std::sync::Arc::new(page);
    view! {
        <AuthGuard>
            {
                let route = route.clone();
                let page = page.clone();
                view! {
                    <AbilityGuard route=route>
                        {
                            let page = page.clone();
                            view! { <Layout>{page()}</Layout> }
                        }
                    </AbilityGuard>
                }
            }
        </AuthGuard>
    }
    .into_any()
}

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route.clone() {
        AppRoute::Login => view! { <GuestGuard><LoginPage /></GuestGuard> }.into_any(),
        AppRoute::Signup => view! { <GuestGuard><SignupPage /></GuestGuard> }.into_any(),
        AppRoute::NotAuthorized => view! { <StatusPage code=401 /> }.into_any(),
        AppRoute::NotFound => view! { <StatusPage code=404 /> }.into_any(),
        AppRoute::ServerError => view! { <StatusPage code=500 /> }.into_any(),
        AppRoute::Home => protected(route, || view! { <HomePage /> }.into_any()),
        AppRoute::List(kind) => protected(route, move || {
            with_entity!(kind, E => list_page::<E>().into_any())
        }),
        AppRoute::New(kind) => protected(route, move || {
            with_entity!(kind, E => form_page::<E>(FormMode::Create).into_any())
        }),
        AppRoute::Edit(kind, id) => protected(route, move || {
            with_entity!(kind, E => form_page::<E>(FormMode::Edit(id.clone())).into_any())
        }),
    }
}

/// 路由出口：URL 变化时重新匹配
#[component]
fn RouterOutlet() -> impl IntoView {
    let location = use_app_location();
    let route = Memo::new(move |_| location.with(|l| l.route()));
    move || route_matcher(route.get())
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 构建期配置
    let config = AppConfig::from_build_env().unwrap_or_else(|e| {
        error!(error = %e, "invalid build configuration; using defaults");
        AppConfig::default()
    });
    info!(api = %config.api_base, "starting admin console");

    // 2. 共享 API 客户端、认证与通知上下文
    api::provide_api(&config);
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    provide_context(ToastContext::new());

    // 3. 启动时解析一次会话
    init_auth(auth_ctx);

    view! {
        <Router>
            <RouterOutlet />
            <ToastHost />
        </Router>
    }
}
