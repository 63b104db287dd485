//! 认证模块
//!
//! 会话状态以 reducer 的方式管理：组件只派发 `SessionAction`，
//! 状态转换规则全部在核心 crate 的 `Session::reduce` 中。
//! 守卫组件通过读取 `session` 信号与 cookie 决定渲染内容。

use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use zatca_admin::session::SessionCookies;
use zatca_admin::{AbilityCache, AbilitySet, AppConfig, AuthService, Session, SessionAction};
use zatca_shared::NAVIGATION;

use crate::api::{ApiClient, use_api, use_config};
use crate::web::DocumentCookies;

/// 认证上下文
///
/// 通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 会话状态
    pub session: RwSignal<Session>,
    /// 按角色列表缓存的权限集合
    abilities: StoredValue<AbilityCache>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self {
            session: RwSignal::new(Session::default()),
            abilities: StoredValue::new(AbilityCache::new()),
        }
    }

    pub fn dispatch(&self, action: SessionAction) {
        self.session.update(|s| s.reduce(action));
    }

    /// Read fresh from `document.cookie` on every call.
    pub fn has_cookie(&self) -> bool {
        SessionCookies::new(DocumentCookies).has_session()
    }

    /// Ability set of the signed-in user. Tracks the session signal.
    pub fn abilities(&self) -> Arc<AbilitySet> {
        let user = self.session.with(|s| s.user.clone());
        let mut set = None;
        self.abilities
            .update_value(|cache| set = Some(cache.get(NAVIGATION, user.as_ref())));
        set.unwrap_or_default()
    }

    /// Drops the session after the API rejected the token.
    pub fn expire(&self, client: &ApiClient) {
        client.cookies().clear();
        client.clear_cache();
        self.dispatch(SessionAction::Logout);
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 只执行一次 who-am-i 查询，不重试。
pub fn init_auth(ctx: AuthContext) {
    if ctx.session.with_untracked(|s| s.initialized || s.loading) {
        return;
    }
    ctx.dispatch(SessionAction::Resolving);

    let client = use_api();
    let geo_echo_url = use_config().geo_echo_url;
    spawn_local(async move {
        let user = AuthService::new(&*client, &geo_echo_url)
            .resolve_session()
            .await;
        ctx.dispatch(SessionAction::SessionResolved(user));
    });
}

/// 注销并清除状态
///
/// 导航由守卫组件监听会话状态自动处理。
pub fn logout(ctx: AuthContext, client: &ApiClient, config: &AppConfig) {
    AuthService::new(client, &config.geo_echo_url).logout();
    ctx.dispatch(SessionAction::Logout);
}
