//! 共享的 API 客户端与配置

use std::sync::Arc;

use leptos::prelude::*;
use zatca_admin::{AppConfig, GraphqlClient};

use crate::web::{BrowserHttp, DocumentCookies};

/// The one GraphQL client every page talks through.
pub type ApiClient = GraphqlClient<BrowserHttp, DocumentCookies>;

pub fn provide_api(config: &AppConfig) {
    provide_context(config.clone());
    provide_context(Arc::new(ApiClient::new(BrowserHttp, DocumentCookies, config)));
}

pub fn use_api() -> Arc<ApiClient> {
    use_context::<Arc<ApiClient>>().expect("ApiClient should be provided")
}

pub fn use_config() -> AppConfig {
    use_context::<AppConfig>().expect("AppConfig should be provided")
}
