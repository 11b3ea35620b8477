//! 浏览器端的 API 组装
//!
//! 把核心库的网关与浏览器实现拼在一起：fetch 客户端、localStorage 会话、整页跳转恢复。

use crate::web::router::hard_redirect;
use crate::web::{FetchClient, LocalStorage};
use foldervault::{ApiGateway, AuthRecovery, ClientConfig, FolderVaultApi, SessionStore};
use leptos::prelude::*;

/// 会话失效时整页跳转到登录页
#[derive(Clone, Copy, Default)]
pub struct HardRedirect;

impl AuthRecovery for HardRedirect {
    fn recover(&self, login_path: &str) {
        hard_redirect(login_path);
    }
}

pub type BrowserApi = FolderVaultApi<FetchClient, LocalStorage, HardRedirect>;

pub fn browser_session() -> SessionStore<LocalStorage> {
    SessionStore::new(LocalStorage)
}

/// 后端地址可在构建时通过 `FOLDERVAULT_API_BASE` 覆盖
pub fn browser_api() -> BrowserApi {
    let config = ClientConfig::from_override(option_env!("FOLDERVAULT_API_BASE"));
    log::info!("[Api] backend {}", config.api_base_url());
    FolderVaultApi::new(ApiGateway::new(
        config,
        FetchClient,
        browser_session(),
        HardRedirect,
    ))
}

/// 从 Context 获取 API 客户端
pub fn use_api() -> BrowserApi {
    use_context::<BrowserApi>().expect("BrowserApi should be provided")
}
