//! 认证模块
//!
//! 会话的真实来源是 localStorage；这里只维护一个会话快照信号，
//! 供路由服务和页面组件响应登录/注销。

use crate::api::{BrowserApi, browser_session};
use foldervault::{ApiResult, LoginOutcome, Session};
use leptos::prelude::*;

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 会话快照（只读）
    pub session: ReadSignal<Session>,
    set_session: WriteSignal<Session>,
}

impl AuthContext {
    /// 创建认证上下文，初始值从 localStorage 读取
    pub fn new() -> Self {
        let (session, set_session) = signal(browser_session().snapshot());
        Self {
            session,
            set_session,
        }
    }

    /// 存储变化后重新读取快照
    pub fn refresh(&self) {
        self.set_session.set(browser_session().snapshot());
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 登录并刷新会话快照
///
/// # Arguments
/// * `origin` - 守卫重定向时保存的原始路径
pub async fn login(
    ctx: AuthContext,
    api: &BrowserApi,
    email: String,
    password: String,
    origin: Option<String>,
) -> ApiResult<LoginOutcome> {
    let outcome = api.login(&email, &password, origin.as_deref()).await?;
    ctx.refresh();
    Ok(outcome)
}

/// 注销并清除状态
///
/// 导航由路由服务的会话监听自动处理。
pub fn logout(ctx: AuthContext, api: &BrowserApi) {
    if let Err(e) = api.logout() {
        log::error!("[Auth] {}", e);
    }
    ctx.refresh();
}
