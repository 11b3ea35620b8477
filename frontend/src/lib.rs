//! FolderVault 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `foldervault::route` / `foldervault::guard`: 路由表与守卫（核心库，纯逻辑）
//! - `web::router`: 路由服务（History API 引擎）
//! - `auth`: 会话快照信号
//! - `api`: 浏览器端网关组装
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod admin;
    pub mod files;
    pub mod folders;
    mod icons;
    pub mod login;
    pub mod navbar;
    pub mod register;
    mod toast;
}

use crate::api::browser_api;
use crate::auth::AuthContext;
use crate::components::admin::AdminPage;
use crate::components::files::FilesPage;
use crate::components::folders::FoldersPage;
use crate::components::login::LoginPage;
use crate::components::navbar::Navbar;
use crate::components::register::RegisterPage;

use foldervault::AppRoute;
use leptos::prelude::*;

// 原生 Web API 封装模块
pub(crate) mod web {
    mod http;
    pub mod router;
    mod storage;

    pub use http::FetchClient;
    pub use storage::LocalStorage;
}

use web::router::{Router, RouterOutlet, use_router};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Home | AppRoute::AllFolders => view! { <FoldersPage /> }.into_any(),
        AppRoute::Folder(name) => view! { <FilesPage folder=name /> }.into_any(),
        AppRoute::Admin => view! { <AdminPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <h1 class="text-3xl font-bold">"404 - Page Not Found"</h1>
            </div>
        }
        .into_any(),
    }
}

/// 导航栏在登录/注册页隐藏
#[component]
fn Shell() -> impl IntoView {
    let router = use_router();
    let show_navbar = move || router.current_route().with(|r| r.shows_navbar());

    view! {
        <Show when=show_navbar>
            <Navbar />
        </Show>
        <RouterOutlet matcher=route_matcher />
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. API 客户端与认证上下文
    provide_context(browser_api());
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 会话信号注入路由服务，守卫在每次导航时读取
    view! {
        <Router session=auth_ctx.session>
            <Shell />
        </Router>
    }
}
