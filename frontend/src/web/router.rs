//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history / window.location 的操作都集中在此模块。
//! 实现了"监听 -> 守卫 -> 处理 -> 加载"的导航流程，守卫决策来自核心库的 [`RouteGuard`]。

use foldervault::guard::history_state;
use foldervault::{AppRoute, RouteDecision, RouteGuard, Session};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 写入 History 状态；`origin` 作为 state 保存，供登录页读取
fn write_history(path: &str, origin: Option<&str>, use_push: bool) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let state = origin.map(JsValue::from_str).unwrap_or(JsValue::NULL);
    let _ = if use_push {
        history.push_state_with_url(&state, "", Some(path))
    } else {
        history.replace_state_with_url(&state, "", Some(path))
    };
}

/// 守卫重定向到登录页时保存的原始路径
pub fn current_origin() -> Option<String> {
    web_sys::window()
        .and_then(|w| w.history().ok())
        .and_then(|h| h.state().ok())
        .and_then(|s| s.as_string())
}

/// 整页跳转，丢弃全部内存状态
pub fn hard_redirect(path: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href(path);
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 会话信号由外部注入，守卫在每次导航时读取它。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    session: ReadSignal<Session>,
}

impl RouterService {
    fn new(session: ReadSignal<Session>) -> Self {
        let (current_route, set_route) = signal(AppRoute::from_path(&current_path()));
        let router = Self {
            current_route,
            set_route,
            session,
        };
        // 首次加载也要经过守卫
        router.navigate_to(&current_path(), false);
        router
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 导航到指定路径（pushState）
    pub fn navigate(&self, path: &str) {
        self.navigate_to(path, true);
    }

    /// **核心方法：导航与守卫**
    ///
    /// # Arguments
    /// * `path` - 目标路径
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn navigate_to(&self, path: &str, use_push: bool) {
        let target = AppRoute::from_path(path);
        let session = self.session.get_untracked();
        let decision = RouteGuard::check(&target, path, &session);
        // 原地替换时保留条目上已有的来源路径
        let carried = if use_push { None } else { current_origin() };
        let state = history_state(&decision, &target, carried.as_deref(), !use_push);

        match decision {
            RouteDecision::Allow => {
                write_history(path, state.as_deref(), use_push);
                self.set_route.set(target);
            }
            RouteDecision::RedirectTo { path: redirect, .. } => {
                write_history(&redirect, state.as_deref(), use_push);
                self.set_route.set(AppRoute::from_path(&redirect));
            }
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            // popstate 时也执行守卫逻辑，用 replaceState 避免污染历史
            router.navigate_to(&current_path(), false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话变化（登录、注销）后对当前路径重新求值
    fn setup_session_watch(&self) {
        let router = *self;
        let session = self.session;

        // 首次运行只建立依赖，初始路径已在构造时求值过
        Effect::new(move |prev: Option<()>| {
            session.track();
            if prev.is_some() {
                router.navigate_to(&current_path(), false);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: ReadSignal<Session>) -> RouterService {
    let router = RouterService::new(session);

    router.init_popstate_listener();
    router.setup_session_watch();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 会话信号
    session: ReadSignal<Session>,
    children: Children,
) -> impl IntoView {
    provide_router(session);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接，点击时走路由服务而不是整页跳转
#[component]
pub fn Link(
    #[prop(into)] to: String,
    #[prop(into, optional)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
