//! 路由守卫
//!
//! 每次导航时同步求值的纯函数：输入当前路径、会话快照和路由的角色要求，
//! 输出放行或重定向。不做任何网络请求。

use crate::route::{ADMIN_PATH, ALL_FOLDERS_PATH, AppRoute, LOGIN_PATH, RoleSet, is_public_path};
use crate::session::Session;
use foldervault_shared::ADMIN_ROLE;

/// 守卫的决策结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectTo {
        path: String,
        /// 是否携带原始目标路径，登录成功后可返回
        preserve_origin: bool,
    },
}

impl RouteDecision {
    fn redirect(path: &str) -> Self {
        Self::RedirectTo {
            path: path.to_string(),
            preserve_origin: false,
        }
    }

    fn redirect_preserving_origin(path: &str) -> Self {
        Self::RedirectTo {
            path: path.to_string(),
            preserve_origin: true,
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// 已登录用户访问登录/注册页时的默认落点
///
/// 与 [`post_login_target`] 不同，这里对 `"Admin"` 做精确匹配。
pub fn role_default_path(role: &str) -> &'static str {
    if role == ADMIN_ROLE {
        ADMIN_PATH
    } else {
        ALL_FOLDERS_PATH
    }
}

/// 登录成功后的跳转目标
///
/// 优先返回守卫保存的原始路径；否则按角色决定，角色比较前先转小写。
pub fn post_login_target(origin: Option<&str>, role: &str) -> String {
    if let Some(origin) = origin.filter(|o| !o.is_empty()) {
        return origin.to_string();
    }
    if role.to_lowercase() == ADMIN_ROLE.to_lowercase() {
        ADMIN_PATH.to_string()
    } else {
        ALL_FOLDERS_PATH.to_string()
    }
}

/// **核心守卫逻辑**
pub fn evaluate(path: &str, session: &Session, required_roles: Option<&RoleSet>) -> RouteDecision {
    let public = is_public_path(path);

    // 1. 未登录访问受保护路径
    if !session.is_authenticated() && !public {
        return RouteDecision::redirect_preserving_origin(LOGIN_PATH);
    }

    // 2. 已登录访问登录/注册页
    if session.is_authenticated() && public {
        return RouteDecision::redirect(role_default_path(session.role()));
    }

    // 3. 角色不满足
    if let Some(roles) = required_roles {
        if !roles.contains(session.role()) {
            return RouteDecision::redirect(ALL_FOLDERS_PATH);
        }
    }

    RouteDecision::Allow
}

/// 基于路由表的守卫入口
pub struct RouteGuard;

impl RouteGuard {
    /// 对已解析的路由求值；404 路由总是放行
    ///
    /// 求值使用路由的规范路径，`/login/` 与 `/login` 等价。
    pub fn check(route: &AppRoute, path: &str, session: &Session) -> RouteDecision {
        if !route.is_guarded() {
            return RouteDecision::Allow;
        }
        let canonical = route.to_path();
        let decision = evaluate(&canonical, session, route.required_roles().as_ref());
        if let RouteDecision::RedirectTo { path: to, .. } = &decision {
            log::info!("[Guard] {} -> {}", path, to);
        }
        decision
    }
}

/// 导航后写入 history 条目的 state，即登录页可读取的原始路径
///
/// - 保留来源的重定向：写入目标路由的规范路径
/// - 其他重定向：清空
/// - 放行且是原地替换（首次加载、前进后退、会话变化后重新求值）：保留条目已有的 state
/// - 放行且是新条目：清空
pub fn history_state(
    decision: &RouteDecision,
    route: &AppRoute,
    carried: Option<&str>,
    replacing: bool,
) -> Option<String> {
    match decision {
        RouteDecision::RedirectTo {
            preserve_origin: true,
            ..
        } => Some(route.to_path()),
        RouteDecision::RedirectTo { .. } => None,
        RouteDecision::Allow if replacing => carried.map(str::to_string),
        RouteDecision::Allow => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemoryStorage, SessionStore};

    fn admin_roles() -> RoleSet {
        RoleSet::new(["Admin"])
    }

    #[test]
    fn test_anonymous_redirects_to_login_with_origin() {
        let session = Session::anonymous();
        for path in ["/", "/allfolders", "/allfolders/logos", "/admin", "/anything"] {
            assert_eq!(
                evaluate(path, &session, None),
                RouteDecision::RedirectTo {
                    path: "/login".into(),
                    preserve_origin: true
                },
                "path {}",
                path
            );
        }
    }

    #[test]
    fn test_anonymous_may_open_public_pages() {
        let session = Session::anonymous();
        assert!(evaluate("/login", &session, None).is_allow());
        assert!(evaluate("/register", &session, None).is_allow());
    }

    #[test]
    fn test_authenticated_admin_leaves_login_for_admin() {
        let session = Session::new("t", "Admin");
        assert_eq!(
            evaluate("/login", &session, None),
            RouteDecision::RedirectTo {
                path: "/admin".into(),
                preserve_origin: false
            }
        );
        assert_eq!(
            evaluate("/register", &session, None),
            RouteDecision::RedirectTo {
                path: "/admin".into(),
                preserve_origin: false
            }
        );
    }

    #[test]
    fn test_other_roles_leave_login_for_all_folders() {
        for role in ["User", "admin", "ADMIN", "Editor", ""] {
            let session = Session::new("t", role);
            assert_eq!(
                evaluate("/login", &session, None),
                RouteDecision::RedirectTo {
                    path: "/allfolders".into(),
                    preserve_origin: false
                },
                "role {:?}",
                role
            );
        }
    }

    #[test]
    fn test_missing_role_defaults_to_user() {
        let session = Session {
            token: Some("t".into()),
            role: None,
        };
        assert_eq!(
            evaluate("/admin", &session, Some(&admin_roles())),
            RouteDecision::RedirectTo {
                path: "/allfolders".into(),
                preserve_origin: false
            }
        );
    }

    #[test]
    fn test_user_denied_admin_route() {
        let session = Session::new("t", "User");
        let decision = evaluate("/admin", &session, Some(&admin_roles()));
        assert!(!decision.is_allow());
        assert_eq!(
            decision,
            RouteDecision::RedirectTo {
                path: "/allfolders".into(),
                preserve_origin: false
            }
        );
    }

    #[test]
    fn test_admin_allowed_admin_route() {
        let session = Session::new("t", "Admin");
        assert!(evaluate("/admin", &session, Some(&admin_roles())).is_allow());
        assert!(evaluate("/allfolders", &session, None).is_allow());
    }

    #[test]
    fn test_lowercase_admin_role_mismatch_is_preserved() {
        // 登录时角色原样保存为 "admin"；登录跳转按小写比较会去 /admin，
        // 但守卫精确比较 "Admin"，因此落到 /allfolders。
        let store = SessionStore::new(MemoryStorage::new());
        store.save("t");
        store.save_role("admin");
        let session = store.snapshot();

        assert_eq!(post_login_target(None, &store.role()), "/admin");
        assert_eq!(
            evaluate("/login", &session, None),
            RouteDecision::RedirectTo {
                path: "/allfolders".into(),
                preserve_origin: false
            }
        );
        assert!(!RouteGuard::check(&AppRoute::Admin, "/admin", &session).is_allow());
    }

    #[test]
    fn test_post_login_target_prefers_origin() {
        assert_eq!(
            post_login_target(Some("/allfolders/logos"), "Admin"),
            "/allfolders/logos"
        );
        assert_eq!(post_login_target(Some(""), "User"), "/allfolders");
        assert_eq!(post_login_target(None, "ADMIN"), "/admin");
    }

    #[test]
    fn test_check_ignores_trailing_slash() {
        let user = Session::new("t", "User");
        for path in ["/login/", "/register/"] {
            let route = AppRoute::from_path(path);
            assert_eq!(
                RouteGuard::check(&route, path, &user),
                RouteDecision::RedirectTo {
                    path: "/allfolders".into(),
                    preserve_origin: false
                },
                "path {}",
                path
            );
            assert!(RouteGuard::check(&route, path, &Session::anonymous()).is_allow());
        }

        let admin_only = AppRoute::from_path("/admin/");
        assert!(!RouteGuard::check(&admin_only, "/admin/", &user).is_allow());
    }

    #[test]
    fn test_origin_survives_reevaluation_of_login_page() {
        // 深链接加载：受保护路径被重定向到登录页并记录来源
        let anonymous = Session::anonymous();
        let requested = AppRoute::from_path("/allfolders/logos/");
        let decision = RouteGuard::check(&requested, "/allfolders/logos/", &anonymous);
        let state = history_state(&decision, &requested, None, true);
        assert_eq!(state.as_deref(), Some("/allfolders/logos"));

        // 随后在登录页原地重新求值（会话监听、前进后退）不能丢失来源
        let login = AppRoute::Login;
        let decision = RouteGuard::check(&login, "/login", &anonymous);
        assert!(decision.is_allow());
        let state = history_state(&decision, &login, state.as_deref(), true);
        assert_eq!(state.as_deref(), Some("/allfolders/logos"));

        assert_eq!(
            post_login_target(state.as_deref(), "User"),
            "/allfolders/logos"
        );
    }

    #[test]
    fn test_new_entries_and_plain_redirects_drop_origin() {
        let login = AppRoute::Login;
        assert_eq!(
            history_state(&RouteDecision::Allow, &login, Some("/admin"), false),
            None
        );

        let user = Session::new("t", "User");
        let decision = RouteGuard::check(&login, "/login", &user);
        assert_eq!(history_state(&decision, &login, Some("/admin"), true), None);
    }

    #[test]
    fn test_check_skips_not_found() {
        let session = Session::anonymous();
        assert!(RouteGuard::check(&AppRoute::NotFound, "/nope", &session).is_allow());
        assert!(!RouteGuard::check(&AppRoute::Home, "/", &session).is_allow());
    }
}
