//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性。

use foldervault_shared::ADMIN_ROLE;
use std::collections::BTreeSet;
use std::fmt::Display;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const ALL_FOLDERS_PATH: &str = "/allfolders";
pub const ADMIN_PATH: &str = "/admin";

/// 无需登录即可访问的路径
pub const PUBLIC_PATHS: [&str; 2] = [LOGIN_PATH, REGISTER_PATH];

pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

/// 受保护路由允许的角色集合
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSet(BTreeSet<String>);

impl RoleSet {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(roles.into_iter().map(Into::into).collect())
    }

    /// 精确匹配，区分大小写
    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }
}

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    #[default]
    Login,
    Register,
    /// `/`
    Home,
    /// `/allfolders`
    AllFolders,
    /// `/allfolders/:foldername`
    Folder(String),
    /// `/admin`，仅 Admin 角色
    Admin,
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let trimmed = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };

        match trimmed {
            "/" | "" => Self::Home,
            LOGIN_PATH => Self::Login,
            REGISTER_PATH => Self::Register,
            ALL_FOLDERS_PATH => Self::AllFolders,
            ADMIN_PATH => Self::Admin,
            other => match other.strip_prefix("/allfolders/") {
                Some(name) if !name.is_empty() && !name.contains('/') => {
                    Self::Folder(decode_segment(name))
                }
                _ => Self::NotFound,
            },
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => LOGIN_PATH.to_string(),
            Self::Register => REGISTER_PATH.to_string(),
            Self::Home => "/".to_string(),
            Self::AllFolders => ALL_FOLDERS_PATH.to_string(),
            Self::Folder(name) => format!("{}/{}", ALL_FOLDERS_PATH, urlencoding::encode(name)),
            Self::Admin => ADMIN_PATH.to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 未匹配的路径只渲染 404，不参与守卫
    pub fn is_guarded(&self) -> bool {
        !matches!(self, Self::NotFound)
    }

    /// 路由声明的角色要求，`None` 表示任意已登录角色
    pub fn required_roles(&self) -> Option<RoleSet> {
        match self {
            Self::Admin => Some(RoleSet::new([ADMIN_ROLE])),
            _ => None,
        }
    }

    /// 导航栏只在登录/注册页隐藏
    pub fn shows_navbar(&self) -> bool {
        !self.is_public()
    }
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_table() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Home);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/register"), AppRoute::Register);
        assert_eq!(AppRoute::from_path("/allfolders"), AppRoute::AllFolders);
        assert_eq!(AppRoute::from_path("/allfolders/"), AppRoute::AllFolders);
        assert_eq!(AppRoute::from_path("/admin"), AppRoute::Admin);
        assert_eq!(
            AppRoute::from_path("/allfolders/logos"),
            AppRoute::Folder("logos".into())
        );
        assert_eq!(AppRoute::from_path("/allfolders/a/b"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/settings"), AppRoute::NotFound);
    }

    #[test]
    fn test_folder_names_are_percent_encoded() {
        let route = AppRoute::Folder("brand assets".into());
        assert_eq!(route.to_path(), "/allfolders/brand%20assets");
        assert_eq!(AppRoute::from_path(&route.to_path()), route);
    }

    #[test]
    fn test_only_admin_declares_roles() {
        let roles = AppRoute::Admin.required_roles().unwrap();
        assert!(roles.contains("Admin"));
        assert!(!roles.contains("admin"));
        assert!(AppRoute::AllFolders.required_roles().is_none());
    }

    #[test]
    fn test_navbar_hidden_on_public_pages() {
        assert!(!AppRoute::Login.shows_navbar());
        assert!(!AppRoute::Register.shows_navbar());
        assert!(AppRoute::Folder("x".into()).shows_navbar());
    }
}
