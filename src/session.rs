//! 会话存储模块
//!
//! 会话（token + role）持久化在一个字符串键值存储中。
//! 浏览器中是 `localStorage`，测试中是 [`MemoryStorage`]。
//! 路由守卫和 API 网关都通过注入的 [`SessionStore`] 读取会话，而不是直接访问全局存储。

use crate::error::{ApiError, ApiResult};
use foldervault_shared::{DEFAULT_ROLE, STORAGE_ROLE_KEY, STORAGE_TOKEN_KEY};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

// =========================================================
// 存储后端抽象
// =========================================================

/// 同步的字符串键值存储
pub trait StorageBackend {
    fn get(&self, key: &str) -> Option<String>;
    /// 返回写入是否成功
    fn set(&self, key: &str, value: &str) -> bool;
    fn remove(&self, key: &str) -> bool;
}

/// 内存存储，克隆体共享同一份数据
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) -> bool {
        self.entries.borrow_mut().remove(key);
        true
    }
}

// =========================================================
// 会话
// =========================================================

/// 某一时刻的会话快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(token: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            role: Some(role.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// 生效角色：没有 token 或没有存储角色时为 `"User"`
    pub fn role(&self) -> &str {
        match (&self.token, &self.role) {
            (Some(_), Some(role)) => role,
            _ => DEFAULT_ROLE,
        }
    }
}

/// 会话存储
///
/// token 与 role 分别存放在各自的键下，读写都是同步的。
/// token 是不透明的，客户端不校验其内容或过期时间。
#[derive(Clone, Default)]
pub struct SessionStore<B> {
    backend: B,
}

impl<B: StorageBackend> SessionStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 保存登录得到的 token
    pub fn save(&self, token: &str) {
        if !self.backend.set(STORAGE_TOKEN_KEY, token) {
            log::warn!("[Session] failed to persist token");
        }
    }

    /// 保存服务端声明的角色，原样存储，不做大小写归一化
    pub fn save_role(&self, role: &str) {
        if !self.backend.set(STORAGE_ROLE_KEY, role) {
            log::warn!("[Session] failed to persist role");
        }
    }

    pub fn read(&self) -> Option<String> {
        self.backend.get(STORAGE_TOKEN_KEY)
    }

    pub fn role(&self) -> String {
        self.snapshot().role().to_string()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn snapshot(&self) -> Session {
        Session {
            token: self.read(),
            role: self.backend.get(STORAGE_ROLE_KEY),
        }
    }

    /// 清除 token 与 role，可重复调用
    ///
    /// 两个键都会尝试删除；任一失败时返回 `Storage` 错误，列出失败的键。
    pub fn clear(&self) -> ApiResult<()> {
        let failed: Vec<&str> = [STORAGE_TOKEN_KEY, STORAGE_ROLE_KEY]
            .into_iter()
            .filter(|key| !self.backend.remove(key))
            .collect();

        if failed.is_empty() {
            return Ok(());
        }
        log::warn!("[Session] failed to remove {}", failed.join(", "));
        Err(ApiError::storage(format!(
            "Failed to clear session keys: {}",
            failed.join(", ")
        ))
        .in_op("session.clear"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore<MemoryStorage> {
        SessionStore::new(MemoryStorage::new())
    }

    #[test]
    fn test_save_and_read() {
        let store = store();
        assert_eq!(store.read(), None);

        store.save("abc");
        store.save_role("Admin");

        assert_eq!(store.read().as_deref(), Some("abc"));
        assert_eq!(store.role(), "Admin");
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_role_defaults_to_user() {
        let store = store();
        store.save("abc");
        assert_eq!(store.role(), "User");
    }

    #[test]
    fn test_role_ignored_without_token() {
        let store = store();
        store.save_role("Admin");
        assert_eq!(store.role(), "User");
        assert!(!store.snapshot().is_authenticated());
    }

    #[test]
    fn test_role_stored_verbatim() {
        let store = store();
        store.save("abc");
        store.save_role("admin");
        assert_eq!(store.role(), "admin");
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = store();
        store.save("abc");
        store.save_role("Admin");

        store.clear().unwrap();
        let once = store.snapshot();
        store.clear().unwrap();
        let twice = store.snapshot();

        assert_eq!(once, Session::anonymous());
        assert_eq!(once, twice);
        assert!(store.backend().is_empty());
    }

    #[test]
    fn test_clones_share_storage() {
        let store = store();
        let other = store.clone();
        store.save("abc");
        assert_eq!(other.read().as_deref(), Some("abc"));
        other.clear().unwrap();
        assert_eq!(store.read(), None);
    }

    /// 删除 token 总是失败的存储
    #[derive(Clone, Default)]
    struct StickyTokenStorage {
        inner: MemoryStorage,
    }

    impl StorageBackend for StickyTokenStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> bool {
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> bool {
            key != STORAGE_TOKEN_KEY && self.inner.remove(key)
        }
    }

    #[test]
    fn test_clear_reports_failed_removal() {
        let store = SessionStore::new(StickyTokenStorage::default());
        store.save("abc");
        store.save_role("Admin");

        let err = store.clear().unwrap_err();
        assert_eq!(err.kind, crate::error::ApiErrorKind::Storage);
        assert!(err.message().contains("token"));
        assert_eq!(err.spans()[0].operation, "session.clear");

        // role 仍然被删除
        assert_eq!(store.backend().inner.get(STORAGE_ROLE_KEY), None);
        assert!(store.is_authenticated());
    }
}
