//! FolderVault 客户端核心
//!
//! 与平台无关的部分，浏览器前端和原生测试共用：
//! - `session`: 会话存储（token + role）
//! - `route` / `guard`: 路由表与导航守卫
//! - `request` / `gateway`: HTTP 抽象与统一的请求管道
//! - `api`: 类型化的后端操作

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod request;
pub mod route;
pub mod session;

pub use api::{FolderVaultApi, LoginOutcome, UploadSource};
pub use config::ClientConfig;
pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use gateway::{ApiGateway, AuthRecovery};
pub use guard::{RouteDecision, RouteGuard};
pub use route::{AppRoute, RoleSet};
pub use session::{MemoryStorage, Session, SessionStore, StorageBackend};
