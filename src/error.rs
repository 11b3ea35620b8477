use std::fmt;

// =========================================================
// 错误类型枚举
// =========================================================

/// 客户端错误分类
/// 包含错误对应的语义（状态码）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 400: 发请求前的本地校验失败
    InvalidInput,
    /// 401/403: 会话失效，已清除会话并触发恢复
    SessionInvalid,
    /// 后端以非 2xx 拒绝了请求（401/403 之外）
    Rejected,
    /// 网络层失败，没有拿到响应
    Network,
    /// 请求或响应体的 JSON 编解码失败
    Serialization,
    /// 会话存储读写失败
    Storage,
}

impl ApiErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiErrorKind::InvalidInput | ApiErrorKind::Serialization => 400,
            ApiErrorKind::SessionInvalid => 401,
            ApiErrorKind::Rejected | ApiErrorKind::Storage => 500,
            ApiErrorKind::Network => 503,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiErrorKind::InvalidInput => "INVALID_INPUT",
            ApiErrorKind::SessionInvalid => "SESSION_INVALID",
            ApiErrorKind::Rejected => "REQUEST_REJECTED",
            ApiErrorKind::Network => "NETWORK_ERROR",
            ApiErrorKind::Serialization => "JSON_PARSE_ERROR",
            ApiErrorKind::Storage => "STORAGE_ERROR",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
/// 记录错误发生时的操作和相关细节
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    /// 操作名称，如 "upload.confirm", "files.list"
    pub operation: String,
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端领域错误
///
/// - kind: 错误类型/语义
/// - message: 可直接展示给用户的消息
/// - status: 后端返回的 HTTP 状态码（如果有）
/// - spans: 结构化的调用追踪栈，流水线中用于标记失败的阶段
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    status: Option<u16>,
    spans: Vec<ErrorSpan>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::InvalidInput, message)
    }

    pub fn session_invalid(status: u16) -> Self {
        Self::new(ApiErrorKind::SessionInvalid, "Session expired, please log in again")
            .with_status(status)
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Rejected, message).with_status(status)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Serialization, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Storage, message)
    }

    // --- Context builders (Builder Pattern) ---

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// 添加操作追踪（无额外细节）
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    /// 添加操作追踪（带额外细节）
    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    // --- Accessors ---

    /// 后端状态码；本地错误回退到分类的默认状态码
    pub fn status_code(&self) -> u16 {
        self.status.unwrap_or_else(|| self.kind.status_code())
    }

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    pub fn is_session_invalid(&self) -> bool {
        self.kind == ApiErrorKind::SessionInvalid
    }
}

// =========================================================
// Display & Error trait 实现
// =========================================================

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::serialization(e.to_string())
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_trace() {
        let err = ApiError::rejected(500, "boom")
            .in_op("upload.confirm")
            .in_op_with("upload", "logos");
        assert_eq!(
            err.to_string(),
            "[REQUEST_REJECTED] boom | trace: upload.confirm -> upload(logos)"
        );
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_status_falls_back_to_kind() {
        assert_eq!(ApiError::invalid_input("x").status_code(), 400);
        assert_eq!(ApiError::session_invalid(403).status_code(), 403);
        assert!(ApiError::session_invalid(401).is_session_invalid());
        assert_eq!(ApiError::storage("x").status_code(), 500);
        assert_eq!(ApiError::storage("x").error_code(), "STORAGE_ERROR");
    }
}
