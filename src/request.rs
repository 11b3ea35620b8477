use crate::error::{ApiError, ApiResult};
use serde::de::DeserializeOwned;

pub use foldervault_shared::protocol::HttpMethod;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 请求体
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpBody {
    /// JSON 等文本
    Text(String),
    /// 上传到对象存储的原始字节
    Bytes(Vec<u8>),
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<HttpBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    /// 同名 header 会被覆盖
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(key));
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_json(self, body: String) -> Self {
        let mut req = self.with_header("Content-Type", "application/json");
        req.body = Some(HttpBody::Text(body));
        req
    }

    pub fn with_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.body = Some(HttpBody::Bytes(bytes));
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 解析 JSON 响应体；空 body 按 `{}` 处理
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        let body = if self.body.trim().is_empty() {
            "{}"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(body).map_err(ApiError::from)
    }

    /// 后端错误响应中的 `message` 字段
    pub fn error_message(&self) -> Option<String> {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            message: String,
        }
        serde_json::from_str::<ErrorBody>(&self.body)
            .ok()
            .map(|b| b.message)
    }
}

/// HTTP 客户端特性 (Trait)
/// 使用 async_trait 以支持异步调用，(?Send) 是因为浏览器环境下 JS 类型不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    /// 只有拿不到响应时才返回 Err；任何状态码都作为 Ok 返回
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
pub struct MockHttpClient {
    // ("METHOD URL", (Status, Response Body))，None 表示网络错误
    responses: RefCell<HashMap<String, Option<(u16, String)>>>,
    // 记录发出的请求
    pub requests: RefCell<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn route_key(method: HttpMethod, url: &str) -> String {
        format!("{} {}", method.as_str(), url)
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.responses
            .borrow_mut()
            .insert(Self::route_key(method, url), Some((status, body.to_string())));
    }

    pub fn mock_network_error(&self, method: HttpMethod, url: &str) {
        self.responses
            .borrow_mut()
            .insert(Self::route_key(method, url), None);
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let key = Self::route_key(req.method, &req.url);
        self.requests.borrow_mut().push(req);

        match self.responses.borrow().get(&key) {
            Some(Some((status, body))) => Ok(HttpResponse::new(*status, body.clone())),
            Some(None) => Err(ApiError::network(format!("connection refused: {}", key))),
            None => Ok(HttpResponse::new(404, "Not Found")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_header_replaces_existing() {
        let req = HttpRequest::new("https://x", HttpMethod::Get)
            .with_header("Authorization", "Bearer a")
            .with_header("authorization", "Bearer b");
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.header("Authorization"), Some("Bearer b"));
    }

    #[test]
    fn test_empty_body_decodes_as_object() {
        let resp = HttpResponse::new(204, "");
        let ack: foldervault_shared::Acknowledgement = resp.json().unwrap();
        assert_eq!(ack.message, None);
    }

    #[test]
    fn test_error_message_extraction() {
        let resp = HttpResponse::new(400, r#"{"message":"Invalid credentials"}"#);
        assert_eq!(resp.error_message().as_deref(), Some("Invalid credentials"));
        assert_eq!(HttpResponse::new(500, "oops").error_message(), None);
    }
}
