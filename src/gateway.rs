//! API 网关
//!
//! 所有发往后端的请求都经过这里：注入 `Authorization: Bearer <token>`，
//! 并在 401/403 时清除会话、调用注入的 [`AuthRecovery`]（浏览器中是整页跳转到登录页）。
//! 恢复动作对每个失败响应只触发一次，原请求不会重试。

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::request::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use crate::route::LOGIN_PATH;
use crate::session::{SessionStore, StorageBackend};
use foldervault_shared::HEADER_AUTHORIZATION;
use foldervault_shared::protocol::ApiRequest;

/// 会话失效后的恢复处理
pub trait AuthRecovery {
    fn recover(&self, login_path: &str);
}

fn is_auth_failure(status: u16) -> bool {
    status == 401 || status == 403
}

#[derive(Clone)]
pub struct ApiGateway<C, B, R> {
    config: ClientConfig,
    client: C,
    session: SessionStore<B>,
    recovery: R,
}

impl<C, B, R> ApiGateway<C, B, R>
where
    C: HttpClient,
    B: StorageBackend,
    R: AuthRecovery,
{
    pub fn new(config: ClientConfig, client: C, session: SessionStore<B>, recovery: R) -> Self {
        Self {
            config,
            client,
            session,
            recovery,
        }
    }

    pub fn session(&self) -> &SessionStore<B> {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn recovery(&self) -> &R {
        &self.recovery
    }

    fn authorize(&self, req: HttpRequest) -> HttpRequest {
        match self.session.read() {
            Some(token) => req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token)),
            None => req,
        }
    }

    /// 响应拦截：401/403 触发恢复，其他非 2xx 原样转为错误
    fn intercept(&self, resp: HttpResponse) -> ApiResult<HttpResponse> {
        if is_auth_failure(resp.status) {
            log::warn!(
                "[Gateway] authorization failed ({}), clearing session",
                resp.status
            );
            if let Err(e) = self.session.clear() {
                log::error!("[Gateway] {}", e);
            }
            self.recovery.recover(LOGIN_PATH);
            return Err(ApiError::session_invalid(resp.status));
        }

        if !resp.is_success() {
            let message = resp
                .error_message()
                .unwrap_or_else(|| format!("Request failed with status {}", resp.status));
            return Err(ApiError::rejected(resp.status, message));
        }

        Ok(resp)
    }

    /// 带凭据的原始请求
    pub async fn dispatch(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
        headers: &[(&str, &str)],
    ) -> ApiResult<HttpResponse> {
        let url = self.config.url(path);
        log::debug!("[Gateway] {} {}", method.as_str(), url);

        let mut req = HttpRequest::new(&url, method);
        for (key, value) in headers {
            req = req.with_header(key, value);
        }
        if let Some(body) = body {
            req = req.with_json(body);
        }

        let resp = self.client.send(self.authorize(req)).await?;
        self.intercept(resp)
    }

    /// 带凭据的类型化请求
    pub async fn send<Q: ApiRequest>(&self, request: &Q) -> ApiResult<Q::Response> {
        let body = if request.has_body() {
            Some(serde_json::to_string(request)?)
        } else {
            None
        };
        let resp = self.dispatch(Q::METHOD, &request.path(), body, &[]).await?;
        resp.json()
    }

    /// 匿名请求（登录、注册）
    ///
    /// 不附带凭据，不做拦截：任何状态码都原样返回给调用方，会话保持不变。
    pub async fn send_anonymous<Q: ApiRequest>(&self, request: &Q) -> ApiResult<HttpResponse> {
        let url = self.config.url(&request.path());
        log::debug!("[Gateway] {} {} (anonymous)", Q::METHOD.as_str(), url);

        let mut req = HttpRequest::new(&url, Q::METHOD);
        if request.has_body() {
            req = req.with_json(serde_json::to_string(request)?);
        }
        self.client.send(req).await
    }

    /// 直接上传到预签名地址，地址本身带授权，不注入 token
    pub async fn put_object(&self, url: &str, content_type: &str, bytes: Vec<u8>) -> ApiResult<()> {
        log::debug!("[Gateway] PUT object ({} bytes)", bytes.len());
        let req = HttpRequest::new(url, HttpMethod::Put)
            .with_header("Content-Type", content_type)
            .with_bytes(bytes);

        let resp = self.client.send(req).await?;
        if !resp.is_success() {
            return Err(ApiError::rejected(
                resp.status,
                format!("Object storage rejected upload with status {}", resp.status),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ApiErrorKind;
    use crate::request::MockHttpClient;
    use crate::session::MemoryStorage;
    use foldervault_shared::protocol::{ListFilesRequest, ListFoldersRequest, LoginRequest};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    pub const BASE: &str = "http://api.test/api";

    /// 记录恢复调用
    #[derive(Clone, Default)]
    pub struct RecordingRecovery {
        pub calls: Rc<RefCell<Vec<String>>>,
    }

    impl AuthRecovery for RecordingRecovery {
        fn recover(&self, login_path: &str) {
            self.calls.borrow_mut().push(login_path.to_string());
        }
    }

    pub type TestGateway = ApiGateway<MockHttpClient, MemoryStorage, RecordingRecovery>;

    pub fn gateway() -> TestGateway {
        ApiGateway::new(
            ClientConfig::new(BASE),
            MockHttpClient::new(),
            SessionStore::new(MemoryStorage::new()),
            RecordingRecovery::default(),
        )
    }

    pub fn logged_in(role: &str) -> TestGateway {
        let gw = gateway();
        gw.session().save("tok-1");
        gw.session().save_role(role);
        gw
    }

    #[tokio::test]
    async fn test_attaches_bearer_token() {
        let gw = logged_in("User");
        gw.client().mock_response(
            HttpMethod::Get,
            &format!("{}/folders/list-folders", BASE),
            200,
            json!({ "folders": [{ "name": "logos", "totalItems": 2 }], "message": "ok", "prefix": "" }),
        );

        let listing = gw.send(&ListFoldersRequest).await.unwrap();
        assert_eq!(listing.folders.len(), 1);

        let req = gw.client().last_request().unwrap();
        assert_eq!(req.header("Authorization"), Some("Bearer tok-1"));
        assert!(req.body.is_none());
    }

    #[tokio::test]
    async fn test_no_header_without_token() {
        let gw = gateway();
        gw.client().mock_response(
            HttpMethod::Get,
            &format!("{}/folders/list-folders", BASE),
            200,
            json!({}),
        );
        gw.send(&ListFoldersRequest).await.unwrap();
        assert_eq!(gw.client().last_request().unwrap().header("Authorization"), None);
    }

    #[tokio::test]
    async fn test_auth_failure_clears_session_and_recovers_once() {
        for status in [401u16, 403] {
            let gw = logged_in("Admin");
            let url = format!("{}/files/logos", BASE);
            gw.client()
                .mock_response(HttpMethod::Get, &url, status, json!({ "message": "expired" }));

            let err = gw
                .send(&ListFilesRequest {
                    folder: "logos".into(),
                })
                .await
                .unwrap_err();

            assert_eq!(err.kind, ApiErrorKind::SessionInvalid);
            assert_eq!(err.status_code(), status);
            assert_eq!(gw.session().read(), None);
            assert_eq!(gw.session().role(), "User");
            assert_eq!(*gw.recovery().calls.borrow(), vec!["/login".to_string()]);
            assert_eq!(gw.client().request_count(), 1, "must not retry");
        }
    }

    #[tokio::test]
    async fn test_other_errors_pass_through() {
        let gw = logged_in("User");
        let url = format!("{}/folders/list-folders", BASE);
        gw.client()
            .mock_response(HttpMethod::Get, &url, 500, json!({ "message": "S3 unavailable" }));

        let err = gw.send(&ListFoldersRequest).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Rejected);
        assert_eq!(err.message(), "S3 unavailable");
        assert_eq!(gw.session().read().as_deref(), Some("tok-1"));
        assert!(gw.recovery().calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_network_error_passes_through() {
        let gw = logged_in("User");
        gw.client()
            .mock_network_error(HttpMethod::Get, &format!("{}/folders/list-folders", BASE));

        let err = gw.send(&ListFoldersRequest).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Network);
        assert!(gw.session().is_authenticated());
        assert!(gw.recovery().calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_raw_dispatch_intercepts_any_path() {
        let gw = logged_in("User");
        gw.client().mock_response(
            HttpMethod::Post,
            &format!("{}/some/other/path", BASE),
            403,
            json!({}),
        );

        let err = gw
            .dispatch(
                HttpMethod::Post,
                "/some/other/path",
                Some("{}".into()),
                &[("X-Trace", "1")],
            )
            .await
            .unwrap_err();

        assert!(err.is_session_invalid());
        assert_eq!(gw.session().read(), None);
        let req = gw.client().last_request().unwrap();
        assert_eq!(req.header("X-Trace"), Some("1"));
        assert_eq!(req.header("Content-Type"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_anonymous_skips_credentials_and_recovery() {
        let gw = logged_in("User");
        gw.client().mock_response(
            HttpMethod::Post,
            &format!("{}/auth/login", BASE),
            401,
            json!({ "message": "Invalid credentials" }),
        );

        let resp = gw
            .send_anonymous(&LoginRequest {
                email: "a@b.c".into(),
                password: "x".into(),
            })
            .await
            .unwrap();

        assert_eq!(resp.status, 401);
        assert_eq!(gw.session().read().as_deref(), Some("tok-1"));
        assert!(gw.recovery().calls.borrow().is_empty());
        assert_eq!(gw.client().last_request().unwrap().header("Authorization"), None);
    }

    #[tokio::test]
    async fn test_put_object_sends_raw_bytes() {
        let gw = logged_in("User");
        gw.client()
            .mock_response(HttpMethod::Put, "https://s3.test/up?sig=1", 200, json!({}));

        gw.put_object("https://s3.test/up?sig=1", "image/png", vec![1, 2, 3])
            .await
            .unwrap();

        let req = gw.client().last_request().unwrap();
        assert_eq!(req.header("Authorization"), None);
        assert_eq!(req.header("Content-Type"), Some("image/png"));
        assert_eq!(req.body, Some(crate::request::HttpBody::Bytes(vec![1, 2, 3])));
    }
}
