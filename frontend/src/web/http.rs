//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现核心库的 [`HttpClient`]。

use foldervault::error::{ApiError, ApiResult};
use foldervault::request::{HttpBody, HttpClient, HttpRequest, HttpResponse};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

/// 基于浏览器 fetch 的 HTTP 客户端
#[derive(Clone, Copy, Default)]
pub struct FetchClient;

impl FetchClient {
    fn build(req: &HttpRequest) -> ApiResult<Request> {
        let headers = Headers::new()
            .map_err(|e| ApiError::network(format!("创建 Headers 失败: {:?}", e)))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| ApiError::network(format!("设置 Header 失败: {:?}", e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        match &req.body {
            Some(HttpBody::Text(body)) => opts.set_body(&JsValue::from_str(body)),
            Some(HttpBody::Bytes(bytes)) => {
                let array = js_sys::Uint8Array::from(bytes.as_slice());
                opts.set_body(&array.into());
            }
            None => {}
        }

        Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| ApiError::network(format!("请求构建失败: {:?}", e)))
    }

    async fn text(response: &Response) -> ApiResult<String> {
        let promise = response
            .text()
            .map_err(|e| ApiError::serialization(format!("{:?}", e)))?;

        let text = JsFuture::from(promise)
            .await
            .map_err(|e| ApiError::serialization(format!("{:?}", e)))?;

        text.as_string()
            .ok_or_else(|| ApiError::serialization("无法转换为字符串"))
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let request = Self::build(&req)?;

        let window =
            web_sys::window().ok_or_else(|| ApiError::network("无法获取 window 对象"))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ApiError::network(format!("网络错误: {:?}", e)))?;

        let response: Response = resp_value.dyn_into().map_err(|e| {
            ApiError::serialization(format!("Response 类型转换失败: {:?}", e))
        })?;

        Ok(HttpResponse {
            status: response.status(),
            body: Self::text(&response).await?,
        })
    }
}
