//! HTTP 请求封装模块
//!
//! 基于 `gloo-net`，对外只暴露构建器与最小的响应接口，
//! 页面层不直接接触 `gloo_net` 类型。

use coursemart_shared::ApiError;
use coursemart_shared::protocol::HttpMethod;
use gloo_net::http::{Request, RequestBuilder, Response};
use thiserror::Error;
use wasm_bindgen::JsValue;

/// HTTP 错误类型
#[derive(Debug, Error)]
pub enum HttpError {
    /// 请求构建失败
    #[error("请求构建失败: {0}")]
    RequestBuildFailed(String),
    /// 网络请求失败
    #[error("网络错误: {0}")]
    NetworkError(String),
    /// 响应解析失败
    #[error("响应解析失败: {0}")]
    ResponseParseFailed(String),
}

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::RequestBuildFailed(msg) => ApiError::Encode(msg),
            HttpError::NetworkError(msg) => ApiError::Network(msg),
            HttpError::ResponseParseFailed(msg) => ApiError::Decode(msg),
        }
    }
}

/// HTTP 响应封装
pub struct HttpResponse {
    inner: Response,
}

impl HttpResponse {
    /// 获取 HTTP 状态码
    pub fn status(&self) -> u16 {
        self.inner.status()
    }

    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        self.inner.ok()
    }

    /// 获取响应体文本
    pub async fn text(self) -> Result<String, HttpError> {
        self.inner
            .text()
            .await
            .map_err(|e| HttpError::ResponseParseFailed(e.to_string()))
    }
}

/// HTTP 请求构建器
pub struct HttpRequestBuilder {
    inner: RequestBuilder,
    body: Option<JsValue>,
}

impl HttpRequestBuilder {
    fn new(inner: RequestBuilder) -> Self {
        Self { inner, body: None }
    }

    /// 添加请求头
    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.inner = self.inner.header(key, value);
        self
    }

    /// 设置 JSON 请求体
    pub fn json_body(self, body: String) -> Self {
        let mut builder = self.header("Content-Type", "application/json");
        builder.body = Some(JsValue::from_str(&body));
        builder
    }

    /// 设置 multipart 请求体，Content-Type 由浏览器生成
    pub fn form(mut self, form: web_sys::FormData) -> Self {
        self.body = Some(form.into());
        self
    }

    /// 发送请求
    pub async fn send(self) -> Result<HttpResponse, HttpError> {
        let request: Request = match self.body {
            Some(body) => self.inner.body(body),
            None => self.inner.build(),
        }
        .map_err(|e| HttpError::RequestBuildFailed(e.to_string()))?;

        let inner = request
            .send()
            .await
            .map_err(|e| HttpError::NetworkError(e.to_string()))?;

        Ok(HttpResponse { inner })
    }
}

/// 轻量级 HTTP 客户端
pub struct HttpClient;

impl HttpClient {
    pub fn request(method: HttpMethod, url: &str) -> HttpRequestBuilder {
        let builder = match method {
            HttpMethod::Get => Request::get(url),
            HttpMethod::Post => Request::post(url),
            HttpMethod::Put => Request::put(url),
            HttpMethod::Delete => Request::delete(url),
            HttpMethod::Patch => Request::patch(url),
        };
        HttpRequestBuilder::new(builder)
    }

    /// 创建 POST 请求
    pub fn post(url: &str) -> HttpRequestBuilder {
        Self::request(HttpMethod::Post, url)
    }
}
