//! REST 客户端
//!
//! 所有端点都以 [`ApiRequest`] 描述，这里只负责拼 URL、挂 token、
//! 解析响应和把非 2xx 状态归类为 [`ApiError`]。

use std::time::Duration;

use async_trait::async_trait;
use coursemart_shared::learning::session::LearningBackend;
use coursemart_shared::protocol::{
    ApiRequest, CompleteLectureRequest, CourseContentRequest, ErrorBody, ProgressRequest,
    UPLOAD_IMAGE_PATH, UPLOAD_VIDEO_PATH, UploadResponse,
};
use coursemart_shared::validation::UploadKind;
use coursemart_shared::{
    ApiError, Comment, CommentAuthor, Course, HEADER_AUTHORIZATION, Timestamp,
};
use leptos::prelude::*;
use serde::de::DeserializeOwned;

use crate::web::{HttpClient, HttpRequestBuilder, HttpResponse};

#[derive(Clone)]
pub struct CourseApi {
    base_url: String,
    token: Option<String>,
    on_unauthorized: Option<Callback<()>>,
}

impl CourseApi {
    pub fn new(base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            token: None,
            on_unauthorized: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// 收到 401 时调用（全局注销 + 跳转登录）
    pub fn on_unauthorized(mut self, callback: Callback<()>) -> Self {
        self.on_unauthorized = Some(callback);
        self
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    // 认证头
    fn authorize(&self, builder: HttpRequestBuilder) -> HttpRequestBuilder {
        match &self.token {
            Some(token) => builder.header(HEADER_AUTHORIZATION, &format!("Bearer {token}")),
            None => builder,
        }
    }

    /// 发送一个类型化请求
    pub async fn send<R: ApiRequest>(&self, request: &R) -> Result<R::Response, ApiError> {
        let path = request.path();
        let mut builder = self.authorize(HttpClient::request(R::METHOD, &self.url(&path)));
        if R::METHOD.has_body() {
            let body =
                serde_json::to_string(request).map_err(|e| ApiError::Encode(e.to_string()))?;
            builder = builder.json_body(body);
        }

        let response = builder.send().await.map_err(|e| {
            log::error!("[Api] {:?} {path} failed: {e}", R::METHOD);
            ApiError::from(e)
        })?;
        self.read(&path, response).await
    }

    /// multipart 上传，文件需先通过 [`UploadKind::check`]
    pub async fn upload(
        &self,
        kind: UploadKind,
        file: &web_sys::File,
    ) -> Result<UploadResponse, ApiError> {
        let form = web_sys::FormData::new()
            .map_err(|e| ApiError::Encode(format!("FormData: {e:?}")))?;
        form.append_with_blob(kind.field_name(), file)
            .map_err(|e| ApiError::Encode(format!("FormData: {e:?}")))?;

        let path = match kind {
            UploadKind::Image => UPLOAD_IMAGE_PATH,
            UploadKind::Video => UPLOAD_VIDEO_PATH,
        };
        log::info!("[Api] uploading {} ({} bytes) to {path}", file.name(), file.size());

        let response = self
            .authorize(HttpClient::post(&self.url(path)))
            .form(form)
            .send()
            .await?;
        self.read(path, response).await
    }

    async fn read<T: DeserializeOwned>(
        &self,
        path: &str,
        response: HttpResponse,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let ok = response.ok();
        let text = response.text().await?;

        if !ok {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.message);
            let err = ApiError::from_status(status, message);
            if err == ApiError::Unauthorized {
                if let Some(callback) = &self.on_unauthorized {
                    callback.run(());
                }
            }
            log::warn!("[Api] {path} -> {err}");
            return Err(err);
        }

        decode_success(&text).inspect_err(|err| log::warn!("[Api] {path} -> {err}"))
    }
}

/// 解析 2xx 响应体
///
/// 空体或非 JSON 文本按 `{}` 解析，只需确认的响应（如 [`Ack`]）因此也能成功；
/// 要求字段的响应类型仍然返回 `Decode`。
///
/// [`Ack`]: coursemart_shared::protocol::Ack
fn decode_success<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let body = text.trim();
    let is_json = !body.is_empty() && serde_json::from_str::<serde_json::Value>(body).is_ok();
    let body = if is_json { body } else { "{}" };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

// =========================================================
// 学习页后端
// =========================================================

#[async_trait(?Send)]
impl LearningBackend for CourseApi {
    async fn course_content(&self, course_id: &str) -> Result<Course, ApiError> {
        let request = CourseContentRequest {
            course_id: course_id.to_string(),
        };
        Ok(self.send(&request).await?.course)
    }

    async fn completed_lectures(&self, course_id: &str) -> Result<Vec<String>, ApiError> {
        let request = ProgressRequest {
            course_id: course_id.to_string(),
        };
        Ok(self.send(&request).await?.into_completed())
    }

    async fn complete_lecture(&self, course_id: &str, lecture_id: &str) -> Result<(), ApiError> {
        let request = CompleteLectureRequest {
            course_id: course_id.to_string(),
            lecture_id: lecture_id.to_string(),
        };
        self.send(&request).await.map(|_| ())
    }

    /// 后端没有评论接口，返回固定的示例讨论
    async fn lecture_comments(
        &self,
        _course_id: &str,
        _lecture_id: &str,
    ) -> Result<Vec<Comment>, ApiError> {
        Ok(demo_comments(Timestamp::now()))
    }
}

fn demo_comments(now: Timestamp) -> Vec<Comment> {
    let seed = [
        (
            1,
            "John Doe",
            "Great explanation! Very helpful.",
            Duration::from_secs(2 * 3_600),
        ),
        (
            2,
            "Jane Smith",
            "Can you explain the concept at 5:30 again?",
            Duration::from_secs(24 * 3_600),
        ),
    ];
    seed.into_iter()
        .map(|(id, name, text, age)| Comment {
            id,
            author: CommentAuthor {
                name: name.to_string(),
                avatar: None,
            },
            text: text.to_string(),
            posted_at: now - age,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursemart_shared::protocol::{Ack, CourseEnvelope};

    #[test]
    fn empty_or_plain_text_success_bodies_are_acknowledged() {
        assert_eq!(decode_success::<Ack>(""), Ok(Ack::default()));
        assert_eq!(decode_success::<Ack>("  \n"), Ok(Ack::default()));
        assert_eq!(decode_success::<Ack>("OK"), Ok(Ack::default()));

        let ack: Ack = decode_success(r#"{"success":true,"message":"Lecture completed"}"#).unwrap();
        assert_eq!(ack.success, Some(true));
        assert_eq!(ack.message.as_deref(), Some("Lecture completed"));
    }

    #[test]
    fn success_bodies_missing_required_fields_still_fail() {
        assert!(matches!(decode_success::<CourseEnvelope>(""), Err(ApiError::Decode(_))));
        assert!(matches!(
            decode_success::<CourseEnvelope>(r#"{"courses":[]}"#),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn base_url_is_normalised() {
        let api = CourseApi::new("http://localhost:5000/api/".into());
        assert_eq!(api.url("/courses"), "http://localhost:5000/api/courses");
        assert_eq!(api.url("courses"), "http://localhost:5000/api/courses");
    }

    #[test]
    fn demo_comments_are_newest_first() {
        let now = Timestamp::new(10 * 24 * 3_600 * 1_000);
        let comments = demo_comments(now);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].posted_at.relative_to(now), "2 hours ago");
        assert_eq!(comments[1].posted_at.relative_to(now), "1 day ago");
        assert!(comments[0].posted_at > comments[1].posted_at);
    }
}
