//! 文件选择与上传的公共逻辑

use coursemart_shared::protocol::UploadResponse;
use coursemart_shared::validation::UploadKind;
use wasm_bindgen::JsCast;

use crate::api::CourseApi;

/// `<input type="file">` change 事件中选中的第一个文件
pub fn selected_file(ev: &web_sys::Event) -> Option<web_sys::File> {
    ev.target()?
        .dyn_into::<web_sys::HtmlInputElement>()
        .ok()?
        .files()?
        .get(0)
}

/// 校验类型与大小后上传；错误已转换为可直接展示的文本
pub async fn upload_checked(
    api: &CourseApi,
    kind: UploadKind,
    file: &web_sys::File,
) -> Result<UploadResponse, String> {
    kind.check(&file.type_(), file.size())
        .map_err(|rejected| rejected.to_string())?;

    let fallback = match kind {
        UploadKind::Image => "Failed to upload image",
        UploadKind::Video => "Failed to upload video",
    };
    api.upload(kind, file).await.map_err(|e| {
        log::error!("[Upload] {} failed: {e}", file.name());
        e.user_message(fallback)
    })
}
