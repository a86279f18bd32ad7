//! 课时新增 / 编辑表单

use coursemart_shared::date::format_duration;
use coursemart_shared::protocol::{AddLectureRequest, UpdateLectureRequest};
use coursemart_shared::validation::UploadKind;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::form_state::{LectureFormState, rounded_duration};
use crate::auth::use_session;
use crate::components::notification::Notice;
use crate::components::upload::{selected_file, upload_checked};

#[component]
pub fn LectureForm(
    course_id: String,
    state: LectureFormState,
    notice: RwSignal<Option<Notice>>,
    /// 保存成功后调用（重新加载课程）
    on_saved: Callback<()>,
) -> impl IntoView {
    let session = use_session();
    let (saving, set_saving) = signal(false);
    let (uploading, set_uploading) = signal(false);

    let on_video = move |ev: web_sys::Event| {
        let Some(file) = selected_file(&ev) else {
            return;
        };
        set_uploading.set(true);
        spawn_local(async move {
            match upload_checked(&session.api(), UploadKind::Video, &file).await {
                Ok(uploaded) => {
                    state.video_url.set(uploaded.url);
                    state.duration.set(rounded_duration(uploaded.duration));
                    notice.set(Notice::success("Video uploaded successfully!"));
                }
                Err(message) => notice.set(Notice::error(message)),
            }
            set_uploading.set(false);
        });
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = match state.snapshot().into_draft() {
            Ok(draft) => draft,
            Err(rejected) => {
                notice.set(Notice::error(rejected.to_string()));
                return;
            }
        };
        let course_id = course_id.clone();
        let editing = state.editing.get_untracked();
        set_saving.set(true);
        spawn_local(async move {
            let api = session.api();
            let (result, done) = match editing {
                Some(lecture_id) => (
                    api.send(&UpdateLectureRequest {
                        course_id,
                        lecture_id,
                        draft,
                    })
                    .await,
                    "Lecture updated successfully!",
                ),
                None => (
                    api.send(&AddLectureRequest { course_id, draft }).await,
                    "Lecture added successfully!",
                ),
            };
            match result {
                Ok(_) => {
                    notice.set(Notice::success(done));
                    state.reset();
                    on_saved.run(());
                }
                Err(e) => {
                    log::error!("[Editor] Failed to save lecture: {e}");
                    notice.set(Notice::error(e.user_message("Failed to save lecture")));
                }
            }
            set_saving.set(false);
        });
    };

    view! {
        <form class="card bg-base-200 p-4 space-y-4" on:submit=on_submit>
            <h3 class="font-semibold text-lg">
                {move || if state.editing.with(Option::is_some) { "Edit Lecture" } else { "Add New Lecture" }}
            </h3>
            <label class="form-control">
                <span class="label-text">"Title *"</span>
                <input
                    class="input input-bordered"
                    prop:value=state.title
                    on:input=move |ev| state.title.set(event_target_value(&ev))
                    required
                />
            </label>
            <label class="form-control">
                <span class="label-text">"Description"</span>
                <textarea
                    class="textarea textarea-bordered"
                    rows="3"
                    prop:value=state.description
                    on:input=move |ev| state.description.set(event_target_value(&ev))
                ></textarea>
            </label>
            <div class="grid md:grid-cols-2 gap-4">
                <label class="form-control">
                    <span class="label-text">"Video URL *"</span>
                    <input
                        type="url"
                        class="input input-bordered"
                        placeholder="https://..."
                        prop:value=state.video_url
                        on:input=move |ev| state.video_url.set(event_target_value(&ev))
                    />
                </label>
                <label class="form-control">
                    <span class="label-text">"...or upload a video (max 100MB)"</span>
                    <input
                        type="file"
                        accept="video/*"
                        class="file-input file-input-bordered"
                        disabled=move || uploading.get()
                        on:change=on_video
                    />
                </label>
            </div>
            <div class="grid md:grid-cols-2 gap-4 items-end">
                <label class="form-control">
                    <span class="label-text">
                        {move || format!("Duration in seconds ({})", format_duration(state.duration.get()))}
                    </span>
                    <input
                        type="number"
                        min="0"
                        class="input input-bordered"
                        prop:value=move || state.duration.get().to_string()
                        on:input=move |ev| {
                            state.duration.set(event_target_value(&ev).trim().parse().unwrap_or(0));
                        }
                    />
                </label>
                <label class="label cursor-pointer justify-start gap-3">
                    <input
                        type="checkbox"
                        class="checkbox checkbox-primary"
                        prop:checked=state.is_free
                        on:change=move |ev| state.is_free.set(event_target_checked(&ev))
                    />
                    <span class="label-text">"Free preview"</span>
                </label>
            </div>
            <div class="flex gap-2 justify-end">
                <button type="button" class="btn btn-ghost" on:click=move |_| state.reset()>"Cancel"</button>
                <button type="submit" class="btn btn-primary" disabled=move || saving.get() || uploading.get()>
                    {move || if uploading.get() {
                        "Uploading..."
                    } else if saving.get() {
                        "Saving..."
                    } else {
                        "Save Lecture"
                    }}
                </button>
            </div>
        </form>
    }
}
