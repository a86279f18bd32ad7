//! 讲师的课程创建 / 编辑页
//!
//! 此模块按职责拆分为以下子模块：
//! - `form_state`: 表单状态管理（数据持有、回填、转换为请求对象）
//! - `list_field`: 可增删的文本列表输入
//! - `lecture_form`: 课时表单与视频上传

mod form_state;
mod lecture_form;
mod list_field;

use coursemart_shared::date::format_duration;
use coursemart_shared::protocol::{
    CreateCourseRequest, DeleteCourseRequest, DeleteLectureRequest, GetCourseRequest,
    PublishCourseRequest, UpdateCourseRequest,
};
use coursemart_shared::validation::UploadKind;
use coursemart_shared::{Course, CourseLevel, CourseStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_session;
use crate::components::icons::{ChevronLeft, Pencil, Plus, Trash2};
use crate::components::loading::Loading;
use crate::components::notification::{Notice, Toast};
use crate::components::upload::{selected_file, upload_checked};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

use form_state::{CATEGORIES, CourseFormState, LectureFormState};
use lecture_form::LectureForm;
use list_field::ListField;

/// 浏览器确认框；无法弹出时视为取消
fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// 课程基本信息表单（创建与编辑共用）
#[component]
fn CourseDetailsForm(state: CourseFormState, notice: RwSignal<Option<Notice>>) -> impl IntoView {
    let session = use_session();
    let (uploading, set_uploading) = signal(false);

    let on_thumbnail = move |ev: web_sys::Event| {
        let Some(file) = selected_file(&ev) else {
            return;
        };
        set_uploading.set(true);
        spawn_local(async move {
            match upload_checked(&session.api(), UploadKind::Image, &file).await {
                Ok(uploaded) => {
                    state.thumbnail.set(uploaded.url);
                    notice.set(Notice::success("Thumbnail uploaded successfully!"));
                }
                Err(message) => notice.set(Notice::error(message)),
            }
            set_uploading.set(false);
        });
    };

    view! {
        <label class="form-control">
            <span class="label-text">"Title *"</span>
            <input
                class="input input-bordered"
                placeholder="e.g. Complete Rust Bootcamp"
                prop:value=state.title
                on:input=move |ev| state.title.set(event_target_value(&ev))
                required
            />
        </label>
        <label class="form-control">
            <span class="label-text">"Description *"</span>
            <textarea
                class="textarea textarea-bordered"
                rows="5"
                prop:value=state.description
                on:input=move |ev| state.description.set(event_target_value(&ev))
                required
            ></textarea>
        </label>

        <div class="grid md:grid-cols-2 gap-4">
            <label class="form-control">
                <span class="label-text">"Category *"</span>
                <select class="select select-bordered" on:change=move |ev| state.category.set(event_target_value(&ev))>
                    <option value="" selected=move || state.category.with(String::is_empty)>"Select a category"</option>
                    {CATEGORIES.into_iter().map(|c| view! {
                        <option value=c selected=move || state.category.with(|cur| cur == c)>{c}</option>
                    }).collect_view()}
                </select>
            </label>
            <label class="form-control">
                <span class="label-text">"Level"</span>
                <select
                    class="select select-bordered"
                    on:change=move |ev| {
                        if let Some(level) = CourseLevel::parse(&event_target_value(&ev)) {
                            state.level.set(level);
                        }
                    }
                >
                    {CourseLevel::ALL.into_iter().map(|level| view! {
                        <option value=level.as_str() selected=move || state.level.get() == level class="capitalize">
                            {level.as_str()}
                        </option>
                    }).collect_view()}
                </select>
            </label>
        </div>

        <div class="grid md:grid-cols-2 gap-4">
            <label class="form-control">
                <span class="label-text">"Price (0 for free)"</span>
                <input
                    type="number"
                    min="0"
                    step="0.01"
                    class="input input-bordered"
                    prop:value=state.price
                    on:input=move |ev| state.price.set(event_target_value(&ev))
                />
            </label>
            <label class="form-control">
                <span class="label-text">"Language"</span>
                <input
                    class="input input-bordered"
                    prop:value=state.language
                    on:input=move |ev| state.language.set(event_target_value(&ev))
                />
            </label>
        </div>

        <div class="form-control space-y-2">
            <span class="label-text">"Thumbnail"</span>
            <Show when=move || state.thumbnail.with(|t| !t.trim().is_empty())>
                <img src=move || state.thumbnail.get() alt="thumbnail" class="w-64 h-36 object-cover rounded" />
            </Show>
            <input
                type="file"
                accept="image/*"
                class="file-input file-input-bordered w-full max-w-md"
                disabled=move || uploading.get()
                on:change=on_thumbnail
            />
            <Show when=move || uploading.get()>
                <span class="text-sm text-base-content/60">"Uploading thumbnail..."</span>
            </Show>
        </div>

        <ListField label="Requirements" placeholder="e.g. Basic programming knowledge" items=state.requirements />
        <ListField label="What students will learn" placeholder="e.g. Build a web server" items=state.outcomes />
    }
}

#[component]
pub fn CreateCoursePage() -> impl IntoView {
    let session = use_session();
    let router = use_router();
    let state = CourseFormState::new();
    let notice = RwSignal::new(Option::<Notice>::None);
    let (saving, set_saving) = signal(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = match state.snapshot().into_draft() {
            Ok(draft) => draft,
            Err(rejected) => {
                notice.set(Notice::error(rejected.to_string()));
                return;
            }
        };
        set_saving.set(true);
        spawn_local(async move {
            match session.api().send(&CreateCourseRequest { draft }).await {
                Ok(envelope) => {
                    log::info!("[Editor] Created course {}", envelope.course.id);
                    router.navigate_to(AppRoute::EditCourse {
                        id: envelope.course.id,
                    });
                }
                Err(e) => {
                    log::error!("[Editor] Failed to create course: {e}");
                    notice.set(Notice::error(e.user_message("Failed to create course")));
                }
            }
            set_saving.set(false);
        });
    };

    view! {
        <Toast notice=notice />
        <div class="max-w-4xl mx-auto px-4 py-8">
            <h1 class="text-3xl font-bold">"Create New Course"</h1>
            <p class="text-base-content/70 mt-2 mb-6">"Fill in the details below; you can add lectures after saving."</p>
            <form class="card bg-base-100 shadow" on:submit=on_submit>
                <div class="card-body space-y-4">
                    <CourseDetailsForm state=state notice=notice />
                    <div class="card-actions justify-end">
                        <button type="button" class="btn btn-ghost" on:click=move |_| router.navigate_to(AppRoute::Dashboard)>
                            "Cancel"
                        </button>
                        <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                            {move || if saving.get() { "Creating..." } else { "Create Course" }}
                        </button>
                    </div>
                </div>
            </form>
        </div>
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditTab {
    Details,
    Curriculum,
}

#[component]
pub fn EditCoursePage(id: String) -> impl IntoView {
    let session = use_session();
    let router = use_router();
    let state = CourseFormState::new();
    let lecture_state = LectureFormState::new();
    let notice = RwSignal::new(Option::<Notice>::None);
    let tab = RwSignal::new(EditTab::Details);

    let (course, set_course) = signal(Option::<Course>::None);
    let (loading, set_loading) = signal(true);
    let (saving, set_saving) = signal(false);

    let course_id = StoredValue::new(id);

    let reload = Callback::new(move |_: ()| {
        let id = course_id.get_value();
        spawn_local(async move {
            match session.api().send(&GetCourseRequest { id }).await {
                Ok(envelope) => {
                    state.load(&envelope.course);
                    set_course.set(Some(envelope.course));
                }
                Err(e) => {
                    log::error!("[Editor] Failed to load course: {e}");
                    notice.set(Notice::error(e.user_message("Failed to load course")));
                }
            }
            set_loading.set(false);
        });
    });
    reload.run(());

    let on_save = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = match state.snapshot().into_draft() {
            Ok(draft) => draft,
            Err(rejected) => {
                notice.set(Notice::error(rejected.to_string()));
                return;
            }
        };
        set_saving.set(true);
        spawn_local(async move {
            let request = UpdateCourseRequest {
                id: course_id.get_value(),
                draft,
            };
            match session.api().send(&request).await {
                Ok(_) => {
                    notice.set(Notice::success("Course updated successfully!"));
                    reload.run(());
                }
                Err(e) => {
                    log::error!("[Editor] Failed to update course: {e}");
                    notice.set(Notice::error(e.user_message("Failed to update course")));
                }
            }
            set_saving.set(false);
        });
    };

    let on_publish_toggle = move |_| {
        let published = course.with_untracked(|c| c.as_ref().is_some_and(Course::is_published));
        let status = if published {
            CourseStatus::Draft
        } else {
            CourseStatus::Published
        };
        set_saving.set(true);
        spawn_local(async move {
            let request = PublishCourseRequest {
                id: course_id.get_value(),
                status,
            };
            match session.api().send(&request).await {
                Ok(_) => {
                    let verb = if published { "unpublished" } else { "published" };
                    notice.set(Notice::success(format!("Course {verb} successfully!")));
                    reload.run(());
                }
                Err(e) => notice.set(Notice::error(e.user_message("Failed to update status"))),
            }
            set_saving.set(false);
        });
    };

    let on_delete_course = move |_| {
        if !confirm("Are you sure you want to delete this course? This cannot be undone.") {
            return;
        }
        set_saving.set(true);
        spawn_local(async move {
            match session.api().send(&DeleteCourseRequest { id: course_id.get_value() }).await {
                Ok(_) => {
                    log::info!("[Editor] Deleted course {}", course_id.get_value());
                    router.navigate_to(AppRoute::Dashboard);
                }
                Err(e) => {
                    notice.set(Notice::error(e.user_message("Failed to delete course")));
                    set_saving.set(false);
                }
            }
        });
    };

    let on_delete_lecture = move |lecture_id: String| {
        if !confirm("Are you sure you want to delete this lecture?") {
            return;
        }
        set_saving.set(true);
        spawn_local(async move {
            let request = DeleteLectureRequest {
                course_id: course_id.get_value(),
                lecture_id,
            };
            match session.api().send(&request).await {
                Ok(_) => {
                    notice.set(Notice::success("Lecture deleted successfully!"));
                    reload.run(());
                }
                Err(e) => notice.set(Notice::error(e.user_message("Failed to delete lecture"))),
            }
            set_saving.set(false);
        });
    };

    let tab_class = move |t: EditTab| if tab.get() == t { "tab tab-active" } else { "tab" };
    let preview = move || AppRoute::CourseDetail { id: course_id.get_value() }.to_path();

    view! {
        <Toast notice=notice />
        <Show when=move || !loading.get() fallback=|| view! { <Loading full_screen=true /> }>
            <Show
                when=move || course.with(Option::is_some)
                fallback=|| view! { <div class="max-w-6xl mx-auto px-4 py-8">"Course not found"</div> }
            >
                <div class="max-w-6xl mx-auto px-4 py-8 space-y-6">
                    <div class="flex flex-wrap justify-between items-center gap-4">
                        <div>
                            <Link to="/dashboard" class="link link-primary flex items-center gap-1 mb-2">
                                <ChevronLeft attr:class="h-4 w-4" /> "Back to Dashboard"
                            </Link>
                            <h1 class="text-3xl font-bold">"Edit Course"</h1>
                            <p class="text-base-content/60 mt-1">
                                {move || course.with(|c| c.as_ref().map(|c| c.title.clone()).unwrap_or_default())}
                            </p>
                        </div>
                        <div class="flex gap-2">
                            <button
                                class=move || if course.with(|c| c.as_ref().is_some_and(Course::is_published)) { "btn" } else { "btn btn-success" }
                                disabled=move || saving.get()
                                on:click=on_publish_toggle
                            >
                                {move || if course.with(|c| c.as_ref().is_some_and(Course::is_published)) { "Unpublish" } else { "Publish Course" }}
                            </button>
                            <Link to=preview() class="btn btn-primary">"Preview"</Link>
                            <button class="btn btn-error btn-outline" disabled=move || saving.get() on:click=on_delete_course>
                                <Trash2 attr:class="h-4 w-4" />
                            </button>
                        </div>
                    </div>

                    <div role="tablist" class="tabs tabs-bordered">
                        <a role="tab" class=move || tab_class(EditTab::Details) on:click=move |_| tab.set(EditTab::Details)>"Course Details"</a>
                        <a role="tab" class=move || tab_class(EditTab::Curriculum) on:click=move |_| tab.set(EditTab::Curriculum)>
                            {move || format!("Curriculum ({} lectures)", course.with(|c| c.as_ref().map_or(0, |c| c.lectures.len())))}
                        </a>
                    </div>

                    <Show
                        when=move || tab.get() == EditTab::Details
                        fallback=move || view! {
                            <Curriculum
                                course=course
                                lecture_state=lecture_state
                                notice=notice
                                course_id=course_id.get_value()
                                on_saved=reload
                                on_delete=Callback::new(on_delete_lecture)
                            />
                        }
                    >
                        <form class="card bg-base-100 shadow" on:submit=on_save>
                            <div class="card-body space-y-4">
                                <CourseDetailsForm state=state notice=notice />
                                <div class="card-actions justify-end">
                                    <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                                        {move || if saving.get() { "Saving..." } else { "Save Changes" }}
                                    </button>
                                </div>
                            </div>
                        </form>
                    </Show>
                </div>
            </Show>
        </Show>
    }
}

#[component]
fn Curriculum(
    course: ReadSignal<Option<Course>>,
    lecture_state: LectureFormState,
    notice: RwSignal<Option<Notice>>,
    course_id: String,
    on_saved: Callback<()>,
    on_delete: Callback<String>,
) -> impl IntoView {
    let lectures = move || course.with(|c| c.as_ref().map(|c| c.lectures.clone()).unwrap_or_default());

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body space-y-4">
                <div class="flex justify-between items-center">
                    <h2 class="card-title">"Lectures"</h2>
                    <Show when=move || !lecture_state.open.get()>
                        <button class="btn btn-primary btn-sm gap-1" on:click=move |_| lecture_state.start_new()>
                            <Plus attr:class="h-4 w-4" /> "Add Lecture"
                        </button>
                    </Show>
                </div>

                <Show when=move || lecture_state.open.get()>
                    <LectureForm course_id=course_id.clone() state=lecture_state notice=notice on_saved=on_saved />
                </Show>

                <Show
                    when=move || course.with(|c| c.as_ref().is_some_and(|c| !c.lectures.is_empty()))
                    fallback=|| view! { <p class="text-base-content/60 py-6 text-center">"No lectures yet. Add your first lecture to get started."</p> }
                >
                    <ul class="divide-y divide-base-300">
                        <For
                            each={move || lectures().into_iter().enumerate().collect::<Vec<_>>()}
                            key={|(index, lecture)| (*index, lecture.id.clone(), lecture.title.clone(), lecture.duration, lecture.is_free)}
                            children=move |(index, lecture)| {
                                let edit_target = lecture.clone();
                                let lecture_id = lecture.id.clone();
                                view! {
                                    <li class="py-3 flex items-center justify-between gap-4">
                                        <div>
                                            <p class="font-medium">{format!("{}. {}", index + 1, lecture.title)}</p>
                                            <p class="text-sm text-base-content/60">
                                                {format_duration(lecture.duration)}
                                                {lecture.is_free.then(|| view! { <span class="badge badge-success badge-sm ml-2">"Free preview"</span> })}
                                            </p>
                                        </div>
                                        <div class="flex gap-1">
                                            <button class="btn btn-ghost btn-sm" on:click=move |_| lecture_state.start_edit(&edit_target)>
                                                <Pencil attr:class="h-4 w-4" />
                                            </button>
                                            <button class="btn btn-ghost btn-sm text-error" on:click=move |_| on_delete.run(lecture_id.clone())>
                                                <Trash2 attr:class="h-4 w-4" />
                                            </button>
                                        </div>
                                    </li>
                                }
                            }
                        />
                    </ul>
                </Show>
            </div>
        </div>
    }
}
