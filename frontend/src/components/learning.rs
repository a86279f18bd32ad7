//! 学习页
//!
//! 页面只负责渲染与转发事件；选课时、观看进度、完成判定和评论都由
//! [`LearningSession`] 驱动，状态变化通过订阅回写到 `RwSignal`。

use std::future::Future;
use std::rc::Rc;

use coursemart_shared::date::format_duration;
use coursemart_shared::learning::session::LearningSession;
use coursemart_shared::learning::{ACCESS_DENIED_REDIRECT_DELAY, LearningState, LoadStatus};
use coursemart_shared::{CommentAuthor, Lecture, LoadError, Timestamp};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::CourseApi;
use crate::auth::use_session;
use crate::components::icons::{CheckCircle, ChevronLeft, ChevronRight, PlayCircle};
use crate::components::loading::Loading;
use crate::web::Delay;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

type Session = Rc<LearningSession<CourseApi>>;
type SessionHandle = StoredValue<Session, LocalStorage>;

/// 在事件循环上执行一次会话操作
fn drive<F, Fut>(session: SessionHandle, op: F)
where
    F: FnOnce(Session) -> Fut,
    Fut: Future<Output = ()> + 'static,
{
    spawn_local(op(session.get_value()));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Overview,
    Resources,
    Comments,
}

#[component]
pub fn LearningPage(id: String) -> impl IntoView {
    let ctx = use_session();
    let router = use_router();

    let session: Session = Rc::new(LearningSession::new(id.clone(), ctx.api()));
    let state = RwSignal::new(session.snapshot());
    session.subscribe(move |s| state.set(s.clone()));
    let session = StoredValue::new_local(session);

    // 403 后延迟跳回课程页；页面卸载时 Delay 随之释放并取消
    let redirect = StoredValue::new_local(Option::<Delay>::None);

    drive(session, move |s| async move {
        if let Err(err) = s.load().await {
            log::warn!("[Learning] Failed to open course {id}: {err}");
            if err == LoadError::AccessDenied {
                let delay = Delay::new(ACCESS_DENIED_REDIRECT_DELAY, move || {
                    router.navigate_to(AppRoute::CourseDetail { id });
                });
                redirect.try_update_value(|slot| *slot = Some(delay));
            }
        }
    });

    let status = Memo::new(move |_| state.with(|s| s.status().clone()));
    let current = Memo::new(move |_| state.with(|s| s.current_lecture().cloned()));

    view! {
        {move || match status.get() {
            LoadStatus::Loading => view! { <Loading full_screen=true /> }.into_any(),
            LoadStatus::Failed(err) => {
                let redirecting = err == LoadError::AccessDenied;
                view! {
                    <div class="max-w-7xl mx-auto px-4 py-8">
                        <div role="alert" class="alert alert-error">
                            <span>{err.to_string()}</span>
                        </div>
                        {redirecting.then(|| view! {
                            <p class="mt-4 text-base-content/60">"Redirecting to the course page..."</p>
                        })}
                    </div>
                }
                .into_any()
            }
            LoadStatus::Ready => view! {
                <div class="min-h-screen bg-base-200">
                    <LearningHeader state=state />
                    <div class="max-w-7xl mx-auto p-4 grid grid-cols-1 lg:grid-cols-4 gap-6">
                        <div class="lg:col-span-3 space-y-6">
                            <div class="card bg-base-100 shadow-lg overflow-hidden">
                                <VideoPlayer session=session state=state current=current />
                                <LectureControls session=session state=state current=current />
                            </div>
                            <LectureTabs session=session state=state current=current />
                        </div>
                        <Curriculum session=session state=state />
                    </div>
                </div>
            }
            .into_any(),
        }}
    }
}

#[component]
fn LearningHeader(state: RwSignal<LearningState>) -> impl IntoView {
    let router = use_router();
    let title = move || state.with(|s| s.course().map(|c| c.title.clone()).unwrap_or_default());
    let instructor = move || {
        state.with(|s| {
            s.course()
                .map(|c| c.instructor_name().to_string())
                .unwrap_or_default()
        })
    };

    view! {
        <div class="bg-base-100 shadow-sm border-b border-base-300">
            <div class="max-w-7xl mx-auto px-4 py-3 flex items-center justify-between">
                <div class="flex items-center gap-4">
                    <button class="btn btn-ghost btn-sm" on:click=move |_| router.navigate_to(AppRoute::Dashboard)>
                        <ChevronLeft attr:class="h-4 w-4" /> "Back to Dashboard"
                    </button>
                    <div>
                        <h1 class="text-xl font-semibold">{title}</h1>
                        <p class="text-sm text-base-content/60">"by " {instructor}</p>
                    </div>
                </div>
                <div class="text-right">
                    <div class="text-sm text-base-content/60">"Your Progress"</div>
                    <div class="text-lg font-semibold text-primary">
                        {move || format!("{}% Complete", state.with(LearningState::overall_progress))}
                    </div>
                    <progress
                        class="progress progress-primary w-40"
                        value=move || state.with(LearningState::overall_progress)
                        max="100"
                    ></progress>
                </div>
            </div>
        </div>
    }
}

#[component]
fn VideoPlayer(
    session: SessionHandle,
    state: RwSignal<LearningState>,
    current: Memo<Option<Lecture>>,
) -> impl IntoView {
    let poster = move || state.with(|s| s.course().and_then(|c| c.thumbnail.clone()));
    let has_lectures = move || state.with(|s| !s.lectures().is_empty());

    // 按课时重建 <video>，切换课时时播放器从头开始
    move || match current.get() {
        Some(lecture) => {
            let lecture_id = lecture.id.clone();
            let playing = lecture.id.clone();
            let on_time_update = move |ev: web_sys::Event| {
                let video = event_target::<web_sys::HtmlMediaElement>(&ev);
                let (position, duration) = (video.current_time(), video.duration());
                let playing = playing.clone();
                drive(session, move |s| async move {
                    s.on_playback_time_update(&playing, position, duration).await;
                });
            };
            let on_error = move |_| log::error!("[Learning] Video failed to load for lecture {lecture_id}");
            view! {
                <div class="bg-black aspect-video">
                    {match lecture.video_url.filter(|url| !url.trim().is_empty()) {
                        Some(src) => view! {
                            <video
                                class="w-full h-full"
                                controls
                                src=src
                                poster=poster
                                on:timeupdate=on_time_update
                                on:error=on_error
                            >
                                "Your browser does not support the video tag."
                            </video>
                        }
                        .into_any(),
                        None => view! {
                            <div class="flex items-center justify-center h-full text-white/70">
                                "No video available for this lecture."
                            </div>
                        }
                        .into_any(),
                    }}
                </div>
            }
            .into_any()
        }
        None => view! {
            <div class="bg-black aspect-video flex items-center justify-center">
                <div class="text-center text-white">
                    <PlayCircle attr:class="w-16 h-16 mx-auto mb-4 opacity-50" />
                    <p class="text-lg mb-2">"Select a Lecture"</p>
                    {move || if has_lectures() {
                        view! {
                            <button
                                class="btn btn-primary mt-4"
                                on:click=move |_| drive(session, |s| async move { s.select_lecture(0).await })
                            >
                                "Start First Lecture"
                            </button>
                        }
                        .into_any()
                    } else {
                        view! { <p class="text-sm opacity-75">"This course has no lectures yet."</p> }.into_any()
                    }}
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
fn LectureControls(
    session: SessionHandle,
    state: RwSignal<LearningState>,
    current: Memo<Option<Lecture>>,
) -> impl IntoView {
    let completed = move || state.with(LearningState::current_is_completed);
    let completing = move || {
        state.with(|s| {
            s.current_lecture()
                .is_some_and(|lecture| s.is_completing(&lecture.id))
        })
    };

    view! {
        <div class="card-body">
            <div class="flex items-center justify-between">
                <h2 class="card-title text-2xl">
                    {move || current.get().map(|l| l.title).unwrap_or_else(|| "Select a lecture to start learning".into())}
                </h2>
                <Show when=completed>
                    <span class="badge badge-success gap-1">
                        <CheckCircle attr:class="h-4 w-4" /> "Completed"
                    </span>
                </Show>
            </div>
            <progress
                class="progress progress-secondary w-full"
                value=move || state.with(LearningState::watch_fraction)
                max="100"
            ></progress>
            <div class="card-actions justify-between mt-2">
                <button
                    class="btn btn-outline"
                    disabled=move || !state.with(LearningState::can_go_previous)
                    on:click=move |_| drive(session, |s| async move { s.previous().await })
                >
                    <ChevronLeft attr:class="h-4 w-4" /> "Previous"
                </button>
                <button
                    class="btn btn-success"
                    disabled=move || current.with(Option::is_none) || completed() || completing()
                    on:click=move |_| drive(session, |s| async move { s.mark_current_complete().await })
                >
                    <CheckCircle attr:class="h-4 w-4" />
                    {move || if completed() { "Completed" } else { "Mark as Complete" }}
                </button>
                <button
                    class="btn btn-primary"
                    disabled=move || !state.with(LearningState::can_go_next)
                    on:click=move |_| drive(session, |s| async move { s.next().await })
                >
                    "Next" <ChevronRight attr:class="h-4 w-4" />
                </button>
            </div>
        </div>
    }
}

#[component]
fn LectureTabs(
    session: SessionHandle,
    state: RwSignal<LearningState>,
    current: Memo<Option<Lecture>>,
) -> impl IntoView {
    let tab = RwSignal::new(Tab::Overview);
    let tab_class = move |t: Tab| if tab.get() == t { "tab tab-active" } else { "tab" };

    view! {
        <div class="card bg-base-100 shadow">
            <div role="tablist" class="tabs tabs-bordered px-6 pt-4">
                <a role="tab" class=move || tab_class(Tab::Overview) on:click=move |_| tab.set(Tab::Overview)>"Overview"</a>
                <a role="tab" class=move || tab_class(Tab::Resources) on:click=move |_| tab.set(Tab::Resources)>"Resources"</a>
                <a role="tab" class=move || tab_class(Tab::Comments) on:click=move |_| tab.set(Tab::Comments)>
                    {move || format!("Comments ({})", state.with(|s| s.comments().len()))}
                </a>
            </div>
            <div class="card-body">
                {move || match tab.get() {
                    Tab::Overview => view! {
                        <h3 class="text-lg font-semibold">"About this lecture"</h3>
                        <p class="text-base-content/70">
                            {move || current
                                .get()
                                .map(|l| l.description)
                                .filter(|d| !d.trim().is_empty())
                                .unwrap_or_else(|| "No description available for this lecture.".into())}
                        </p>
                        {move || current.get().map(|l| view! {
                            <p class="text-sm text-base-content/50">{format!("Duration: {}", format_duration(l.duration))}</p>
                        })}
                    }
                    .into_any(),
                    Tab::Resources => view! { <ResourceList current=current /> }.into_any(),
                    Tab::Comments => view! { <CommentSection session=session state=state /> }.into_any(),
                }}
            </div>
        </div>
    }
}

#[component]
fn ResourceList(current: Memo<Option<Lecture>>) -> impl IntoView {
    let resources = move || current.get().map(|l| l.resources).unwrap_or_default();

    move || {
        let resources = resources();
        if resources.is_empty() {
            return view! { <p class="text-base-content/60">"No resources for this lecture."</p> }.into_any();
        }
        view! {
            <ul class="space-y-2">
                {resources.into_iter().map(|resource| view! {
                    <li>
                        <a href=resource.url target="_blank" rel="noopener noreferrer" class="link link-primary">
                            {resource.name}
                        </a>
                    </li>
                }).collect_view()}
            </ul>
        }
        .into_any()
    }
}

#[component]
fn CommentSection(session: SessionHandle, state: RwSignal<LearningState>) -> impl IntoView {
    let ctx = use_session();
    let draft = RwSignal::new(String::new());
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(user) = ctx.current_user() else {
            return;
        };
        let text = draft.get_untracked();
        let result = session.with_value(|s| s.add_comment(&text, CommentAuthor::from(&user), Timestamp::now()));
        match result {
            Ok(()) => {
                draft.set(String::new());
                set_error_msg.set(None);
            }
            Err(rejected) => set_error_msg.set(Some(rejected.to_string())),
        }
    };

    view! {
        <form class="mb-6 space-y-2" on:submit=on_submit>
            <h3 class="text-lg font-semibold">"Add a comment"</h3>
            <textarea
                class="textarea textarea-bordered w-full"
                rows="3"
                placeholder="Share your thoughts or ask a question..."
                prop:value=draft
                on:input=move |ev| draft.set(event_target_value(&ev))
            ></textarea>
            <Show when=move || error_msg.get().is_some()>
                <p class="text-error text-sm">{move || error_msg.get().unwrap_or_default()}</p>
            </Show>
            <button type="submit" class="btn btn-primary btn-sm" disabled=move || draft.with(|d| d.trim().is_empty())>
                "Post Comment"
            </button>
        </form>

        <Show
            when=move || state.with(|s| !s.comments().is_empty())
            fallback=|| view! { <p class="text-base-content/60">"No comments yet. Be the first to comment!"</p> }
        >
            <div class="space-y-4">
                <For
                    each=move || state.with(|s| s.comments().to_vec())
                    key=|comment| comment.id
                    children=move |comment| {
                        let posted = comment.posted_at.relative_to(Timestamp::now());
                        view! {
                            <div class="flex gap-3">
                                <img src=comment.author.avatar_url() alt=comment.author.name.clone() class="w-10 h-10 rounded-full" />
                                <div class="flex-1">
                                    <div class="flex items-center gap-2">
                                        <span class="font-semibold">{comment.author.name.clone()}</span>
                                        <span class="text-xs text-base-content/50">{posted}</span>
                                    </div>
                                    <p class="text-base-content/80">{comment.text}</p>
                                </div>
                            </div>
                        }
                    }
                />
            </div>
        </Show>
    }
}

#[component]
fn Curriculum(session: SessionHandle, state: RwSignal<LearningState>) -> impl IntoView {
    let rows = move || {
        state.with(|s| {
            s.lectures()
                .iter()
                .enumerate()
                .map(|(index, lecture)| {
                    (
                        index,
                        lecture.clone(),
                        s.is_completed(&lecture.id),
                        index == s.current_index() && s.current_lecture().is_some(),
                    )
                })
                .collect::<Vec<_>>()
        })
    };

    view! {
        <aside class="card bg-base-100 shadow h-fit">
            <div class="card-body p-4">
                <h3 class="card-title text-base">"Course Content"</h3>
                <p class="text-sm text-base-content/60">
                    {move || state.with(|s| {
                        let total = s.lectures().len();
                        let done = s.lectures().iter().filter(|l| s.is_completed(&l.id)).count();
                        format!("{done} of {total} lectures completed")
                    })}
                </p>
                <ul class="menu p-0">
                    {move || rows().into_iter().map(|(index, lecture, done, active)| view! {
                        <li>
                            <a
                                class=if active { "active" } else { "" }
                                on:click=move |_| drive(session, move |s| async move { s.select_lecture(index).await })
                            >
                                {if done {
                                    view! { <CheckCircle attr:class="h-4 w-4 text-success shrink-0" /> }.into_any()
                                } else {
                                    view! { <PlayCircle attr:class="h-4 w-4 opacity-60 shrink-0" /> }.into_any()
                                }}
                                <span class="flex-1">{format!("{}. {}", index + 1, lecture.title)}</span>
                                <span class="text-xs opacity-60">{format_duration(lecture.duration)}</span>
                            </a>
                        </li>
                    }).collect_view()}
                </ul>
            </div>
        </aside>
    }
}
