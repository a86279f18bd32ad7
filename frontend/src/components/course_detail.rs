use coursemart_shared::date::{format_duration, format_hours_minutes};
use coursemart_shared::enrollment::EnrollmentAction;
use coursemart_shared::protocol::{
    CourseReviewsRequest, EnrollFreeRequest, GetCourseRequest, MockPurchaseRequest,
};
use coursemart_shared::{Course, Review, Timestamp, avatar_or_fallback};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_session;
use crate::components::course_card::thumbnail_or_placeholder;
use crate::components::icons::{ChevronLeft, Clock, Lock, PlayCircle, Star, Users};
use crate::components::loading::Loading;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Overview,
    Curriculum,
    Reviews,
}

#[component]
pub fn CourseDetailPage(id: String) -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let (course, set_course) = signal(Option::<Course>::None);
    let (reviews, set_reviews) = signal(Vec::<Review>::new());
    let (loading, set_loading) = signal(true);
    let (enrolling, set_enrolling) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (tab, set_tab) = signal(Tab::Overview);

    // 课程、评价与最新的报名状态并行加载
    {
        let id = id.clone();
        spawn_local(async move {
            match session.api().send(&GetCourseRequest { id }).await {
                Ok(envelope) => set_course.set(Some(envelope.course)),
                Err(e) => log::error!("[CourseDetail] Failed to load course: {e}"),
            }
            set_loading.set(false);
        });
    }
    {
        let course_id = id.clone();
        spawn_local(async move {
            match session.api().send(&CourseReviewsRequest { course_id }).await {
                Ok(envelope) => set_reviews.set(envelope.reviews),
                Err(e) => log::warn!("[CourseDetail] Failed to load reviews: {e}"),
            }
        });
    }
    if session.current_user().is_some() {
        spawn_local(async move {
            session.refresh_user().await;
        });
    }

    let action = Memo::new(move |_| {
        let user = session.user();
        course.with(|c| c.as_ref().map(|c| EnrollmentAction::decide(user.as_ref(), c)))
    });

    let learn_route = AppRoute::Learn { id: id.clone() };
    let payment_route = AppRoute::Payment { id: id.clone() };

    // 免费报名 / 模拟购买，成功后刷新用户并进入学习页
    let purchase = {
        let id = id.clone();
        let learn_route = learn_route.clone();
        move |mock: bool| {
            let id = id.clone();
            let learn_route = learn_route.clone();
            set_enrolling.set(true);
            set_error_msg.set(None);
            spawn_local(async move {
                let api = session.api();
                let result = if mock {
                    api.send(&MockPurchaseRequest { course_id: id }).await
                } else {
                    api.send(&EnrollFreeRequest { course_id: id }).await
                };
                match result {
                    Ok(_) => {
                        session.refresh_user().await;
                        router.navigate_to(learn_route);
                    }
                    Err(e) => {
                        let fallback = if mock { "Mock purchase failed" } else { "Enrollment failed" };
                        log::error!("[CourseDetail] {fallback}: {e}");
                        set_error_msg.set(Some(e.user_message(fallback)));
                    }
                }
                set_enrolling.set(false);
            });
        }
    };

    let on_primary = {
        let purchase = purchase.clone();
        move |_| match action.get_untracked() {
            Some(EnrollmentAction::SignIn) => router.navigate_to(AppRoute::Login),
            Some(EnrollmentAction::ContinueLearning) => router.navigate_to(learn_route.clone()),
            Some(EnrollmentAction::EnrollFree) => purchase(false),
            Some(EnrollmentAction::Checkout) => router.navigate_to(payment_route.clone()),
            None => {}
        }
    };

    let on_mock_purchase = move |_| {
        if session.current_user().is_none() {
            router.navigate_to(AppRoute::Login);
        } else {
            purchase(true);
        }
    };

    view! {
        <Show when=move || !loading.get() fallback=|| view! { <Loading full_screen=true /> }>
            {
                let on_primary = on_primary.clone();
                let on_mock_purchase = on_mock_purchase.clone();
                move || match course.get() {
                None => view! {
                    <div class="max-w-7xl mx-auto px-4 py-8">"Course not found"</div>
                }
                .into_any(),
                Some(c) => {
                    let on_primary = on_primary.clone();
                    let on_mock_purchase = on_mock_purchase.clone();
                    let show_mock = !c.is_free();
                    let lecture_count = c.lectures.len();
                    view! {
                        <div class="bg-neutral text-neutral-content">
                            <div class="max-w-7xl mx-auto px-4 py-8 grid lg:grid-cols-3 gap-8">
                                <div class="lg:col-span-2">
                                    <Link to="/courses" class="link link-hover flex items-center gap-1 mb-6">
                                        <ChevronLeft attr:class="h-4 w-4" /> "All Courses"
                                    </Link>
                                    <h1 class="text-4xl font-bold mb-6">{c.title.clone()}</h1>
                                    <p class="text-xl opacity-80 mb-6">{c.description.clone()}</p>
                                    <div class="flex flex-wrap gap-6 items-center opacity-90">
                                        <span class="flex items-center gap-1">
                                            <Star attr:class="h-5 w-5 text-warning" />
                                            {c.rating.map(|r| format!("{r:.1}")).unwrap_or_else(|| "New".into())}
                                        </span>
                                        <span class="flex items-center gap-1">
                                            <Users attr:class="h-5 w-5" />
                                            {format!("{} students", c.total_students.unwrap_or(0))}
                                        </span>
                                        <span class="flex items-center gap-1">
                                            <Clock attr:class="h-5 w-5" />
                                            {format_hours_minutes(c.total_duration())}
                                        </span>
                                        <span>"Created by " {c.instructor_name().to_string()}</span>
                                    </div>
                                </div>

                                <div class="card bg-base-100 text-base-content shadow-xl">
                                    <figure>
                                        <img src=thumbnail_or_placeholder(&c) alt=c.title.clone() class="w-full h-48 object-cover" />
                                    </figure>
                                    <div class="card-body">
                                        <p class="text-3xl font-bold">{c.price_label()}</p>
                                        <Show when=move || error_msg.get().is_some()>
                                            <div role="alert" class="alert alert-error text-sm py-2">
                                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                                            </div>
                                        </Show>
                                        <button
                                            class="btn btn-primary w-full"
                                            disabled=move || enrolling.get()
                                            on:click=on_primary
                                        >
                                            {move || if enrolling.get() {
                                                "Processing...".to_string()
                                            } else {
                                                action.get().map(|a| a.label()).unwrap_or_default().to_string()
                                            }}
                                        </button>
                                        <Show when=move || {
                                            show_mock && matches!(action.get(), Some(EnrollmentAction::Checkout))
                                        }>
                                            <button
                                                class="btn btn-outline btn-secondary w-full"
                                                disabled=move || enrolling.get()
                                                on:click=on_mock_purchase.clone()
                                            >
                                                "Mock Purchase (Test)"
                                            </button>
                                        </Show>
                                        <ul class="text-sm space-y-1 mt-4 opacity-80">
                                            <li>{format!("{lecture_count} lectures")}</li>
                                            <li>"Full lifetime access"</li>
                                            <li>"Access on mobile and desktop"</li>
                                        </ul>
                                    </div>
                                </div>
                            </div>
                        </div>

                        <div class="max-w-7xl mx-auto px-4 py-8">
                            <div role="tablist" class="tabs tabs-bordered mb-6">
                                <a role="tab" class=move || tab_class(tab.get() == Tab::Overview) on:click=move |_| set_tab.set(Tab::Overview)>"Overview"</a>
                                <a role="tab" class=move || tab_class(tab.get() == Tab::Curriculum) on:click=move |_| set_tab.set(Tab::Curriculum)>"Curriculum"</a>
                                <a role="tab" class=move || tab_class(tab.get() == Tab::Reviews) on:click=move |_| set_tab.set(Tab::Reviews)>
                                    {move || format!("Reviews ({})", reviews.with(Vec::len))}
                                </a>
                            </div>
                            <CourseTabs course=c tab=tab reviews=reviews />
                        </div>
                    }
                    .into_any()
                }
            }
            }
        </Show>
    }
}

fn tab_class(active: bool) -> &'static str {
    if active { "tab tab-active" } else { "tab" }
}

#[component]
fn CourseTabs(course: Course, tab: ReadSignal<Tab>, reviews: ReadSignal<Vec<Review>>) -> impl IntoView {
    let course = StoredValue::new(course);

    move || match tab.get() {
        Tab::Overview => course.with_value(|c| {
            let learn = c.what_you_will_learn.clone();
            let requirements = c.requirements.clone();
            view! {
                <div class="grid md:grid-cols-2 gap-8">
                    <div class="card bg-base-100 shadow">
                        <div class="card-body">
                            <h2 class="card-title">"What you'll learn"</h2>
                            <ul class="list-disc list-inside space-y-1">
                                {learn.into_iter().map(|item| view! { <li>{item}</li> }).collect_view()}
                            </ul>
                        </div>
                    </div>
                    <div class="card bg-base-100 shadow">
                        <div class="card-body">
                            <h2 class="card-title">"Requirements"</h2>
                            <ul class="list-disc list-inside space-y-1">
                                {requirements.into_iter().map(|item| view! { <li>{item}</li> }).collect_view()}
                            </ul>
                        </div>
                    </div>
                </div>
            }
            .into_any()
        }),
        Tab::Curriculum => course.with_value(|c| {
            let lectures = c.lectures.clone();
            view! {
                <ul class="menu bg-base-100 rounded-box shadow">
                    {lectures.into_iter().enumerate().map(|(i, lecture)| view! {
                        <li>
                            <div class="flex justify-between">
                                <span class="flex items-center gap-2">
                                    {if lecture.is_free {
                                        view! { <PlayCircle attr:class="h-4 w-4 text-primary" /> }.into_any()
                                    } else {
                                        view! { <Lock attr:class="h-4 w-4 opacity-50" /> }.into_any()
                                    }}
                                    {format!("{}. {}", i + 1, lecture.title)}
                                    {lecture.is_free.then(|| view! {
                                        <span class="badge badge-success badge-sm">"Preview"</span>
                                    })}
                                </span>
                                <span class="text-sm opacity-60">{format_duration(lecture.duration)}</span>
                            </div>
                        </li>
                    }).collect_view()}
                </ul>
            }
            .into_any()
        }),
        Tab::Reviews => view! { <ReviewList reviews=reviews /> }.into_any(),
    }
}

#[component]
fn ReviewList(reviews: ReadSignal<Vec<Review>>) -> impl IntoView {
    let now = Timestamp::now();

    view! {
        <Show
            when=move || !reviews.with(Vec::is_empty)
            fallback=|| view! { <p class="text-base-content/60 py-8">"No reviews yet."</p> }
        >
            <div class="space-y-4">
                <For
                    each=move || reviews.get()
                    key=|review| review.id.clone()
                    children=move |review| {
                        let name = review.user.as_ref().map(|u| u.name.clone()).unwrap_or_else(|| "Student".into());
                        let avatar = avatar_or_fallback(
                            review.user.as_ref().and_then(|u| u.avatar.as_deref()),
                            &name,
                        );
                        let posted = review
                            .created_at
                            .map(|at| Timestamp::from(at).relative_to(now))
                            .unwrap_or_default();
                        let stars = "★".repeat(review.rating.min(5) as usize);
                        view! {
                            <div class="card bg-base-100 shadow-sm">
                                <div class="card-body flex-row gap-4">
                                    <img src=avatar alt=name.clone() class="w-10 h-10 rounded-full" />
                                    <div>
                                        <p class="font-semibold">{name}</p>
                                        <p class="text-warning">{stars} <span class="text-xs text-base-content/50 ml-2">{posted}</span></p>
                                        <p class="mt-1">{review.comment}</p>
                                    </div>
                                </div>
                            </div>
                        }
                    }
                />
            </div>
        </Show>
    }
}
