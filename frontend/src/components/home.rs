use coursemart_shared::Course;
use coursemart_shared::protocol::ListCoursesRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_session;
use crate::components::course_card::CourseCard;
use crate::components::icons::Search;
use crate::components::loading::Loading;
use crate::web::router::{Link, use_router, with_query};

const FEATURED_COUNT: usize = 4;

#[component]
pub fn HomePage() -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let (featured, set_featured) = signal(Vec::<Course>::new());
    let (loading, set_loading) = signal(true);
    let (query, set_query) = signal(String::new());

    spawn_local(async move {
        match session.api().send(&ListCoursesRequest).await {
            Ok(envelope) => set_featured.set(
                envelope
                    .courses
                    .into_iter()
                    .take(FEATURED_COUNT)
                    .collect(),
            ),
            Err(e) => log::error!("[Home] Failed to load courses: {e}"),
        }
        set_loading.set(false);
    });

    let on_search = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let q = query.get_untracked();
        let q = q.trim();
        if q.is_empty() {
            router.navigate("/courses");
        } else {
            router.navigate(&with_query("/courses", "q", q));
        }
    };

    view! {
        <section class="hero bg-base-100 py-16 lg:py-24">
            <div class="hero-content flex-col lg:flex-row-reverse gap-12 max-w-7xl">
                <div class="card bg-gradient-to-br from-primary/10 to-secondary/20 w-full lg:w-1/2 h-80 flex items-center justify-center">
                    <h3 class="text-xl font-bold">"Start Learning Today"</h3>
                </div>
                <div class="space-y-8 lg:w-1/2">
                    <h1 class="text-4xl lg:text-5xl font-bold leading-tight">
                        "Empower your future with courses designed to "
                        <span class="text-primary">"fit your choice."</span>
                    </h1>
                    <p class="text-lg text-base-content/70">
                        "Learn from expert instructors, at your own pace, on any device."
                    </p>
                    <form class="join w-full max-w-lg" on:submit=on_search>
                        <label class="input input-bordered join-item flex items-center gap-2 flex-1">
                            <Search attr:class="h-5 w-5 opacity-50" />
                            <input
                                type="text"
                                class="grow"
                                placeholder="Search for courses..."
                                prop:value=query
                                on:input=move |ev| set_query.set(event_target_value(&ev))
                            />
                        </label>
                        <button type="submit" class="btn btn-primary join-item">"Search"</button>
                    </form>
                </div>
            </div>
        </section>

        <section class="py-16 bg-base-200">
            <div class="max-w-7xl mx-auto px-4">
                <div class="text-center mb-12">
                    <h2 class="text-3xl font-bold mb-4">"Learn from the best"</h2>
                    <p class="text-lg text-base-content/70">
                        "Discover top-rated courses from experienced instructors."
                    </p>
                </div>

                <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                    <Show
                        when=move || !featured.with(Vec::is_empty)
                        fallback=|| view! {
                            <p class="text-center text-base-content/50 py-12">
                                "No courses available yet. Check back soon!"
                            </p>
                        }
                    >
                        <div class="grid md:grid-cols-2 lg:grid-cols-4 gap-6">
                            <For
                                each=move || featured.get()
                                key=|course| course.id.clone()
                                children=|course| view! { <CourseCard course=course /> }
                            />
                        </div>
                    </Show>
                </Show>

                <div class="text-center mt-8">
                    <Link to="/courses" class="btn btn-outline btn-primary">"Browse all courses"</Link>
                </div>
            </div>
        </section>
    }
}
