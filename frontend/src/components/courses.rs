use std::collections::BTreeSet;

use coursemart_shared::Course;
use coursemart_shared::protocol::ListCoursesRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_session;
use crate::components::course_card::CourseCard;
use crate::components::icons::{BookOpen, Search};
use crate::components::loading::Loading;
use crate::web::router::query_param;

/// 目录页的客户端过滤条件
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    pub query: String,
    /// 空字符串表示全部分类
    pub category: String,
}

impl CatalogFilter {
    pub fn matches(&self, course: &Course) -> bool {
        let category = self.category.trim();
        if !category.is_empty() && !course.category.eq_ignore_ascii_case(category) {
            return false;
        }
        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        [
            course.title.as_str(),
            course.description.as_str(),
            course.category.as_str(),
            course.instructor_name(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
    }

    pub fn apply(&self, courses: &[Course]) -> Vec<Course> {
        courses
            .iter()
            .filter(|course| self.matches(course))
            .cloned()
            .collect()
    }
}

/// 已加载课程中出现过的分类，按字母序
pub fn categories(courses: &[Course]) -> Vec<String> {
    courses
        .iter()
        .map(|c| c.category.trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[component]
pub fn CoursesPage() -> impl IntoView {
    let session = use_session();

    let (courses, set_courses) = signal(Vec::<Course>::new());
    let (loading, set_loading) = signal(true);
    let filter = RwSignal::new(CatalogFilter {
        query: query_param("q").unwrap_or_default(),
        category: String::new(),
    });

    spawn_local(async move {
        match session.api().send(&ListCoursesRequest).await {
            Ok(envelope) => set_courses.set(envelope.courses),
            Err(e) => log::error!("[Courses] Failed to load courses: {e}"),
        }
        set_loading.set(false);
    });

    let visible = Memo::new(move |_| courses.with(|all| filter.with(|f| f.apply(all))));
    let category_options = Memo::new(move |_| courses.with(|all| categories(all)));

    view! {
        <div class="bg-base-100 border-b border-base-300">
            <div class="max-w-7xl mx-auto px-4 py-8 flex flex-col md:flex-row md:items-center md:justify-between gap-4">
                <div>
                    <h1 class="text-3xl font-bold">"All Courses"</h1>
                    <p class="mt-2 text-lg text-base-content/70">
                        "Discover courses from expert instructors"
                    </p>
                </div>
                <div class="flex flex-col sm:flex-row gap-4">
                    <label class="input input-bordered flex items-center gap-2">
                        <Search attr:class="h-5 w-5 opacity-50" />
                        <input
                            type="text"
                            class="grow"
                            placeholder="Search courses..."
                            prop:value=move || filter.with(|f| f.query.clone())
                            on:input=move |ev| filter.update(|f| f.query = event_target_value(&ev))
                        />
                    </label>
                    <select
                        class="select select-bordered"
                        on:change=move |ev| filter.update(|f| f.category = event_target_value(&ev))
                    >
                        <option value="">"All Categories"</option>
                        <For
                            each=move || category_options.get()
                            key=|c| c.clone()
                            children=|c| view! { <option value=c.clone()>{c.clone()}</option> }
                        />
                    </select>
                </div>
            </div>
        </div>

        <div class="max-w-7xl mx-auto px-4 py-8">
            <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                <Show
                    when=move || !visible.with(Vec::is_empty)
                    fallback=|| view! {
                        <div class="text-center py-20">
                            <BookOpen attr:class="mx-auto h-24 w-24 text-base-content/30" />
                            <h3 class="mt-4 text-lg font-medium">"No courses available"</h3>
                            <p class="mt-2 text-base-content/60">"Check back soon for new courses!"</p>
                        </div>
                    }
                >
                    <p class="mb-6 text-base-content/70">
                        {move || format!("Showing {} courses", visible.with(Vec::len))}
                    </p>
                    <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 xl:grid-cols-4 gap-6">
                        <For
                            each=move || visible.get()
                            key=|course| course.id.clone()
                            children=|course| view! { <CourseCard course=course /> }
                        />
                    </div>
                </Show>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: &str, title: &str, category: &str) -> Course {
        Course {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    fn catalog() -> Vec<Course> {
        vec![
            course("1", "Rust Fundamentals", "Development"),
            course("2", "Brand Identity", "Design"),
            course("3", "Async Rust in Practice", "development"),
        ]
    }

    #[test]
    fn empty_filter_keeps_everything() {
        assert_eq!(CatalogFilter::default().apply(&catalog()).len(), 3);
    }

    #[test]
    fn query_is_case_insensitive() {
        let filter = CatalogFilter {
            query: "  RUST ".into(),
            ..Default::default()
        };
        let ids: Vec<_> = filter.apply(&catalog()).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[test]
    fn category_and_query_combine() {
        let filter = CatalogFilter {
            query: "async".into(),
            category: "Development".into(),
        };
        let ids: Vec<_> = filter.apply(&catalog()).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, ["3"]);
    }

    #[test]
    fn categories_are_sorted_and_unique() {
        let mut courses = catalog();
        courses.push(course("4", "Untitled", "  "));
        assert_eq!(categories(&courses), ["Design", "Development", "development"]);
    }
}
