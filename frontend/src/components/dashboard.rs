use coursemart_shared::protocol::{AdminStatsRequest, EnrolledCoursesRequest, InstructorCoursesRequest};
use coursemart_shared::{AdminStats, Course, Role};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_session;
use crate::components::course_card::{CourseCard, thumbnail_or_placeholder};
use crate::components::icons::{BookOpen, CheckCircle, Pencil, Plus, Star, Users};
use crate::components::loading::Loading;
use crate::web::route::AppRoute;
use crate::web::router::Link;

/// 学生面板的统计数据
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LearningSummary {
    pub enrolled: usize,
    pub completed: usize,
    pub in_progress: usize,
}

impl LearningSummary {
    pub fn of(courses: &[Course]) -> Self {
        let mut summary = Self {
            enrolled: courses.len(),
            ..Default::default()
        };
        for course in courses {
            match course.progress_percent() {
                100 => summary.completed += 1,
                0 => {}
                _ => summary.in_progress += 1,
            }
        }
        summary
    }
}

/// 讲师面板的统计数据
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TeachingSummary {
    pub courses: usize,
    pub published: usize,
    pub students: u64,
    /// 只统计有评分的课程
    pub average_rating: Option<f64>,
}

impl TeachingSummary {
    pub fn of(courses: &[Course]) -> Self {
        let ratings: Vec<f64> = courses
            .iter()
            .filter_map(|c| c.rating)
            .filter(|r| *r > 0.0)
            .collect();
        Self {
            courses: courses.len(),
            published: courses.iter().filter(|c| c.is_published()).count(),
            students: courses
                .iter()
                .map(|c| u64::from(c.total_students.unwrap_or(0)))
                .sum(),
            average_rating: (!ratings.is_empty())
                .then(|| ratings.iter().sum::<f64>() / ratings.len() as f64),
        }
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = use_session();

    move || match session.role() {
        Some(Role::Student) => view! { <StudentDashboard /> }.into_any(),
        Some(Role::Instructor) => view! { <InstructorDashboard /> }.into_any(),
        Some(Role::Admin) => view! { <AdminDashboard /> }.into_any(),
        None => view! { <Loading full_screen=true /> }.into_any(),
    }
}

#[component]
fn StatCard(
    title: &'static str,
    #[prop(into)] value: Signal<String>,
    #[prop(optional)] accent: &'static str,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="stat">
            <div class=format!("stat-figure {accent}")>{children()}</div>
            <div class="stat-title">{title}</div>
            <div class=format!("stat-value {accent}")>{move || value.get()}</div>
        </div>
    }
}

#[component]
fn StudentDashboard() -> impl IntoView {
    let session = use_session();
    let (courses, set_courses) = signal(Vec::<Course>::new());
    let (loading, set_loading) = signal(true);

    spawn_local(async move {
        match session.api().send(&EnrolledCoursesRequest).await {
            Ok(envelope) => set_courses.set(envelope.courses),
            Err(e) => log::error!("[Dashboard] Failed to load enrolled courses: {e}"),
        }
        set_loading.set(false);
    });

    let summary = Memo::new(move |_| courses.with(|c| LearningSummary::of(c)));

    view! {
        <div class="max-w-7xl mx-auto px-4 py-8 space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"My Learning"</h1>
                <p class="text-base-content/70 mt-2">"Track your progress and continue learning"</p>
            </div>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <StatCard title="Enrolled Courses" accent="text-primary" value=Signal::derive(move || summary.get().enrolled.to_string())>
                    <BookOpen attr:class="h-8 w-8" />
                </StatCard>
                <StatCard title="Completed" accent="text-success" value=Signal::derive(move || summary.get().completed.to_string())>
                    <CheckCircle attr:class="h-8 w-8" />
                </StatCard>
                <StatCard title="In Progress" accent="text-info" value=Signal::derive(move || summary.get().in_progress.to_string())>
                    <Star attr:class="h-8 w-8" />
                </StatCard>
            </div>

            <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                <Show
                    when=move || !courses.with(Vec::is_empty)
                    fallback=|| view! {
                        <div class="card bg-base-100 shadow p-12 text-center items-center">
                            <BookOpen attr:class="h-12 w-12 text-base-content/30" />
                            <h3 class="mt-4 text-lg font-medium">"No courses yet"</h3>
                            <p class="mt-2 text-base-content/60">"Start learning by enrolling in courses"</p>
                            <Link to="/courses" class="btn btn-primary mt-6">"Browse Courses"</Link>
                        </div>
                    }
                >
                    <h2 class="text-2xl font-bold">"Continue Learning"</h2>
                    <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                        <For
                            each=move || courses.get()
                            key=|course| course.id.clone()
                            children=|course| view! { <CourseCard course=course show_progress=true /> }
                        />
                    </div>
                </Show>
            </Show>
        </div>
    }
}

#[component]
fn InstructorDashboard() -> impl IntoView {
    let session = use_session();
    let (courses, set_courses) = signal(Vec::<Course>::new());
    let (loading, set_loading) = signal(true);

    spawn_local(async move {
        match session.api().send(&InstructorCoursesRequest).await {
            Ok(envelope) => set_courses.set(envelope.courses),
            Err(e) => log::error!("[Dashboard] Failed to load instructor courses: {e}"),
        }
        set_loading.set(false);
    });

    let summary = Memo::new(move |_| courses.with(|c| TeachingSummary::of(c)));
    let create_path = AppRoute::CreateCourse.to_path();

    view! {
        <div class="max-w-7xl mx-auto px-4 py-8 space-y-8">
            <div class="flex justify-between items-center">
                <div>
                    <h1 class="text-3xl font-bold">"Instructor Dashboard"</h1>
                    <p class="text-base-content/70 mt-2">"Manage your courses and track performance"</p>
                </div>
                <Link to=create_path.clone() class="btn btn-primary gap-2">
                    <Plus attr:class="h-5 w-5" /> "Create New Course"
                </Link>
            </div>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <StatCard title="Total Courses" accent="text-primary" value=Signal::derive(move || summary.get().courses.to_string())>
                    <BookOpen attr:class="h-8 w-8" />
                </StatCard>
                <StatCard title="Published" accent="text-success" value=Signal::derive(move || summary.get().published.to_string())>
                    <CheckCircle attr:class="h-8 w-8" />
                </StatCard>
                <StatCard title="Total Students" accent="text-info" value=Signal::derive(move || summary.get().students.to_string())>
                    <Users attr:class="h-8 w-8" />
                </StatCard>
                <StatCard
                    title="Avg Rating"
                    accent="text-warning"
                    value=Signal::derive(move || {
                        summary.get().average_rating.map(|r| format!("{r:.1}")).unwrap_or_else(|| "0.0".into())
                    })
                >
                    <Star attr:class="h-8 w-8" />
                </StatCard>
            </div>

            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">"My Courses"</h2>
                    <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                        <Show
                            when=move || !courses.with(Vec::is_empty)
                            fallback={
                                let create_path = create_path.clone();
                                move || view! {
                                    <div class="py-12 text-center">
                                        <h3 class="text-lg font-medium">"No courses yet"</h3>
                                        <p class="mt-2 text-base-content/60">"Create your first course and start teaching"</p>
                                        <Link to=create_path.clone() class="btn btn-primary mt-6">"Create Your First Course"</Link>
                                    </div>
                                }
                            }
                        >
                            <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                                <For
                                    each=move || courses.get()
                                    key=|course| course.id.clone()
                                    children=|course| view! { <TeachingCard course=course /> }
                                />
                            </div>
                        </Show>
                    </Show>
                </div>
            </div>
        </div>
    }
}

#[component]
fn TeachingCard(course: Course) -> impl IntoView {
    let edit = AppRoute::EditCourse {
        id: course.id.clone(),
    };
    let (badge_class, badge) = if course.is_published() {
        ("badge badge-success", "Published")
    } else {
        ("badge badge-warning", "Draft")
    };

    view! {
        <div class="card card-compact bg-base-200 hover:shadow-md transition-shadow">
            <figure class="h-40">
                <img src=thumbnail_or_placeholder(&course) alt=course.title.clone() class="w-full h-full object-cover" />
            </figure>
            <div class="card-body">
                <h3 class="font-semibold line-clamp-2">{course.title.clone()}</h3>
                <p class="text-sm text-base-content/60 line-clamp-2">{course.description.clone()}</p>
                <div class="card-actions justify-between items-center">
                    <span class=badge_class>{badge}</span>
                    <Link to=edit.to_path() class="btn btn-ghost btn-sm gap-1">
                        <Pencil attr:class="h-4 w-4" /> "Edit Course"
                    </Link>
                </div>
            </div>
        </div>
    }
}

#[component]
fn AdminDashboard() -> impl IntoView {
    let session = use_session();
    let (stats, set_stats) = signal(AdminStats::default());
    let (loading, set_loading) = signal(true);

    spawn_local(async move {
        match session.api().send(&AdminStatsRequest).await {
            Ok(envelope) => set_stats.set(envelope.stats),
            Err(e) => log::error!("[Dashboard] Failed to load admin stats: {e}"),
        }
        set_loading.set(false);
    });

    view! {
        <div class="max-w-7xl mx-auto px-4 py-8 space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Admin Dashboard"</h1>
                <p class="text-base-content/70 mt-2">"Platform overview and management"</p>
            </div>
            <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <StatCard title="Total Users" accent="text-primary" value=Signal::derive(move || stats.get().total_users.to_string())>
                        <Users attr:class="h-8 w-8" />
                    </StatCard>
                    <StatCard title="Total Courses" accent="text-secondary" value=Signal::derive(move || stats.get().total_courses.to_string())>
                        <BookOpen attr:class="h-8 w-8" />
                    </StatCard>
                    <StatCard title="Enrollments" accent="text-info" value=Signal::derive(move || stats.get().total_enrollments.to_string())>
                        <CheckCircle attr:class="h-8 w-8" />
                    </StatCard>
                    <StatCard title="Total Revenue" accent="text-success" value=Signal::derive(move || format!("${:.2}", stats.get().total_revenue))>
                        <Star attr:class="h-8 w-8" />
                    </StatCard>
                </div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursemart_shared::CourseStatus;

    fn course(progress: Option<f64>) -> Course {
        Course {
            progress,
            ..Default::default()
        }
    }

    #[test]
    fn learning_summary_buckets_by_progress() {
        let courses = [
            course(None),
            course(Some(40.0)),
            course(Some(99.6)),
            course(Some(100.0)),
        ];
        // 99.6 四舍五入为 100
        assert_eq!(
            LearningSummary::of(&courses),
            LearningSummary {
                enrolled: 4,
                completed: 2,
                in_progress: 1,
            }
        );
    }

    #[test]
    fn teaching_summary_ignores_unrated_courses() {
        let courses = [
            Course {
                status: CourseStatus::Published,
                rating: Some(4.0),
                total_students: Some(10),
                ..Default::default()
            },
            Course {
                rating: Some(5.0),
                total_students: Some(3),
                ..Default::default()
            },
            Course::default(),
        ];
        let summary = TeachingSummary::of(&courses);
        assert_eq!(summary.courses, 3);
        assert_eq!(summary.published, 1);
        assert_eq!(summary.students, 13);
        assert_eq!(summary.average_rating, Some(4.5));

        assert_eq!(TeachingSummary::of(&[]).average_rating, None);
    }
}
