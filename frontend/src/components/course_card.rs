use coursemart_shared::Course;
use coursemart_shared::date::format_hours_minutes;
use leptos::prelude::*;

use crate::components::icons::{Clock, Star};
use crate::web::route::AppRoute;
use crate::web::router::Link;

pub const THUMBNAIL_PLACEHOLDER: &str = "https://via.placeholder.com/400x240?text=Course+Image";

pub fn thumbnail_or_placeholder(course: &Course) -> String {
    course
        .thumbnail
        .clone()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| THUMBNAIL_PLACEHOLDER.to_string())
}

/// 目录与首页使用的课程卡片
///
/// `show_progress` 用于"我的课程"列表，显示个人学习进度。
#[component]
pub fn CourseCard(course: Course, #[prop(optional)] show_progress: bool) -> impl IntoView {
    let target = if show_progress {
        AppRoute::Learn {
            id: course.id.clone(),
        }
    } else {
        AppRoute::CourseDetail {
            id: course.id.clone(),
        }
    };
    let rating = course
        .rating
        .filter(|r| *r > 0.0)
        .map(|r| format!("{r:.1}"));
    let progress = course.progress_percent();
    let is_free = course.is_free();

    view! {
        <Link to=target.to_path() class="group block">
            <div class="card card-compact bg-base-100 shadow hover:shadow-xl transition-shadow h-full">
                <figure class="h-40 overflow-hidden">
                    <img
                        src=thumbnail_or_placeholder(&course)
                        alt=course.title.clone()
                        class="w-full h-full object-cover group-hover:scale-105 transition-transform duration-300"
                    />
                </figure>
                <div class="card-body">
                    <h3 class="card-title text-base line-clamp-2 group-hover:text-primary">
                        {course.title.clone()}
                    </h3>
                    <p class="text-sm text-base-content/70">{course.instructor_name().to_string()}</p>
                    <div class="flex items-center gap-3 text-sm text-base-content/70">
                        {rating.map(|r| view! {
                            <span class="flex items-center gap-1 font-bold text-warning">
                                <Star attr:class="h-4 w-4" /> {r}
                            </span>
                        })}
                        <span class="flex items-center gap-1">
                            <Clock attr:class="h-4 w-4" />
                            {format_hours_minutes(course.total_duration())}
                        </span>
                    </div>
                    {if show_progress {
                        view! {
                            <div class="mt-2">
                                <progress class="progress progress-primary w-full" value=progress max="100"></progress>
                                <p class="text-xs text-base-content/60">{format!("{progress}% complete")}</p>
                            </div>
                        }
                        .into_any()
                    } else {
                        view! {
                            <div class="card-actions justify-between items-center mt-2">
                                <span class=if is_free { "text-xl font-bold text-success" } else { "text-xl font-bold" }>
                                    {course.price_label()}
                                </span>
                                <span class="badge badge-ghost capitalize">{course.level.as_str()}</span>
                            </div>
                        }
                        .into_any()
                    }}
                </div>
            </div>
        </Link>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_thumbnails_use_placeholder() {
        let mut course = Course::default();
        assert_eq!(thumbnail_or_placeholder(&course), THUMBNAIL_PLACEHOLDER);
        course.thumbnail = Some("  ".into());
        assert_eq!(thumbnail_or_placeholder(&course), THUMBNAIL_PLACEHOLDER);
        course.thumbnail = Some("https://cdn/x.png".into());
        assert_eq!(thumbnail_or_placeholder(&course), "https://cdn/x.png");
    }
}
