//! 表单状态管理模块
//!
//! 将零散的 signal 整合为表单状态结构体，负责：
//! - 数据的持有与回填
//! - 数据的重置
//! - 数据到请求对象的转换（含校验）

use coursemart_shared::date::round_seconds;
use coursemart_shared::protocol::{CourseDraft, LectureDraft};
use coursemart_shared::validation::clean_list;
use coursemart_shared::{Course, CourseLevel, Lecture};
use leptos::prelude::*;
use thiserror::Error;

pub const CATEGORIES: [&str; 8] = [
    "Web Development",
    "Mobile Development",
    "Data Science",
    "Machine Learning",
    "Design",
    "Business",
    "Marketing",
    "Photography",
];

pub const DEFAULT_LANGUAGE: &str = "English";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormRejected {
    #[error("Title is required")]
    MissingTitle,
    #[error("Description is required")]
    MissingDescription,
    #[error("Please select a category")]
    MissingCategory,
    #[error("Price must be a non-negative number")]
    InvalidPrice,
    #[error("Please upload a video or enter a video URL")]
    MissingVideo,
}

/// 课程表单的一次快照
#[derive(Debug, Clone, PartialEq)]
pub struct CourseForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub level: CourseLevel,
    /// 输入框原文
    pub price: String,
    pub thumbnail: String,
    pub language: String,
    pub requirements: Vec<String>,
    pub outcomes: Vec<String>,
}

impl Default for CourseForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: String::new(),
            level: CourseLevel::Beginner,
            price: "0".to_string(),
            thumbnail: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            requirements: vec![String::new()],
            outcomes: vec![String::new()],
        }
    }
}

impl CourseForm {
    pub fn into_draft(self) -> Result<CourseDraft, FormRejected> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormRejected::MissingTitle);
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(FormRejected::MissingDescription);
        }
        let category = self.category.trim();
        if category.is_empty() {
            return Err(FormRejected::MissingCategory);
        }
        let price = match self.price.trim() {
            "" => 0.0,
            raw => raw
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite() && *p >= 0.0)
                .ok_or(FormRejected::InvalidPrice)?,
        };
        let language = match self.language.trim() {
            "" => DEFAULT_LANGUAGE,
            lang => lang,
        };

        Ok(CourseDraft {
            title: title.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            level: self.level,
            price,
            thumbnail: self.thumbnail.trim().to_string(),
            language: language.to_string(),
            requirements: clean_list(&self.requirements),
            what_you_will_learn: clean_list(&self.outcomes),
        })
    }
}

impl From<&Course> for CourseForm {
    fn from(course: &Course) -> Self {
        let non_empty = |items: &[String]| {
            if items.is_empty() {
                vec![String::new()]
            } else {
                items.to_vec()
            }
        };
        Self {
            title: course.title.clone(),
            description: course.description.clone(),
            category: course.category.clone(),
            level: course.level,
            price: course.price.to_string(),
            thumbnail: course.thumbnail.clone().unwrap_or_default(),
            language: if course.language.is_empty() {
                DEFAULT_LANGUAGE.to_string()
            } else {
                course.language.clone()
            },
            requirements: non_empty(&course.requirements),
            outcomes: non_empty(&course.what_you_will_learn),
        }
    }
}

/// 课程表单状态
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，非常适合作为 Props 在组件间传递。
#[derive(Clone, Copy)]
pub struct CourseFormState {
    pub title: RwSignal<String>,
    pub description: RwSignal<String>,
    pub category: RwSignal<String>,
    pub level: RwSignal<CourseLevel>,
    pub price: RwSignal<String>,
    pub thumbnail: RwSignal<String>,
    pub language: RwSignal<String>,
    pub requirements: RwSignal<Vec<String>>,
    pub outcomes: RwSignal<Vec<String>>,
}

impl CourseFormState {
    pub fn new() -> Self {
        let form = CourseForm::default();
        Self {
            title: RwSignal::new(form.title),
            description: RwSignal::new(form.description),
            category: RwSignal::new(form.category),
            level: RwSignal::new(form.level),
            price: RwSignal::new(form.price),
            thumbnail: RwSignal::new(form.thumbnail),
            language: RwSignal::new(form.language),
            requirements: RwSignal::new(form.requirements),
            outcomes: RwSignal::new(form.outcomes),
        }
    }

    /// 用已有课程回填
    pub fn load(&self, course: &Course) {
        let form = CourseForm::from(course);
        self.title.set(form.title);
        self.description.set(form.description);
        self.category.set(form.category);
        self.level.set(form.level);
        self.price.set(form.price);
        self.thumbnail.set(form.thumbnail);
        self.language.set(form.language);
        self.requirements.set(form.requirements);
        self.outcomes.set(form.outcomes);
    }

    pub fn snapshot(&self) -> CourseForm {
        CourseForm {
            title: self.title.get_untracked(),
            description: self.description.get_untracked(),
            category: self.category.get_untracked(),
            level: self.level.get_untracked(),
            price: self.price.get_untracked(),
            thumbnail: self.thumbnail.get_untracked(),
            language: self.language.get_untracked(),
            requirements: self.requirements.get_untracked(),
            outcomes: self.outcomes.get_untracked(),
        }
    }
}

impl Default for CourseFormState {
    fn default() -> Self {
        Self::new()
    }
}

/// 课时表单快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LectureForm {
    pub title: String,
    pub description: String,
    pub video_url: String,
    /// 秒
    pub duration: u32,
    pub is_free: bool,
}

impl LectureForm {
    pub fn into_draft(self) -> Result<LectureDraft, FormRejected> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormRejected::MissingTitle);
        }
        let video_url = self.video_url.trim();
        if video_url.is_empty() {
            return Err(FormRejected::MissingVideo);
        }
        Ok(LectureDraft {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            video_url: video_url.to_string(),
            duration: self.duration,
            is_free: self.is_free,
        })
    }
}

impl From<&Lecture> for LectureForm {
    fn from(lecture: &Lecture) -> Self {
        Self {
            title: lecture.title.clone(),
            description: lecture.description.clone(),
            video_url: lecture.video_url.clone().unwrap_or_default(),
            duration: lecture.duration,
            is_free: lecture.is_free,
        }
    }
}

/// 上传返回的时长（秒，浮点）取整
pub fn rounded_duration(duration: Option<f64>) -> u32 {
    duration.map_or(0, round_seconds)
}

/// 课时表单状态；`editing` 为正在编辑的课时 id，`None` 表示新增
#[derive(Clone, Copy)]
pub struct LectureFormState {
    pub title: RwSignal<String>,
    pub description: RwSignal<String>,
    pub video_url: RwSignal<String>,
    pub duration: RwSignal<u32>,
    pub is_free: RwSignal<bool>,
    pub editing: RwSignal<Option<String>>,
    pub open: RwSignal<bool>,
}

impl LectureFormState {
    pub fn new() -> Self {
        Self {
            title: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            video_url: RwSignal::new(String::new()),
            duration: RwSignal::new(0),
            is_free: RwSignal::new(false),
            editing: RwSignal::new(None),
            open: RwSignal::new(false),
        }
    }

    fn fill(&self, form: LectureForm) {
        self.title.set(form.title);
        self.description.set(form.description);
        self.video_url.set(form.video_url);
        self.duration.set(form.duration);
        self.is_free.set(form.is_free);
    }

    /// 打开空白表单用于新增
    pub fn start_new(&self) {
        self.fill(LectureForm::default());
        self.editing.set(None);
        self.open.set(true);
    }

    pub fn start_edit(&self, lecture: &Lecture) {
        self.fill(LectureForm::from(lecture));
        self.editing.set(Some(lecture.id.clone()));
        self.open.set(true);
    }

    /// 重置表单到初始状态并收起
    pub fn reset(&self) {
        self.fill(LectureForm::default());
        self.editing.set(None);
        self.open.set(false);
    }

    pub fn snapshot(&self) -> LectureForm {
        LectureForm {
            title: self.title.get_untracked(),
            description: self.description.get_untracked(),
            video_url: self.video_url.get_untracked(),
            duration: self.duration.get_untracked(),
            is_free: self.is_free.get_untracked(),
        }
    }
}

impl Default for LectureFormState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_course() -> CourseForm {
        CourseForm {
            title: "  Rust from Zero ".into(),
            description: "Ownership and borrowing".into(),
            category: "Web Development".into(),
            price: "19.5".into(),
            requirements: vec!["".into(), " A laptop ".into()],
            outcomes: vec!["   ".into()],
            ..Default::default()
        }
    }

    #[test]
    fn course_draft_is_trimmed_and_lists_cleaned() {
        let draft = valid_course().into_draft().unwrap();
        assert_eq!(draft.title, "Rust from Zero");
        assert_eq!(draft.price, 19.5);
        assert_eq!(draft.language, "English");
        assert_eq!(draft.requirements, vec!["A laptop"]);
        assert!(draft.what_you_will_learn.is_empty());
    }

    #[test]
    fn course_draft_rejects_missing_fields_and_bad_price() {
        let mut form = valid_course();
        form.category = " ".into();
        assert_eq!(form.into_draft(), Err(FormRejected::MissingCategory));

        let mut form = valid_course();
        form.price = "-3".into();
        assert_eq!(form.into_draft(), Err(FormRejected::InvalidPrice));

        let mut form = valid_course();
        form.price = "abc".into();
        assert_eq!(form.into_draft(), Err(FormRejected::InvalidPrice));

        let mut form = valid_course();
        form.price = String::new();
        assert_eq!(form.into_draft().map(|d| d.price), Ok(0.0));
    }

    #[test]
    fn course_form_keeps_one_blank_row_per_list() {
        let course = Course {
            title: "T".into(),
            what_you_will_learn: vec!["traits".into()],
            ..Default::default()
        };
        let form = CourseForm::from(&course);
        assert_eq!(form.requirements, vec![String::new()]);
        assert_eq!(form.outcomes, vec!["traits"]);
        assert_eq!(form.language, DEFAULT_LANGUAGE);
    }

    #[test]
    fn lecture_draft_requires_title_and_video() {
        let form = LectureForm {
            title: "Intro".into(),
            ..Default::default()
        };
        assert_eq!(form.clone().into_draft(), Err(FormRejected::MissingVideo));

        let draft = LectureForm {
            video_url: " https://v/1.mp4 ".into(),
            duration: 95,
            is_free: true,
            ..form
        }
        .into_draft()
        .unwrap();
        assert_eq!(draft.video_url, "https://v/1.mp4");
        assert!(draft.is_free);
    }

    #[test]
    fn upload_durations_are_rounded() {
        assert_eq!(rounded_duration(Some(94.6)), 95);
        assert_eq!(rounded_duration(Some(f64::NAN)), 0);
        assert_eq!(rounded_duration(None), 0);
    }
}
