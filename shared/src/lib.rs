use serde::{Deserialize, Serialize};

pub mod date;
pub mod enrollment;
pub mod error;
pub mod learning;
pub mod protocol;
pub mod validation;

pub use date::Timestamp;
pub use error::{ApiError, LoadError};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const AVATAR_FALLBACK_URL: &str = "https://ui-avatars.com/api/?name=";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// Account role. Exactly one per user; every role-dependent branch matches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Instructor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Instructor => "Instructor",
            Role::Admin => "Admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub enrolled_courses: Vec<String>,
}

impl User {
    pub fn is_enrolled(&self, course_id: &str) -> bool {
        self.enrolled_courses.iter().any(|id| id == course_id)
    }

    /// Avatar URL, falling back to a generated initials image.
    pub fn avatar_url(&self) -> String {
        avatar_or_fallback(self.avatar.as_deref(), &self.name)
    }
}

pub fn avatar_or_fallback(avatar: Option<&str>, name: &str) -> String {
    match avatar {
        Some(url) if !url.trim().is_empty() => url.to_string(),
        _ => format!("{}{}", AVATAR_FALLBACK_URL, name.replace(' ', "+")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CourseLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    pub const ALL: [CourseLevel; 3] = [
        CourseLevel::Beginner,
        CourseLevel::Intermediate,
        CourseLevel::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CourseLevel::Beginner => "beginner",
            CourseLevel::Intermediate => "intermediate",
            CourseLevel::Advanced => "advanced",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    #[default]
    Draft,
    Published,
}

/// Populated instructor profile embedded in a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructorProfile {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// The backend sends either the populated profile or a bare id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InstructorRef {
    Profile(InstructorProfile),
    Id(String),
}

impl InstructorRef {
    pub fn id(&self) -> &str {
        match self {
            InstructorRef::Profile(profile) => &profile.id,
            InstructorRef::Id(id) => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            InstructorRef::Profile(profile) => Some(&profile.name),
            InstructorRef::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub video_url: Option<String>,
    /// 秒；小数时长取整
    #[serde(default, deserialize_with = "date::seconds::deserialize")]
    pub duration: u32,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub level: CourseLevel,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub status: CourseStatus,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub what_you_will_learn: Vec<String>,
    /// Ordered; order drives previous/next navigation.
    #[serde(default)]
    pub lectures: Vec<Lecture>,
    #[serde(default)]
    pub instructor: Option<InstructorRef>,
    #[serde(default, alias = "averageRating")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub total_students: Option<u32>,
    /// Only present in "my courses" listings.
    #[serde(default)]
    pub progress: Option<f64>,
}

impl Course {
    pub fn is_free(&self) -> bool {
        self.price <= 0.0
    }

    pub fn is_published(&self) -> bool {
        self.status == CourseStatus::Published
    }

    pub fn instructor_id(&self) -> Option<&str> {
        self.instructor.as_ref().map(InstructorRef::id)
    }

    pub fn instructor_name(&self) -> &str {
        self.instructor
            .as_ref()
            .and_then(InstructorRef::name)
            .unwrap_or("Unknown instructor")
    }

    /// 课程总时长（秒）
    pub fn total_duration(&self) -> u32 {
        self.lectures.iter().map(|l| l.duration).sum()
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress.unwrap_or(0.0).clamp(0.0, 100.0).round() as u8
    }

    pub fn price_label(&self) -> String {
        if self.is_free() {
            "Free".to_string()
        } else {
            format!("${:.2}", self.price)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewAuthor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub user: Option<ReviewAuthor>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentAuthor {
    pub name: String,
    pub avatar: Option<String>,
}

impl CommentAuthor {
    pub fn avatar_url(&self) -> String {
        avatar_or_fallback(self.avatar.as_deref(), &self.name)
    }
}

impl From<&User> for CommentAuthor {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

/// Lecture discussion entry. Held in memory only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub author: CommentAuthor,
    pub text: String,
    pub posted_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_courses: u64,
    #[serde(default)]
    pub total_enrollments: u64,
    #[serde(default)]
    pub total_revenue: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_course_with_populated_instructor() {
        let json = r#"{
            "_id": "c1",
            "title": "Rust for Everyone",
            "price": 19.99,
            "level": "intermediate",
            "status": "published",
            "instructor": { "_id": "u9", "name": "Ada" },
            "lectures": [
                { "_id": "l1", "title": "Intro", "videoUrl": "https://v/1.mp4", "duration": 90, "isFree": true },
                { "_id": "l2", "title": "Ownership", "duration": 600,
                  "resources": [{ "name": "Slides", "url": "https://r/s.pdf" }] }
            ]
        }"#;

        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.instructor_id(), Some("u9"));
        assert_eq!(course.instructor_name(), "Ada");
        assert_eq!(course.level, CourseLevel::Intermediate);
        assert!(course.is_published());
        assert!(!course.is_free());
        assert_eq!(course.total_duration(), 690);
        assert!(course.lectures[0].is_free);
        assert_eq!(course.lectures[1].resources[0].name, "Slides");
    }

    #[test]
    fn decodes_fractional_and_null_lecture_durations() {
        let json = r#"{
            "course": {
                "_id": "c3",
                "title": "Video basics",
                "lectures": [
                    { "_id": "l1", "title": "A", "duration": 12.5 },
                    { "_id": "l2", "title": "B", "duration": null },
                    { "_id": "l3", "title": "C" }
                ]
            }
        }"#;
        let envelope: protocol::CourseEnvelope = serde_json::from_str(json).unwrap();
        let durations: Vec<u32> = envelope.course.lectures.iter().map(|l| l.duration).collect();
        assert_eq!(durations, vec![13, 0, 0]);
        assert_eq!(envelope.course.total_duration(), 13);
    }

    #[test]
    fn decodes_course_with_bare_instructor_id() {
        let json = r#"{ "_id": "c2", "title": "Free stuff", "instructor": "u3" }"#;
        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.instructor_id(), Some("u3"));
        assert_eq!(course.instructor_name(), "Unknown instructor");
        assert!(course.is_free());
        assert_eq!(course.price_label(), "Free");
        assert!(course.lectures.is_empty());
    }

    #[test]
    fn decodes_user_role_and_enrollments() {
        let json = r#"{
            "_id": "u1", "name": "Grace Hopper", "email": "g@h.io",
            "role": "instructor", "enrolledCourses": ["c1", "c7"]
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Instructor);
        assert!(user.is_enrolled("c7"));
        assert!(!user.is_enrolled("c2"));
        assert_eq!(
            user.avatar_url(),
            "https://ui-avatars.com/api/?name=Grace+Hopper"
        );
    }

    #[test]
    fn progress_percent_is_clamped_and_rounded() {
        let mut course = Course::default();
        assert_eq!(course.progress_percent(), 0);
        course.progress = Some(66.6);
        assert_eq!(course.progress_percent(), 67);
        course.progress = Some(140.0);
        assert_eq!(course.progress_percent(), 100);
    }
}
