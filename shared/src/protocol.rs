use crate::{AdminStats, Course, CourseLevel, CourseStatus, Review, Role, User};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Whether the request struct is serialized as a JSON body.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// Path parameters are `#[serde(skip)]` fields so that only the payload ends up in the body.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path, relative to the API root.
    fn path(&self) -> String;
}

macro_rules! api_request {
    ($req:ty => $resp:ty, $method:ident, |$this:ident| $path:expr) => {
        impl ApiRequest for $req {
            type Response = $resp;
            const METHOD: HttpMethod = HttpMethod::$method;
            fn path(&$this) -> String {
                $path
            }
        }
    };
}

// =========================================================
// Response Envelopes
// =========================================================

/// Body of a non-2xx response.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Generic acknowledgement for endpoints whose payload the client ignores.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseEnvelope {
    pub course: Course,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoursesEnvelope {
    #[serde(default)]
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(default)]
    pub completed_lectures: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressEnvelope {
    #[serde(default)]
    pub progress: Option<ProgressRecord>,
}

impl ProgressEnvelope {
    pub fn into_completed(self) -> Vec<String> {
        self.progress
            .map(|p| p.completed_lectures)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewsEnvelope {
    #[serde(default)]
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminStatsEnvelope {
    #[serde(default)]
    pub stats: AdminStats,
}

/// Result of a multipart upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    /// 视频时长（秒），仅视频上传返回
    #[serde(default)]
    pub duration: Option<f64>,
}

pub const UPLOAD_IMAGE_PATH: &str = "/upload/image";
pub const UPLOAD_VIDEO_PATH: &str = "/upload/video";

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

api_request!(LoginRequest => AuthResponse, Post, |self| "/auth/login".into());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

api_request!(RegisterRequest => AuthResponse, Post, |self| "/auth/register".into());

/// `GET /auth/me`
#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentUserRequest;

api_request!(CurrentUserRequest => UserEnvelope, Get, |self| "/auth/me".into());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub bio: String,
    pub avatar: String,
}

api_request!(UpdateProfileRequest => UserEnvelope, Put, |self| "/auth/profile".into());

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

api_request!(ChangePasswordRequest => Ack, Put, |self| "/auth/change-password".into());

// =========================================================
// Catalog
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ListCoursesRequest;

api_request!(ListCoursesRequest => CoursesEnvelope, Get, |self| "/courses".into());

#[derive(Debug, Serialize, Deserialize)]
pub struct GetCourseRequest {
    #[serde(skip)]
    pub id: String,
}

api_request!(GetCourseRequest => CourseEnvelope, Get, |self| format!("/courses/{}", self.id));

#[derive(Debug, Serialize, Deserialize)]
pub struct CourseReviewsRequest {
    #[serde(skip)]
    pub course_id: String,
}

api_request!(CourseReviewsRequest => ReviewsEnvelope, Get, |self| format!("/reviews/course/{}", self.course_id));

#[derive(Debug, Serialize, Deserialize)]
pub struct EnrolledCoursesRequest;

api_request!(EnrolledCoursesRequest => CoursesEnvelope, Get, |self| "/courses/student/my-courses".into());

#[derive(Debug, Serialize, Deserialize)]
pub struct InstructorCoursesRequest;

api_request!(InstructorCoursesRequest => CoursesEnvelope, Get, |self| "/courses/instructor/my-courses".into());

// =========================================================
// Learning
// =========================================================

/// 403 when the user is not enrolled and the lecture is not a free preview.
#[derive(Debug, Serialize, Deserialize)]
pub struct CourseContentRequest {
    #[serde(skip)]
    pub course_id: String,
}

api_request!(CourseContentRequest => CourseEnvelope, Get, |self| format!("/courses/{}/content", self.course_id));

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressRequest {
    #[serde(skip)]
    pub course_id: String,
}

api_request!(ProgressRequest => ProgressEnvelope, Get, |self| format!("/courses/{}/progress", self.course_id));

/// Idempotent on the backend.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompleteLectureRequest {
    #[serde(skip)]
    pub course_id: String,
    #[serde(skip)]
    pub lecture_id: String,
}

api_request!(CompleteLectureRequest => Ack, Post, |self| format!(
    "/courses/{}/lectures/{}/complete",
    self.course_id, self.lecture_id
));

// =========================================================
// Payments
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollFreeRequest {
    pub course_id: String,
}

api_request!(EnrollFreeRequest => Ack, Post, |self| "/payments/enroll-free".into());

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockPurchaseRequest {
    pub course_id: String,
}

api_request!(MockPurchaseRequest => Ack, Post, |self| "/payments/mock-purchase".into());

// =========================================================
// Authoring
// =========================================================

/// Editable course fields shared by create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub level: CourseLevel,
    pub price: f64,
    pub thumbnail: String,
    pub language: String,
    pub requirements: Vec<String>,
    pub what_you_will_learn: Vec<String>,
}

impl From<&Course> for CourseDraft {
    fn from(course: &Course) -> Self {
        Self {
            title: course.title.clone(),
            description: course.description.clone(),
            category: course.category.clone(),
            level: course.level,
            price: course.price,
            thumbnail: course.thumbnail.clone().unwrap_or_default(),
            language: course.language.clone(),
            requirements: course.requirements.clone(),
            what_you_will_learn: course.what_you_will_learn.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourseRequest {
    #[serde(flatten)]
    pub draft: CourseDraft,
}

api_request!(CreateCourseRequest => CourseEnvelope, Post, |self| "/courses".into());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCourseRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(flatten)]
    pub draft: CourseDraft,
}

api_request!(UpdateCourseRequest => Ack, Put, |self| format!("/courses/{}", self.id));

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteCourseRequest {
    #[serde(skip)]
    pub id: String,
}

api_request!(DeleteCourseRequest => Ack, Delete, |self| format!("/courses/{}", self.id));

#[derive(Debug, Serialize, Deserialize)]
pub struct PublishCourseRequest {
    #[serde(skip)]
    pub id: String,
    pub status: CourseStatus,
}

api_request!(PublishCourseRequest => Ack, Patch, |self| format!("/courses/{}/publish", self.id));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureDraft {
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub duration: u32,
    pub is_free: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddLectureRequest {
    #[serde(skip)]
    pub course_id: String,
    #[serde(flatten)]
    pub draft: LectureDraft,
}

api_request!(AddLectureRequest => Ack, Post, |self| format!("/courses/{}/lectures", self.course_id));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateLectureRequest {
    #[serde(skip)]
    pub course_id: String,
    #[serde(skip)]
    pub lecture_id: String,
    #[serde(flatten)]
    pub draft: LectureDraft,
}

api_request!(UpdateLectureRequest => Ack, Put, |self| format!(
    "/courses/{}/lectures/{}",
    self.course_id, self.lecture_id
));

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteLectureRequest {
    #[serde(skip)]
    pub course_id: String,
    #[serde(skip)]
    pub lecture_id: String,
}

api_request!(DeleteLectureRequest => Ack, Delete, |self| format!(
    "/courses/{}/lectures/{}",
    self.course_id, self.lecture_id
));

// =========================================================
// Admin
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminStatsRequest;

api_request!(AdminStatsRequest => AdminStatsEnvelope, Get, |self| "/admin/stats".into());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_parameters_stay_out_of_the_body() {
        let req = CompleteLectureRequest {
            course_id: "c1".into(),
            lecture_id: "l2".into(),
        };
        assert_eq!(req.path(), "/courses/c1/lectures/l2/complete");
        assert_eq!(serde_json::to_string(&req).unwrap(), "{}");
        assert_eq!(CompleteLectureRequest::METHOD, HttpMethod::Post);
    }

    #[test]
    fn payment_requests_use_camel_case() {
        let req = EnrollFreeRequest {
            course_id: "c9".into(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({ "courseId": "c9" })
        );
    }

    #[test]
    fn update_course_flattens_draft() {
        let req = UpdateCourseRequest {
            id: "c3".into(),
            draft: CourseDraft {
                title: "T".into(),
                price: 9.5,
                what_you_will_learn: vec!["traits".into()],
                ..Default::default()
            },
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(req.path(), "/courses/c3");
        assert_eq!(body["title"], "T");
        assert_eq!(body["whatYouWillLearn"][0], "traits");
        assert_eq!(body["level"], "beginner");
        assert!(body.get("id").is_none());
    }

    #[test]
    fn progress_envelope_tolerates_missing_record() {
        let empty: ProgressEnvelope = serde_json::from_str("{}").unwrap();
        assert!(empty.into_completed().is_empty());

        let full: ProgressEnvelope =
            serde_json::from_str(r#"{"progress":{"completedLectures":["l1","l3"]}}"#).unwrap();
        assert_eq!(full.into_completed(), vec!["l1", "l3"]);
    }

    #[test]
    fn only_write_methods_carry_a_body() {
        assert!(!HttpMethod::Get.has_body());
        assert!(!HttpMethod::Delete.has_body());
        assert!(HttpMethod::Patch.has_body());
        assert_eq!(
            CourseContentRequest {
                course_id: "c1".into()
            }
            .path(),
            "/courses/c1/content"
        );
    }
}
