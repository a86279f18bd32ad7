use thiserror::Error;

// =========================================================
// API 错误
// =========================================================

/// Failure of a single request against the REST backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 401: token missing or expired
    #[error("not authenticated")]
    Unauthorized,
    /// 403: not enrolled and the resource is not a free preview
    #[error("access denied: {0}")]
    Forbidden(String),
    /// 404
    #[error("not found: {0}")]
    NotFound(String),
    #[error("server responded with {status}: {message}")]
    Status { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("failed to encode request: {0}")]
    Encode(String),
}

impl ApiError {
    /// Classify a non-2xx response. `message` is the backend's `message` field, if any.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        let message = message.unwrap_or_default();
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            _ => ApiError::Status { status, message },
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend-provided message when there is one, `fallback` otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Forbidden(message)
            | ApiError::NotFound(message)
            | ApiError::Status { message, .. }
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            _ => fallback.to_string(),
        }
    }
}

// =========================================================
// 课程内容加载错误
// =========================================================

/// Terminal outcome of loading course content for the learning view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Please purchase this course to access video content")]
    AccessDenied,
    #[error("Course not found")]
    NotFound,
    #[error("Failed to load course")]
    Failed,
}

impl From<&ApiError> for LoadError {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::Forbidden(_) => LoadError::AccessDenied,
            ApiError::NotFound(_) => LoadError::NotFound,
            _ => LoadError::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_status_codes() {
        assert_eq!(ApiError::from_status(401, None), ApiError::Unauthorized);
        assert_eq!(
            ApiError::from_status(403, Some("not enrolled".into())),
            ApiError::Forbidden("not enrolled".into())
        );
        assert_eq!(
            ApiError::from_status(500, None),
            ApiError::Status {
                status: 500,
                message: String::new()
            }
        );
        assert_eq!(ApiError::Network("offline".into()).status_code(), None);
    }

    #[test]
    fn user_message_prefers_backend_text() {
        let err = ApiError::from_status(400, Some("Already enrolled".into()));
        assert_eq!(err.user_message("Enrollment failed"), "Already enrolled");

        let err = ApiError::from_status(400, Some("   ".into()));
        assert_eq!(err.user_message("Enrollment failed"), "Enrollment failed");

        assert_eq!(
            ApiError::Unauthorized.user_message("Payment failed"),
            "Payment failed"
        );
    }

    #[test]
    fn load_errors_distinguish_forbidden() {
        assert_eq!(
            LoadError::from(&ApiError::Forbidden(String::new())),
            LoadError::AccessDenied
        );
        assert_eq!(
            LoadError::from(&ApiError::NotFound(String::new())),
            LoadError::NotFound
        );
        assert_eq!(
            LoadError::from(&ApiError::Network("reset".into())),
            LoadError::Failed
        );
        assert_eq!(
            LoadError::AccessDenied.to_string(),
            "Please purchase this course to access video content"
        );
    }
}
