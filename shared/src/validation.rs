//! Client-side form checks run before anything is sent to the backend.

use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_IMAGE_BYTES: f64 = 10.0 * 1024.0 * 1024.0;
pub const MAX_VIDEO_BYTES: f64 = 100.0 * 1024.0 * 1024.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordChangeRejected {
    #[error("Passwords do not match")]
    Mismatch,
    #[error("Password must be at least 6 characters")]
    TooShort,
}

pub fn check_new_password(new_password: &str, confirm: &str) -> Result<(), PasswordChangeRejected> {
    if new_password != confirm {
        return Err(PasswordChangeRejected::Mismatch);
    }
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordChangeRejected::TooShort);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejected {
    #[error("Please upload an image file (JPG, PNG, etc.)")]
    NotAnImage,
    #[error("Image size should be less than 10MB")]
    ImageTooLarge,
    #[error("Video size should be less than 100MB")]
    VideoTooLarge,
}

impl UploadKind {
    /// Multipart field name the backend expects.
    pub fn field_name(&self) -> &'static str {
        match self {
            UploadKind::Image => "image",
            UploadKind::Video => "file",
        }
    }

    /// `size` is in bytes, as reported by the browser `File`.
    pub fn check(&self, mime: &str, size: f64) -> Result<(), UploadRejected> {
        match self {
            UploadKind::Image if !mime.starts_with("image/") => Err(UploadRejected::NotAnImage),
            UploadKind::Image if size > MAX_IMAGE_BYTES => Err(UploadRejected::ImageTooLarge),
            UploadKind::Video if size > MAX_VIDEO_BYTES => Err(UploadRejected::VideoTooLarge),
            _ => Ok(()),
        }
    }
}

/// Drop blank entries from an editable list field.
pub fn clean_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_rules() {
        assert_eq!(
            check_new_password("secret1", "secret2"),
            Err(PasswordChangeRejected::Mismatch)
        );
        assert_eq!(
            check_new_password("abc", "abc"),
            Err(PasswordChangeRejected::TooShort)
        );
        assert_eq!(check_new_password("abcdef", "abcdef"), Ok(()));
        assert_eq!(
            PasswordChangeRejected::TooShort.to_string(),
            "Password must be at least 6 characters"
        );
    }

    #[test]
    fn upload_limits() {
        let mb = 1024.0 * 1024.0;
        assert_eq!(UploadKind::Image.check("image/png", 2.0 * mb), Ok(()));
        assert_eq!(
            UploadKind::Image.check("application/pdf", 1.0),
            Err(UploadRejected::NotAnImage)
        );
        assert_eq!(
            UploadKind::Image.check("image/jpeg", 11.0 * mb),
            Err(UploadRejected::ImageTooLarge)
        );
        assert_eq!(UploadKind::Video.check("video/mp4", 99.0 * mb), Ok(()));
        assert_eq!(
            UploadKind::Video.check("video/mp4", 101.0 * mb),
            Err(UploadRejected::VideoTooLarge)
        );
    }

    #[test]
    fn clean_list_drops_blank_entries() {
        let items = vec!["  Rust basics ".to_string(), "".into(), "   ".into(), "Traits".into()];
        assert_eq!(clean_list(&items), vec!["Rust basics", "Traits"]);
    }
}
