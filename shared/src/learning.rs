//! 课程学习进度状态机
//!
//! 纯状态，不做任何 I/O：网络请求由 [`session::LearningSession`] 发起，
//! 结果再通过 `apply_*` / `finish_*` 方法回灌。
//!
//! 不变量：
//! - 存在课时时 `current_index` 始终落在 `[0, len - 1]`
//! - 每个课时至多发出一次完成请求（已完成或请求中的课时不会再次发出）
//! - 切换课时先把观看进度清零
//! - 只接受属于当前课时的评论响应

use std::collections::BTreeSet;
use std::time::Duration;

use thiserror::Error;

use crate::{Comment, CommentAuthor, Course, Lecture, LoadError, Timestamp};

pub mod session;

#[cfg(test)]
mod tests;

/// Watch percentage at which a lecture counts as completed.
pub const COMPLETION_THRESHOLD: f64 = 90.0;

/// Delay before leaving the learning view after an access-denied response.
pub const ACCESS_DENIED_REDIRECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadStatus {
    #[default]
    Loading,
    Ready,
    Failed(LoadError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommentRejected {
    #[error("Comment cannot be empty")]
    Empty,
    #[error("Select a lecture before commenting")]
    NoLecture,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LearningState {
    course_id: String,
    status: LoadStatus,
    course: Option<Course>,
    current_index: usize,
    /// 0–100
    watch_fraction: f64,
    completed: BTreeSet<String>,
    in_flight: BTreeSet<String>,
    comments: Vec<Comment>,
}

impl LearningState {
    pub fn new(course_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            status: LoadStatus::Loading,
            course: None,
            current_index: 0,
            watch_fraction: 0.0,
            completed: BTreeSet::new(),
            in_flight: BTreeSet::new(),
            comments: Vec::new(),
        }
    }

    // =========================================================
    // 读取
    // =========================================================

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn course(&self) -> Option<&Course> {
        self.course.as_ref()
    }

    pub fn lectures(&self) -> &[Lecture] {
        self.course
            .as_ref()
            .map(|c| c.lectures.as_slice())
            .unwrap_or_default()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_lecture(&self) -> Option<&Lecture> {
        self.lectures().get(self.current_index)
    }

    pub fn watch_fraction(&self) -> f64 {
        self.watch_fraction
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn is_completed(&self, lecture_id: &str) -> bool {
        self.completed.contains(lecture_id)
    }

    pub fn is_completing(&self, lecture_id: &str) -> bool {
        self.in_flight.contains(lecture_id)
    }

    pub fn current_is_completed(&self) -> bool {
        self.current_lecture()
            .is_some_and(|lecture| self.is_completed(&lecture.id))
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.current_index + 1 < self.lectures().len()
    }

    /// `round(completed / total * 100)`; 0 without lectures.
    ///
    /// Only ids of lectures in this course count, so stale ids from the backend
    /// cannot push the figure past 100.
    pub fn overall_progress(&self) -> u8 {
        let lectures = self.lectures();
        if lectures.is_empty() {
            return 0;
        }
        let done = lectures
            .iter()
            .filter(|lecture| self.completed.contains(&lecture.id))
            .count();
        (done as f64 / lectures.len() as f64 * 100.0).round() as u8
    }

    // =========================================================
    // 加载
    // =========================================================

    pub fn apply_content(&mut self, course: Course) {
        self.course = Some(course);
        self.status = LoadStatus::Ready;
        self.current_index = 0;
        self.watch_fraction = 0.0;
        self.comments.clear();
    }

    pub fn apply_progress(&mut self, completed: impl IntoIterator<Item = String>) {
        self.completed.extend(completed);
    }

    pub fn fail(&mut self, err: LoadError) {
        self.status = LoadStatus::Failed(err);
    }

    // =========================================================
    // 课时导航
    // =========================================================

    /// Returns the id of the newly selected lecture (whose comments should be
    /// loaded), or `None` when `index` is out of range.
    pub fn select_lecture(&mut self, index: usize) -> Option<String> {
        let id = self.lectures().get(index)?.id.clone();
        self.current_index = index;
        self.watch_fraction = 0.0;
        self.comments.clear();
        Some(id)
    }

    pub fn previous(&mut self) -> Option<String> {
        if !self.can_go_previous() {
            return None;
        }
        self.select_lecture(self.current_index - 1)
    }

    pub fn next(&mut self) -> Option<String> {
        if !self.can_go_next() {
            return None;
        }
        self.select_lecture(self.current_index + 1)
    }

    // =========================================================
    // 播放进度与完成
    // =========================================================

    /// Feed a `timeupdate` from the video element playing `lecture_id`.
    ///
    /// Events from a player that no longer shows the selected lecture are
    /// dropped. Returns the lecture id when this update crossed the completion
    /// threshold and a completion request must be sent.
    pub fn update_playback(
        &mut self,
        lecture_id: &str,
        current_time: f64,
        duration: f64,
    ) -> Option<String> {
        if self.current_lecture().is_none_or(|lecture| lecture.id != lecture_id) {
            return None;
        }
        if !duration.is_finite() || !current_time.is_finite() || duration <= 0.0 {
            return None;
        }
        let progress = (current_time / duration * 100.0).clamp(0.0, 100.0);
        self.watch_fraction = progress;

        if progress < COMPLETION_THRESHOLD {
            return None;
        }
        self.begin_completion(lecture_id).then(|| lecture_id.to_string())
    }

    /// Reserve a completion request for `lecture_id`. `false` when it is
    /// already completed or a request is outstanding.
    pub fn begin_completion(&mut self, lecture_id: &str) -> bool {
        if self.completed.contains(lecture_id) || self.in_flight.contains(lecture_id) {
            return false;
        }
        self.in_flight.insert(lecture_id.to_string());
        true
    }

    pub fn finish_completion(&mut self, lecture_id: &str, accepted: bool) {
        self.in_flight.remove(lecture_id);
        if accepted {
            self.completed.insert(lecture_id.to_string());
        }
    }

    // =========================================================
    // 评论
    // =========================================================

    /// Apply a comment response. Dropped (returns `false`) when `lecture_id`
    /// is no longer the selected lecture.
    pub fn apply_comments(&mut self, lecture_id: &str, comments: Vec<Comment>) -> bool {
        let is_current = self
            .current_lecture()
            .is_some_and(|lecture| lecture.id == lecture_id);
        if is_current {
            self.comments = comments;
        }
        is_current
    }

    /// Prepend a locally authored comment; nothing is sent to the backend.
    pub fn add_comment(
        &mut self,
        text: &str,
        author: CommentAuthor,
        now: Timestamp,
    ) -> Result<&Comment, CommentRejected> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CommentRejected::Empty);
        }
        if self.current_lecture().is_none() {
            return Err(CommentRejected::NoLecture);
        }
        self.comments.insert(
            0,
            Comment {
                id: now.as_millis(),
                author,
                text: text.to_string(),
                posted_at: now,
            },
        );
        Ok(&self.comments[0])
    }
}
