//! 学习会话：把 [`LearningState`] 与后端调用串起来
//!
//! 运行在单线程事件循环上。状态放在 `RefCell` 中，借用从不跨越 `.await`。

use std::cell::RefCell;

use async_trait::async_trait;

use super::{CommentRejected, LearningState};
use crate::{ApiError, Comment, CommentAuthor, Course, LoadError, Timestamp};

/// Backend operations the learning view depends on.
#[async_trait(?Send)]
pub trait LearningBackend {
    /// `GET /courses/{id}/content`
    async fn course_content(&self, course_id: &str) -> Result<Course, ApiError>;
    /// `GET /courses/{id}/progress`
    async fn completed_lectures(&self, course_id: &str) -> Result<Vec<String>, ApiError>;
    /// `POST /courses/{id}/lectures/{lectureId}/complete`
    async fn complete_lecture(&self, course_id: &str, lecture_id: &str) -> Result<(), ApiError>;
    async fn lecture_comments(
        &self,
        course_id: &str,
        lecture_id: &str,
    ) -> Result<Vec<Comment>, ApiError>;
}

type Listener = Box<dyn Fn(&LearningState)>;

pub struct LearningSession<B> {
    backend: B,
    state: RefCell<LearningState>,
    listeners: RefCell<Vec<Listener>>,
}

impl<B: LearningBackend> LearningSession<B> {
    pub fn new(course_id: impl Into<String>, backend: B) -> Self {
        Self {
            backend,
            state: RefCell::new(LearningState::new(course_id)),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Called with the new state after every mutation.
    pub fn subscribe(&self, listener: impl Fn(&LearningState) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    pub fn snapshot(&self) -> LearningState {
        self.state.borrow().clone()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&LearningState) -> R) -> R {
        f(&self.state.borrow())
    }

    fn course_id(&self) -> String {
        self.state.borrow().course_id().to_string()
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut LearningState) -> R) -> R {
        let result = f(&mut self.state.borrow_mut());
        self.notify();
        result
    }

    fn notify(&self) {
        let state = self.state.borrow();
        for listener in self.listeners.borrow().iter() {
            listener(&state);
        }
    }

    /// Fetch course content and saved progress, then select the first lecture.
    ///
    /// A failed progress fetch is not fatal: the course opens with nothing completed.
    pub async fn load(&self) -> Result<(), LoadError> {
        let course_id = self.course_id();

        let course = match self.backend.course_content(&course_id).await {
            Ok(course) => course,
            Err(err) => {
                let load_err = LoadError::from(&err);
                log::error!("[Learning] failed to load course {course_id}: {err}");
                self.mutate(|s| s.fail(load_err.clone()));
                return Err(load_err);
            }
        };

        let completed = match self.backend.completed_lectures(&course_id).await {
            Ok(ids) => ids,
            Err(err) => {
                log::warn!("[Learning] failed to load progress for {course_id}: {err}");
                Vec::new()
            }
        };

        log::debug!(
            "[Learning] course {course_id} loaded: {} lectures, {} completed",
            course.lectures.len(),
            completed.len()
        );
        self.mutate(|s| {
            s.apply_content(course);
            s.apply_progress(completed);
        });
        self.select_lecture(0).await;
        Ok(())
    }

    pub async fn select_lecture(&self, index: usize) {
        if let Some(lecture_id) = self.mutate(|s| s.select_lecture(index)) {
            self.load_comments(lecture_id).await;
        }
    }

    pub async fn previous(&self) {
        if let Some(lecture_id) = self.mutate(LearningState::previous) {
            self.load_comments(lecture_id).await;
        }
    }

    pub async fn next(&self) {
        if let Some(lecture_id) = self.mutate(LearningState::next) {
            self.load_comments(lecture_id).await;
        }
    }

    async fn load_comments(&self, lecture_id: String) {
        let course_id = self.course_id();
        match self.backend.lecture_comments(&course_id, &lecture_id).await {
            Ok(comments) => {
                if !self.mutate(|s| s.apply_comments(&lecture_id, comments)) {
                    log::debug!("[Learning] discarded stale comments for lecture {lecture_id}");
                }
            }
            Err(err) => log::warn!("[Learning] failed to load comments for {lecture_id}: {err}"),
        }
    }

    /// `lecture_id` is the lecture the reporting player was built for.
    pub async fn on_playback_time_update(
        &self,
        lecture_id: &str,
        current_time: f64,
        duration: f64,
    ) {
        let crossed = self.mutate(|s| s.update_playback(lecture_id, current_time, duration));
        if let Some(lecture_id) = crossed {
            self.send_completion(lecture_id).await;
        }
    }

    /// Explicit "mark as complete". No-op when already completed or in flight.
    pub async fn mark_complete(&self, lecture_id: &str) {
        if self.mutate(|s| s.begin_completion(lecture_id)) {
            self.send_completion(lecture_id.to_string()).await;
        }
    }

    pub async fn mark_current_complete(&self) {
        let current = self.with_state(|s| s.current_lecture().map(|l| l.id.clone()));
        if let Some(lecture_id) = current {
            self.mark_complete(&lecture_id).await;
        }
    }

    async fn send_completion(&self, lecture_id: String) {
        let course_id = self.course_id();
        let result = self.backend.complete_lecture(&course_id, &lecture_id).await;
        match &result {
            Ok(()) => log::info!("[Learning] lecture {lecture_id} completed"),
            Err(err) => log::error!("[Learning] failed to mark lecture {lecture_id} complete: {err}"),
        }
        self.mutate(|s| s.finish_completion(&lecture_id, result.is_ok()));
    }

    pub fn add_comment(
        &self,
        text: &str,
        author: CommentAuthor,
        now: Timestamp,
    ) -> Result<(), CommentRejected> {
        self.mutate(|s| s.add_comment(text, author, now).map(|_| ()))
    }
}
