use super::session::{LearningBackend, LearningSession};
use super::*;
use crate::ApiError;
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use tokio::sync::oneshot;

// =========================================================
// 辅助函数
// =========================================================

fn lecture(id: &str) -> Lecture {
    Lecture {
        id: id.to_string(),
        title: format!("Lecture {id}"),
        duration: 100,
        ..Default::default()
    }
}

fn course_with(ids: &[&str]) -> Course {
    Course {
        id: "c1".into(),
        title: "Systems Programming".into(),
        lectures: ids.iter().map(|id| lecture(id)).collect(),
        ..Default::default()
    }
}

fn ready_state(ids: &[&str]) -> LearningState {
    let mut state = LearningState::new("c1");
    state.apply_content(course_with(ids));
    state
}

fn author() -> CommentAuthor {
    CommentAuthor {
        name: "Lin".into(),
        avatar: None,
    }
}

fn comment(id: i64, text: &str) -> Comment {
    Comment {
        id,
        author: author(),
        text: text.into(),
        posted_at: Timestamp::new(id),
    }
}

// =========================================================
// MockBackend
// =========================================================

struct MockBackend {
    content: RefCell<Result<Course, ApiError>>,
    progress: RefCell<Result<Vec<String>, ApiError>>,
    complete_result: RefCell<Result<(), ApiError>>,
    complete_calls: RefCell<Vec<String>>,
    comments: RefCell<HashMap<String, Vec<Comment>>>,
    comment_gates: RefCell<HashMap<String, oneshot::Receiver<Vec<Comment>>>>,
}

impl MockBackend {
    fn new(course: Course) -> Self {
        Self {
            content: RefCell::new(Ok(course)),
            progress: RefCell::new(Ok(Vec::new())),
            complete_result: RefCell::new(Ok(())),
            complete_calls: RefCell::new(Vec::new()),
            comments: RefCell::new(HashMap::new()),
            comment_gates: RefCell::new(HashMap::new()),
        }
    }

    fn failing(err: ApiError) -> Self {
        let backend = Self::new(Course::default());
        *backend.content.borrow_mut() = Err(err);
        backend
    }

    /// The next comment request for `lecture_id` resolves only when the sender fires.
    fn gate_comments(&self, lecture_id: &str) -> oneshot::Sender<Vec<Comment>> {
        let (tx, rx) = oneshot::channel();
        self.comment_gates
            .borrow_mut()
            .insert(lecture_id.to_string(), rx);
        tx
    }
}

#[async_trait(?Send)]
impl LearningBackend for Rc<MockBackend> {
    async fn course_content(&self, _course_id: &str) -> Result<Course, ApiError> {
        self.content.borrow().clone()
    }

    async fn completed_lectures(&self, _course_id: &str) -> Result<Vec<String>, ApiError> {
        self.progress.borrow().clone()
    }

    async fn complete_lecture(&self, _course_id: &str, lecture_id: &str) -> Result<(), ApiError> {
        self.complete_calls.borrow_mut().push(lecture_id.to_string());
        self.complete_result.borrow().clone()
    }

    async fn lecture_comments(
        &self,
        _course_id: &str,
        lecture_id: &str,
    ) -> Result<Vec<Comment>, ApiError> {
        let gate = self.comment_gates.borrow_mut().remove(lecture_id);
        match gate {
            Some(rx) => Ok(rx.await.unwrap_or_default()),
            None => Ok(self
                .comments
                .borrow()
                .get(lecture_id)
                .cloned()
                .unwrap_or_default()),
        }
    }
}

fn session_with(backend: &Rc<MockBackend>) -> LearningSession<Rc<MockBackend>> {
    LearningSession::new("c1", Rc::clone(backend))
}

// =========================================================
// 播放进度
// =========================================================

#[test]
fn playback_progress_is_clamped() {
    let mut state = ready_state(&["l1"]);

    state.update_playback("l1", 25.0, 100.0);
    assert_eq!(state.watch_fraction(), 25.0);

    state.update_playback("l1", -5.0, 100.0);
    assert_eq!(state.watch_fraction(), 0.0);

    state.update_playback("l1", 150.0, 100.0);
    assert_eq!(state.watch_fraction(), 100.0);
}

#[test]
fn non_positive_or_non_finite_duration_is_ignored() {
    let mut state = ready_state(&["l1"]);
    state.update_playback("l1", 40.0, 100.0);

    for (time, duration) in [
        (10.0, 0.0),
        (10.0, -3.0),
        (10.0, f64::NAN),
        (10.0, f64::INFINITY),
        (f64::NAN, 100.0),
    ] {
        assert_eq!(state.update_playback("l1", time, duration), None);
        assert_eq!(state.watch_fraction(), 40.0);
    }
}

#[test]
fn crossing_threshold_requests_completion_once() {
    let mut state = ready_state(&["l1", "l2"]);

    assert_eq!(state.update_playback("l1", 89.9, 100.0), None);
    assert_eq!(state.update_playback("l1", 90.0, 100.0), Some("l1".to_string()));
    // 请求未返回前，后续 timeupdate 不会再次触发
    assert_eq!(state.update_playback("l1", 95.0, 100.0), None);
    assert!(state.is_completing("l1"));

    state.finish_completion("l1", true);
    assert!(state.is_completed("l1"));
    assert!(!state.is_completing("l1"));
    assert_eq!(state.update_playback("l1", 99.0, 100.0), None);
}

#[test]
fn failed_completion_can_be_retried() {
    let mut state = ready_state(&["l1"]);

    assert!(state.update_playback("l1", 92.0, 100.0).is_some());
    state.finish_completion("l1", false);
    assert!(!state.is_completed("l1"));

    assert_eq!(state.update_playback("l1", 93.0, 100.0), Some("l1".to_string()));
}

#[test]
fn playback_from_a_replaced_player_is_ignored() {
    let mut state = ready_state(&["l1", "l2"]);
    state.next();

    // l1 的播放器在切换后仍可能触发一次 timeupdate
    assert_eq!(state.update_playback("l1", 95.0, 100.0), None);
    assert_eq!(state.watch_fraction(), 0.0);
    assert!(!state.is_completing("l1"));
    assert!(!state.is_completing("l2"));

    assert_eq!(state.update_playback("l2", 95.0, 100.0), Some("l2".to_string()));
}

// =========================================================
// 导航
// =========================================================

#[test]
fn navigation_is_clamped_at_both_ends() {
    let mut state = ready_state(&["l1", "l2", "l3"]);

    assert!(!state.can_go_previous());
    assert_eq!(state.previous(), None);
    assert_eq!(state.current_index(), 0);

    assert_eq!(state.next(), Some("l2".to_string()));
    assert_eq!(state.next(), Some("l3".to_string()));
    assert!(!state.can_go_next());
    assert_eq!(state.next(), None);
    assert_eq!(state.current_index(), 2);
}

#[test]
fn select_lecture_is_bounds_checked() {
    let mut state = ready_state(&["l1", "l2"]);
    state.select_lecture(1);
    state.update_playback("l2", 50.0, 100.0);

    assert_eq!(state.select_lecture(2), None);
    assert_eq!(state.current_index(), 1);
    assert_eq!(state.watch_fraction(), 50.0);
}

#[test]
fn switching_lectures_resets_watch_fraction() {
    let mut state = ready_state(&["l1", "l2"]);
    state.update_playback("l1", 70.0, 100.0);

    state.next();
    assert_eq!(state.watch_fraction(), 0.0);
    assert_eq!(state.current_lecture().map(|l| l.id.as_str()), Some("l2"));
}

#[test]
fn empty_course_has_no_navigation() {
    let mut state = ready_state(&[]);
    assert_eq!(state.current_lecture(), None);
    assert_eq!(state.next(), None);
    assert_eq!(state.previous(), None);
    assert_eq!(state.select_lecture(0), None);
    assert_eq!(state.update_playback("l1", 95.0, 100.0), None);
}

// =========================================================
// 总进度
// =========================================================

#[test]
fn overall_progress() {
    assert_eq!(ready_state(&[]).overall_progress(), 0);
    assert_eq!(LearningState::new("c1").overall_progress(), 0);

    let mut state = ready_state(&["l1", "l2", "l3", "l4"]);
    state.apply_progress(["l1".to_string(), "l3".to_string()]);
    assert_eq!(state.overall_progress(), 50);

    let mut state = ready_state(&["l1", "l2", "l3"]);
    state.apply_progress(["l1".to_string()]);
    assert_eq!(state.overall_progress(), 33);
}

#[test]
fn unknown_completed_ids_do_not_count() {
    let mut state = ready_state(&["l1", "l2"]);
    state.apply_progress(["l1".to_string(), "gone".to_string(), "also-gone".to_string()]);
    assert_eq!(state.overall_progress(), 50);
}

// =========================================================
// 评论
// =========================================================

#[test]
fn blank_comments_are_rejected() {
    let mut state = ready_state(&["l1"]);
    assert_eq!(
        state.add_comment("   \n", author(), Timestamp::new(1)),
        Err(CommentRejected::Empty)
    );
    assert!(state.comments().is_empty());
}

#[test]
fn new_comments_are_prepended() {
    let mut state = ready_state(&["l1"]);
    state.apply_comments("l1", vec![comment(1, "older")]);

    let added = state
        .add_comment("  Great lecture ", author(), Timestamp::new(42))
        .unwrap();
    assert_eq!(added.id, 42);
    assert_eq!(added.text, "Great lecture");

    let texts: Vec<_> = state.comments().iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["Great lecture", "older"]);
}

#[test]
fn comments_need_a_selected_lecture() {
    let mut state = LearningState::new("c1");
    assert_eq!(
        state.add_comment("hello", author(), Timestamp::new(1)),
        Err(CommentRejected::NoLecture)
    );
}

#[test]
fn comments_for_other_lectures_are_ignored() {
    let mut state = ready_state(&["l1", "l2"]);
    state.next();
    assert!(!state.apply_comments("l1", vec![comment(1, "stale")]));
    assert!(state.comments().is_empty());
    assert!(state.apply_comments("l2", vec![comment(2, "fresh")]));
    assert_eq!(state.comments()[0].text, "fresh");
}

// =========================================================
// LearningSession
// =========================================================

#[tokio::test]
async fn load_applies_content_progress_and_first_lecture() {
    let backend = Rc::new(MockBackend::new(course_with(&["l1", "l2"])));
    *backend.progress.borrow_mut() = Ok(vec!["l2".into()]);
    backend
        .comments
        .borrow_mut()
        .insert("l1".into(), vec![comment(1, "hi")]);
    let session = session_with(&backend);

    session.load().await.unwrap();

    session.with_state(|s| {
        assert_eq!(s.status(), &LoadStatus::Ready);
        assert_eq!(s.current_index(), 0);
        assert!(s.is_completed("l2"));
        assert_eq!(s.overall_progress(), 50);
        assert_eq!(s.comments().len(), 1);
    });
}

#[tokio::test]
async fn forbidden_content_is_access_denied() {
    let backend = Rc::new(MockBackend::failing(ApiError::Forbidden(
        "not enrolled".into(),
    )));
    let session = session_with(&backend);

    assert_eq!(session.load().await, Err(LoadError::AccessDenied));
    assert_eq!(
        session.snapshot().status(),
        &LoadStatus::Failed(LoadError::AccessDenied)
    );
}

#[tokio::test]
async fn other_failures_are_generic() {
    let backend = Rc::new(MockBackend::failing(ApiError::Network("offline".into())));
    let session = session_with(&backend);

    assert_eq!(session.load().await, Err(LoadError::Failed));
    assert!(session.with_state(|s| s.course().is_none()));
}

#[tokio::test]
async fn progress_failure_is_not_fatal() {
    let backend = Rc::new(MockBackend::new(course_with(&["l1"])));
    *backend.progress.borrow_mut() = Err(ApiError::Status {
        status: 500,
        message: String::new(),
    });
    let session = session_with(&backend);

    assert_eq!(session.load().await, Ok(()));
    assert_eq!(session.with_state(LearningState::overall_progress), 0);
}

#[tokio::test]
async fn mark_complete_twice_calls_backend_once() {
    let backend = Rc::new(MockBackend::new(course_with(&["l1", "l2"])));
    let session = session_with(&backend);
    session.load().await.unwrap();

    session.mark_complete("l1").await;
    session.mark_complete("l1").await;

    assert_eq!(*backend.complete_calls.borrow(), vec!["l1".to_string()]);
    session.with_state(|s| {
        assert!(s.is_completed("l1"));
        assert_eq!(s.overall_progress(), 50);
    });
}

#[tokio::test]
async fn already_completed_lectures_are_not_resent() {
    let backend = Rc::new(MockBackend::new(course_with(&["l1"])));
    *backend.progress.borrow_mut() = Ok(vec!["l1".into()]);
    let session = session_with(&backend);
    session.load().await.unwrap();

    session.on_playback_time_update("l1", 99.0, 100.0).await;
    session.mark_current_complete().await;

    assert!(backend.complete_calls.borrow().is_empty());
}

#[tokio::test]
async fn rejected_completion_is_not_reflected() {
    let backend = Rc::new(MockBackend::new(course_with(&["l1"])));
    *backend.complete_result.borrow_mut() = Err(ApiError::Status {
        status: 500,
        message: "boom".into(),
    });
    let session = session_with(&backend);
    session.load().await.unwrap();

    session.on_playback_time_update("l1", 95.0, 100.0).await;
    assert!(!session.with_state(|s| s.is_completed("l1")));

    // 继续播放越过阈值即可重试
    *backend.complete_result.borrow_mut() = Ok(());
    session.on_playback_time_update("l1", 96.0, 100.0).await;
    assert!(session.with_state(|s| s.is_completed("l1")));
    assert_eq!(backend.complete_calls.borrow().len(), 2);
}

#[tokio::test]
async fn late_comments_for_previous_lecture_are_discarded() {
    let backend = Rc::new(MockBackend::new(course_with(&["l1", "l2"])));
    let release_l1 = backend.gate_comments("l1");
    backend
        .comments
        .borrow_mut()
        .insert("l2".into(), vec![comment(2, "about l2")]);
    let session = session_with(&backend);

    // load() 停在 l1 评论请求上
    let mut loading = Box::pin(session.load());
    assert!(futures::poll!(&mut loading).is_pending());
    assert_eq!(session.with_state(LearningState::current_index), 0);

    session.next().await;
    assert_eq!(session.with_state(|s| s.watch_fraction()), 0.0);

    release_l1.send(vec![comment(1, "about l1")]).unwrap();
    loading.await.unwrap();

    session.with_state(|s| {
        assert_eq!(s.current_index(), 1);
        let texts: Vec<_> = s.comments().iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["about l2"]);
    });
}

#[tokio::test]
async fn late_playback_for_previous_lecture_sends_nothing() {
    let backend = Rc::new(MockBackend::new(course_with(&["l1", "l2"])));
    let session = session_with(&backend);
    session.load().await.unwrap();

    session.on_playback_time_update("l1", 40.0, 100.0).await;
    session.next().await;
    session.on_playback_time_update("l1", 99.0, 100.0).await;

    assert!(backend.complete_calls.borrow().is_empty());
    session.with_state(|s| {
        assert_eq!(s.watch_fraction(), 0.0);
        assert!(!s.is_completed("l1"));
    });
}

#[tokio::test]
async fn listeners_see_every_change() {
    let backend = Rc::new(MockBackend::new(course_with(&["l1", "l2"])));
    let session = session_with(&backend);
    let seen = Rc::new(Cell::new(0usize));
    let last_index = Rc::new(Cell::new(usize::MAX));
    {
        let seen = Rc::clone(&seen);
        let last_index = Rc::clone(&last_index);
        session.subscribe(move |state| {
            seen.set(seen.get() + 1);
            last_index.set(state.current_index());
        });
    }

    session.load().await.unwrap();
    session.next().await;

    assert!(seen.get() >= 3);
    assert_eq!(last_index.get(), 1);
}

#[tokio::test]
async fn three_lecture_walkthrough() {
    let backend = Rc::new(MockBackend::new(course_with(&["L1", "L2", "L3"])));
    let session = session_with(&backend);
    session.load().await.unwrap();

    session.select_lecture(0).await;
    session.on_playback_time_update("L1", 90.0, 100.0).await;
    session.with_state(|s| {
        assert_eq!(s.watch_fraction(), 90.0);
        assert!(s.is_completed("L1"));
        assert_eq!(s.overall_progress(), 33);
    });

    session.next().await;
    session.next().await;
    assert_eq!(session.with_state(LearningState::current_index), 2);

    session.next().await;
    assert_eq!(session.with_state(LearningState::current_index), 2);
}
