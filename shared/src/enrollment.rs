//! Enrollment and checkout decisions for the catalog and payment screens.

use crate::{Course, User};

/// What the primary call-to-action on a course page does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentAction {
    /// Not signed in: go to the login screen.
    SignIn,
    /// Enrolled student or the course's own instructor: open the learning view.
    ContinueLearning,
    /// Free course: `POST /payments/enroll-free`, then open the learning view.
    EnrollFree,
    /// Paid course: open the payment screen.
    Checkout,
}

impl EnrollmentAction {
    pub fn decide(user: Option<&User>, course: &Course) -> Self {
        let Some(user) = user else {
            return EnrollmentAction::SignIn;
        };
        if user.is_enrolled(&course.id) || course.instructor_id() == Some(user.id.as_str()) {
            EnrollmentAction::ContinueLearning
        } else if course.is_free() {
            EnrollmentAction::EnrollFree
        } else {
            EnrollmentAction::Checkout
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EnrollmentAction::SignIn => "Login to Enroll",
            EnrollmentAction::ContinueLearning => "Go to Course",
            EnrollmentAction::EnrollFree => "Enroll for Free",
            EnrollmentAction::Checkout => "Buy Now",
        }
    }
}

/// Where the payment screen sends the user once the course is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutGate {
    Proceed,
    /// Already has access; skip straight to learning.
    AlreadyEnrolled,
    /// Nothing to pay for; back to the course page.
    FreeCourse,
}

impl CheckoutGate {
    pub fn decide(user: &User, course: &Course) -> Self {
        if user.is_enrolled(&course.id) {
            CheckoutGate::AlreadyEnrolled
        } else if course.is_free() {
            CheckoutGate::FreeCourse
        } else {
            CheckoutGate::Proceed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InstructorRef, Role};

    fn user(enrolled: &[&str]) -> User {
        User {
            id: "u1".into(),
            name: "Sam".into(),
            email: "sam@example.com".into(),
            role: Role::Student,
            avatar: None,
            bio: None,
            enrolled_courses: enrolled.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn course(price: f64) -> Course {
        Course {
            id: "c1".into(),
            title: "Course".into(),
            price,
            instructor: Some(InstructorRef::Id("u7".into())),
            ..Default::default()
        }
    }

    #[test]
    fn anonymous_visitors_must_sign_in() {
        assert_eq!(
            EnrollmentAction::decide(None, &course(0.0)),
            EnrollmentAction::SignIn
        );
    }

    #[test]
    fn free_and_paid_courses_take_different_paths() {
        let u = user(&[]);
        assert_eq!(
            EnrollmentAction::decide(Some(&u), &course(0.0)),
            EnrollmentAction::EnrollFree
        );
        assert_eq!(
            EnrollmentAction::decide(Some(&u), &course(49.0)),
            EnrollmentAction::Checkout
        );
    }

    #[test]
    fn enrolled_students_and_owners_continue() {
        assert_eq!(
            EnrollmentAction::decide(Some(&user(&["c1"])), &course(49.0)),
            EnrollmentAction::ContinueLearning
        );

        let mut owner = user(&[]);
        owner.id = "u7".into();
        owner.role = Role::Instructor;
        assert_eq!(
            EnrollmentAction::decide(Some(&owner), &course(49.0)),
            EnrollmentAction::ContinueLearning
        );
    }

    #[test]
    fn checkout_gate() {
        assert_eq!(
            CheckoutGate::decide(&user(&["c1"]), &course(10.0)),
            CheckoutGate::AlreadyEnrolled
        );
        assert_eq!(
            CheckoutGate::decide(&user(&[]), &course(0.0)),
            CheckoutGate::FreeCourse
        );
        assert_eq!(
            CheckoutGate::decide(&user(&[]), &course(10.0)),
            CheckoutGate::Proceed
        );
    }
}
