//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、访问级别以及守卫决策。

use std::fmt::Display;

use coursemart_shared::Role;

use crate::auth::SessionStatus;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页 (默认路由)
    #[default]
    Home,
    Login,
    Register,
    /// Google OAuth 回调，token / error 在查询串中
    OAuthCallback,
    Courses,
    CourseDetail { id: String },
    Payment { id: String },
    Learn { id: String },
    Dashboard,
    Profile,
    CreateCourse,
    EditCourse { id: String },
}

/// 路由的访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// 仅未登录用户（登录、注册页）
    GuestOnly,
    Authenticated,
    Role(Role),
}

/// 守卫结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// 会话仍在恢复中，显示加载状态
    Wait,
    Redirect(AppRoute),
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    ///
    /// 查询串与末尾的 `/` 会被忽略；无法识别的路径返回 `None`。
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Self::Home,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["auth", "google", "success"] => Self::OAuthCallback,
            ["courses"] => Self::Courses,
            ["courses", id] => Self::CourseDetail { id: id.to_string() },
            ["courses", id, "payment"] => Self::Payment { id: id.to_string() },
            ["courses", id, "learn"] => Self::Learn { id: id.to_string() },
            ["dashboard"] => Self::Dashboard,
            ["profile"] => Self::Profile,
            ["instructor", "course", "new"] => Self::CreateCourse,
            ["instructor", "course", id, "edit"] => Self::EditCourse { id: id.to_string() },
            _ => return None,
        };
        Some(route)
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".into(),
            Self::Login => "/login".into(),
            Self::Register => "/register".into(),
            Self::OAuthCallback => "/auth/google/success".into(),
            Self::Courses => "/courses".into(),
            Self::CourseDetail { id } => format!("/courses/{id}"),
            Self::Payment { id } => format!("/courses/{id}/payment"),
            Self::Learn { id } => format!("/courses/{id}/learn"),
            Self::Dashboard => "/dashboard".into(),
            Self::Profile => "/profile".into(),
            Self::CreateCourse => "/instructor/course/new".into(),
            Self::EditCourse { id } => format!("/instructor/course/{id}/edit"),
        }
    }

    /// **核心守卫逻辑：定义该路由的访问级别**
    pub fn access(&self) -> Access {
        match self {
            Self::Home
            | Self::OAuthCallback
            | Self::Courses
            | Self::CourseDetail { .. } => Access::Public,
            Self::Login | Self::Register => Access::GuestOnly,
            Self::Payment { .. } | Self::Learn { .. } | Self::Dashboard | Self::Profile => {
                Access::Authenticated
            }
            Self::CreateCourse | Self::EditCourse { .. } => Access::Role(Role::Instructor),
        }
    }

    /// 根据当前会话状态决定是否放行
    pub fn guard(&self, status: SessionStatus) -> GuardDecision {
        match (self.access(), status) {
            (Access::Public, _) => GuardDecision::Allow,
            (_, SessionStatus::Loading) => GuardDecision::Wait,
            (Access::GuestOnly, SessionStatus::Anonymous) => GuardDecision::Allow,
            (Access::GuestOnly, SessionStatus::Authenticated(_)) => {
                GuardDecision::Redirect(Self::auth_success_redirect())
            }
            (_, SessionStatus::Anonymous) => GuardDecision::Redirect(Self::auth_failure_redirect()),
            (Access::Role(required), SessionStatus::Authenticated(role)) if role != required => {
                GuardDecision::Redirect(Self::Dashboard)
            }
            _ => GuardDecision::Allow,
        }
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSTRUCTOR: SessionStatus = SessionStatus::Authenticated(Role::Instructor);
    const STUDENT: SessionStatus = SessionStatus::Authenticated(Role::Student);

    #[test]
    fn parses_parameterised_paths() {
        assert_eq!(AppRoute::from_path("/"), Some(AppRoute::Home));
        assert_eq!(
            AppRoute::from_path("/courses/abc/learn"),
            Some(AppRoute::Learn { id: "abc".into() })
        );
        assert_eq!(
            AppRoute::from_path("/instructor/course/42/edit/"),
            Some(AppRoute::EditCourse { id: "42".into() })
        );
        assert_eq!(
            AppRoute::from_path("/auth/google/success?token=t.o.k"),
            Some(AppRoute::OAuthCallback)
        );
        assert_eq!(AppRoute::from_path("/login?error=no_token"), Some(AppRoute::Login));
        assert_eq!(AppRoute::from_path("/nope"), None);
        assert_eq!(AppRoute::from_path("/courses/a/b"), None);
    }

    #[test]
    fn paths_round_trip() {
        let routes = [
            AppRoute::Home,
            AppRoute::Register,
            AppRoute::CourseDetail { id: "c1".into() },
            AppRoute::Payment { id: "c1".into() },
            AppRoute::CreateCourse,
            AppRoute::EditCourse { id: "c1".into() },
        ];
        for route in routes {
            assert_eq!(AppRoute::from_path(&route.to_path()), Some(route));
        }
    }

    #[test]
    fn public_routes_never_wait() {
        let route = AppRoute::CourseDetail { id: "c1".into() };
        assert_eq!(route.guard(SessionStatus::Loading), GuardDecision::Allow);
        assert_eq!(route.guard(SessionStatus::Anonymous), GuardDecision::Allow);
    }

    #[test]
    fn protected_routes_wait_then_redirect_anonymous() {
        let route = AppRoute::Learn { id: "c1".into() };
        assert_eq!(route.guard(SessionStatus::Loading), GuardDecision::Wait);
        assert_eq!(
            route.guard(SessionStatus::Anonymous),
            GuardDecision::Redirect(AppRoute::Login)
        );
        assert_eq!(route.guard(STUDENT), GuardDecision::Allow);
    }

    #[test]
    fn role_mismatch_goes_to_dashboard() {
        assert_eq!(
            AppRoute::CreateCourse.guard(STUDENT),
            GuardDecision::Redirect(AppRoute::Dashboard)
        );
        assert_eq!(AppRoute::CreateCourse.guard(INSTRUCTOR), GuardDecision::Allow);
        assert_eq!(
            AppRoute::CreateCourse.guard(SessionStatus::Anonymous),
            GuardDecision::Redirect(AppRoute::Login)
        );
    }

    #[test]
    fn signed_in_users_skip_login() {
        assert_eq!(
            AppRoute::Login.guard(INSTRUCTOR),
            GuardDecision::Redirect(AppRoute::Dashboard)
        );
        assert_eq!(AppRoute::Register.guard(SessionStatus::Anonymous), GuardDecision::Allow);
        assert_eq!(AppRoute::Login.guard(SessionStatus::Loading), GuardDecision::Wait);
    }
}
