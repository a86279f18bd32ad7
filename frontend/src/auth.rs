//! 认证模块
//!
//! 管理用户会话（token + 用户信息），与路由系统解耦。
//! 路由服务通过注入的 [`SessionStatus`] 信号来检查认证状态。

use coursemart_shared::protocol::{
    ChangePasswordRequest, CurrentUserRequest, LoginRequest, RegisterRequest,
    UpdateProfileRequest,
};
use coursemart_shared::{ApiError, Role, User};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::CourseApi;
use crate::web::LocalStorage;

const STORAGE_TOKEN_KEY: &str = "token";
const STORAGE_USER_KEY: &str = "user";

/// 会话状态的三态视图，路由守卫只依赖它
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// 正在用持久化的 token 恢复会话
    Loading,
    Anonymous,
    Authenticated(Role),
}

/// 认证状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<User>,
    /// 是否正在加载
    pub is_loading: bool,
}

impl SessionState {
    pub fn status(&self) -> SessionStatus {
        match (&self.user, self.is_loading) {
            (_, true) => SessionStatus::Loading,
            (Some(user), false) => SessionStatus::Authenticated(user.role),
            (None, false) => SessionStatus::Anonymous,
        }
    }
}

/// 认证上下文
///
/// 在 App 根部创建一次，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct SessionContext {
    /// 认证状态（只读）
    pub state: ReadSignal<SessionState>,
    set_state: WriteSignal<SessionState>,
    status: Memo<SessionStatus>,
    /// 每次会话因 401 失效时递增
    expiry: RwSignal<u32>,
    api_root: StoredValue<String>,
}

impl SessionContext {
    /// 创建新的认证上下文
    pub fn new(api_root: String) -> Self {
        let (state, set_state) = signal(SessionState::default());
        let status = Memo::new(move |_| state.with(SessionState::status));
        Self {
            state,
            set_state,
            status,
            expiry: RwSignal::new(0),
            api_root: StoredValue::new(api_root),
        }
    }

    /// 会话状态信号（用于路由服务注入）
    pub fn status_signal(&self) -> Signal<SessionStatus> {
        self.status.into()
    }

    pub fn expiry_signal(&self) -> Signal<u32> {
        self.expiry.into()
    }

    /// 当前用户（响应式）
    pub fn user(&self) -> Option<User> {
        self.state.with(|s| s.user.clone())
    }

    /// 当前用户（不追踪，用于事件处理器和异步任务）
    pub fn current_user(&self) -> Option<User> {
        self.state.with_untracked(|s| s.user.clone())
    }

    pub fn role(&self) -> Option<Role> {
        match self.status.get() {
            SessionStatus::Authenticated(role) => Some(role),
            _ => None,
        }
    }

    /// API 根地址，例如 `http://localhost:5000/api`
    pub fn api_root(&self) -> String {
        self.api_root.get_value()
    }

    /// 携带当前 token 的 API 客户端；401 会使会话失效
    pub fn api(&self) -> CourseApi {
        let ctx = *self;
        CourseApi::new(self.api_root.get_value())
            .with_token(self.state.with_untracked(|s| s.token.clone()))
            .on_unauthorized(Callback::new(move |_| ctx.expire()))
    }

    /// 从 LocalStorage 恢复会话，随后用 `/auth/me` 校验
    pub fn init(&self) {
        let Some(token) = LocalStorage::get(STORAGE_TOKEN_KEY) else {
            self.set_state.set(SessionState::default());
            return;
        };

        self.set_state.set(SessionState {
            token: Some(token),
            user: LocalStorage::get_json::<User>(STORAGE_USER_KEY),
            is_loading: true,
        });

        let ctx = *self;
        spawn_local(async move {
            match ctx.fetch_current_user().await {
                Ok(user) => {
                    log::debug!("[Auth] Session restored for {}", user.email);
                    ctx.store_user(user);
                    ctx.set_state.update(|s| s.is_loading = false);
                }
                Err(err) => {
                    log::warn!("[Auth] Stored session rejected: {err}");
                    ctx.logout();
                }
            }
        });
    }

    async fn fetch_current_user(&self) -> Result<User, ApiError> {
        // 不挂 on_unauthorized：校验失败由调用方决定如何处理
        let token = self.state.with_untracked(|s| s.token.clone());
        let response = CourseApi::new(self.api_root.get_value())
            .with_token(token)
            .send(&CurrentUserRequest)
            .await?;
        Ok(response.user)
    }

    fn start_session(&self, token: String, user: User) {
        LocalStorage::set(STORAGE_TOKEN_KEY, &token);
        LocalStorage::set_json(STORAGE_USER_KEY, &user);
        log::info!("[Auth] Signed in as {} ({})", user.email, user.role.as_str());
        self.set_state.set(SessionState {
            token: Some(token),
            user: Some(user),
            is_loading: false,
        });
    }

    fn store_user(&self, user: User) {
        LocalStorage::set_json(STORAGE_USER_KEY, &user);
        self.set_state.update(|s| s.user = Some(user));
    }

    /// 登录并保存状态
    pub async fn login(&self, email: String, password: String) -> Result<User, ApiError> {
        let response = CourseApi::new(self.api_root.get_value())
            .send(&LoginRequest { email, password })
            .await?;
        self.start_session(response.token, response.user.clone());
        Ok(response.user)
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<User, ApiError> {
        let response = CourseApi::new(self.api_root.get_value())
            .send(&request)
            .await?;
        self.start_session(response.token, response.user.clone());
        Ok(response.user)
    }

    /// OAuth 回调：保存 token 并加载用户
    pub async fn complete_oauth(&self, token: String) -> Result<User, ApiError> {
        self.set_state.update(|s| {
            s.token = Some(token.clone());
            s.is_loading = true;
        });
        match self.fetch_current_user().await {
            Ok(user) => {
                self.start_session(token, user.clone());
                Ok(user)
            }
            Err(err) => {
                self.logout();
                Err(err)
            }
        }
    }

    /// 重新拉取用户（例如报名后刷新已购课程列表）
    pub async fn refresh_user(&self) -> Option<User> {
        match self.api().send(&CurrentUserRequest).await {
            Ok(response) => {
                self.store_user(response.user.clone());
                Some(response.user)
            }
            Err(err) => {
                log::error!("[Auth] Failed to refresh user: {err}");
                None
            }
        }
    }

    pub async fn update_profile(&self, request: UpdateProfileRequest) -> Result<User, ApiError> {
        let response = self.api().send(&request).await?;
        self.store_user(response.user.clone());
        Ok(response.user)
    }

    pub async fn change_password(&self, request: ChangePasswordRequest) -> Result<(), ApiError> {
        self.api().send(&request).await.map(|_| ())
    }

    /// 注销并清除状态
    ///
    /// 导航将由路由服务的守卫监听自动处理。
    pub fn logout(&self) {
        LocalStorage::delete(STORAGE_TOKEN_KEY);
        LocalStorage::delete(STORAGE_USER_KEY);
        self.set_state.set(SessionState::default());
    }

    /// 任意请求返回 401 时调用
    pub fn expire(&self) {
        if self.state.with_untracked(|s| s.token.is_none()) {
            return;
        }
        log::warn!("[Auth] Token rejected by backend, signing out");
        self.logout();
        self.expiry.update(|n| *n += 1);
    }
}

/// 从 Context 获取认证上下文
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: "u1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role,
            avatar: None,
            bio: None,
            enrolled_courses: Vec::new(),
        }
    }

    #[test]
    fn status_follows_loading_and_user() {
        let mut state = SessionState::default();
        assert_eq!(state.status(), SessionStatus::Anonymous);

        state.token = Some("t".into());
        state.is_loading = true;
        assert_eq!(state.status(), SessionStatus::Loading);

        // 持久化的用户信息在校验完成前不算登录
        state.user = Some(user(Role::Admin));
        assert_eq!(state.status(), SessionStatus::Loading);

        state.is_loading = false;
        assert_eq!(state.status(), SessionStatus::Authenticated(Role::Admin));
    }
}
