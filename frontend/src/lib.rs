//! CourseMart 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话状态管理
//! - `api`: 后端 REST 客户端
//! - `components`: UI 组件层

mod api;
mod auth;
mod config;
mod components {
    pub mod course_card;
    pub mod course_detail;
    pub mod course_editor;
    pub mod courses;
    pub mod dashboard;
    pub mod footer;
    pub mod home;
    pub mod icons;
    pub mod learning;
    pub mod loading;
    pub mod login;
    pub mod navbar;
    pub mod notification;
    pub mod oauth_callback;
    pub mod payment;
    pub mod profile;
    pub mod register;
    pub mod upload;
}

pub use config::AppConfig;

use crate::auth::SessionContext;
use crate::components::course_detail::CourseDetailPage;
use crate::components::course_editor::{CreateCoursePage, EditCoursePage};
use crate::components::courses::CoursesPage;
use crate::components::dashboard::DashboardPage;
use crate::components::footer::Footer;
use crate::components::home::HomePage;
use crate::components::learning::LearningPage;
use crate::components::loading::Loading;
use crate::components::login::LoginPage;
use crate::components::navbar::Navbar;
use crate::components::oauth_callback::OAuthCallbackPage;
use crate::components::payment::PaymentPage;
use crate::components::profile::ProfilePage;
use crate::components::register::RegisterPage;

use leptos::prelude::*;

// 浏览器 API 封装模块（基于 gloo-* 系列 crate）
pub(crate) mod web {
    mod http;
    pub mod route;
    pub mod router;
    mod storage;
    mod timer;

    pub use http::{HttpClient, HttpRequestBuilder, HttpResponse};
    pub use storage::LocalStorage;
    pub use timer::Delay;
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::OAuthCallback => view! { <OAuthCallbackPage /> }.into_any(),
        AppRoute::Courses => view! { <CoursesPage /> }.into_any(),
        AppRoute::CourseDetail { id } => view! { <CourseDetailPage id=id /> }.into_any(),
        AppRoute::Payment { id } => view! { <PaymentPage id=id /> }.into_any(),
        AppRoute::Learn { id } => view! { <LearningPage id=id /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::CreateCourse => view! { <CreateCoursePage /> }.into_any(),
        AppRoute::EditCourse { id } => view! { <EditCoursePage id=id /> }.into_any(),
    }
}

/// 会话恢复或守卫重定向期间的占位
fn pending_view() -> AnyView {
    view! { <Loading full_screen=true /> }.into_any()
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建会话上下文
    let config = AppConfig::load();
    let session = SessionContext::new(config.api_root());
    provide_context(session);

    // 2. 从 LocalStorage 恢复 token 并拉取当前用户
    session.init();

    view! {
        // 3. 路由器组件：注入会话信号实现守卫
        <Router status=session.status_signal() expiry=session.expiry_signal()>
            <div class="min-h-screen flex flex-col bg-base-200">
                <Navbar />
                <main class="flex-1">
                    <RouterOutlet matcher=route_matcher pending=pending_view />
                </main>
                <Footer />
            </div>
        </Router>
    }
}
