//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, GuardDecision};
use crate::auth::SessionStatus;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

fn write_history(path: &str, use_push: bool) {
    if use_push {
        push_history_state(path);
    } else {
        replace_history_state(path);
    }
}

/// 读取当前 URL 的查询参数
pub fn query_param(name: &str) -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    web_sys::UrlSearchParams::new_with_str(&search)
        .ok()?
        .get(name)
}

/// 拼接带单个查询参数的路径，值由 `URLSearchParams` 编码
pub fn with_query(path: &str, key: &str, value: &str) -> String {
    let encoded = web_sys::UrlSearchParams::new().ok().map(|params| {
        params.append(key, value);
        String::from(params.to_string())
    });
    match encoded {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入会话状态信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 会话状态（注入的信号，实现解耦）
    status: Signal<SessionStatus>,
}

impl RouterService {
    fn new(status: Signal<SessionStatus>) -> Self {
        // 1. 初始化当前路由（从 URL 解析），未知路径回到首页
        let initial_route = AppRoute::from_path(&current_path()).unwrap_or_else(|| {
            replace_history_state("/");
            AppRoute::Home
        });
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            status,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 当前路由的守卫结果（响应式）
    pub fn decision(&self) -> GuardDecision {
        self.current_route.get().guard(self.status.get())
    }

    /// **核心方法：导航与守卫**
    ///
    /// `path` 可以带查询串，例如 `/login?error=no_token`
    pub fn navigate(&self, path: &str) {
        match AppRoute::from_path(path) {
            Some(route) => self.navigate_to_route(route, path, true),
            None => {
                log::debug!("[Router] Unknown path {path}, redirecting to home.");
                self.navigate_to_route(AppRoute::Home, "/", true);
            }
        }
    }

    pub fn navigate_to(&self, route: AppRoute) {
        let path = route.to_path();
        self.navigate_to_route(route, &path, true);
    }

    /// 导航到指定路由
    ///
    /// # Arguments
    /// * `target_route` - 目标路由
    /// * `path` - 写入地址栏的完整路径
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn navigate_to_route(&self, target_route: AppRoute, path: &str, use_push: bool) {
        // --- Step 1: 验证目标路由 ---
        // 会话仍在加载时先放行，由 enforce_guard 在状态确定后复核
        if let GuardDecision::Redirect(redirect) = target_route.guard(self.status.get_untracked())
        {
            log::info!("[Router] Access to {target_route} denied. Redirecting to {redirect}.");
            write_history(&redirect.to_path(), use_push);
            self.set_route.set(redirect);
            return;
        }

        // --- Step 2: 加载页面 (更新状态) ---
        write_history(path, use_push);
        self.set_route.set(target_route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            let path = current_path();
            match AppRoute::from_path(&path) {
                Some(route) => router.navigate_to_route(route, &path, false),
                None => router.navigate_to_route(AppRoute::Home, "/", false),
            }
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话状态或路由变化时复核守卫
    ///
    /// 覆盖两种情况：启动时会话恢复完成，以及登录 / 注销。
    fn enforce_guard(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let status = self.status;

        Effect::new(move |_| {
            let route = current_route.get();
            if let GuardDecision::Redirect(redirect) = route.guard(status.get()) {
                log::info!("[Router] Session changed on {route}, redirecting to {redirect}.");
                replace_history_state(&redirect.to_path());
                set_route.set(redirect);
            }
        });
    }

    /// 会话过期（任意请求返回 401）时回到登录页，即使当前页面是公开的
    fn redirect_on_expiry(&self, expiry: Signal<u32>) {
        let set_route = self.set_route;

        Effect::new(move |prev: Option<u32>| {
            let count = expiry.get();
            if prev.is_some_and(|prev| prev != count) {
                let redirect = AppRoute::auth_failure_redirect();
                log::warn!("[Router] Session expired, redirecting to {redirect}.");
                push_history_state(&redirect.to_path());
                set_route.set(redirect);
            }
            count
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(status: Signal<SessionStatus>, expiry: Signal<u32>) -> RouterService {
    let router = RouterService::new(status);

    // 初始化监听器
    router.init_popstate_listener();
    router.enforce_guard();
    router.redirect_on_expiry(expiry);

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话状态信号
    status: Signal<SessionStatus>,
    /// 会话过期计数，每次 401 递增
    expiry: Signal<u32>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    // 提供路由服务到 Context
    provide_router(status, expiry);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件；守卫未放行时渲染 `pending`。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
    /// 等待会话恢复或重定向时的占位视图
    pending: fn() -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || match router.decision() {
        GuardDecision::Allow => matcher(router.current_route().get()),
        GuardDecision::Wait | GuardDecision::Redirect(_) => pending(),
    }
}

/// 站内链接，点击时走路由服务而不是整页刷新
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)]
    to: String,
    #[prop(optional, into)] class: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        if ev.ctrl_key() || ev.meta_key() || ev.shift_key() {
            return;
        }
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
