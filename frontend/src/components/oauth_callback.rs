use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_session;
use crate::components::loading::Loading;
use crate::web::route::AppRoute;
use crate::web::router::{query_param, use_router, with_query};

/// Google 登录回调：`?token=` 成功，`?error=` 失败
#[component]
pub fn OAuthCallbackPage() -> impl IntoView {
    let session = use_session();
    let router = use_router();
    let login_path = AppRoute::auth_failure_redirect().to_path();

    let fail = move |code: &str| {
        log::warn!("[OAuth] Sign-in failed: {code}");
        router.navigate(&with_query(&login_path, "error", code));
    };

    match (query_param("error"), query_param("token")) {
        (Some(code), _) => fail(&code),
        (None, Some(token)) if !token.trim().is_empty() => {
            spawn_local(async move {
                match session.complete_oauth(token).await {
                    Ok(_) => router.navigate_to(AppRoute::auth_success_redirect()),
                    Err(e) => {
                        log::error!("[OAuth] Failed to load user: {e}");
                        fail("auth_failed");
                    }
                }
            });
        }
        _ => fail("no_token"),
    }

    view! { <Loading full_screen=true message="Completing Google Sign-In...".to_string() /> }
}
