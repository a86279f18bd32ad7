use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_session;
use crate::components::icons::{BookOpen, Lock};
use crate::web::route::AppRoute;
use crate::web::router::{Link, query_param, use_router};

/// OAuth 回调放进 `?error=` 的错误码对应的提示
pub fn oauth_error_message(code: &str) -> &'static str {
    match code {
        "no_token" => "Sign-in did not return a token. Please try again.",
        "invalid_token" => "The sign-in token was invalid. Please try again.",
        "user_not_found" => "No account was found for this sign-in.",
        "auth_failed" => "Google sign-in failed. Please try again.",
        _ => "Sign-in failed. Please try again.",
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(
        query_param("error").map(|code| oauth_error_message(&code).to_string()),
    );

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let (email, password) = (email.get_untracked(), password.get_untracked());
        if email.trim().is_empty() || password.is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            match session.login(email.trim().to_string(), password).await {
                Ok(_) => router.navigate_to(AppRoute::auth_success_redirect()),
                Err(e) => {
                    log::warn!("[Login] Sign-in failed: {e}");
                    set_error_msg.set(Some(e.user_message("Login failed")));
                }
            }
            set_is_submitting.set(false);
        });
    };

    let google_url = format!("{}/auth/google", session.api_root());

    view! {
        <div class="hero min-h-[80vh] bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4 flex flex-col items-center gap-2">
                    <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                        <BookOpen attr:class="h-8 w-8" />
                    </div>
                    <h1 class="text-3xl font-bold">"Welcome back"</h1>
                    <p class="text-base-content/70">"Log in to continue learning"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Logging in..." }.into_any()
                                } else {
                                    view! { <Lock attr:class="h-4 w-4" /> "Log in" }.into_any()
                                }}
                            </button>
                        </div>
                        <div class="divider">"or"</div>
                        <a href=google_url class="btn btn-outline">"Continue with Google"</a>
                        <p class="text-center text-sm mt-4">
                            "Don't have an account? "
                            <Link to="/register" class="link link-primary">"Sign up"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_oauth_errors_have_specific_messages() {
        assert_eq!(
            oauth_error_message("no_token"),
            "Sign-in did not return a token. Please try again."
        );
        assert_ne!(
            oauth_error_message("auth_failed"),
            oauth_error_message("something_else")
        );
        assert_eq!(
            oauth_error_message(""),
            "Sign-in failed. Please try again."
        );
    }
}
