use coursemart_shared::Role;
use coursemart_shared::protocol::RegisterRequest;
use coursemart_shared::validation::check_new_password;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_session;
use crate::components::icons::Users;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

/// 注册时可选的角色；管理员账号不能自助注册
const SIGNUP_ROLES: [Role; 2] = [Role::Student, Role::Instructor];

#[component]
pub fn RegisterPage() -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let role = RwSignal::new(Role::Student);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let request = RegisterRequest {
            name: name.get_untracked().trim().to_string(),
            email: email.get_untracked().trim().to_string(),
            password: password.get_untracked(),
            role: role.get_untracked(),
        };
        if request.name.is_empty() || request.email.is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }
        if let Err(rejected) = check_new_password(&request.password, &confirm.get_untracked()) {
            set_error_msg.set(Some(rejected.to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            match session.register(request).await {
                Ok(_) => router.navigate_to(AppRoute::auth_success_redirect()),
                Err(e) => {
                    log::warn!("[Register] Sign-up failed: {e}");
                    set_error_msg.set(Some(e.user_message("Registration failed")));
                }
            }
            set_is_submitting.set(false);
        });
    };

    let text_field = move |id: &'static str, label: &'static str, kind: &'static str, value: RwSignal<String>| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text">{label}</span>
                </label>
                <input
                    id=id
                    type=kind
                    class="input input-bordered"
                    prop:value=value
                    on:input=move |ev| value.set(event_target_value(&ev))
                    required
                />
            </div>
        }
    };

    view! {
        <div class="hero min-h-[80vh] bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4 flex flex-col items-center gap-2">
                    <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                        <Users attr:class="h-8 w-8" />
                    </div>
                    <h1 class="text-3xl font-bold">"Create your account"</h1>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        {text_field("name", "Full name", "text", name)}
                        {text_field("email", "Email", "email", email)}
                        {text_field("password", "Password", "password", password)}
                        {text_field("confirm", "Confirm password", "password", confirm)}

                        <div class="form-control">
                            <label class="label" for="role">
                                <span class="label-text">"I want to"</span>
                            </label>
                            <select
                                id="role"
                                class="select select-bordered"
                                on:change=move |ev| {
                                    let value = event_target_value(&ev);
                                    if let Some(r) = SIGNUP_ROLES.into_iter().find(|r| r.as_str() == value) {
                                        role.set(r);
                                    }
                                }
                            >
                                <option value="student" selected=move || role.get() == Role::Student>"Learn (Student)"</option>
                                <option value="instructor" selected=move || role.get() == Role::Instructor>"Teach (Instructor)"</option>
                            </select>
                        </div>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() { "Creating account..." } else { "Sign up" }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-4">
                            "Already have an account? "
                            <Link to="/login" class="link link-primary">"Log in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
