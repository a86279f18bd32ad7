use coursemart_shared::Role;
use leptos::prelude::*;

use crate::auth::use_session;
use crate::components::icons::{BookOpen, LogOut};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

#[component]
pub fn Navbar() -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let on_logout = move |_| {
        session.logout();
        router.navigate_to(AppRoute::Home);
    };

    view! {
        <nav class="navbar bg-base-100 shadow-md sticky top-0 z-40 px-4 md:px-8">
            <div class="flex-1">
                <Link to="/" class="btn btn-ghost text-2xl font-bold text-primary gap-2">
                    <BookOpen attr:class="h-6 w-6" />
                    "CourseMart"
                </Link>
            </div>
            <div class="flex-none gap-2 items-center">
                <Link to="/courses" class="btn btn-ghost">"Courses"</Link>
                {move || match session.user() {
                    None => view! {
                        <Link to="/login" class="btn btn-ghost">"Log in"</Link>
                        <Link to="/register" class="btn btn-primary">"Sign up"</Link>
                    }
                    .into_any(),
                    Some(user) => {
                        let is_instructor = user.role == Role::Instructor;
                        view! {
                            <Show when=move || is_instructor>
                                <Link to=AppRoute::CreateCourse.to_path() class="btn btn-ghost">
                                    "Teach"
                                </Link>
                            </Show>
                            <div class="dropdown dropdown-end">
                                <div tabindex="0" role="button" class="btn btn-ghost btn-circle avatar">
                                    <div class="w-10 rounded-full ring ring-primary ring-offset-2">
                                        <img src=user.avatar_url() alt=user.name.clone() />
                                    </div>
                                </div>
                                <ul tabindex="0" class="dropdown-content menu z-[1] mt-3 w-56 rounded-box bg-base-100 p-2 shadow">
                                    <li class="menu-title">
                                        <span>{user.name.clone()}</span>
                                        <span class="text-xs font-normal">{user.email.clone()}</span>
                                    </li>
                                    <li><Link to="/dashboard">
                                        {if user.role == Role::Admin { "Admin Dashboard" } else { "My Learning" }}
                                    </Link></li>
                                    <li><Link to="/profile">"Profile"</Link></li>
                                    <li>
                                        <a on:click=on_logout class="text-error">
                                            <LogOut attr:class="h-4 w-4" /> "Logout"
                                        </a>
                                    </li>
                                </ul>
                            </div>
                        }
                        .into_any()
                    }
                }}
            </div>
        </nav>
    }
}
