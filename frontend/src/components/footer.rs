use leptos::prelude::*;

use crate::web::router::Link;

#[component]
pub fn Footer() -> impl IntoView {
    let year = chrono::Utc::now().format("%Y").to_string();

    view! {
        <footer class="footer footer-center bg-neutral text-neutral-content p-10 mt-16">
            <aside>
                <p class="text-2xl font-bold text-primary">"CourseMart"</p>
                <p class="opacity-70">"Empowering learners worldwide with quality education."</p>
            </aside>
            <nav class="grid grid-flow-col gap-6">
                <Link to="/courses" class="link link-hover">"Browse Courses"</Link>
                <Link to="/register" class="link link-hover">"Teach on CourseMart"</Link>
                <Link to="/dashboard" class="link link-hover">"My Learning"</Link>
            </nav>
            <aside>
                <p class="opacity-60">{format!("© {year} CourseMart. All rights reserved.")}</p>
            </aside>
        </footer>
    }
}
