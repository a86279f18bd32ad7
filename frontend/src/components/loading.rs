use leptos::prelude::*;

/// 加载指示器
///
/// `full_screen` 时覆盖整个视口，用于会话恢复和路由等待。
#[component]
pub fn Loading(
    #[prop(optional)] full_screen: bool,
    #[prop(optional, into)] message: Option<String>,
) -> impl IntoView {
    let message = message.unwrap_or_else(|| "Loading...".to_string());

    if full_screen {
        view! {
            <div class="fixed inset-0 z-50 flex items-center justify-center bg-base-100/90">
                <div class="text-center">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                    <p class="mt-4 text-base-content/70">{message}</p>
                </div>
            </div>
        }
        .into_any()
    } else {
        view! {
            <div class="flex items-center justify-center py-12">
                <span class="loading loading-spinner loading-md text-primary"></span>
            </div>
        }
        .into_any()
    }
}
