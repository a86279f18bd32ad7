use std::time::Duration;

use leptos::prelude::*;

use crate::web::Delay;

/// 通知显示时长
const NOTICE_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Option<Self> {
        Some(Self {
            text: text.into(),
            is_error: false,
        })
    }

    pub fn error(text: impl Into<String>) -> Option<Self> {
        Some(Self {
            text: text.into(),
            is_error: true,
        })
    }
}

/// 右上角通知，3 秒后自动清除；新通知会重置计时
#[component]
pub fn Toast(notice: RwSignal<Option<Notice>>) -> impl IntoView {
    let dismiss = StoredValue::new_local(Option::<Delay>::None);

    Effect::new(move |_| {
        if notice.with(Option::is_some) {
            // 替换旧的 Delay 即取消它
            let delay = Delay::new(NOTICE_DURATION, move || notice.set(None));
            dismiss.set_value(Some(delay));
        }
    });

    view! {
        <Show when=move || notice.with(Option::is_some)>
            <div class="toast toast-top toast-end z-50">
                <div class=move || {
                    if notice.with(|n| n.as_ref().is_some_and(|n| n.is_error)) {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    }
                }>
                    <span>{move || notice.with(|n| n.as_ref().map(|n| n.text.clone()).unwrap_or_default())}</span>
                </div>
            </div>
        </Show>
    }
}
