//! 可增删的文本列表输入（课程要求 / 学习收获）

use leptos::prelude::*;

use crate::components::icons::{Plus, Trash2};

#[component]
pub fn ListField(
    label: &'static str,
    placeholder: &'static str,
    items: RwSignal<Vec<String>>,
) -> impl IntoView {
    let rows = move || items.with(|list| (0..list.len()).collect::<Vec<_>>());

    view! {
        <div class="form-control space-y-2">
            <span class="label-text font-medium">{label}</span>
            <For
                each=rows
                key=|index| *index
                children=move |index| {
                    view! {
                        <div class="join w-full">
                            <input
                                type="text"
                                class="input input-bordered join-item flex-1"
                                placeholder=placeholder
                                prop:value=move || items.with(|list| list.get(index).cloned().unwrap_or_default())
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    items.update(|list| {
                                        if let Some(slot) = list.get_mut(index) {
                                            *slot = value;
                                        }
                                    });
                                }
                            />
                            <button
                                type="button"
                                class="btn btn-ghost join-item"
                                disabled=move || items.with(|list| list.len() <= 1)
                                on:click=move |_| items.update(|list| {
                                    if list.len() > 1 && index < list.len() {
                                        list.remove(index);
                                    }
                                })
                            >
                                <Trash2 attr:class="h-4 w-4" />
                            </button>
                        </div>
                    }
                }
            />
            <button
                type="button"
                class="btn btn-ghost btn-sm w-fit gap-1"
                on:click=move |_| items.update(|list| list.push(String::new()))
            >
                <Plus attr:class="h-4 w-4" /> "Add item"
            </button>
        </div>
    }
}
