use coursemart_shared::protocol::{
    ChangePasswordRequest, EnrolledCoursesRequest, InstructorCoursesRequest, UpdateProfileRequest,
};
use coursemart_shared::validation::{UploadKind, check_new_password};
use coursemart_shared::{Course, Role, avatar_or_fallback};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_session;
use crate::components::course_card::CourseCard;
use crate::components::icons::{BookOpen, Lock, Pencil};
use crate::components::notification::{Notice, Toast};
use crate::components::upload::{selected_file, upload_checked};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Profile,
    Password,
    Courses,
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let session = use_session();
    let notice = RwSignal::new(Option::<Notice>::None);
    let tab = RwSignal::new(Tab::Profile);

    let name = move || session.user().map(|u| u.name).unwrap_or_default();
    let header_avatar = move || {
        session
            .user()
            .map(|u| u.avatar_url())
            .unwrap_or_default()
    };
    let tab_class = move |t: Tab| if tab.get() == t { "tab tab-active" } else { "tab" };

    view! {
        <Toast notice=notice />
        <div class="max-w-6xl mx-auto px-4 py-8 space-y-6">
            <div class="card bg-base-100 shadow">
                <div class="card-body flex-row items-center gap-4">
                    <img src=header_avatar alt=name class="w-20 h-20 rounded-full object-cover" />
                    <div>
                        <h1 class="text-2xl font-bold">{name}</h1>
                        <p class="text-base-content/60">{move || session.user().map(|u| u.email).unwrap_or_default()}</p>
                        <span class="badge badge-primary mt-1">
                            {move || session.role().map(|r| r.label()).unwrap_or_default()}
                        </span>
                    </div>
                </div>
            </div>

            <div role="tablist" class="tabs tabs-boxed w-fit">
                <a role="tab" class=move || tab_class(Tab::Profile) on:click=move |_| tab.set(Tab::Profile)>
                    <Pencil attr:class="h-4 w-4 mr-1" /> "Profile"
                </a>
                <a role="tab" class=move || tab_class(Tab::Password) on:click=move |_| tab.set(Tab::Password)>
                    <Lock attr:class="h-4 w-4 mr-1" /> "Password"
                </a>
                <Show when=move || session.role() != Some(Role::Admin)>
                    <a role="tab" class=move || tab_class(Tab::Courses) on:click=move |_| tab.set(Tab::Courses)>
                        <BookOpen attr:class="h-4 w-4 mr-1" /> "My Courses"
                    </a>
                </Show>
            </div>

            {move || match tab.get() {
                Tab::Profile => view! { <ProfileForm notice=notice /> }.into_any(),
                Tab::Password => view! { <PasswordForm notice=notice /> }.into_any(),
                Tab::Courses => view! { <MyCourses /> }.into_any(),
            }}
        </div>
    }
}

#[component]
fn ProfileForm(notice: RwSignal<Option<Notice>>) -> impl IntoView {
    let session = use_session();
    let user = session.current_user();

    let name = RwSignal::new(user.as_ref().map(|u| u.name.clone()).unwrap_or_default());
    let bio = RwSignal::new(user.as_ref().and_then(|u| u.bio.clone()).unwrap_or_default());
    let avatar = RwSignal::new(user.as_ref().and_then(|u| u.avatar.clone()).unwrap_or_default());
    let email = user.map(|u| u.email).unwrap_or_default();
    let (saving, set_saving) = signal(false);
    let (uploading, set_uploading) = signal(false);

    let on_avatar = move |ev: web_sys::Event| {
        let Some(file) = selected_file(&ev) else {
            return;
        };
        set_uploading.set(true);
        spawn_local(async move {
            match upload_checked(&session.api(), UploadKind::Image, &file).await {
                Ok(uploaded) => {
                    avatar.set(uploaded.url);
                    notice.set(Notice::success("Avatar uploaded successfully!"));
                }
                Err(message) => notice.set(Notice::error(message)),
            }
            set_uploading.set(false);
        });
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let request = UpdateProfileRequest {
            name: name.get_untracked().trim().to_string(),
            bio: bio.get_untracked(),
            avatar: avatar.get_untracked(),
        };
        set_saving.set(true);
        spawn_local(async move {
            match session.update_profile(request).await {
                Ok(_) => notice.set(Notice::success("Profile updated successfully!")),
                Err(e) => {
                    log::error!("[Profile] Update failed: {e}");
                    notice.set(Notice::error(e.user_message("Failed to update profile")));
                }
            }
            set_saving.set(false);
        });
    };

    view! {
        <form class="card bg-base-100 shadow" on:submit=on_submit>
            <div class="card-body space-y-4">
                <h2 class="card-title">"Profile Information"</h2>
                <div class="flex items-center gap-4">
                    <img
                        src=move || avatar_or_fallback(Some(avatar.get().as_str()), &name.get())
                        alt="avatar"
                        class="w-16 h-16 rounded-full object-cover"
                    />
                    <label class="btn btn-outline btn-sm">
                        {move || if uploading.get() { "Uploading..." } else { "Change Avatar" }}
                        <input type="file" accept="image/*" class="hidden" on:change=on_avatar disabled=move || uploading.get() />
                    </label>
                </div>
                <label class="form-control">
                    <span class="label-text">"Name"</span>
                    <input class="input input-bordered" prop:value=name on:input=move |ev| name.set(event_target_value(&ev)) required />
                </label>
                <label class="form-control">
                    <span class="label-text">"Email"</span>
                    <input class="input input-bordered" value=email disabled />
                </label>
                <label class="form-control">
                    <span class="label-text">"Bio"</span>
                    <textarea
                        class="textarea textarea-bordered"
                        rows="4"
                        placeholder="Tell us about yourself..."
                        prop:value=bio
                        on:input=move |ev| bio.set(event_target_value(&ev))
                    ></textarea>
                </label>
                <div class="card-actions justify-end">
                    <button type="submit" class="btn btn-primary" disabled=move || saving.get() || uploading.get()>
                        {move || if saving.get() { "Saving..." } else { "Save Changes" }}
                    </button>
                </div>
            </div>
        </form>
    }
}

#[component]
fn PasswordForm(notice: RwSignal<Option<Notice>>) -> impl IntoView {
    let session = use_session();
    let current = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let (saving, set_saving) = signal(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let new_value = new_password.get_untracked();
        if let Err(rejected) = check_new_password(&new_value, &confirm.get_untracked()) {
            notice.set(Notice::error(rejected.to_string()));
            return;
        }
        let request = ChangePasswordRequest {
            current_password: current.get_untracked(),
            new_password: new_value,
        };
        set_saving.set(true);
        spawn_local(async move {
            match session.change_password(request).await {
                Ok(()) => {
                    notice.set(Notice::success("Password changed successfully!"));
                    current.set(String::new());
                    new_password.set(String::new());
                    confirm.set(String::new());
                }
                Err(e) => {
                    log::warn!("[Profile] Password change failed: {e}");
                    notice.set(Notice::error(e.user_message("Failed to change password")));
                }
            }
            set_saving.set(false);
        });
    };

    let field = move |label: &'static str, value: RwSignal<String>| {
        view! {
            <label class="form-control">
                <span class="label-text">{label}</span>
                <input
                    type="password"
                    class="input input-bordered"
                    prop:value=value
                    on:input=move |ev| value.set(event_target_value(&ev))
                    required
                />
            </label>
        }
    };

    view! {
        <form class="card bg-base-100 shadow max-w-lg" on:submit=on_submit>
            <div class="card-body space-y-4">
                <h2 class="card-title">"Change Password"</h2>
                {field("Current Password", current)}
                {field("New Password", new_password)}
                {field("Confirm New Password", confirm)}
                <div class="card-actions justify-end">
                    <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                        {move || if saving.get() { "Changing..." } else { "Change Password" }}
                    </button>
                </div>
            </div>
        </form>
    }
}

#[component]
fn MyCourses() -> impl IntoView {
    let session = use_session();
    let (courses, set_courses) = signal(Vec::<Course>::new());
    let is_student = session.current_user().is_some_and(|u| u.role == Role::Student);

    spawn_local(async move {
        let api = session.api();
        let result = if is_student {
            api.send(&EnrolledCoursesRequest).await
        } else {
            api.send(&InstructorCoursesRequest).await
        };
        match result {
            Ok(envelope) => set_courses.set(envelope.courses),
            Err(e) => log::error!("[Profile] Failed to load courses: {e}"),
        }
    });

    view! {
        <Show
            when=move || !courses.with(Vec::is_empty)
            fallback=move || view! {
                <p class="text-base-content/60 py-8">
                    {if is_student { "You haven't enrolled in any courses yet." } else { "You haven't created any courses yet." }}
                </p>
            }
        >
            <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                <For
                    each=move || courses.get()
                    key=|course| course.id.clone()
                    children=move |course| view! { <CourseCard course=course show_progress=is_student /> }
                />
            </div>
        </Show>
    }
}
