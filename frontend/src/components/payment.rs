use coursemart_shared::Course;
use coursemart_shared::enrollment::CheckoutGate;
use coursemart_shared::protocol::{GetCourseRequest, MockPurchaseRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_session;
use crate::components::course_card::thumbnail_or_placeholder;
use crate::components::icons::{ChevronLeft, Lock};
use crate::components::loading::Loading;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

/// 模拟结算的税率（18%）
const TAX_RATE: f64 = 0.18;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderSummary {
    pub price: f64,
    pub tax: f64,
    pub total: f64,
}

impl OrderSummary {
    pub fn for_price(price: f64) -> Self {
        let price = price.max(0.0);
        let tax = (price * TAX_RATE * 100.0).round() / 100.0;
        Self {
            price,
            tax,
            total: price + tax,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PaymentMethod {
    Card,
    Upi,
    NetBanking,
}

impl PaymentMethod {
    const ALL: [PaymentMethod; 3] = [PaymentMethod::Card, PaymentMethod::Upi, PaymentMethod::NetBanking];

    fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::Upi => "UPI Payment",
            PaymentMethod::NetBanking => "Net Banking",
        }
    }
}

#[component]
pub fn PaymentPage(id: String) -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let (course, set_course) = signal(Option::<Course>::None);
    let (loading, set_loading) = signal(true);
    let (processing, set_processing) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let method = RwSignal::new(PaymentMethod::Card);

    {
        let id = id.clone();
        spawn_local(async move {
            match session.api().send(&GetCourseRequest { id: id.clone() }).await {
                Ok(envelope) => {
                    let gate = session
                        .current_user()
                        .map(|user| CheckoutGate::decide(&user, &envelope.course));
                    match gate {
                        Some(CheckoutGate::AlreadyEnrolled) => {
                            log::info!("[Payment] Already enrolled in {id}");
                            router.navigate_to(AppRoute::Learn { id });
                            return;
                        }
                        Some(CheckoutGate::FreeCourse) => {
                            router.navigate_to(AppRoute::CourseDetail { id });
                            return;
                        }
                        _ => set_course.set(Some(envelope.course)),
                    }
                }
                Err(e) => {
                    log::error!("[Payment] Failed to load course: {e}");
                    set_error_msg.set(Some(e.user_message("Failed to load course")));
                }
            }
            set_loading.set(false);
        });
    }

    let on_submit = {
        let id = id.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            if processing.get_untracked() {
                return;
            }
            set_processing.set(true);
            set_error_msg.set(None);

            let course_id = id.clone();
            spawn_local(async move {
                match session
                    .api()
                    .send(&MockPurchaseRequest {
                        course_id: course_id.clone(),
                    })
                    .await
                {
                    Ok(_) => {
                        session.refresh_user().await;
                        router.navigate_to(AppRoute::Learn { id: course_id });
                    }
                    Err(e) => {
                        log::error!("[Payment] Purchase failed: {e}");
                        set_error_msg.set(Some(e.user_message("Payment failed. Please try again.")));
                    }
                }
                set_processing.set(false);
            });
        }
    };

    let back = AppRoute::CourseDetail { id }.to_path();
    let holder = session.current_user().map(|u| u.name).unwrap_or_default();

    view! {
        <Show when=move || !loading.get() fallback=|| view! { <Loading full_screen=true /> }>
            {
                let back = back.clone();
                let holder = holder.clone();
                let on_submit = on_submit.clone();
                move || match course.get() {
                    None => view! {
                        <div class="max-w-4xl mx-auto px-4 py-8">
                            {move || error_msg.get().unwrap_or_else(|| "Course not found".into())}
                        </div>
                    }
                    .into_any(),
                    Some(c) => {
                        let summary = OrderSummary::for_price(c.price);
                        view! {
                            <div class="max-w-4xl mx-auto px-4 py-8">
                                <Link to=back.clone() class="link link-primary flex items-center gap-1 mb-4">
                                    <ChevronLeft attr:class="h-4 w-4" /> "Back to Course"
                                </Link>
                                <h1 class="text-3xl font-bold mb-8">"Complete Your Purchase"</h1>

                                <div class="grid grid-cols-1 lg:grid-cols-2 gap-8">
                                    <div class="card bg-base-100 shadow">
                                        <div class="card-body">
                                            <h2 class="card-title">"Order Summary"</h2>
                                            <div class="flex items-center gap-4 my-4">
                                                <img src=thumbnail_or_placeholder(&c) alt=c.title.clone() class="w-16 h-16 object-cover rounded" />
                                                <div>
                                                    <h3 class="font-semibold">{c.title.clone()}</h3>
                                                    <p class="text-sm opacity-70">"by " {c.instructor_name().to_string()}</p>
                                                </div>
                                            </div>
                                            <div class="divider my-0"></div>
                                            <div class="flex justify-between"><span>"Course Price"</span><span>{format!("${:.2}", summary.price)}</span></div>
                                            <div class="flex justify-between"><span>"Tax (18%)"</span><span>{format!("${:.2}", summary.tax)}</span></div>
                                            <div class="divider my-0"></div>
                                            <div class="flex justify-between text-lg font-bold">
                                                <span>"Total"</span>
                                                <span class="text-primary">{format!("${:.2}", summary.total)}</span>
                                            </div>
                                            <ul class="mt-4 text-sm opacity-70 space-y-1">
                                                <li>"Lifetime access to course"</li>
                                                <li>{format!("{} lectures", c.lectures.len())}</li>
                                                <li>"Certificate of completion"</li>
                                            </ul>
                                        </div>
                                    </div>

                                    <form class="card bg-base-100 shadow" on:submit=on_submit.clone()>
                                        <div class="card-body space-y-4">
                                            <h2 class="card-title">"Payment Details"</h2>
                                            <Show when=move || error_msg.get().is_some()>
                                                <div role="alert" class="alert alert-error">
                                                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                                                </div>
                                            </Show>
                                            {PaymentMethod::ALL.into_iter().map(|m| view! {
                                                <label class="label cursor-pointer justify-start gap-3">
                                                    <input
                                                        type="radio"
                                                        name="paymentMethod"
                                                        class="radio radio-primary"
                                                        prop:checked=move || method.get() == m
                                                        on:change=move |_| method.set(m)
                                                    />
                                                    <span>{m.label()}</span>
                                                </label>
                                            }).collect_view()}
                                            <PaymentFields method=method holder=holder.clone() />
                                            <div role="alert" class="alert alert-info text-sm">
                                                <Lock attr:class="h-4 w-4" />
                                                <span>"Demo mode: no real payment will be charged."</span>
                                            </div>
                                            <button type="submit" class="btn btn-primary w-full" disabled=move || processing.get()>
                                                {move || if processing.get() {
                                                    "Processing...".to_string()
                                                } else {
                                                    format!("Pay ${:.2}", summary.total)
                                                }}
                                            </button>
                                        </div>
                                    </form>
                                </div>
                            </div>
                        }
                        .into_any()
                    }
                }
            }
        </Show>
    }
}

/// 各支付方式的演示输入项，不会被提交
#[component]
fn PaymentFields(method: RwSignal<PaymentMethod>, holder: String) -> impl IntoView {
    move || match method.get() {
        PaymentMethod::Card => view! {
            <div class="space-y-3">
                <input type="text" class="input input-bordered w-full" placeholder="1234 5678 9012 3456" value="4111 1111 1111 1111" />
                <div class="grid grid-cols-2 gap-3">
                    <input type="text" class="input input-bordered" placeholder="MM/YY" value="12/25" />
                    <input type="text" class="input input-bordered" placeholder="CVV" value="123" />
                </div>
                <input type="text" class="input input-bordered w-full" placeholder="Cardholder Name" value=holder.clone() />
            </div>
        }
        .into_any(),
        PaymentMethod::Upi => view! {
            <input type="text" class="input input-bordered w-full" placeholder="yourname@upi" value="test@upi" />
        }
        .into_any(),
        PaymentMethod::NetBanking => view! {
            <select class="select select-bordered w-full">
                <option>"State Bank of India"</option>
                <option>"HDFC Bank"</option>
                <option>"ICICI Bank"</option>
                <option>"Axis Bank"</option>
            </select>
        }
        .into_any(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_summary_adds_rounded_tax() {
        let summary = OrderSummary::for_price(49.99);
        assert_eq!(summary.tax, 9.0);
        assert!((summary.total - 58.99).abs() < 1e-9);
    }

    #[test]
    fn negative_prices_are_treated_as_zero() {
        assert_eq!(
            OrderSummary::for_price(-5.0),
            OrderSummary {
                price: 0.0,
                tax: 0.0,
                total: 0.0
            }
        );
    }
}
