use std::time::Duration;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::data::auth::{sign_in, SignInForm};
use crate::pages::{api_client, use_session, use_settings, Alert};

pub(crate) const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

const INPUT: &str = "w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-[#EF495D]";

#[component]
pub fn SignInPage() -> impl IntoView {
    let session = use_session();
    let settings = use_settings();
    let navigate = use_navigate();

    let form = RwSignal::new(SignInForm::default());
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let (success, set_success) = signal::<Option<String>>(None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        set_error.set(None);
        set_success.set(None);

        let snapshot = form.get_untracked();
        if let Err(message) = snapshot.validate() {
            set_error.set(Some(message));
            return;
        }
        let Some(api) = api_client(&settings) else {
            set_error.set(Some("Login failed".to_string()));
            return;
        };

        set_loading.set(true);
        let session = session.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            match sign_in(&api, &session, &snapshot).await {
                Ok(_) => {
                    set_success.set(Some("Login successful! Redirecting...".to_string()));
                    set_timeout(move || navigate("/bookings", Default::default()), REDIRECT_DELAY);
                }
                Err(message) => set_error.set(Some(message)),
            }
            set_loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen flex items-center justify-center bg-gray-50 pt-24 px-4">
            <div class="w-full max-w-md rounded-xl bg-white p-8 shadow-xl">
                <h2 class="text-3xl font-bold text-gray-800 mb-2 text-center">"Welcome Back"</h2>
                <p class="text-gray-600 mb-6 text-center">"Sign in to book your next session"</p>

                <Alert message=error tone="bg-red-100 text-red-800" on_close=Callback::new(move |_| set_error.set(None))/>
                <Alert message=success tone="bg-green-100 text-green-800" on_close=Callback::new(move |_| set_success.set(None))/>

                <form class="space-y-4" on:submit=on_submit>
                    <div>
                        <label class="text-sm font-medium text-gray-700 mb-1 block">"Email"</label>
                        <input
                            type="email"
                            class=INPUT
                            placeholder="you@example.com"
                            prop:value=move || form.with(|f| f.email.clone())
                            on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                        />
                    </div>
                    <div>
                        <label class="text-sm font-medium text-gray-700 mb-1 block">"Password"</label>
                        <input
                            type="password"
                            class=INPUT
                            prop:value=move || form.with(|f| f.password.clone())
                            on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                        />
                    </div>
                    <label class="flex items-center gap-2 text-sm text-gray-700">
                        <input
                            type="checkbox"
                            prop:checked=move || form.with(|f| f.remember_me)
                            on:change=move |ev| form.update(|f| f.remember_me = event_target_checked(&ev))
                        />
                        "Remember me"
                    </label>
                    <label class="flex items-center gap-2 text-sm text-gray-700">
                        <input
                            type="checkbox"
                            prop:checked=move || form.with(|f| f.agree_terms)
                            on:change=move |ev| form.update(|f| f.agree_terms = event_target_checked(&ev))
                        />
                        "I agree to the Terms and Conditions"
                    </label>
                    <button
                        type="submit"
                        class="w-full bg-[#EF495D] hover:bg-[#e63946] text-white rounded-lg py-3 font-semibold disabled:opacity-50"
                        disabled=move || loading.get()
                    >
                        {move || if loading.get() { "Signing in..." } else { "Sign In" }}
                    </button>
                </form>

                <p class="mt-6 text-center text-sm text-gray-600">
                    "Don't have an account? "
                    <A href="/sign-up" attr:class="font-semibold text-[#EF495D]">"Sign up"</A>
                </p>
            </div>
        </div>
    }
}
