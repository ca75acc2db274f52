use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::data::auth::{register, RegisterRequest, SignUpForm, BRANCH_CHOICES, COURSE_CHOICES};
use crate::pages::sign_in::REDIRECT_DELAY;
use crate::pages::{api_client, use_session, use_settings, Alert};

const INPUT: &str = "w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-[#EF495D]";

#[component]
fn TextField(
    form: RwSignal<SignUpForm>,
    label: &'static str,
    #[prop(default = "text")] kind: &'static str,
    field: fn(&mut RegisterRequest) -> &mut String,
) -> impl IntoView {
    view! {
        <div>
            <label class="text-sm font-medium text-gray-700 mb-1 block">{label}</label>
            <input
                type=kind
                class=INPUT
                on:input=move |ev| form.update(|f| *field(&mut f.request) = event_target_value(&ev))
            />
        </div>
    }
}

#[component]
fn ChoiceField(
    form: RwSignal<SignUpForm>,
    label: &'static str,
    choices: &'static [(&'static str, &'static str)],
    field: fn(&mut RegisterRequest) -> &mut String,
) -> impl IntoView {
    view! {
        <div>
            <label class="text-sm font-medium text-gray-700 mb-1 block">{label}</label>
            <select
                class=INPUT
                on:change=move |ev| form.update(|f| *field(&mut f.request) = event_target_value(&ev))
            >
                <option value="">{format!("Select {}", label.to_lowercase())}</option>
                {choices.iter().map(|(value, name)| view! {
                    <option value=*value>{*name}</option>
                }).collect::<Vec<_>>()}
            </select>
        </div>
    }
}

#[component]
pub fn SignUpPage() -> impl IntoView {
    let session = use_session();
    let settings = use_settings();
    let navigate = use_navigate();

    let form = RwSignal::new(SignUpForm::default());
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
            set_error.set(Some("Registration failed. Please check your information.".to_string()));
            return;
        };

        set_loading.set(true);
        let session = session.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            match register(&api, &session, &snapshot).await {
                Ok(_) => {
                    set_success.set(Some("Registration successful! Redirecting...".to_string()));
                    set_timeout(move || navigate("/bookings", Default::default()), REDIRECT_DELAY);
                }
                Err(message) => set_error.set(Some(message)),
            }
            set_loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen flex items-center justify-center bg-gray-50 pt-28 pb-8 px-4">
            <div class="w-full max-w-2xl rounded-xl bg-white p-8 shadow-xl">
                <h2 class="text-3xl font-bold text-gray-800 mb-2 text-center">"Create Your Account"</h2>
                <p class="text-gray-600 mb-6 text-center">"Join the league and start booking courts"</p>

                <Alert message=error tone="bg-red-100 text-red-800" on_close=Callback::new(move |_| set_error.set(None))/>
                <Alert message=success tone="bg-green-100 text-green-800" on_close=Callback::new(move |_| set_success.set(None))/>

                <form class="grid grid-cols-1 md:grid-cols-2 gap-4" on:submit=on_submit>
                    <TextField form=form label="Username" field=|r| &mut r.username/>
                    <TextField form=form label="Full Name" field=|r| &mut r.full_name/>
                    <TextField form=form label="Email" kind="email" field=|r| &mut r.email/>
                    <TextField form=form label="Mobile" kind="tel" field=|r| &mut r.mobile/>
                    <ChoiceField form=form label="Branch" choices=&BRANCH_CHOICES field=|r| &mut r.branch/>
                    <ChoiceField form=form label="Course" choices=&COURSE_CHOICES field=|r| &mut r.course/>
                    <TextField form=form label="Password" kind="password" field=|r| &mut r.password/>
                    <TextField form=form label="Confirm Password" kind="password" field=|r| &mut r.password2/>

                    <label class="md:col-span-2 flex items-center gap-2 text-sm text-gray-700">
                        <input
                            type="checkbox"
                            prop:checked=move || form.with(|f| f.agree_terms)
                            on:change=move |ev| form.update(|f| f.agree_terms = event_target_checked(&ev))
                        />
                        "I agree to the Terms and Conditions"
                    </label>
                    <button
                        type="submit"
                        class="md:col-span-2 w-full bg-[#EF495D] hover:bg-[#e63946] text-white rounded-lg py-3 font-semibold disabled:opacity-50"
                        disabled=move || loading.get()
                    >
                        {move || if loading.get() { "Creating account..." } else { "Sign Up" }}
                    </button>
                </form>

                <p class="mt-6 text-center text-sm text-gray-600">
                    "Already have an account? "
                    <A href="/sign-in" attr:class="font-semibold text-[#EF495D]">"Sign in"</A>
                </p>
            </div>
        </div>
    }
}
