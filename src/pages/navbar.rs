use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::data::auth::sign_out;
use crate::data::session::User;
use crate::pages::use_session;

#[component]
pub fn Navbar() -> impl IntoView {
    let session = use_session();
    let (user, set_user) = signal::<Option<User>>(None);

    // storage is only readable once hydrated
    {
        let session = session.clone();
        Effect::new(move |_| {
            set_user.set(session.access_token().and_then(|_| session.user()));
        });
    }

    let subscription = {
        let session_for_listener = session.clone();
        session.subscribe(move |_| {
            set_user.set(
                session_for_listener
                    .access_token()
                    .and_then(|_| session_for_listener.user()),
            );
        })
    };
    {
        let session = session.clone();
        on_cleanup(move || session.unsubscribe(subscription));
    }

    let navigate = use_navigate();
    let logout = move |_| {
        sign_out(&session);
        navigate("/sign-in", Default::default());
    };

    view! {
        <nav class="fixed top-0 inset-x-0 z-50 bg-white shadow-md">
            <div class="max-w-6xl mx-auto flex items-center justify-between px-4 py-4">
                <A href="/" attr:class="text-2xl font-bold text-[#EF495D]">"Sports League"</A>
                <div class="flex items-center gap-6 text-gray-700">
                    <A href="/home" attr:class="hover:text-[#EF495D]">"Home"</A>
                    <A href="/bookings" attr:class="hover:text-[#EF495D]">"Book a Court"</A>
                    {move || match user.get() {
                        Some(user) => view! {
                            <span class="font-medium">{user.display_name().to_string()}</span>
                            <button
                                class="rounded-lg border border-[#EF495D] px-4 py-2 text-[#EF495D] hover:bg-red-50"
                                on:click=logout.clone()
                            >
                                "Logout"
                            </button>
                        }
                        .into_any(),
                        None => view! {
                            <A href="/sign-in" attr:class="hover:text-[#EF495D]">"Sign In"</A>
                            <A href="/sign-up" attr:class="rounded-lg bg-[#EF495D] px-4 py-2 text-white">"Sign Up"</A>
                        }
                        .into_any(),
                    }}
                </div>
            </div>
        </nav>
    }
}
