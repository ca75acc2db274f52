use leptos::prelude::*;
use leptos_router::components::A;

use crate::data::catalog::Sport;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="min-h-screen bg-gradient-to-br from-gray-50 to-blue-50 pt-36 pb-12 px-4">
            <div class="max-w-4xl mx-auto text-center">
                <h1 class="text-4xl font-bold text-gray-800 mb-4">"Play More, Wait Less"</h1>
                <p class="text-lg text-gray-600 mb-8">
                    "Reserve a court for today or tomorrow in a few taps."
                </p>
                <A href="/bookings" attr:class="inline-block rounded-lg bg-[#EF495D] px-8 py-3 font-semibold text-white hover:bg-[#e63946]">
                    "Book a Court"
                </A>

                <div class="mt-12 grid grid-cols-2 md:grid-cols-5 gap-4">
                    {Sport::ALL.into_iter().map(|sport| view! {
                        <div class=format!("rounded-xl border-2 p-4 {}", sport.card_class())>
                            <div class="text-3xl mb-2">{sport.icon()}</div>
                            <div class=format!("font-semibold {}", sport.accent_class())>{sport.label()}</div>
                        </div>
                    }).collect::<Vec<_>>()}
                </div>
            </div>
        </div>
    }
}
