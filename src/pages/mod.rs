use leptos::prelude::*;

use crate::data::api::HttpBookingApi;
use crate::data::session::SessionStore;
use crate::settings::ClientSettings;

pub mod booking;
pub mod booking_list;
pub mod home;
pub mod navbar;
pub mod sign_in;
pub mod sign_up;

pub(crate) fn use_session() -> SessionStore {
    use_context::<SessionStore>().unwrap_or_else(SessionStore::browser)
}

/// Provided by the app once the server has handed its settings over.
pub(crate) fn use_settings() -> ClientSettings {
    use_context::<ClientSettings>().unwrap_or_default()
}

pub(crate) fn api_client(settings: &ClientSettings) -> Option<HttpBookingApi> {
    match HttpBookingApi::new(&settings.api_base_url) {
        Ok(api) => Some(api),
        Err(err) => {
            leptos::logging::error!("bad api_base_url '{}': {}", settings.api_base_url, err);
            None
        }
    }
}

#[component]
pub(crate) fn Alert(
    #[prop(into)] message: Signal<Option<String>>,
    #[prop(into)] tone: String,
    on_close: Callback<()>,
) -> impl IntoView {
    view! {
        {move || message.get().map(|text| {
            let tone = tone.clone();
            view! {
                <div class=format!("mb-6 flex items-start justify-between rounded-lg px-4 py-3 text-sm {}", tone)>
                    <span>{text}</span>
                    <button class="ml-4 font-bold" on:click=move |_| on_close.run(())>"×"</button>
                </div>
            }
        })}
    }
}
