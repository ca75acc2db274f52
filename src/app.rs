use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::{
    components::{FlatRoutes, Route, Router},
    StaticSegment,
};

use crate::data::session::SessionStore;
use crate::pages::booking::BookingPage;
use crate::pages::home::HomePage;
use crate::pages::navbar::Navbar;
use crate::pages::sign_in::SignInPage;
use crate::pages::sign_up::SignUpPage;
use crate::settings::{get_client_settings, ClientSettings};

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <Stylesheet id="leptos" href="/pkg/league-booking.css"/>
                <AutoReload options=options.clone() />
                <HydrationScripts options/>
                <link rel="shortcut icon" type="image/ico" href="/favicon.ico"/>
                <Link rel="preconnect" href="https://fonts.googleapis.com"/>
                <Link rel="preconnect" href="https://fonts.gstatic.com" crossorigin="anonymous"/>
                <Link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700&display=swap" rel="stylesheet"/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

type SettingsResource = Resource<Result<ClientSettings, ServerFnError>>;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_context(SessionStore::browser());

    // blocking: serialized into the page so hydration sees the server's values
    let settings: SettingsResource = Resource::new_blocking(|| (), |_| get_client_settings());
    provide_context(settings);

    view! {
        <Title text="Sports League Booking"/>
        <Router>
            <Navbar/>
            <main>
                <FlatRoutes fallback=|| "Page not found.">
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("home") view=HomePage/>
                    <Route path=StaticSegment("sign-in") view=|| view! { <WithSettings><SignInPage/></WithSettings> }/>
                    <Route path=StaticSegment("sign-up") view=|| view! { <WithSettings><SignUpPage/></WithSettings> }/>
                    <Route path=StaticSegment("bookings") view=|| view! { <WithSettings><BookingPage/></WithSettings> }/>
                </FlatRoutes>
            </main>
        </Router>
    }
}

/// Renders `children` once the server's client settings are in context.
#[component]
fn WithSettings(children: ChildrenFn) -> impl IntoView {
    let settings = expect_context::<SettingsResource>();

    view! {
        <Suspense fallback=|| view! { <p class="pt-36 text-center text-gray-500">"Loading..."</p> }>
            {move || {
                let children = children.clone();
                Suspend::new(async move {
                    let settings = settings.await.unwrap_or_else(|err| {
                        leptos::logging::error!("could not load settings, using defaults: {}", err);
                        ClientSettings::default()
                    });
                    view! { <Configured settings children/> }
                })
            }}
        </Suspense>
    }
}

#[component]
fn Configured(settings: ClientSettings, children: ChildrenFn) -> impl IntoView {
    provide_context(settings);
    children()
}
