use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::{
    components::{Route, Router, Routes},
    StaticSegment,
};

use crate::components::nav::Nav;
use crate::components::notice::NoticeProvider;
use crate::pages::admin::AdminDashboard;
use crate::pages::home::HomePage;
use crate::pages::participate::ParticipatePage;
use crate::session::SessionProvider;

/// Auth0 SPA SDK build exposing the `auth0` global the bindings expect.
const AUTH0_SDK: &str = "https://cdn.auth0.com/js/auth0-spa-js/2.1/auth0-spa-js.production.js";

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <link rel="icon" href="/favicon.svg" type="image/svg+xml" />
                <script src=AUTH0_SDK></script>
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/naff-web.css" />
        <Title text="NAFF Team Portal" />
        <SessionProvider>
            <NoticeProvider>
                <Router>
                    <Routes fallback=|| view! { <p>"Page not found."</p> }.into_any()>
                        <Route path=StaticSegment("") view=HomePage />
                        <Route path=StaticSegment("participate") view=ParticipateView />
                        <Route path=StaticSegment("admin") view=AdminView />
                    </Routes>
                </Router>
            </NoticeProvider>
        </SessionProvider>
    }
}

#[component]
fn ParticipateView() -> impl IntoView {
    view! {
        <div class="app-layout">
            <Nav />
            <main class="main-content">
                <ParticipatePage />
            </main>
        </div>
    }
}

#[component]
fn AdminView() -> impl IntoView {
    view! {
        <div class="app-layout">
            <Nav />
            <main class="main-content">
                <AdminDashboard />
            </main>
        </div>
    }
}
