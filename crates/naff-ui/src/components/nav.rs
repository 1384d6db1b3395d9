use leptos::prelude::*;

use crate::session::SessionStore;

#[component]
pub fn Nav() -> impl IntoView {
    view! {
        <nav class="nav-sidebar">
            <div class="nav-brand">
                <div class="brand-icon">"N"</div>
                <span class="brand-text">"NAFF Portal"</span>
            </div>
            <ul class="nav-links">
                <li class="nav-item">
                    <a href="/participate">
                        <span class="nav-icon">"\u{2691}"</span>
                        <span>"My Team"</span>
                    </a>
                </li>
                <li class="nav-item">
                    <a href="/admin">
                        <span class="nav-icon">"\u{25A3}"</span>
                        <span>"Admin"</span>
                    </a>
                </li>
            </ul>
            <SessionControls />
        </nav>
    }
}

/// Browser sign-in state from the identity provider, with popup login and
/// logout buttons.
#[component]
fn SessionControls() -> impl IntoView {
    let Some(session) = use_context::<SessionStore>() else {
        return ().into_any();
    };

    let loggedIn = session.logged_in_signal();
    let displayName = {
        let session = session.clone();
        move || {
            session
                .user()
                .and_then(|u| u.name.or(u.email))
                .unwrap_or_else(|| "Signed in".into())
        }
    };

    let onLogin = {
        #[allow(unused_variables)]
        let session = session.clone();
        move |_: leptos::ev::MouseEvent| {
            #[cfg(feature = "hydrate")]
            crate::auth0::spawn_login(session.clone());
        }
    };

    let onLogout = {
        #[allow(unused_variables)]
        let session = session.clone();
        move |_: leptos::ev::MouseEvent| {
            #[cfg(feature = "hydrate")]
            crate::auth0::spawn_logout(session.clone());
        }
    };

    view! {
        <div class="nav-session">
            <Show
                when=move || loggedIn.get()
                fallback=move || {
                    view! {
                        <button class="btn btn-primary" on:click=onLogin.clone()>
                            "Sign in"
                        </button>
                    }
                }
            >
                <span class="nav-user">{displayName.clone()}</span>
                <button class="btn" on:click=onLogout.clone()>
                    "Sign out"
                </button>
            </Show>
        </div>
    }
        .into_any()
}
