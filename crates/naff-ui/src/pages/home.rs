use leptos::prelude::*;

use crate::session::get_public_config;

#[component]
pub fn HomePage() -> impl IntoView {
    let config = Resource::new(|| (), |_| get_public_config());

    view! {
        <div class="login-page">
            <div class="login-card">
                <div class="login-header">
                    <div class="login-icon">"N"</div>
                    <h1>"NAFF Team Portal"</h1>
                    <p>"Sign in to register your team and submit your film"</p>
                </div>
                <Suspense fallback=|| view! { <div class="spinner"></div> }>
                    {move || Suspend::new(async move {
                        match config.await {
                            Ok(config) => {
                                view! {
                                    <a class="btn btn-primary" href=config.login_url() rel="external">
                                        "Sign In"
                                    </a>
                                }
                                    .into_any()
                            }
                            Err(e) => {
                                view! { <div class="login-error">{e.to_string()}</div> }.into_any()
                            }
                        }
                    })}
                </Suspense>
                <p>
                    <a href="/participate">"Already signed in? Go to your team"</a>
                </p>
            </div>
        </div>
    }
}
