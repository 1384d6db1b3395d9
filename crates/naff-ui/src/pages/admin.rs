use leptos::prelude::*;
use naff_types::{AdminPage, Team};

#[server]
pub async fn load_admin_page() -> Result<AdminPage, ServerFnError> {
    use crate::server;

    if let Some(page) = server::preloaded::<AdminPage>() {
        return Ok(page);
    }

    let state = server::app_state()?;
    let token = server::request_token();
    naff_api::loader::load_admin(&state.client, token.as_ref())
        .await
        .map_err(server::exit)
}

#[component]
pub fn AdminDashboard() -> impl IntoView {
    let page = Resource::new(|| (), |_| load_admin_page());

    view! {
        <div class="dashboard-header">
            <h1>"Teams"</h1>
            <p class="subtitle">"Every registered team"</p>
        </div>
        <Suspense fallback=|| {
            view! {
                <div class="loading">
                    <div class="spinner"></div>
                    "Loading teams..."
                </div>
            }
        }>
            {move || Suspend::new(async move {
                match page.await {
                    Ok(data) => view! { <TeamTable teams=data.teams /> }.into_any(),
                    Err(e) => {
                        view! {
                            <div class="card">
                                <p class="login-error">"Failed to load teams: " {e.to_string()}</p>
                            </div>
                        }
                            .into_any()
                    }
                }
            })}
        </Suspense>
    }
}

#[component]
fn TeamTable(teams: Vec<Team>) -> impl IntoView {
    if teams.is_empty() {
        return view! {
            <div class="card">
                <div class="card-title">"No Teams Yet"</div>
            </div>
        }
            .into_any();
    }

    let count = teams.len();
    let withFile = teams.iter().filter(|t| t.has_file).count();

    view! {
        <div class="card">
            <div class="card-title">
                {format!("{count} Team{} ({withFile} with files)", if count == 1 { "" } else { "s" })}
            </div>
            <table>
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Code"</th>
                        <th>"Film"</th>
                        <th>"File"</th>
                    </tr>
                </thead>
                <tbody>
                    {teams
                        .into_iter()
                        .map(|team| {
                            view! {
                                <tr>
                                    <td>{team.name}</td>
                                    <td>
                                        <code>{team.id}</code>
                                    </td>
                                    <td>{team.film_name}</td>
                                    <td>{if team.has_file { "\u{2713}" } else { "\u{2014}" }}</td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
        .into_any()
}
