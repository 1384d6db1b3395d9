use leptos::prelude::*;
use naff_types::{ParticipantPage, Team, User};

use crate::components::notice::{NoticeContext, NoticeLevel};

#[server]
pub async fn load_participant_page() -> Result<ParticipantPage, ServerFnError> {
    use crate::server;

    if let Some(page) = server::preloaded::<ParticipantPage>() {
        return Ok(page);
    }

    let state = server::app_state()?;
    let token = server::request_token();
    naff_api::loader::load_participant(&state.client, token.as_ref())
        .await
        .map_err(server::exit)
}

#[server]
pub async fn join_team(code: String) -> Result<Team, ServerFnError> {
    use crate::server;

    let state = server::app_state()?;
    let token = server::require_token(&state)?;
    state
        .client
        .join_team(&token, code.trim())
        .await
        .map_err(|e| server::action_error(&state, "join", e))
}

#[server]
pub async fn create_team(name: String) -> Result<Team, ServerFnError> {
    use crate::server;

    let state = server::app_state()?;
    let token = server::require_token(&state)?;
    state
        .client
        .create_team(&token, name.trim())
        .await
        .map_err(|e| server::action_error(&state, "create", e))
}

#[server]
pub async fn leave_team() -> Result<(), ServerFnError> {
    use crate::server;

    let state = server::app_state()?;
    let token = server::require_token(&state)?;
    state
        .client
        .leave_team(&token)
        .await
        .map_err(|e| server::action_error(&state, "leave", e))
}

#[component]
pub fn ParticipatePage() -> impl IntoView {
    let joinAction = ServerAction::<JoinTeam>::new();
    let createAction = ServerAction::<CreateTeam>::new();
    let leaveAction = ServerAction::<LeaveTeam>::new();

    report_outcome(
        move || joinAction.value().get().map(|r| r.map(|_| ()).map_err(|e| e.to_string())),
        "Joined team",
        "Could not join team",
    );
    report_outcome(
        move || createAction.value().get().map(|r| r.map(|_| ()).map_err(|e| e.to_string())),
        "Team created",
        "Could not create team",
    );
    report_outcome(
        move || leaveAction.value().get().map(|r| r.map_err(|e| e.to_string())),
        "Left team",
        "Could not leave team",
    );

    let page = Resource::new(
        move || {
            (
                joinAction.version().get(),
                createAction.version().get(),
                leaveAction.version().get(),
            )
        },
        |_| load_participant_page(),
    );

    view! {
        <div class="dashboard-header">
            <h1>"Your Team"</h1>
            <p class="subtitle">"Join an existing team or start a new one"</p>
        </div>
        <Suspense fallback=|| {
            view! {
                <div class="loading">
                    <div class="spinner"></div>
                    "Loading your team..."
                </div>
            }
        }>
            {move || Suspend::new(async move {
                match page.await {
                    Ok(data) => {
                        view! {
                            <ParticipantContent
                                page=data
                                join=joinAction
                                create=createAction
                                leave=leaveAction
                            />
                        }
                            .into_any()
                    }
                    Err(e) => {
                        view! {
                            <div class="card">
                                <p class="login-error">"Failed to load your team: " {e.to_string()}</p>
                            </div>
                        }
                            .into_any()
                    }
                }
            })}
        </Suspense>
    }
}

/// Surfaces the latest outcome of an action as a notice.
fn report_outcome(
    outcome: impl Fn() -> Option<Result<(), String>> + Send + Sync + 'static,
    success: &'static str,
    prefix: &'static str,
) {
    let notices = use_context::<NoticeContext>();
    Effect::new(move |_| {
        let (Some(notices), Some(result)) = (notices, outcome()) else {
            return;
        };
        match result {
            Ok(()) => notices.push(success.to_string(), NoticeLevel::Success),
            Err(e) => notices.push(format!("{prefix}: {e}"), NoticeLevel::Error),
        }
    });
}

#[component]
fn ParticipantContent(
    page: ParticipantPage,
    join: ServerAction<JoinTeam>,
    create: ServerAction<CreateTeam>,
    leave: ServerAction<LeaveTeam>,
) -> impl IntoView {
    let ParticipantPage {
        user,
        team,
        members,
    } = page;

    let greeting = format!("Signed in as {} ({})", user.name, user.email);

    view! {
        <p class="subtitle">{greeting}</p>
        {match team {
            Some(team) => {
                view! { <TeamCard team=team members=members.unwrap_or_default() leave=leave /> }
                    .into_any()
            }
            None => view! { <NoTeam join=join create=create /> }.into_any(),
        }}
    }
}

#[component]
fn TeamCard(team: Team, members: Vec<User>, leave: ServerAction<LeaveTeam>) -> impl IntoView {
    let count = members.len();
    let fileStatus = if team.has_file { "Uploaded" } else { "Not uploaded" };

    view! {
        <div class="card">
            <div class="card-title">{team.name.clone()}</div>
            <table>
                <tbody>
                    <tr>
                        <th>"Join code"</th>
                        <td>
                            <code>{team.id.clone()}</code>
                        </td>
                    </tr>
                    <tr>
                        <th>"Film"</th>
                        <td>{team.film_name.clone()}</td>
                    </tr>
                    <tr>
                        <th>"Description"</th>
                        <td>{team.film_description.clone()}</td>
                    </tr>
                    <tr>
                        <th>"File"</th>
                        <td>{fileStatus}</td>
                    </tr>
                </tbody>
            </table>
        </div>
        <div class="card">
            <div class="card-title">
                {format!("{count} Member{}", if count == 1 { "" } else { "s" })}
            </div>
            <table>
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Email"</th>
                    </tr>
                </thead>
                <tbody>
                    {members
                        .into_iter()
                        .map(|member| {
                            view! {
                                <tr>
                                    <td>{member.name}</td>
                                    <td>{member.email}</td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
            <ActionForm action=leave>
                <button type="submit" class="btn btn-danger">
                    "Leave team"
                </button>
            </ActionForm>
        </div>
    }
}

#[component]
fn NoTeam(join: ServerAction<JoinTeam>, create: ServerAction<CreateTeam>) -> impl IntoView {
    view! {
        <div class="card">
            <div class="card-title">"Join a team"</div>
            <ActionForm action=join>
                <div class="form-group">
                    <label for="code">"Team code"</label>
                    <input type="text" id="code" name="code" placeholder="Code from a teammate" required />
                </div>
                <button type="submit" class="btn btn-primary">
                    "Join"
                </button>
            </ActionForm>
        </div>
        <div class="card">
            <div class="card-title">"Create a team"</div>
            <ActionForm action=create>
                <div class="form-group">
                    <label for="name">"Team name"</label>
                    <input type="text" id="name" name="name" placeholder="Team name" required />
                </div>
                <button type="submit" class="btn btn-primary">
                    "Create"
                </button>
            </ActionForm>
        </div>
    }
}
