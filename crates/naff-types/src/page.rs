use serde::{Deserialize, Serialize};

use crate::team::{Team, User};

/// Data assembled for the participant page. `members` is only present when
/// the user belongs to a team.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticipantPage {
    pub user: User,
    pub team: Option<Team>,
    pub members: Option<Vec<User>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminPage {
    pub user: User,
    pub teams: Vec<Team>,
}
