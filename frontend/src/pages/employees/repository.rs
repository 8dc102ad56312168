use serde::{Deserialize, Serialize};

use super::utils::available_employees;
use crate::api::{ApiClient, ApiError, Employee, FlexibleId, Team, TeamPayload};

/// Everything the employees screen shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Directory {
    pub teams: Vec<Team>,
    /// Employees not on any team.
    pub available: Vec<Employee>,
}

/// A create or edit submitted from the team dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamDraft {
    pub team_id: Option<i64>,
    pub payload: TeamPayload,
    pub add: Vec<FlexibleId>,
    pub remove: Vec<FlexibleId>,
}

/// Teams are best effort: when they fail to load every employee counts as
/// available. A failed employee list fails the whole screen.
pub async fn load_directory(api: &ApiClient) -> Result<Directory, ApiError> {
    let (teams, employees) = futures::join!(api.list_teams(), api.list_employees());
    let teams = teams.unwrap_or_else(|err| {
        log::warn!("teams unavailable: {}", err);
        Vec::new()
    });
    let available = available_employees(&employees?, &teams);
    Ok(Directory { teams, available })
}

/// Creates or updates the team, then applies the membership changes.
/// Returns `true` when a new team was created.
pub async fn save_team(api: &ApiClient, draft: TeamDraft) -> Result<bool, ApiError> {
    let (team_id, created) = match draft.team_id {
        Some(id) => {
            api.update_team(id, &draft.payload).await?;
            (Some(id), false)
        }
        None => (api.create_team(&draft.payload).await?, true),
    };
    let Some(team_id) = team_id else {
        if !draft.add.is_empty() {
            log::warn!("team created without an id; members were not added");
        }
        return Ok(created);
    };
    api.add_team_members(team_id, draft.add).await?;
    for emp_no in &draft.remove {
        api.remove_team_member(team_id, emp_no).await?;
    }
    Ok(created)
}
