use futures::future::join_all;
use log::warn;
use serde_json::Value;

use crate::utils::query::encode_component;

use super::{
    client::ApiClient,
    types::{AddMembersRequest, ApiError, DashboardStats, Employee, FlexibleId, Team, TeamPayload},
};

fn decode_list<T: serde::de::DeserializeOwned>(value: Value, what: &str) -> Vec<T> {
    let items = match value {
        Value::Array(items) => items,
        other => other
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
    };
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                warn!("skipping unreadable {}: {}", what, err);
                None
            }
        })
        .collect()
}

impl ApiClient {
    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        let value = self.get("/stats").await.into_result()?;
        let counters = ["stats", "data"]
            .iter()
            .find_map(|k| value.get(*k).filter(|v| v.is_object()))
            .unwrap_or(&value);
        Ok(DashboardStats::from_value(counters))
    }

    pub async fn list_employees(&self) -> Result<Vec<Employee>, ApiError> {
        let value = self.get("/employees").await.into_result()?;
        Ok(decode_list(value, "employee"))
    }

    pub async fn get_employee(&self, emp_no: &str) -> Result<Employee, ApiError> {
        let value = self
            .get(&format!("/employees/{}", encode_component(emp_no)))
            .await
            .into_result()?;
        let record = value.get("data").filter(|d| d.is_object()).unwrap_or(&value);
        serde_json::from_value(record.clone())
            .map_err(|e| ApiError::unknown(format!("Failed to parse response: {}", e)))
    }

    pub async fn list_team_members(&self, team_id: i64) -> Result<Vec<Employee>, ApiError> {
        let value = self
            .get(&format!("/teams/{}/members", team_id))
            .await
            .into_result()?;
        Ok(decode_list(value, "team member"))
    }

    /// Teams with their members. A team whose member list fails to load is
    /// shown with no members.
    pub async fn list_teams(&self) -> Result<Vec<Team>, ApiError> {
        let value = self.get("/teams").await.into_result()?;
        let teams: Vec<Team> = decode_list(value, "team");
        let members = join_all(teams.iter().map(|t| self.list_team_members(t.id))).await;
        Ok(teams
            .into_iter()
            .zip(members)
            .map(|(mut team, members)| {
                team.members = members.unwrap_or_else(|err| {
                    warn!("members of team {} unavailable: {}", team.id, err);
                    Vec::new()
                });
                team
            })
            .collect())
    }

    /// Returns the new team id, read from `teamId` or `insertId`.
    pub async fn create_team(&self, payload: &TeamPayload) -> Result<Option<i64>, ApiError> {
        let result = self.post_json("/teams", payload).await;
        let id = result
            .get("teamId")
            .or_else(|| result.get("insertId"))
            .and_then(Value::as_i64);
        result.into_result()?;
        Ok(id)
    }

    pub async fn update_team(&self, team_id: i64, payload: &TeamPayload) -> Result<(), ApiError> {
        self.put_json(&format!("/teams/{}", team_id), payload)
            .await
            .into_result()
            .map(|_| ())
    }

    pub async fn delete_team(&self, team_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/teams/{}", team_id))
            .await
            .into_result()
            .map(|_| ())
    }

    pub async fn add_team_members(
        &self,
        team_id: i64,
        emp_nos: Vec<FlexibleId>,
    ) -> Result<(), ApiError> {
        if emp_nos.is_empty() {
            return Ok(());
        }
        self.post_json(
            &format!("/teams/{}/members", team_id),
            &AddMembersRequest { emp_nos },
        )
        .await
        .into_result()
        .map(|_| ())
    }

    pub async fn remove_team_member(
        &self,
        team_id: i64,
        emp_no: &FlexibleId,
    ) -> Result<(), ApiError> {
        self.delete(&format!("/teams/{}/members/{}", team_id, emp_no))
            .await
            .into_result()
            .map(|_| ())
    }
}
