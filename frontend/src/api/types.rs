use leptos::*;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// Numeric or textual identifier as the backend happens to send it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlexibleId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for FlexibleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlexibleId::Number(n) => write!(f, "{}", n),
            FlexibleId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FlexibleId {
    fn from(value: i64) -> Self {
        FlexibleId::Number(value)
    }
}

impl From<&str> for FlexibleId {
    fn from(value: &str) -> Self {
        FlexibleId::Text(value.to_string())
    }
}

/// Cached snapshot of the signed-in user. Unknown backend fields are kept so
/// the persisted snapshot round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, alias = "userId", skip_serializing_if = "Option::is_none")]
    pub id: Option<FlexibleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, alias = "avatar", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn display_name(&self) -> Option<&str> {
        self.first_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.username.as_deref().filter(|s| !s.is_empty()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub users: i64,
    pub teams: i64,
    pub available_teams: i64,
    pub bidding_projects: i64,
    pub units: i64,
    pub stores: i64,
    pub companies: i64,
    pub projects: i64,
}

impl DashboardStats {
    /// Counters are read leniently: missing or non-numeric values become 0.
    pub fn from_value(value: &Value) -> Self {
        let num = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| value.get(*k).and_then(Value::as_i64))
                .unwrap_or(0)
        };
        Self {
            users: num(&["users"]),
            teams: num(&["teams"]),
            available_teams: num(&["avalaibleTeams", "availableTeams"]),
            bidding_projects: num(&["bundingproject", "biddingProjects"]),
            units: num(&["units", "Units"]),
            stores: num(&["stores", "Stores"]),
            companies: num(&["Companies", "companies"]),
            projects: num(&["projects", "Projects"]),
        }
    }
}

fn de_flexible_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "active"
        ),
        _ => false,
    })
}

fn de_flexible_id<'de, D>(deserializer: D) -> Result<FlexibleId, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .map(FlexibleId::Number)
            .ok_or_else(|| de::Error::custom("identifier out of range")),
        Value::String(s) => Ok(FlexibleId::Text(s)),
        other => Err(de::Error::custom(format!("invalid identifier: {}", other))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "empNo", deserialize_with = "de_flexible_id")]
    pub emp_no: FlexibleId,
    #[serde(rename = "name_ar", default)]
    pub name_ar: String,
    #[serde(rename = "name_en", default, skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(rename = "job_Desc", default, skip_serializing_if = "Option::is_none")]
    pub job_desc: Option<String>,
    #[serde(rename = "Work_status", default, deserialize_with = "de_flexible_flag")]
    pub work_status: bool,
    #[serde(rename = "perHour", default, skip_serializing_if = "Option::is_none")]
    pub per_hour: Option<f64>,
    #[serde(rename = "Job_code", default, skip_serializing_if = "Option::is_none")]
    pub job_code: Option<Value>,
    #[serde(rename = "WPlaceDesc", default, skip_serializing_if = "Option::is_none")]
    pub work_place_desc: Option<String>,
    #[serde(rename = "Work_place", default, skip_serializing_if = "Option::is_none")]
    pub work_place: Option<Value>,
}

impl Employee {
    pub fn job_label(&self) -> &str {
        self.job_desc
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("—")
    }

    pub fn work_place_label(&self) -> String {
        self.work_place_desc
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| self.work_place.as_ref().map(value_label))
            .unwrap_or_default()
    }
}

pub fn value_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub members: Vec<Employee>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPayload {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMembersRequest {
    pub emp_nos: Vec<FlexibleId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl From<ApiError> for String {
    fn from(error: ApiError) -> Self {
        error.error
    }
}

impl IntoView for ApiError {
    fn into_view(self) -> View {
        self.error.into_view()
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: "VALIDATION_ERROR".to_string(),
            details: None,
        }
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: "UNKNOWN".to_string(),
            details: None,
        }
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: "REQUEST_FAILED".to_string(),
            details: None,
        }
    }

    pub fn network() -> Self {
        Self {
            error: super::client::NETWORK_ERROR.to_string(),
            code: "NETWORK_ERROR".to_string(),
            details: None,
        }
    }

    pub fn http(status: u16, msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: format!("HTTP_{}", status),
            details: Some(serde_json::json!({ "status": status })),
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.details
            .as_ref()
            .and_then(|d| d.get("status"))
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_profile_snapshot_round_trips_exactly() {
        let raw = r#"{"id":1,"username":"alice"}"#;
        let user: UserProfile = serde_json::from_str(raw).unwrap();
        assert_eq!(user.id, Some(FlexibleId::Number(1)));
        assert_eq!(serde_json::to_string(&user).unwrap(), raw);
    }

    #[test]
    fn user_profile_keeps_unknown_fields_and_aliases() {
        let user: UserProfile = serde_json::from_value(json!({
            "userId": "u-7",
            "firstName": "Sara",
            "avatar": "/uploads/s.png",
            "department": "ops"
        }))
        .unwrap();
        assert_eq!(user.id, Some(FlexibleId::Text("u-7".into())));
        assert_eq!(user.avatar_url.as_deref(), Some("/uploads/s.png"));
        assert_eq!(user.extra.get("department"), Some(&json!("ops")));
        assert_eq!(user.display_name(), Some("Sara"));
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let user = UserProfile {
            username: Some("alice".into()),
            first_name: Some(String::new()),
            ..UserProfile::default()
        };
        assert_eq!(user.display_name(), Some("alice"));
        assert_eq!(UserProfile::default().display_name(), None);
    }

    #[test]
    fn employee_accepts_loose_backend_shapes() {
        let emp: Employee = serde_json::from_value(json!({
            "empNo": 1042,
            "name_ar": "أحمد",
            "job_Desc": "",
            "Work_status": "1",
            "Work_place": 12
        }))
        .unwrap();
        assert_eq!(emp.emp_no.to_string(), "1042");
        assert!(emp.work_status);
        assert_eq!(emp.job_label(), "—");
        assert_eq!(emp.work_place_label(), "12");

        let emp: Employee =
            serde_json::from_value(json!({ "empNo": "E-1", "Work_status": false })).unwrap();
        assert_eq!(emp.emp_no, FlexibleId::Text("E-1".into()));
        assert!(!emp.work_status);
    }

    #[test]
    fn stats_read_leniently() {
        let stats = DashboardStats::from_value(&json!({
            "users": 12,
            "teams": "3",
            "avalaibleTeams": 2,
            "projects": 5
        }));
        assert_eq!(stats.users, 12);
        assert_eq!(stats.teams, 0);
        assert_eq!(stats.available_teams, 2);
        assert_eq!(stats.projects, 5);
    }

    #[test]
    fn add_members_request_uses_camel_case() {
        let body = serde_json::to_value(AddMembersRequest {
            emp_nos: vec![FlexibleId::Number(1), FlexibleId::Text("E-2".into())],
        })
        .unwrap();
        assert_eq!(body, json!({ "empNos": [1, "E-2"] }));
    }

    #[test]
    fn api_error_helpers_set_expected_codes() {
        assert_eq!(ApiError::validation("bad").code, "VALIDATION_ERROR");
        assert_eq!(ApiError::unknown("x").code, "UNKNOWN");
        assert_eq!(ApiError::request_failed("x").code, "REQUEST_FAILED");
        let http = ApiError::http(404, "Not found");
        assert_eq!(http.code, "HTTP_404");
        assert_eq!(http.status(), Some(404));
        assert_eq!(ApiError::network().error, "Network error");
    }

    #[test]
    fn api_error_display_and_string_conversion_match_error_text() {
        let error = ApiError::unknown("boom");
        assert_eq!(format!("{}", error), "boom");
        let raw: String = ApiError::validation("bad input").into();
        assert_eq!(raw, "bad input");
    }
}
