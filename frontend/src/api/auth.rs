use log::{info, warn};
use reqwest::Method;
use serde_json::Value;

use super::{
    client::{ApiClient, MultipartField, RequestOptions},
    types::{ApiError, LoginRequest, LoginResponse, UpdateProfileRequest, UserProfile},
};

const NO_TOKEN: &str = "No token returned from server";

/// Stores the login outcome in the attached session, mirroring what other
/// tabs observe through the storage bus.
fn persist_session(api: &ApiClient, response: &LoginResponse) -> Result<(), ApiError> {
    if let Some(session) = api.session() {
        session
            .write(&response.token, response.user.as_ref())
            .map_err(|e| ApiError::unknown(e.to_string()))?;
    }
    Ok(())
}

impl ApiClient {
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let body = serde_json::to_value(request)
            .map_err(|e| ApiError::validation(format!("Failed to encode request: {}", e)))?;
        // A 401 here means bad credentials, not an expired session.
        let options = RequestOptions::json(Method::POST, body).anonymous();
        let value = self.request("/auth/login", options).await.into_result()?;
        let token = value
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::request_failed(NO_TOKEN))?
            .to_string();
        let user = value
            .get("user")
            .filter(|u| !u.is_null())
            .and_then(|u| match serde_json::from_value::<UserProfile>(u.clone()) {
                Ok(user) => Some(user),
                Err(err) => {
                    warn!("login returned an unreadable user: {}", err);
                    None
                }
            });
        let response = LoginResponse { token, user };
        persist_session(self, &response)?;
        info!("signed in as {:?}", response.user.as_ref().and_then(UserProfile::display_name));
        Ok(response)
    }

    /// `GET /auth/me`, falling back to `/users/me` on servers that only
    /// expose the latter.
    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        let primary = self.get("/auth/me").await;
        let result = if primary.status() == Some(404) {
            self.get("/users/me").await
        } else {
            primary
        };
        let value = result.into_result()?;
        let user = value.get("user").filter(|u| u.is_object()).unwrap_or(&value);
        serde_json::from_value(user.clone())
            .map_err(|e| ApiError::unknown(format!("Failed to parse response: {}", e)))
    }

    /// `PATCH /users/:id`. The returned profile merges the server echo over
    /// the submitted fields.
    pub async fn update_user(
        &self,
        current: &UserProfile,
        changes: &UpdateProfileRequest,
    ) -> Result<UserProfile, ApiError> {
        let id = current
            .id
            .as_ref()
            .ok_or_else(|| ApiError::validation("Profile has no id"))?;
        let value = self
            .patch_json(&format!("/users/{}", id), changes)
            .await
            .into_result()?;
        if value.get("success").and_then(Value::as_bool) == Some(false) {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Update failed");
            return Err(ApiError::request_failed(message));
        }

        let echo = value.get("user");
        let field = |name: &str, fallback: &str| {
            echo.and_then(|u| u.get(name))
                .and_then(Value::as_str)
                .unwrap_or(fallback)
                .to_string()
        };
        let mut updated = current.clone();
        updated.first_name = Some(field("firstName", &changes.first_name));
        updated.last_name = Some(field("lastName", &changes.last_name));
        updated.email = Some(field("email", &changes.email));
        if let Some(avatar) = echo
            .and_then(|u| u.get("avatarUrl"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| changes.avatar_url.clone())
        {
            updated.avatar_url = Some(avatar);
        }
        Ok(updated)
    }

    /// Uploads an avatar image as the multipart field `avatar` and returns the
    /// stored URL as reported by the server.
    pub async fn upload_avatar(
        &self,
        file_name: &str,
        mime: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        let field = MultipartField {
            name: "avatar".into(),
            file_name: Some(file_name.to_string()),
            mime,
            bytes,
        };
        let result = self.upload("/upload-avatar", vec![field]).await;
        let url = result
            .get("avatarUrl")
            .and_then(Value::as_str)
            .map(str::to_string);
        result.into_result()?;
        url.ok_or_else(|| ApiError::request_failed("Upload did not return an avatar URL"))
    }
}
