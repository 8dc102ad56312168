use crate::{
    api::{ApiClient, ApiError, UpdateProfileRequest, UserProfile},
    state::session::SessionStore,
};

/// A picked avatar file, read into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarUpload {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

fn store(session: &SessionStore, user: &UserProfile) -> Result<(), ApiError> {
    session
        .update_user(Some(user))
        .map_err(|err| ApiError::unknown(err.to_string()))
}

/// The cached profile, or the backend's view of the current user when
/// nothing is cached. A fetched profile is cached for the next visit.
pub async fn load_profile(api: &ApiClient, session: &SessionStore) -> Result<UserProfile, ApiError> {
    if let Some(user) = session.user() {
        return Ok(user);
    }
    let user = api.current_user().await?;
    if let Err(err) = store(session, &user) {
        log::warn!("could not cache fetched profile: {}", err);
    }
    Ok(user)
}

/// Saves the edited fields and writes the merged profile through to the
/// session so every tab sees it.
pub async fn save_profile(
    api: &ApiClient,
    session: &SessionStore,
    current: &UserProfile,
    request: &UpdateProfileRequest,
) -> Result<UserProfile, ApiError> {
    let updated = api.update_user(current, request).await?;
    store(session, &updated)?;
    Ok(updated)
}

pub async fn upload_avatar(
    api: &ApiClient,
    session: &SessionStore,
    current: &UserProfile,
    upload: AvatarUpload,
) -> Result<UserProfile, ApiError> {
    let url = api
        .upload_avatar(&upload.file_name, upload.mime, upload.bytes)
        .await?;
    let mut updated = current.clone();
    updated.avatar_url = Some(url);
    store(session, &updated)?;
    Ok(updated)
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::api::test_support::mock::*;
    use crate::test_support::helpers::{alice, ORIGIN};
    use crate::utils::storage::{KeyValueStore, MemoryStorage, StorageBus, USER_KEY};
    use serde_json::json;

    fn client(transport: &RecordingTransport, session: &SessionStore) -> ApiClient {
        ApiClient::new_with_base_url(ORIGIN)
            .with_transport(transport.clone())
            .with_session(session.clone())
    }

    #[tokio::test]
    async fn cached_profile_skips_the_network() {
        let transport = RecordingTransport::new();
        let session = SessionStore::new(MemoryStorage::new(), StorageBus::new());
        session.write("abc", Some(&alice())).unwrap();

        let user = load_profile(&client(&transport, &session), &session).await.unwrap();
        assert_eq!(user, alice());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn fetched_profile_is_cached() {
        let transport = RecordingTransport::new();
        transport.respond_json(
            GET,
            "http://backend.test/api/auth/me",
            200,
            json!({ "userId": 5, "firstName": "Sara", "email": "s@x.io" }),
        );
        let storage = MemoryStorage::new();
        let session = SessionStore::new(storage.clone(), StorageBus::new());

        let user = load_profile(&client(&transport, &session), &session).await.unwrap();
        assert_eq!(user.first_name.as_deref(), Some("Sara"));
        assert!(storage.get(USER_KEY).unwrap().contains("Sara"));
    }

    #[tokio::test]
    async fn saving_writes_through_to_the_session() {
        let transport = RecordingTransport::new();
        transport.respond_json(
            PATCH,
            "http://backend.test/api/users/1",
            200,
            json!({ "success": true, "user": { "firstName": "Alicia" } }),
        );
        let session = SessionStore::new(MemoryStorage::new(), StorageBus::new());
        session.write("abc", Some(&alice())).unwrap();
        let request = UpdateProfileRequest {
            first_name: "Alicia".into(),
            last_name: "L".into(),
            email: "alice@example.com".into(),
            avatar_url: None,
        };

        let updated = save_profile(&client(&transport, &session), &session, &alice(), &request)
            .await
            .unwrap();
        assert_eq!(updated.first_name.as_deref(), Some("Alicia"));
        assert_eq!(session.user(), Some(updated));
    }

    #[tokio::test]
    async fn rejected_save_keeps_cached_profile() {
        let transport = RecordingTransport::new();
        transport.respond_json(
            PATCH,
            "http://backend.test/api/users/1",
            200,
            json!({ "success": false, "message": "Email taken" }),
        );
        let session = SessionStore::new(MemoryStorage::new(), StorageBus::new());
        session.write("abc", Some(&alice())).unwrap();
        let request = UpdateProfileRequest {
            first_name: "Alice".into(),
            ..UpdateProfileRequest::default()
        };

        let err = save_profile(&client(&transport, &session), &session, &alice(), &request)
            .await
            .unwrap_err();
        assert_eq!(err.error, "Email taken");
        assert_eq!(session.user(), Some(alice()));
    }

    #[tokio::test]
    async fn uploaded_avatar_replaces_cached_url() {
        let transport = RecordingTransport::new();
        transport.respond_json(
            POST,
            "http://backend.test/api/upload-avatar",
            200,
            json!({ "avatarUrl": "/uploads/new.png" }),
        );
        let session = SessionStore::new(MemoryStorage::new(), StorageBus::new());
        session.write("abc", Some(&alice())).unwrap();
        let upload = AvatarUpload {
            file_name: "me.png".into(),
            mime: Some("image/png".into()),
            bytes: vec![1, 2, 3],
        };

        let updated = upload_avatar(&client(&transport, &session), &session, &alice(), upload)
            .await
            .unwrap();
        assert_eq!(updated.avatar_url.as_deref(), Some("/uploads/new.png"));
        assert_eq!(
            session.user().and_then(|u| u.avatar_url),
            Some("/uploads/new.png".to_string())
        );
    }
}
