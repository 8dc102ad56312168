use crate::{
    api::{ApiClient, ApiError, LoginRequest, UserProfile},
    state::session::SessionStore,
    utils::storage::StorageBus,
};
use leptos::*;

type AuthContext = (ReadSignal<AuthState>, WriteSignal<AuthState>);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<UserProfile>,
    pub is_authenticated: bool,
    pub loading: bool,
}

impl AuthState {
    fn from_session(session: &SessionStore) -> Self {
        let snapshot = session.read();
        Self {
            is_authenticated: snapshot.is_authenticated(),
            user: snapshot.user,
            loading: false,
        }
    }
}

pub fn use_session() -> SessionStore {
    use_context::<SessionStore>().unwrap_or_else(|| {
        let session = SessionStore::browser(StorageBus::new());
        provide_context(session.clone());
        session
    })
}

pub fn use_api() -> ApiClient {
    use_context::<ApiClient>().unwrap_or_else(|| ApiClient::new().with_session(use_session()))
}

/// Seeds the auth signal from storage and keeps it in step with session
/// writes from this tab or any other.
fn create_auth_context(session: &SessionStore) -> AuthContext {
    let (auth_state, set_auth_state) = create_signal(AuthState::from_session(session));

    let user_sub = session.subscribe_user(move |user| {
        set_auth_state.update(|state| state.user = user);
    });
    let token_sub = session.subscribe_token(move |token| {
        set_auth_state.update(|state| {
            state.is_authenticated = token.is_some();
            if token.is_none() {
                state.user = None;
            }
        });
    });
    on_cleanup(move || {
        drop(user_sub);
        drop(token_sub);
    });

    (auth_state, set_auth_state)
}

#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let session = use_session();
    let ctx = create_auth_context(&session);
    provide_context::<AuthContext>(ctx);
    view! { <>{children()}</> }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().unwrap_or_else(|| create_signal(AuthState::default()))
}

pub async fn login_request(
    request: LoginRequest,
    api: &ApiClient,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<(), ApiError> {
    set_auth_state.update(|state| state.loading = true);

    match api.login(&request).await {
        Ok(response) => {
            set_auth_state.update(|state| {
                state.user = response.user;
                state.is_authenticated = true;
                state.loading = false;
            });
            Ok(())
        }
        Err(error) => {
            set_auth_state.update(|state| state.loading = false);
            Err(error)
        }
    }
}

/// Sign-out is purely local: the backend keeps no session to revoke.
pub fn logout(session: &SessionStore, set_auth_state: WriteSignal<AuthState>) {
    session.clear();
    set_auth_state.update(|state| {
        state.user = None;
        state.is_authenticated = false;
        state.loading = false;
    });
}

pub fn use_login_action() -> Action<LoginRequest, Result<(), ApiError>> {
    let (_auth, set_auth) = use_auth();
    let api = use_api();

    create_action(move |request: &LoginRequest| {
        let payload = request.clone();
        let api = api.clone();
        async move { login_request(payload, &api, set_auth).await }
    })
}

pub fn use_logout_action() -> Action<(), ()> {
    let (_auth, set_auth) = use_auth();
    let session = use_session();

    create_action(move |_: &()| {
        let session = session.clone();
        async move { logout(&session, set_auth) }
    })
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::test_support::ssr::with_runtime;
    use crate::utils::storage::{KeyValueStore, MemoryStorage, ACCESS_TOKEN_KEY, USER_KEY};

    #[test]
    fn use_auth_returns_default_without_context() {
        with_runtime(|| {
            let (state, _set_state) = use_auth();
            let snapshot = state.get();
            assert!(!snapshot.is_authenticated);
            assert!(snapshot.user.is_none());
        });
    }

    #[test]
    fn auth_state_follows_session_writes() {
        with_runtime(|| {
            let session = SessionStore::new(MemoryStorage::new(), StorageBus::new());
            let (state, _) = create_auth_context(&session);
            assert!(!state.get_untracked().is_authenticated);

            let user = UserProfile {
                username: Some("alice".into()),
                ..UserProfile::default()
            };
            session.write("abc", Some(&user)).unwrap();
            let snapshot = state.get_untracked();
            assert!(snapshot.is_authenticated);
            assert_eq!(snapshot.user, Some(user));

            session.clear();
            assert_eq!(state.get_untracked(), AuthState::default());
        });
    }

    #[test]
    fn auth_state_reads_existing_session() {
        with_runtime(|| {
            let storage = MemoryStorage::new();
            storage.set(ACCESS_TOKEN_KEY, "abc").unwrap();
            storage.set(USER_KEY, r#"{"id":1,"username":"alice"}"#).unwrap();
            let session = SessionStore::new(storage, StorageBus::new());
            let (state, _) = create_auth_context(&session);
            let snapshot = state.get_untracked();
            assert!(snapshot.is_authenticated);
            assert_eq!(
                snapshot.user.and_then(|u| u.username),
                Some("alice".to_string())
            );
        });
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::utils::storage::{KeyValueStore, MemoryStorage, ACCESS_TOKEN_KEY, USER_KEY};
    use httpmock::prelude::*;

    #[tokio::test]
    async fn login_and_logout_update_auth_state() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(200).json_body(serde_json::json!({
                "token": "abc",
                "user": { "id": 1, "username": "alice" }
            }));
        });

        let runtime = create_runtime();
        let storage = MemoryStorage::new();
        let session = SessionStore::new(storage.clone(), StorageBus::new());
        let (state, set_state) = create_signal(AuthState::default());
        let api = ApiClient::new_with_base_url(server.base_url()).with_session(session.clone());

        login_request(
            LoginRequest {
                username: "alice".into(),
                password: "secret".into(),
            },
            &api,
            set_state,
        )
        .await
        .unwrap();

        let snapshot = state.get();
        assert!(snapshot.is_authenticated);
        assert!(!snapshot.loading);
        assert_eq!(storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("abc"));
        assert_eq!(
            storage.get(USER_KEY).as_deref(),
            Some(r#"{"id":1,"username":"alice"}"#)
        );

        logout(&session, set_state);
        let snapshot = state.get();
        assert!(!snapshot.is_authenticated);
        assert!(snapshot.user.is_none());
        assert_eq!(storage.get(ACCESS_TOKEN_KEY), None);
        runtime.dispose();
    }

    #[tokio::test]
    async fn failed_login_leaves_state_signed_out() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(401)
                .json_body(serde_json::json!({ "message": "Invalid credentials" }));
        });

        let runtime = create_runtime();
        let (state, set_state) = create_signal(AuthState::default());
        let api = ApiClient::new_with_base_url(server.base_url())
            .with_session(SessionStore::new(MemoryStorage::new(), StorageBus::new()));

        let err = login_request(
            LoginRequest {
                username: "alice".into(),
                password: "wrong".into(),
            },
            &api,
            set_state,
        )
        .await
        .unwrap_err();

        assert_eq!(err.error, "Invalid credentials");
        assert!(!state.get().is_authenticated);
        assert!(!state.get().loading);
        runtime.dispose();
    }
}
