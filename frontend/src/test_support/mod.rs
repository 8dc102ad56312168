#[cfg(all(test, not(target_arch = "wasm32")))]
pub mod ssr;

#[cfg(all(test, not(target_arch = "wasm32")))]
pub mod helpers {
    use crate::api::{test_support::mock::RecordingTransport, ApiClient, FlexibleId, UserProfile};
    use crate::router::AppContext;
    use crate::state::auth::AuthState;
    use crate::utils::{document::RecordingDocument, storage::MemoryStorage};
    use leptos::*;

    pub const ORIGIN: &str = "http://backend.test";

    pub fn alice() -> UserProfile {
        UserProfile {
            id: Some(FlexibleId::Number(1)),
            username: Some("alice".into()),
            first_name: Some("Alice".into()),
            ..UserProfile::default()
        }
    }

    pub fn provide_auth(
        user: Option<UserProfile>,
    ) -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
        let (auth, set_auth) = create_signal(AuthState {
            is_authenticated: user.is_some(),
            user,
            loading: false,
        });
        provide_context((auth, set_auth));
        (auth, set_auth)
    }

    /// Application context over in-memory storage and document, with a
    /// transport that answers nothing unless scripted.
    pub fn test_context() -> (AppContext, MemoryStorage, RecordingDocument) {
        let (ctx, storage, document, _) = scripted_context();
        (ctx, storage, document)
    }

    pub fn scripted_context() -> (AppContext, MemoryStorage, RecordingDocument, RecordingTransport)
    {
        let storage = MemoryStorage::new();
        let document = RecordingDocument::new();
        let transport = RecordingTransport::new();
        let api = ApiClient::new_with_base_url(ORIGIN).with_transport(transport.clone());
        let ctx = AppContext::new(storage.clone(), document.clone(), api);
        (ctx, storage, document, transport)
    }
}
