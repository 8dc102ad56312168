use super::{
    repository::{self, AvatarUpload},
    utils::{self, ProfileForm},
};
use crate::{
    api::{ApiError, UpdateProfileRequest, UserProfile},
    i18n::tr,
    state::{
        auth::{use_api, use_auth, use_session},
        notices::{use_notices, Notices},
        preferences::{use_language, Language},
    },
    utils::mounted::MountGuard,
};
use leptos::*;

#[derive(Clone, Copy)]
pub struct ProfileViewModel {
    pub profile: Resource<(), Option<Result<UserProfile, ApiError>>>,
    /// Signed-in user as last synced, falling back to the fetched profile.
    pub user: Memo<Option<UserProfile>>,
    pub form: ProfileForm,
    pub error: RwSignal<Option<String>>,
    pub preview: RwSignal<Option<String>>,
    pub save_action: Action<UpdateProfileRequest, Result<UserProfile, ApiError>>,
    pub upload_action: Action<AvatarUpload, Result<UserProfile, ApiError>>,
    language: Signal<Language>,
    notices: Notices,
}

pub fn use_profile_view_model() -> ProfileViewModel {
    let api = use_api();
    let session = use_session();
    let (auth, _) = use_auth();
    let notices = use_notices();
    let language = use_language().signal();
    let guard = MountGuard::new();

    let profile = {
        let api = api.clone();
        let session = session.clone();
        let guard = guard.clone();
        create_resource(
            || (),
            move |_| {
                let api = api.clone();
                let session = session.clone();
                let guard = guard.clone();
                async move { guard.run(repository::load_profile(&api, &session)).await }
            },
        )
    };

    let user = create_memo(move |_| {
        auth.get()
            .user
            .or_else(|| profile.get().flatten().and_then(Result::ok))
    });

    let form = ProfileForm::default();
    create_effect(move |_| {
        if let Some(current) = user.get() {
            form.fill(&current);
        }
    });

    let save_action = {
        let api = api.clone();
        let session = session.clone();
        let guard = guard.clone();
        create_action(move |request: &UpdateProfileRequest| {
            let api = api.clone();
            let session = session.clone();
            let guard = guard.clone();
            let request = request.clone();
            let current = user.get_untracked();
            async move {
                let current = current.ok_or_else(|| ApiError::validation("Profile is not loaded"))?;
                guard
                    .run(repository::save_profile(&api, &session, &current, &request))
                    .await
                    .unwrap_or_else(|| Err(ApiError::unknown("Profile view closed")))
            }
        })
    };

    let upload_action = create_action(move |upload: &AvatarUpload| {
        let api = api.clone();
        let session = session.clone();
        let guard = guard.clone();
        let upload = upload.clone();
        let current = user.get_untracked();
        async move {
            let current = current.ok_or_else(|| ApiError::validation("Profile is not loaded"))?;
            guard
                .run(repository::upload_avatar(&api, &session, &current, upload))
                .await
                .unwrap_or_else(|| Err(ApiError::unknown("Profile view closed")))
        }
    });

    let error = create_rw_signal(None::<String>);
    let preview = create_rw_signal(None::<String>);

    create_effect(move |_| {
        if let Some(result) = save_action.value().get() {
            match result {
                Ok(_) => {
                    error.set(None);
                    notices.success(tr("profile.saved", language.get_untracked()));
                }
                Err(err) => {
                    notices.error(err.error.clone());
                    error.set(Some(err.error));
                }
            }
        }
    });

    create_effect(move |_| {
        if let Some(result) = upload_action.value().get() {
            preview.set(None);
            match result {
                Ok(_) => {
                    notices.success(tr("profile.avatar_saved", language.get_untracked()));
                }
                Err(err) => {
                    notices.error(err.error);
                }
            }
        }
    });

    ProfileViewModel {
        profile,
        user,
        form,
        error,
        preview,
        save_action,
        upload_action,
        language,
        notices,
    }
}

impl ProfileViewModel {
    pub fn save(&self) {
        if self.save_action.pending().get_untracked() {
            return;
        }
        let current_avatar = self.user.get_untracked().and_then(|u| u.avatar_url);
        let request = self.form.request(current_avatar);
        if let Err(key) = utils::validate_profile(&request) {
            self.error.set(Some(tr(key, self.language.get_untracked())));
            return;
        }
        self.error.set(None);
        self.save_action.dispatch(request);
    }

    /// Shows the picked image immediately and uploads it.
    pub fn pick_avatar(&self, upload: AvatarUpload) {
        if let Err(key) = utils::validate_avatar(upload.mime.as_deref()) {
            self.notices.error(tr(key, self.language.get_untracked()));
            return;
        }
        if let Some(mime) = upload.mime.as_deref() {
            self.preview.set(Some(utils::data_url(mime, &upload.bytes)));
        }
        self.upload_action.dispatch(upload);
    }
}
