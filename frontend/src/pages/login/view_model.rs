use super::utils::{self, LoginFormState};
use crate::{
    api::{ApiError, LoginRequest},
    i18n::tr,
    state::{
        auth,
        navigation::{use_navigation, NavigationState},
        notices::{use_notices, Notices},
        preferences::{use_language, Language},
    },
};
use leptos::{ev::SubmitEvent, *};

#[derive(Clone, Copy)]
pub struct LoginViewModel {
    pub form: LoginFormState,
    pub error: RwSignal<Option<String>>,
    pub login_action: Action<LoginRequest, Result<(), ApiError>>,
}

pub fn use_login_view_model() -> LoginViewModel {
    let form = LoginFormState::default();
    let error = create_rw_signal(None::<String>);
    let login_action = auth::use_login_action();
    let notices = use_notices();
    let navigation = use_navigation();
    let language = use_language().signal();

    let vm = LoginViewModel {
        form,
        error,
        login_action,
    };

    create_effect(move |_| {
        if let Some(result) = login_action.value().get() {
            vm.settle(result, &navigation, notices, language.get_untracked());
        }
    });

    vm
}

impl LoginViewModel {
    /// Applies a finished sign-in: on success the password is cleared and the
    /// current history entry is replaced with the return target.
    fn settle(
        &self,
        result: Result<(), ApiError>,
        navigation: &NavigationState,
        notices: Notices,
        language: Language,
    ) {
        match result {
            Ok(()) => {
                self.error.set(None);
                self.form.password.set(String::new());
                notices.success(tr("login.success", language));
                let target = utils::return_target(&navigation.route_untracked().search_params);
                log::info!("signed in, continuing to {}", target);
                navigation.replace(&target);
            }
            Err(err) => {
                notices.error(err.error.clone());
                self.error.set(Some(err.error));
            }
        }
    }

    pub fn pending(&self) -> ReadSignal<bool> {
        self.login_action.pending()
    }

    pub fn submit(&self) -> impl Fn(SubmitEvent) + 'static {
        let vm = *self;
        let language = use_language().signal();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            if vm.login_action.pending().get_untracked() {
                return;
            }
            let username = vm.form.username.get_untracked();
            let password = vm.form.password.get_untracked();
            if let Err(key) = utils::validate_credentials(&username, &password) {
                vm.error.set(Some(tr(key, language.get_untracked())));
                return;
            }
            vm.error.set(None);
            vm.login_action.dispatch(LoginRequest {
                username: username.trim().to_string(),
                password,
            });
        }
    }
}
