use super::{
    repository::{self, Directory, TeamDraft},
    utils,
};
use crate::{
    api::{ApiError, Employee, FlexibleId, Team, TeamPayload},
    i18n::tr,
    state::{
        auth::use_api,
        notices::{use_notices, Notices},
        preferences::{use_language, Language},
    },
    utils::mounted::MountGuard,
};
use leptos::*;

/// Fields of the create/edit team dialog.
#[derive(Clone, Copy)]
pub struct TeamDialog {
    pub open: RwSignal<bool>,
    pub editing: RwSignal<Option<Team>>,
    pub name: RwSignal<String>,
    pub description: RwSignal<String>,
    pub selected: RwSignal<Vec<FlexibleId>>,
    pub search: RwSignal<String>,
    pub error: RwSignal<Option<String>>,
}

impl TeamDialog {
    fn new() -> Self {
        Self {
            open: create_rw_signal(false),
            editing: create_rw_signal(None),
            name: create_rw_signal(String::new()),
            description: create_rw_signal(String::new()),
            selected: create_rw_signal(Vec::new()),
            search: create_rw_signal(String::new()),
            error: create_rw_signal(None),
        }
    }

    /// Opens the dialog blank, or seeded from `team` with its members ticked.
    pub fn open_for(&self, team: Option<Team>) {
        self.name
            .set(team.as_ref().map(|t| t.name.clone()).unwrap_or_default());
        self.description.set(
            team.as_ref()
                .and_then(|t| t.description.clone())
                .unwrap_or_default(),
        );
        self.selected.set(
            team.as_ref()
                .map(|t| t.members.iter().map(|m| m.emp_no.clone()).collect())
                .unwrap_or_default(),
        );
        self.search.set(String::new());
        self.error.set(None);
        self.editing.set(team);
        self.open.set(true);
    }

    pub fn close(&self) {
        self.open.set(false);
        self.editing.set(None);
        self.error.set(None);
    }

    pub fn toggle(&self, emp_no: &FlexibleId) {
        self.selected
            .update(|selected| utils::toggle_selection(selected, emp_no));
    }

    pub fn is_selected(&self, emp_no: &FlexibleId) -> bool {
        self.selected.with(|selected| selected.contains(emp_no))
    }

    fn draft(&self) -> Result<TeamDraft, &'static str> {
        let name = self.name.get_untracked();
        utils::validate_team_name(&name)?;
        let editing = self.editing.get_untracked();
        let current = editing
            .as_ref()
            .map(|t| t.members.clone())
            .unwrap_or_default();
        let (add, remove) = utils::membership_changes(&current, &self.selected.get_untracked());
        Ok(TeamDraft {
            team_id: editing.map(|t| t.id),
            payload: TeamPayload {
                name: name.trim().to_string(),
                description: self.description.get_untracked().trim().to_string(),
            },
            add,
            remove,
        })
    }
}

#[derive(Clone, Copy)]
pub struct EmployeesViewModel {
    pub directory: Resource<u32, Option<Result<Directory, ApiError>>>,
    pub search: RwSignal<String>,
    pub dialog: TeamDialog,
    /// Team awaiting delete confirmation.
    pub pending_delete: RwSignal<Option<Team>>,
    /// Keys of member removals in flight, see [`utils::member_key`].
    pub removing: RwSignal<Vec<String>>,
    pub save_action: Action<TeamDraft, Result<bool, ApiError>>,
    pub delete_action: Action<i64, Result<(), ApiError>>,
    pub remove_action: Action<(i64, FlexibleId), (String, Result<(), ApiError>)>,
    reload: RwSignal<u32>,
    language: Signal<Language>,
}

fn closed() -> ApiError {
    ApiError::unknown("Employees view closed")
}

pub fn use_employees_view_model() -> EmployeesViewModel {
    let api = use_api();
    let notices = use_notices();
    let language = use_language().signal();
    let guard = MountGuard::new();
    let reload = create_rw_signal(0u32);

    let directory = {
        let api = api.clone();
        let guard = guard.clone();
        create_resource(
            move || reload.get(),
            move |_| {
                let api = api.clone();
                let guard = guard.clone();
                async move { guard.run(repository::load_directory(&api)).await }
            },
        )
    };

    let save_action = {
        let api = api.clone();
        let guard = guard.clone();
        create_action(move |draft: &TeamDraft| {
            let api = api.clone();
            let guard = guard.clone();
            let draft = draft.clone();
            async move {
                guard
                    .run(repository::save_team(&api, draft))
                    .await
                    .unwrap_or_else(|| Err(closed()))
            }
        })
    };

    let delete_action = {
        let api = api.clone();
        let guard = guard.clone();
        create_action(move |team_id: &i64| {
            let api = api.clone();
            let guard = guard.clone();
            let team_id = *team_id;
            async move {
                guard
                    .run(api.delete_team(team_id))
                    .await
                    .unwrap_or_else(|| Err(closed()))
            }
        })
    };

    let remove_action = create_action(move |(team_id, emp_no): &(i64, FlexibleId)| {
        let api = api.clone();
        let guard = guard.clone();
        let team_id = *team_id;
        let emp_no = emp_no.clone();
        async move {
            let key = utils::member_key(team_id, &emp_no);
            let result = guard
                .run(api.remove_team_member(team_id, &emp_no))
                .await
                .unwrap_or_else(|| Err(closed()));
            (key, result)
        }
    });

    let vm = EmployeesViewModel {
        directory,
        search: create_rw_signal(String::new()),
        dialog: TeamDialog::new(),
        pending_delete: create_rw_signal(None),
        removing: create_rw_signal(Vec::new()),
        save_action,
        delete_action,
        remove_action,
        reload,
        language,
    };

    create_effect(move |_| {
        if let Some(result) = save_action.value().get() {
            match result {
                Ok(created) => {
                    vm.dialog.close();
                    let key = if created {
                        "employees.team_created"
                    } else {
                        "employees.team_updated"
                    };
                    notices.success(tr(key, language.get_untracked()));
                    vm.retry();
                }
                Err(err) => {
                    notices.error(err.error.clone());
                    vm.dialog.error.set(Some(err.error));
                }
            }
        }
    });

    create_effect(move |_| {
        if let Some(result) = delete_action.value().get() {
            vm.pending_delete.set(None);
            report(notices, language, result, "employees.team_deleted");
            vm.retry();
        }
    });

    create_effect(move |_| {
        if let Some((key, result)) = remove_action.value().get() {
            vm.removing.update(|keys| keys.retain(|k| k != &key));
            report(notices, language, result, "employees.member_removed");
            vm.retry();
        }
    });

    vm
}

fn report(
    notices: Notices,
    language: Signal<Language>,
    result: Result<(), ApiError>,
    success_key: &'static str,
) {
    match result {
        Ok(()) => {
            notices.success(tr(success_key, language.get_untracked()));
        }
        Err(err) => {
            notices.error(err.error);
        }
    }
}

impl EmployeesViewModel {
    pub fn retry(&self) {
        self.reload.update(|n| *n += 1);
    }

    pub fn loaded(&self) -> Option<Result<Directory, ApiError>> {
        self.directory.get().flatten()
    }

    fn available(&self) -> Vec<Employee> {
        self.loaded()
            .and_then(Result::ok)
            .map(|directory| directory.available)
            .unwrap_or_default()
    }

    /// Employees selectable in the dialog, matching the dialog search.
    pub fn candidates(&self) -> Vec<Employee> {
        let editing = self.dialog.editing.get();
        let candidates = utils::dialog_candidates(editing.as_ref(), &self.available());
        utils::filter_employees(&candidates, &self.dialog.search.get())
    }

    pub fn open_create(&self) {
        self.dialog.open_for(None);
    }

    pub fn open_edit(&self, team: Team) {
        self.dialog.open_for(Some(team));
    }

    pub fn submit(&self) {
        if self.save_action.pending().get_untracked() {
            return;
        }
        match self.dialog.draft() {
            Ok(draft) => {
                self.dialog.error.set(None);
                self.save_action.dispatch(draft);
            }
            Err(key) => self
                .dialog
                .error
                .set(Some(tr(key, self.language.get_untracked()))),
        }
    }

    pub fn request_delete(&self, team: Team) {
        self.pending_delete.set(Some(team));
    }

    pub fn cancel_delete(&self) {
        self.pending_delete.set(None);
    }

    pub fn confirm_delete(&self) {
        if self.delete_action.pending().get_untracked() {
            return;
        }
        if let Some(team) = self.pending_delete.get_untracked() {
            self.delete_action.dispatch(team.id);
        }
    }

    pub fn remove_member(&self, team_id: i64, emp_no: FlexibleId) {
        let key = utils::member_key(team_id, &emp_no);
        if self.removing.with_untracked(|keys| keys.contains(&key)) {
            return;
        }
        self.removing.update(|keys| keys.push(key));
        self.remove_action.dispatch((team_id, emp_no));
    }

    pub fn is_removing(&self, team_id: i64, emp_no: &FlexibleId) -> bool {
        let key = utils::member_key(team_id, emp_no);
        self.removing.with(|keys| keys.contains(&key))
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::{helpers::test_context, ssr::with_runtime};

    fn member(no: i64) -> Employee {
        serde_json::from_value(serde_json::json!({ "empNo": no, "name_ar": "m" })).unwrap()
    }

    fn view_model() -> EmployeesViewModel {
        test_context().0.provide();
        leptos_reactive::suppress_resource_load(true);
        let vm = use_employees_view_model();
        leptos_reactive::suppress_resource_load(false);
        vm
    }

    #[test]
    fn editing_seeds_the_dialog() {
        with_runtime(|| {
            let vm = view_model();
            vm.open_edit(Team {
                id: 3,
                name: "Ops".into(),
                description: Some("Night".into()),
                members: vec![member(1), member(2)],
            });
            assert!(vm.dialog.open.get_untracked());
            assert_eq!(vm.dialog.name.get_untracked(), "Ops");
            assert_eq!(vm.dialog.description.get_untracked(), "Night");
            assert!(vm.dialog.is_selected(&FlexibleId::Number(2)));

            vm.dialog.toggle(&FlexibleId::Number(2));
            vm.dialog.toggle(&FlexibleId::Number(9));
            let draft = vm.dialog.draft().unwrap();
            assert_eq!(draft.team_id, Some(3));
            assert_eq!(draft.add, vec![FlexibleId::Number(9)]);
            assert_eq!(draft.remove, vec![FlexibleId::Number(2)]);
        });
    }

    #[test]
    fn creating_starts_blank() {
        with_runtime(|| {
            let vm = view_model();
            vm.dialog.name.set("stale".into());
            vm.open_create();
            assert_eq!(vm.dialog.name.get_untracked(), "");
            assert!(vm.dialog.editing.get_untracked().is_none());
            assert!(vm.dialog.selected.get_untracked().is_empty());
        });
    }

    #[test]
    fn blank_name_is_not_submitted() {
        with_runtime(|| {
            let vm = view_model();
            vm.open_create();
            vm.dialog.name.set("   ".into());
            vm.submit();
            assert_eq!(
                vm.dialog.error.get_untracked().as_deref(),
                Some("Team name is required")
            );
            assert!(vm.save_action.value().get_untracked().is_none());
        });
    }

    #[test]
    fn cancelling_delete_forgets_the_team() {
        with_runtime(|| {
            let vm = view_model();
            vm.request_delete(Team {
                id: 1,
                name: "Ops".into(),
                description: None,
                members: Vec::new(),
            });
            assert!(vm.pending_delete.get_untracked().is_some());
            vm.cancel_delete();
            assert!(vm.pending_delete.get_untracked().is_none());
        });
    }

    #[test]
    fn nothing_is_available_before_loading() {
        with_runtime(|| {
            let vm = view_model();
            assert!(vm.loaded().is_none());
            assert!(vm.candidates().is_empty());
            assert!(!vm.is_removing(1, &FlexibleId::Number(1)));
        });
    }

    #[test]
    fn dialog_lists_team_members_then_loaded_employees() {
        with_runtime(|| {
            let vm = view_model();
            let team = Team {
                id: 4,
                name: "Ops".into(),
                description: None,
                members: vec![member(2)],
            };
            vm.directory.set(Some(Ok(Directory {
                teams: vec![team.clone()],
                available: vec![member(1), member(2), member(3)],
            })));

            vm.open_create();
            let ids: Vec<FlexibleId> = vm.candidates().into_iter().map(|e| e.emp_no).collect();
            assert_eq!(ids.len(), 3);

            vm.open_edit(team);
            let ids: Vec<FlexibleId> = vm.candidates().into_iter().map(|e| e.emp_no).collect();
            assert_eq!(
                ids,
                vec![FlexibleId::Number(2), FlexibleId::Number(1), FlexibleId::Number(3)]
            );
        });
    }
}
