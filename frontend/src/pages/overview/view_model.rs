use super::repository;
use crate::{
    api::{ApiError, DashboardStats},
    state::auth::use_api,
    utils::mounted::MountGuard,
};
use leptos::*;

/// Counters shared by the overview and the dashboard. `None` inside the
/// resource means the view unmounted before the response arrived.
#[derive(Clone, Copy)]
pub struct StatsViewModel {
    pub stats: Resource<u32, Option<Result<DashboardStats, ApiError>>>,
    reload: RwSignal<u32>,
}

pub fn use_stats_view_model() -> StatsViewModel {
    let api = use_api();
    let guard = MountGuard::new();
    let reload = create_rw_signal(0u32);

    let stats = create_resource(
        move || reload.get(),
        move |_| {
            let api = api.clone();
            let guard = guard.clone();
            async move { guard.run(repository::fetch_stats(&api)).await }
        },
    );

    StatsViewModel { stats, reload }
}

impl StatsViewModel {
    pub fn retry(&self) {
        self.reload.update(|n| *n += 1);
    }

    pub fn loaded(&self) -> Option<Result<DashboardStats, ApiError>> {
        self.stats.get().flatten()
    }
}
