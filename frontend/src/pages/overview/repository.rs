use crate::{
    api::{ApiClient, ApiError, DashboardStats},
    components::cards::CardTone,
};

pub async fn fetch_stats(api: &ApiClient) -> Result<DashboardStats, ApiError> {
    api.stats().await
}

/// One labelled counter: i18n key, value and accent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatItem {
    pub label_key: &'static str,
    pub value: i64,
    pub tone: CardTone,
}

impl StatItem {
    fn new(label_key: &'static str, value: i64, tone: CardTone) -> Self {
        Self {
            label_key,
            value,
            tone,
        }
    }
}

/// Headline counters on the overview.
pub fn summary_items(stats: &DashboardStats) -> Vec<StatItem> {
    vec![
        StatItem::new("stats.users", stats.users, CardTone::Info),
        StatItem::new("stats.teams", stats.teams, CardTone::Success),
        StatItem::new("stats.available_teams", stats.available_teams, CardTone::Neutral),
        StatItem::new("stats.bidding_projects", stats.bidding_projects, CardTone::Warning),
        StatItem::new("stats.projects", stats.projects, CardTone::Neutral),
    ]
}

/// Every counter the backend reports, for the dashboard.
pub fn detailed_items(stats: &DashboardStats) -> Vec<StatItem> {
    let mut items = summary_items(stats);
    items.extend([
        StatItem::new("stats.units", stats.units, CardTone::Neutral),
        StatItem::new("stats.stores", stats.stores, CardTone::Neutral),
        StatItem::new("stats.companies", stats.companies, CardTone::Neutral),
    ]);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> DashboardStats {
        DashboardStats {
            users: 12,
            teams: 3,
            available_teams: 1,
            bidding_projects: 4,
            units: 6,
            stores: 7,
            companies: 2,
            projects: 5,
        }
    }

    #[test]
    fn summary_lists_headline_counters_in_order() {
        let keys: Vec<_> = summary_items(&stats()).iter().map(|i| i.label_key).collect();
        assert_eq!(
            keys,
            [
                "stats.users",
                "stats.teams",
                "stats.available_teams",
                "stats.bidding_projects",
                "stats.projects"
            ]
        );
        assert_eq!(summary_items(&stats())[0].value, 12);
    }

    #[test]
    fn detailed_items_cover_every_counter() {
        let items = detailed_items(&stats());
        assert_eq!(items.len(), 8);
        let total: i64 = items.iter().map(|i| i.value).sum();
        assert_eq!(total, 40);
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::api::test_support::mock::*;
    use serde_json::json;

    #[tokio::test]
    async fn fetch_stats_reads_wrapped_counters() {
        let transport = RecordingTransport::new();
        transport.respond_json(
            GET,
            "http://backend.test/api/stats",
            200,
            json!({ "stats": { "users": 9, "teams": 2 } }),
        );
        let api = ApiClient::new_with_base_url("http://backend.test").with_transport(transport);
        let stats = fetch_stats(&api).await.unwrap();
        assert_eq!(stats.users, 9);
        assert_eq!(stats.teams, 2);
    }
}
