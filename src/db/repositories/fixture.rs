use std::sync::Arc;

use super::{RepoError, read_json, write_json};
use crate::db::{CacheStore, TtlPolicy, keys};
use crate::models::{Fixture, FixtureQuery, RoundQuery, RoundWindow};

pub struct FixtureRepository {
    store: Arc<dyn CacheStore>,
    ttl: TtlPolicy,
}

impl FixtureRepository {
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>, ttl: TtlPolicy) -> Self {
        Self { store, ttl }
    }

    pub async fn get(&self, query: &FixtureQuery) -> Result<Vec<Fixture>, RepoError> {
        read_json(self.store.as_ref(), &keys::fixtures(query)).await
    }

    pub async fn save(&self, query: &FixtureQuery, fixtures: &[Fixture]) -> Result<(), RepoError> {
        write_json(
            self.store.as_ref(),
            &keys::fixtures(query),
            fixtures,
            Some(self.ttl.fixtures),
        )
        .await
    }

    pub async fn get_by_round(&self, query: &RoundQuery) -> Result<Vec<Fixture>, RepoError> {
        read_json(self.store.as_ref(), &keys::round_fixtures(query)).await
    }

    pub async fn save_by_round(
        &self,
        query: &RoundQuery,
        fixtures: &[Fixture],
    ) -> Result<(), RepoError> {
        write_json(
            self.store.as_ref(),
            &keys::round_fixtures(query),
            fixtures,
            Some(self.ttl.fixtures),
        )
        .await
    }

    pub async fn get_round_window(&self, query: &RoundQuery) -> Result<RoundWindow, RepoError> {
        read_json(self.store.as_ref(), &keys::round_window(query)).await
    }

    /// Window metadata never expires.
    pub async fn save_round_window(
        &self,
        query: &RoundQuery,
        window: RoundWindow,
    ) -> Result<(), RepoError> {
        write_json(self.store.as_ref(), &keys::round_window(query), &window, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use chrono::NaiveDate;

    fn fixture() -> Fixture {
        Fixture {
            id: "2022-08-13T15:00:00+00:00:Ethiopia Bunna:Saint George".to_string(),
            date_utc: "2022-08-13T15:00:00+00:00".to_string(),
            home_name: "Ethiopia Bunna".to_string(),
            away_name: "Saint George".to_string(),
            home_logo: String::new(),
            away_logo: String::new(),
            status: "scheduled".to_string(),
            last_updated: "2022-08-01T00:00:00+00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn fixture_set_round_trip() {
        let repo = FixtureRepository::new(Arc::new(MemoryStore::new()), TtlPolicy::default());
        let query = FixtureQuery::for_league("ETH").with_season(2022);

        assert!(repo.get(&query).await.unwrap_err().is_not_found());
        repo.save(&query, &[fixture()]).await.unwrap();
        assert_eq!(repo.get(&query).await.unwrap(), vec![fixture()]);
    }

    #[tokio::test]
    async fn malformed_payload_is_internal() {
        let store = Arc::new(MemoryStore::new());
        let repo = FixtureRepository::new(store.clone(), TtlPolicy::default());
        let query = FixtureQuery::for_league("ETH");
        store
            .set(&keys::fixtures(&query), b"{not json".to_vec(), None)
            .await
            .unwrap();

        assert!(matches!(
            repo.get(&query).await.unwrap_err(),
            RepoError::Internal(_)
        ));
    }

    #[tokio::test]
    async fn round_window_round_trip() {
        let repo = FixtureRepository::new(Arc::new(MemoryStore::new()), TtlPolicy::default());
        let query = RoundQuery {
            league: "ETH".to_string(),
            season: 2022,
            round: "3".to_string(),
            window: None,
        };
        let window = RoundWindow {
            from: NaiveDate::from_ymd_opt(2022, 9, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2022, 9, 7).unwrap(),
        };

        repo.save_round_window(&query, window).await.unwrap();
        assert_eq!(repo.get_round_window(&query).await.unwrap(), window);
    }
}
