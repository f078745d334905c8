#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ethiofb::clients::{FootballProvider, UpstreamError};
use ethiofb::config::Config;
use ethiofb::db::{CacheStore, MemoryStore, Store, StoreError, TtlPolicy};
use ethiofb::domain::{LeagueId, TeamId};
use ethiofb::models::{
    Fixture, FixtureQuery, LiveFixture, StandingRow, StandingsResponse, TeamComparison,
    TeamSummary,
};
use ethiofb::state::SharedState;

pub const ETH: LeagueId = LeagueId::new(363);
pub const SEASON: i32 = 2022;

fn unavailable() -> UpstreamError {
    UpstreamError::Status {
        status: 503,
        body: "stub has no data".to_string(),
    }
}

/// Provider stub that serves canned data and counts every call.
/// Anything not configured fails with a 503.
#[derive(Default)]
pub struct StubProvider {
    fixtures: Option<Vec<Fixture>>,
    live: Option<Vec<LiveFixture>>,
    standings: Option<StandingsResponse>,
    catalogs: HashMap<(i32, i32), Vec<TeamSummary>>,
    statistics: HashMap<i32, TeamComparison>,

    pub fixture_calls: AtomicUsize,
    pub live_calls: AtomicUsize,
    pub standings_calls: AtomicUsize,
    pub statistics_requests: Mutex<Vec<TeamId>>,
    pub team_requests: Mutex<Vec<(i32, i32)>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fixtures(mut self, fixtures: Vec<Fixture>) -> Self {
        self.fixtures = Some(fixtures);
        self
    }

    pub fn with_live(mut self, live: Vec<LiveFixture>) -> Self {
        self.live = Some(live);
        self
    }

    pub fn with_standings(mut self, standings: StandingsResponse) -> Self {
        self.standings = Some(standings);
        self
    }

    pub fn with_catalog(mut self, league: i32, season: i32, teams: Vec<TeamSummary>) -> Self {
        self.catalogs.insert((league, season), teams);
        self
    }

    pub fn with_statistics(mut self, stats: TeamComparison) -> Self {
        self.statistics.insert(stats.team_id.value(), stats);
        self
    }

    pub fn fixture_calls(&self) -> usize {
        self.fixture_calls.load(Ordering::SeqCst)
    }

    pub fn standings_calls(&self) -> usize {
        self.standings_calls.load(Ordering::SeqCst)
    }

    pub fn statistics_calls(&self) -> usize {
        self.statistics_requests.lock().unwrap().len()
    }

    pub fn team_requests(&self) -> Vec<(i32, i32)> {
        self.team_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl FootballProvider for StubProvider {
    async fn fetch_fixtures(&self, _query: &FixtureQuery) -> Result<Vec<Fixture>, UpstreamError> {
        self.fixture_calls.fetch_add(1, Ordering::SeqCst);
        self.fixtures.clone().ok_or_else(unavailable)
    }

    async fn fetch_live_fixtures(
        &self,
        _league: LeagueId,
    ) -> Result<Vec<LiveFixture>, UpstreamError> {
        self.live_calls.fetch_add(1, Ordering::SeqCst);
        self.live.clone().ok_or_else(unavailable)
    }

    async fn fetch_teams(
        &self,
        league: LeagueId,
        season: i32,
    ) -> Result<Vec<TeamSummary>, UpstreamError> {
        self.team_requests
            .lock()
            .unwrap()
            .push((league.value(), season));
        self.catalogs
            .get(&(league.value(), season))
            .cloned()
            .ok_or_else(unavailable)
    }

    async fn fetch_statistics(
        &self,
        _league: LeagueId,
        _season: i32,
        team: TeamId,
    ) -> Result<TeamComparison, UpstreamError> {
        self.statistics_requests.lock().unwrap().push(team);
        self.statistics
            .get(&team.value())
            .cloned()
            .ok_or_else(unavailable)
    }

    async fn fetch_standings(
        &self,
        _league: LeagueId,
        _season: i32,
    ) -> Result<StandingsResponse, UpstreamError> {
        self.standings_calls.fetch_add(1, Ordering::SeqCst);
        self.standings.clone().ok_or_else(unavailable)
    }
}

/// [`MemoryStore`] wrapper that counts reads and writes and can be told to
/// fail every write.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    reads: AtomicUsize,
    written: Mutex<Vec<String>>,
    fail_writes: AtomicBool,
    hset_failures: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_writes() -> Self {
        let store = Self::default();
        store.fail_writes.store(true, Ordering::SeqCst);
        store
    }

    /// Fails the next `count` multi-field hash writes with a timeout. Every
    /// other operation succeeds.
    pub fn failing_hset_all(count: usize) -> Self {
        let store = Self::default();
        store.hset_failures.store(count, Ordering::SeqCst);
        store
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.written.lock().unwrap().len()
    }

    pub fn written_keys(&self) -> Vec<String> {
        self.written.lock().unwrap().clone()
    }

    pub async fn keys(&self) -> Vec<String> {
        self.inner.keys().await
    }

    fn record_write(&self, key: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("write refused".to_string()));
        }
        self.written.lock().unwrap().push(key.to_string());
        Ok(())
    }

    fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CacheStore for CountingStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.record_read();
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<(), StoreError> {
        self.record_write(key)?;
        self.inner.set(key, value, ttl).await
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        self.record_read();
        self.inner.exists(key).await
    }

    async fn hget_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        self.record_read();
        self.inner.hget_all(key).await
    }

    async fn hset_all(
        &self,
        key: &str,
        fields: Vec<(String, String)>,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        if self
            .hset_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StoreError::Timeout("hset"));
        }
        self.record_write(key)?;
        self.inner.hset_all(key, fields, ttl).await
    }

    async fn hset_nx(&self, key: &str, field: &str, value: &str) -> Result<bool, StoreError> {
        self.record_write(key)?;
        self.inner.hset_nx(key, field, value).await
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        self.inner.del(key).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }
}

pub struct Harness {
    pub state: SharedState,
    pub provider: Arc<StubProvider>,
    pub store: Arc<CountingStore>,
}

pub fn spawn_state(provider: StubProvider) -> Harness {
    spawn_state_with(provider, CountingStore::new())
}

pub fn spawn_state_with(provider: StubProvider, store: CountingStore) -> Harness {
    let config = Config::default();
    let provider = Arc::new(provider);
    let store = Arc::new(store);

    let state = SharedState::new(
        config.clone(),
        Store::new(store.clone(), TtlPolicy::from(&config.cache)),
        provider.clone(),
    )
    .expect("Failed to wire services");

    Harness {
        state,
        provider,
        store,
    }
}

pub fn fixture(kickoff: &str, home: &str, away: &str) -> Fixture {
    Fixture {
        id: Fixture::identity(None, kickoff, home, away),
        date_utc: kickoff.to_string(),
        home_name: home.to_string(),
        away_name: away.to_string(),
        home_logo: String::new(),
        away_logo: String::new(),
        status: "scheduled".to_string(),
        last_updated: "2022-08-01T00:00:00Z".to_string(),
    }
}

pub fn summary(id: i32, name: &str) -> TeamSummary {
    TeamSummary {
        id: TeamId::new(id),
        name: name.to_string(),
        code: None,
        country: Some("Ethiopia".to_string()),
        founded: Some(1935),
        logo: format!("https://media.example/teams/{id}.png"),
    }
}

pub fn stats(id: i32, name: &str) -> TeamComparison {
    TeamComparison {
        team_id: TeamId::new(id),
        team_name: name.to_string(),
        league_id: ETH,
        season: SEASON,
        form: "WWDL".to_string(),
        played: 30,
        wins: 18,
        draws: 7,
        losses: 5,
        goals_for: 49,
        goals_against: 22,
        clean_sheets: 13,
        failed_to_score: 4,
    }
}

pub fn standings() -> StandingsResponse {
    let row = |rank: i32, id: i32, name: &str, points: i32| StandingRow {
        rank,
        team_id: TeamId::new(id),
        team_name: name.to_string(),
        crest_url: String::new(),
        points,
        played: 30,
        won: 0,
        drawn: 0,
        lost: 0,
        goals_for: 0,
        goals_against: 0,
        goal_diff: 0,
        form: None,
    };

    StandingsResponse {
        league_id: ETH,
        league_name: "Ethiopian Premier League".to_string(),
        season: SEASON,
        table: vec![
            row(2, 2462, "Ethiopia Bunna", 55),
            row(1, 2461, "Saint George", 61),
            row(3, 2470, "Fasil Kenema", 50),
        ],
    }
}
