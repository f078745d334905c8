use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{FootballProvider, UpstreamError};
use crate::config::{LeagueTable, UpstreamConfig};
use crate::domain::{LeagueId, TeamId};
use crate::models::fixture::STATUS_SCHEDULED;
use crate::models::{
    Fixture, FixtureQuery, LiveFixture, StandingRow, StandingsResponse, TeamComparison,
    TeamSummary,
};

const HOST_HEADER: &str = "x-rapidapi-host";
const KEY_HEADER: &str = "x-rapidapi-key";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    errors: serde_json::Value,
    response: Option<T>,
}

#[derive(Debug, Deserialize)]
struct FixtureItem {
    fixture: FixtureInfo,
    teams: HomeAway<TeamRef>,
    #[serde(default)]
    goals: Option<HomeAway<Option<i32>>>,
}

#[derive(Debug, Deserialize)]
struct FixtureInfo {
    #[serde(default)]
    id: Option<i64>,
    date: String,
    #[serde(default)]
    status: Option<FixtureStatus>,
}

#[derive(Debug, Deserialize)]
struct FixtureStatus {
    #[serde(default)]
    elapsed: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct HomeAway<T> {
    home: T,
    away: T,
}

#[derive(Debug, Deserialize)]
struct TeamRef {
    #[serde(default)]
    id: Option<i32>,
    name: String,
    #[serde(default)]
    logo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TeamItem {
    team: TeamInfo,
}

#[derive(Debug, Deserialize)]
struct TeamInfo {
    id: i32,
    name: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    founded: Option<i32>,
    #[serde(default)]
    logo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StandingsItem {
    league: StandingsLeague,
}

#[derive(Debug, Deserialize)]
struct StandingsLeague {
    id: i32,
    name: String,
    season: i32,
    #[serde(default)]
    standings: Vec<Vec<StandingEntry>>,
}

#[derive(Debug, Deserialize)]
struct StandingEntry {
    rank: i32,
    team: TeamRef,
    points: i32,
    #[serde(rename = "goalsDiff")]
    goals_diff: i32,
    #[serde(default)]
    form: Option<String>,
    all: StandingRecord,
}

#[derive(Debug, Deserialize)]
struct StandingRecord {
    played: i32,
    win: i32,
    draw: i32,
    lose: i32,
    goals: GoalPair,
}

#[derive(Debug, Deserialize)]
struct GoalPair {
    #[serde(rename = "for")]
    scored: Option<i32>,
    against: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct StatisticsBody {
    team: TeamRef,
    #[serde(default)]
    form: Option<String>,
    fixtures: StatFixtures,
    goals: StatGoals,
    #[serde(default)]
    clean_sheet: Option<Total>,
    #[serde(default)]
    failed_to_score: Option<Total>,
}

#[derive(Debug, Deserialize)]
struct StatFixtures {
    played: Total,
    wins: Total,
    draws: Total,
    loses: Total,
}

#[derive(Debug, Deserialize)]
struct StatGoals {
    #[serde(rename = "for")]
    scored: GoalTotals,
    against: GoalTotals,
}

#[derive(Debug, Deserialize)]
struct GoalTotals {
    total: Total,
}

#[derive(Debug, Deserialize, Default)]
struct Total {
    #[serde(default)]
    total: Option<i32>,
}

impl Total {
    fn value(&self) -> i32 {
        self.total.unwrap_or(0)
    }
}

/// Client for the API-Football v3 REST API.
#[derive(Clone)]
pub struct ApiFootballClient {
    client: Client,
    base_url: String,
    host: String,
    api_key: Option<String>,
    leagues: LeagueTable,
    max_retries: u32,
    retry_base: Duration,
    retry_max: Duration,
}

impl ApiFootballClient {
    /// Builds a client with the configured request timeout.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &UpstreamConfig, leagues: LeagueTable) -> anyhow::Result<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| anyhow::anyhow!("Invalid upstream base URL: {e}"))?;
        let host = base.host_str().unwrap_or_default().to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("EthioFB/1.0")
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            host,
            api_key: config.resolved_api_key(),
            leagues,
            max_retries: config.max_retries,
            retry_base: Duration::from_millis(config.retry_base_delay_ms),
            retry_max: Duration::from_millis(config.retry_max_delay_ms),
        })
    }

    fn endpoint_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, UpstreamError> {
        let mut url = Url::parse(&format!("{}{path}", self.base_url))
            .map_err(|e| UpstreamError::Transport(format!("invalid url: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &Url) -> Result<T, UpstreamError> {
        let api_key = self.api_key.as_deref().ok_or(UpstreamError::MissingApiKey)?;

        let response = self
            .client
            .get(url.clone())
            .header(KEY_HEADER, api_key)
            .header(HOST_HEADER, &self.host)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|e| UpstreamError::Decode(e.to_string()))?;

        if has_errors(&envelope.errors) {
            return Err(UpstreamError::Api(envelope.errors.to_string()));
        }

        envelope
            .response
            .ok_or_else(|| UpstreamError::Empty(url.path().to_string()))
    }

    /// GET with bounded retries and capped exponential backoff.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        params: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let url = self.endpoint_url(endpoint, params)?;
        let mut attempt = 0;

        loop {
            debug!(%url, attempt, "Calling provider");

            match self.get_once(&url).await {
                Ok(value) => {
                    metrics::counter!("upstream_requests_total", "endpoint" => endpoint, "outcome" => "ok")
                        .increment(1);
                    return Ok(value);
                }
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let delay = backoff_delay(self.retry_base, self.retry_max, attempt);
                    warn!(
                        "Provider call {} failed (attempt {}/{}): {}. Retrying in {:?}",
                        endpoint,
                        attempt + 1,
                        self.max_retries + 1,
                        e,
                        delay
                    );
                    metrics::counter!("upstream_requests_total", "endpoint" => endpoint, "outcome" => "retry")
                        .increment(1);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    metrics::counter!("upstream_requests_total", "endpoint" => endpoint, "outcome" => "error")
                        .increment(1);
                    return Err(e);
                }
            }
        }
    }

    fn league_name(&self, league: LeagueId) -> String {
        self.leagues
            .name_of(league)
            .map_or_else(|| format!("League {league}"), str::to_string)
    }
}

fn has_errors(errors: &serde_json::Value) -> bool {
    match errors {
        serde_json::Value::Null => false,
        serde_json::Value::Array(items) => !items.is_empty(),
        serde_json::Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

/// `base * 2^attempt`, capped at `max`.
#[must_use]
pub fn backoff_delay(base: Duration, max: Duration, attempt: u32) -> Duration {
    let factor = 1_u32.checked_shl(attempt).unwrap_or(u32::MAX);
    base.saturating_mul(factor).min(max)
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn map_fixture(item: &FixtureItem, fetched_at: &str) -> Fixture {
    let home = &item.teams.home;
    let away = &item.teams.away;

    Fixture {
        id: Fixture::identity(item.fixture.id, &item.fixture.date, &home.name, &away.name),
        date_utc: item.fixture.date.clone(),
        home_name: home.name.clone(),
        away_name: away.name.clone(),
        home_logo: home.logo.clone().unwrap_or_default(),
        away_logo: away.logo.clone().unwrap_or_default(),
        status: STATUS_SCHEDULED.to_string(),
        last_updated: fetched_at.to_string(),
    }
}

fn map_fixtures(items: &[FixtureItem], fetched_at: &str) -> Vec<Fixture> {
    items
        .iter()
        .map(|item| map_fixture(item, fetched_at))
        .collect()
}

fn map_live(items: &[FixtureItem], fetched_at: &str) -> Vec<LiveFixture> {
    items
        .iter()
        .map(|item| LiveFixture {
            fixture: map_fixture(item, fetched_at),
            home_goals: item.goals.as_ref().and_then(|g| g.home),
            away_goals: item.goals.as_ref().and_then(|g| g.away),
            elapsed: item.fixture.status.as_ref().and_then(|s| s.elapsed),
        })
        .collect()
}

fn map_teams(items: Vec<TeamItem>) -> Vec<TeamSummary> {
    items
        .into_iter()
        .filter_map(|item| {
            let id = TeamId::parse(&item.team.id.to_string())?;
            Some(TeamSummary {
                id,
                name: item.team.name,
                code: item.team.code,
                country: item.team.country,
                founded: item.team.founded,
                logo: item.team.logo.unwrap_or_default(),
            })
        })
        .collect()
}

fn map_standings(items: Vec<StandingsItem>) -> Option<StandingsResponse> {
    let league = items.into_iter().next()?.league;
    let league_id = (league.id > 0).then(|| LeagueId::new(league.id))?;

    let table = league
        .standings
        .into_iter()
        .flatten()
        .filter_map(|entry| {
            let team_id = entry.team.id.filter(|id| *id > 0).map(TeamId::new)?;
            let goals_for = entry.all.goals.scored.unwrap_or(0);
            let goals_against = entry.all.goals.against.unwrap_or(0);
            Some(StandingRow {
                rank: entry.rank,
                team_id,
                team_name: entry.team.name,
                crest_url: entry.team.logo.unwrap_or_default(),
                points: entry.points,
                played: entry.all.played,
                won: entry.all.win,
                drawn: entry.all.draw,
                lost: entry.all.lose,
                goals_for,
                goals_against,
                goal_diff: entry.goals_diff,
                form: entry.form,
            })
        })
        .collect();

    Some(StandingsResponse {
        league_id,
        league_name: league.name,
        season: league.season,
        table,
    })
}

fn map_statistics(
    body: StatisticsBody,
    league: LeagueId,
    season: i32,
    team: TeamId,
) -> TeamComparison {
    TeamComparison {
        team_id: team,
        team_name: body.team.name,
        league_id: league,
        season,
        form: body.form.unwrap_or_default(),
        played: body.fixtures.played.value(),
        wins: body.fixtures.wins.value(),
        draws: body.fixtures.draws.value(),
        losses: body.fixtures.loses.value(),
        goals_for: body.goals.scored.total.value(),
        goals_against: body.goals.against.total.value(),
        clean_sheets: body.clean_sheet.unwrap_or_default().value(),
        failed_to_score: body.failed_to_score.unwrap_or_default().value(),
    }
}

#[async_trait]
impl FootballProvider for ApiFootballClient {
    async fn fetch_fixtures(&self, query: &FixtureQuery) -> Result<Vec<Fixture>, UpstreamError> {
        let league = self
            .leagues
            .resolve_param(&query.league)
            .ok_or_else(|| UpstreamError::UnknownLeague(query.league.clone()))?;

        let mut params = vec![("league", league.to_string())];
        if let Some(from) = query.from {
            params.push(("from", from.to_string()));
        }
        if let Some(to) = query.to {
            params.push(("to", to.to_string()));
        }
        if let Some(season) = query.season {
            params.push(("season", season.to_string()));
        }
        match query.team.as_deref().map(TeamId::parse) {
            Some(Some(team)) => params.push(("team", team.to_string())),
            Some(None) => debug!(team = ?query.team, "Ignoring non-numeric team filter"),
            None => {}
        }

        let items: Vec<FixtureItem> = self.get_json("/fixtures", &params).await?;
        Ok(map_fixtures(&items, &now_rfc3339()))
    }

    async fn fetch_live_fixtures(
        &self,
        league: LeagueId,
    ) -> Result<Vec<LiveFixture>, UpstreamError> {
        let items: Vec<FixtureItem> = self
            .get_json("/fixtures", &[("live", league.to_string())])
            .await?;
        Ok(map_live(&items, &now_rfc3339()))
    }

    async fn fetch_teams(
        &self,
        league: LeagueId,
        season: i32,
    ) -> Result<Vec<TeamSummary>, UpstreamError> {
        let items: Vec<TeamItem> = self
            .get_json(
                "/teams",
                &[("league", league.to_string()), ("season", season.to_string())],
            )
            .await?;
        Ok(map_teams(items))
    }

    async fn fetch_statistics(
        &self,
        league: LeagueId,
        season: i32,
        team: TeamId,
    ) -> Result<TeamComparison, UpstreamError> {
        let body: StatisticsBody = self
            .get_json(
                "/teams/statistics",
                &[
                    ("league", league.to_string()),
                    ("season", season.to_string()),
                    ("team", team.to_string()),
                ],
            )
            .await?;
        Ok(map_statistics(body, league, season, team))
    }

    async fn fetch_standings(
        &self,
        league: LeagueId,
        season: i32,
    ) -> Result<StandingsResponse, UpstreamError> {
        let items: Vec<StandingsItem> = self
            .get_json(
                "/standings",
                &[("league", league.to_string()), ("season", season.to_string())],
            )
            .await?;

        map_standings(items).ok_or_else(|| {
            UpstreamError::Empty(format!(
                "standings of {} {season}",
                self.league_name(league)
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    const FIXTURES_JSON: &str = r#"{
        "errors": [],
        "response": [{
            "fixture": {"id": null, "date": "2022-08-13T15:00:00+00:00", "status": {"elapsed": null}},
            "teams": {
                "home": {"id": 2462, "name": "Ethiopia Bunna", "logo": "https://media.example/2462.png"},
                "away": {"id": 2461, "name": "Saint George", "logo": null}
            },
            "goals": {"home": null, "away": null}
        }]
    }"#;

    #[test]
    fn maps_fixture_response() {
        let envelope: Envelope<Vec<FixtureItem>> = serde_json::from_str(FIXTURES_JSON).unwrap();
        assert!(!has_errors(&envelope.errors));

        let fixtures = map_fixtures(&envelope.response.unwrap(), "2022-08-01T00:00:00Z");
        assert_eq!(fixtures.len(), 1);
        let fixture = &fixtures[0];
        assert_eq!(fixture.home_name, "Ethiopia Bunna");
        assert_eq!(fixture.away_name, "Saint George");
        assert_eq!(fixture.away_logo, "");
        assert_eq!(fixture.status, "scheduled");
        assert_eq!(
            fixture.id,
            "2022-08-13T15:00:00+00:00:Ethiopia Bunna:Saint George"
        );
    }

    #[test]
    fn provider_error_object_is_detected() {
        let body = r#"{"errors": {"token": "Error/Missing application key"}, "response": []}"#;
        let envelope: Envelope<Vec<FixtureItem>> = serde_json::from_str(body).unwrap();
        assert!(has_errors(&envelope.errors));
    }

    #[test]
    fn maps_statistics_response() {
        let body = r#"{
            "team": {"id": 33, "name": "Manchester United"},
            "form": "WDLW",
            "fixtures": {
                "played": {"total": 38}, "wins": {"total": 23},
                "draws": {"total": 6}, "loses": {"total": 9}
            },
            "goals": {
                "for": {"total": {"total": 58}},
                "against": {"total": {"total": 43}}
            },
            "clean_sheet": {"total": 17},
            "failed_to_score": {"total": 6}
        }"#;
        let parsed: StatisticsBody = serde_json::from_str(body).unwrap();
        let stats = map_statistics(parsed, LeagueId::new(39), 2022, TeamId::new(33));
        assert_eq!(stats.played, 38);
        assert_eq!(stats.losses, 9);
        assert_eq!(stats.goals_for, 58);
        assert_eq!(stats.clean_sheets, 17);
        assert_eq!(stats.form, "WDLW");
    }

    #[test]
    fn maps_standings_response() {
        let body = r#"[{"league": {
            "id": 363, "name": "Premier League", "season": 2022,
            "standings": [[
                {"rank": 2, "team": {"id": 2462, "name": "Ethiopia Bunna", "logo": "b.png"},
                 "points": 40, "goalsDiff": 8, "form": "WWD",
                 "all": {"played": 20, "win": 12, "draw": 4, "lose": 4, "goals": {"for": 30, "against": 22}}},
                {"rank": 1, "team": {"id": 2461, "name": "Saint George", "logo": "a.png"},
                 "points": 45, "goalsDiff": 20, "form": null,
                 "all": {"played": 20, "win": 14, "draw": 3, "lose": 3, "goals": {"for": 35, "against": 15}}}
            ]]
        }}]"#;
        let items: Vec<StandingsItem> = serde_json::from_str(body).unwrap();
        let standings = map_standings(items).unwrap();
        assert_eq!(standings.league_id, LeagueId::new(363));
        assert_eq!(standings.table.len(), 2);
        assert_eq!(standings.leaders(1)[0].team_name, "Saint George");
    }

    #[test]
    fn empty_standings_is_none() {
        assert!(map_standings(vec![]).is_none());
    }

    #[test]
    fn backoff_is_capped() {
        let base = Duration::from_millis(250);
        let max = Duration::from_secs(4);
        assert_eq!(backoff_delay(base, max, 0), Duration::from_millis(250));
        assert_eq!(backoff_delay(base, max, 2), Duration::from_secs(1));
        assert_eq!(backoff_delay(base, max, 10), max);
        assert_eq!(backoff_delay(base, max, 40), max);
    }

    /// Serves one canned HTTP response per connection, repeating the last
    /// one, and counts the requests it saw.
    async fn scripted_server(
        responses: Vec<(u16, &'static str)>,
    ) -> (String, std::sync::Arc<std::sync::atomic::AtomicUsize>) {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let n = counter.fetch_add(1, Ordering::SeqCst);
                let (status, body) = responses[n.min(responses.len() - 1)];

                let mut request = Vec::new();
                let mut buf = [0_u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(read) => request.extend_from_slice(&buf[..read]),
                    }
                }

                let response = format!(
                    "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{addr}"), hits)
    }

    fn client_for(base_url: String) -> ApiFootballClient {
        let mut config = Config::default();
        config.upstream.base_url = base_url;
        config.upstream.api_key = Some("test-key".to_string());
        config.upstream.max_retries = 2;
        config.upstream.retry_base_delay_ms = 1;
        config.upstream.retry_max_delay_ms = 2;
        ApiFootballClient::new(&config.upstream, config.league_table()).unwrap()
    }

    const EMPTY_OK: &str = r#"{"errors": [], "response": []}"#;

    #[tokio::test]
    async fn server_errors_are_retried_until_success() {
        let (url, hits) = scripted_server(vec![(503, "busy"), (429, "slow down"), (200, EMPTY_OK)]).await;
        let client = client_for(url);

        let teams = client.fetch_teams(LeagueId::new(363), 2022).await.unwrap();
        assert!(teams.is_empty());
        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retries_stop_after_max_retries() {
        let (url, hits) = scripted_server(vec![(503, "busy")]).await;
        let client = client_for(url);

        let err = client.fetch_teams(LeagueId::new(363), 2022).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Status { status: 503, .. }));
        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let (url, hits) = scripted_server(vec![(404, "no such endpoint"), (200, EMPTY_OK)]).await;
        let client = client_for(url);

        let err = client.fetch_teams(LeagueId::new(363), 2022).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Status { status: 404, .. }));
        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn api_error_object_is_not_retried() {
        let (url, hits) = scripted_server(vec![(
            200,
            r#"{"errors": {"token": "invalid key"}, "response": []}"#,
        )])
        .await;
        let client = client_for(url);

        let err = client.fetch_teams(LeagueId::new(363), 2022).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Api(_)));
        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_league_fails_before_any_request() {
        let config = Config::default();
        let client = ApiFootballClient::new(&config.upstream, config.league_table()).unwrap();
        let err = client
            .fetch_fixtures(&FixtureQuery::for_league("XYZ"))
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::UnknownLeague(code) if code == "XYZ"));
    }
}
