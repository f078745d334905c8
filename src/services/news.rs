//! News blocks derived from standings and fixture lookups.

use std::sync::Arc;

use crate::config::DefaultsConfig;
use crate::domain::{LeagueId, NewsItem, NewsKind};
use crate::models::{FixtureQuery, RoundQuery};
use crate::services::ServiceError;
use crate::services::fixture_service::FixtureService;
use crate::services::standings_service::StandingsService;

/// Number of table rows quoted in the standings headline.
const LEADERS: usize = 3;

/// The four independent news sources behind the news topic. Each one may
/// fail on its own; the dispatcher keeps whatever succeeds.
#[async_trait::async_trait]
pub trait NewsGenerator: Send + Sync {
    async fn standings_news(&self) -> Result<NewsItem, ServiceError>;

    async fn upcoming_news(&self) -> Result<NewsItem, ServiceError>;

    async fn live_scores(&self) -> Result<NewsItem, ServiceError>;

    async fn general_news(&self) -> Result<NewsItem, ServiceError>;
}

pub struct DerivedNewsGenerator {
    standings: Arc<dyn StandingsService>,
    fixtures: Arc<dyn FixtureService>,
    league_code: String,
    league: LeagueId,
    league_name: String,
    defaults: DefaultsConfig,
}

impl DerivedNewsGenerator {
    #[must_use]
    pub fn new(
        standings: Arc<dyn StandingsService>,
        fixtures: Arc<dyn FixtureService>,
        league: LeagueId,
        league_name: impl Into<String>,
        defaults: DefaultsConfig,
    ) -> Self {
        Self {
            standings,
            fixtures,
            league_code: defaults.news_league.clone(),
            league,
            league_name: league_name.into(),
            defaults,
        }
    }
}

fn non_empty(kind: NewsKind, headline: String, lines: Vec<String>) -> Result<NewsItem, ServiceError> {
    if lines.is_empty() {
        return Err(ServiceError::NotFound(format!("{headline}: nothing to report")));
    }
    Ok(NewsItem {
        kind,
        headline,
        lines,
    })
}

#[async_trait::async_trait]
impl NewsGenerator for DerivedNewsGenerator {
    async fn standings_news(&self) -> Result<NewsItem, ServiceError> {
        let table = self
            .standings
            .get_standings(self.league, self.defaults.season)
            .await?;

        let lines = table
            .leaders(LEADERS)
            .into_iter()
            .map(|row| format!("{}. {} - {} pts", row.rank, row.team_name, row.points))
            .collect();

        non_empty(
            NewsKind::Standings,
            format!("{} table, season {}", table.league_name, table.season),
            lines,
        )
    }

    async fn upcoming_news(&self) -> Result<NewsItem, ServiceError> {
        let query = FixtureQuery::for_league(self.league_code.clone())
            .with_season(self.defaults.season)
            .with_window(self.defaults.window());
        let fixtures = self.fixtures.get_fixtures(&query).await?;

        let lines = fixtures
            .iter()
            .map(|f| format!("{} vs {} ({})", f.home_name, f.away_name, f.date_utc))
            .collect();

        non_empty(
            NewsKind::Upcoming,
            format!("Upcoming in the {}", self.league_name),
            lines,
        )
    }

    async fn live_scores(&self) -> Result<NewsItem, ServiceError> {
        let live = self.fixtures.live_fixtures(self.league).await?;

        let lines = live
            .iter()
            .map(|l| {
                let minute = l.elapsed.map(|m| format!(" ({m}')")).unwrap_or_default();
                format!(
                    "{} {}-{} {}{}",
                    l.fixture.home_name,
                    l.home_goals.unwrap_or(0),
                    l.away_goals.unwrap_or(0),
                    l.fixture.away_name,
                    minute
                )
            })
            .collect();

        non_empty(
            NewsKind::LiveScores,
            format!("Live in the {}", self.league_name),
            lines,
        )
    }

    async fn general_news(&self) -> Result<NewsItem, ServiceError> {
        let query = RoundQuery {
            league: self.league_code.clone(),
            season: self.defaults.season,
            round: self.defaults.round.clone(),
            window: None,
        };
        let fixtures = self.fixtures.get_by_round(&query).await?;

        let lines = fixtures
            .iter()
            .map(|f| format!("{} host {}", f.home_name, f.away_name))
            .collect();

        non_empty(
            NewsKind::General,
            format!("Round {} of the {}", query.round, self.league_name),
            lines,
        )
    }
}
