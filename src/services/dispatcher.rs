//! Routes a classified intent to the lookups its topic needs and assembles
//! the [`AnswerContext`] for the composer.
//!
//! | topic   | lookups                         | on failure                     |
//! |---------|---------------------------------|--------------------------------|
//! | fixture | fixtures of the default round   | empty fixture list             |
//! | table   | standings                       | request fails                  |
//! | news    | four generators, concurrently   | keep the ones that succeeded   |
//! | compare | two statistics, concurrently    | request fails, naming the side |
//! | fact    | none                            | never fails                    |

use std::fmt;
use std::sync::Arc;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{DefaultsConfig, LeagueTable};
use crate::domain::{AnswerContext, ContextData, Intent, LeagueId, NewsItem, Topic};
use crate::models::{ComparisonData, Fixture, RoundQuery};
use crate::services::ServiceError;
use crate::services::fixture_service::FixtureService;
use crate::services::news::NewsGenerator;
use crate::services::standings_service::StandingsService;
use crate::services::statistics_service::StatisticsService;

/// Which team of a comparison failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported topic: {0}")]
    UnsupportedTopic(String),

    #[error("Error while fetching {what}: {source}")]
    Upstream {
        what: &'static str,
        #[source]
        source: ServiceError,
    },

    #[error("Error while fetching data for team {side} ({team}): {source}")]
    Compare {
        side: Side,
        team: String,
        #[source]
        source: ServiceError,
    },
}

pub struct IntentDispatcher {
    leagues: LeagueTable,
    defaults: DefaultsConfig,
    fixtures: Arc<dyn FixtureService>,
    standings: Arc<dyn StandingsService>,
    statistics: Arc<dyn StatisticsService>,
    news: Arc<dyn NewsGenerator>,
}

impl IntentDispatcher {
    #[must_use]
    pub fn new(
        leagues: LeagueTable,
        defaults: DefaultsConfig,
        fixtures: Arc<dyn FixtureService>,
        standings: Arc<dyn StandingsService>,
        statistics: Arc<dyn StatisticsService>,
        news: Arc<dyn NewsGenerator>,
    ) -> Self {
        Self {
            leagues,
            defaults,
            fixtures,
            standings,
            statistics,
            news,
        }
    }

    /// Builds the context for one intent.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::UnsupportedTopic`] for an unknown topic, before any lookup
    /// - [`DispatchError::InvalidInput`] for an unknown league or a comparison
    ///   without exactly two teams, before any lookup
    /// - [`DispatchError::Upstream`] when the standings lookup fails
    /// - [`DispatchError::Compare`] when either statistics lookup fails
    pub async fn dispatch(&self, intent: &Intent) -> Result<AnswerContext, DispatchError> {
        let topic = Topic::from_str(&intent.topic)
            .map_err(|_| DispatchError::UnsupportedTopic(intent.topic.clone()))?;
        let season = intent.season.unwrap_or(self.defaults.season);

        debug!(%topic, league = %intent.league, season, teams = ?intent.teams, "Dispatching intent");

        let data = match topic {
            Topic::Fixture => {
                self.league(&intent.league)?;
                ContextData::Fixtures(self.fixtures_of(&intent.league, season).await)
            }
            Topic::Table => {
                let league = self.league(&intent.league)?;
                let table = self
                    .standings
                    .get_standings(league, season)
                    .await
                    .map_err(|source| DispatchError::Upstream {
                        what: "standings",
                        source,
                    })?;
                ContextData::Table(table)
            }
            Topic::News => ContextData::News(self.news().await),
            Topic::Compare => {
                let [team_a, team_b] = intent.teams.as_slice() else {
                    return Err(DispatchError::InvalidInput(
                        "two teams are required for comparison".to_string(),
                    ));
                };
                let league = self.league(&intent.league)?;
                ContextData::Compare(self.compare(league, season, team_a, team_b).await?)
            }
            Topic::Fact => ContextData::Fact(intent.teams.clone()),
        };

        let language = if intent.language.trim().is_empty() {
            self.defaults.language.as_str()
        } else {
            intent.language.as_str()
        };

        Ok(AnswerContext::new(topic, language, data))
    }

    fn league(&self, code: &str) -> Result<LeagueId, DispatchError> {
        self.leagues
            .resolve(code)
            .ok_or_else(|| DispatchError::InvalidInput(format!("unsupported league: '{code}'")))
    }

    async fn fixtures_of(&self, league: &str, season: i32) -> Vec<Fixture> {
        let query = RoundQuery {
            league: league.to_string(),
            season,
            round: self.defaults.round.clone(),
            window: None,
        };

        match self.fixtures.get_by_round(&query).await {
            Ok(fixtures) => fixtures,
            Err(e) => {
                warn!("Fixture lookup for {} failed, answering with none: {}", league, e);
                Vec::new()
            }
        }
    }

    async fn news(&self) -> Vec<NewsItem> {
        let (standings, upcoming, live, general) = tokio::join!(
            self.news.standings_news(),
            self.news.upcoming_news(),
            self.news.live_scores(),
            self.news.general_news()
        );

        [standings, upcoming, live, general]
            .into_iter()
            .filter_map(|result| match result {
                Ok(item) => Some(item),
                Err(e) => {
                    debug!("News generator skipped: {}", e);
                    None
                }
            })
            .collect()
    }

    async fn compare(
        &self,
        league: LeagueId,
        season: i32,
        team_a: &str,
        team_b: &str,
    ) -> Result<ComparisonData, DispatchError> {
        let (a, b) = tokio::join!(
            self.statistics.statistics(league, season, team_a),
            self.statistics.statistics(league, season, team_b)
        );

        let team_a_stats = a.map_err(|source| DispatchError::Compare {
            side: Side::A,
            team: team_a.to_string(),
            source,
        })?;
        let team_b_stats = b.map_err(|source| DispatchError::Compare {
            side: Side::B,
            team: team_b.to_string(),
            source,
        })?;

        Ok(ComparisonData {
            team_a: team_a_stats,
            team_b: team_b_stats,
        })
    }
}
