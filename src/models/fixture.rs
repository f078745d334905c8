use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The only status fixtures carry in this system.
pub const STATUS_SCHEDULED: &str = "scheduled";

/// A fixture as cached and handed to the composer. Never mutated after it
/// is built from a provider response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: String,
    pub date_utc: String,
    pub home_name: String,
    pub away_name: String,
    #[serde(default)]
    pub home_logo: String,
    #[serde(default)]
    pub away_logo: String,
    pub status: String,
    pub last_updated: String,
}

impl Fixture {
    /// Identity of a fixture: the provider's match id when it has one,
    /// otherwise kickoff plus both team names, which stays unique for
    /// fixtures that share a kickoff time.
    #[must_use]
    pub fn identity(match_id: Option<i64>, kickoff: &str, home: &str, away: &str) -> String {
        match match_id {
            Some(id) if id > 0 => id.to_string(),
            _ => format!("{kickoff}:{home}:{away}"),
        }
    }
}

/// A fixture in progress, used for live score news.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveFixture {
    pub fixture: Fixture,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
    pub elapsed: Option<i32>,
}

/// Fixture-set lookup parameters. Every field participates in the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FixtureQuery {
    /// League code (`ETH`, `EPL`) or a raw numeric league id.
    pub league: String,
    /// Numeric team id filter. Names are not accepted by the provider.
    pub team: Option<String>,
    pub season: Option<i32>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl FixtureQuery {
    #[must_use]
    pub fn for_league(league: impl Into<String>) -> Self {
        Self {
            league: league.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    #[must_use]
    pub const fn with_season(mut self, season: i32) -> Self {
        self.season = Some(season);
        self
    }

    #[must_use]
    pub const fn with_window(mut self, window: RoundWindow) -> Self {
        self.from = Some(window.from);
        self.to = Some(window.to);
        self
    }
}

/// Round based lookup parameters (`pf:` entries and window metadata).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoundQuery {
    pub league: String,
    pub season: i32,
    pub round: String,
    pub window: Option<RoundWindow>,
}

/// Date window of a round, stored as `{"from": "...", "to": "..."}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}
