//! Cache key namespace.
//!
//! Every entity family owns a distinct prefix. The round window key is the
//! only unprefixed one; it starts with a league code, and configuration
//! rejects league codes equal to any prefix below.

use crate::domain::{LeagueId, TeamId};
use crate::models::{FixtureQuery, RoundQuery};

pub const TEAM: &str = "team";
pub const TEAM_NAME: &str = "teamid";
pub const TEAM_CATALOG: &str = "teams";
pub const HYDRATED: &str = "hydrated";
pub const FIXTURES: &str = "fixtures";
pub const ROUND_FIXTURES: &str = "pf";
pub const STANDINGS: &str = "standings";
pub const STATISTICS: &str = "stats";
pub const HEALTH: &str = "ethiofb";

pub const RESERVED_PREFIXES: &[&str] = &[
    TEAM,
    TEAM_NAME,
    TEAM_CATALOG,
    HYDRATED,
    FIXTURES,
    ROUND_FIXTURES,
    STANDINGS,
    STATISTICS,
    HEALTH,
];

/// `team:<id>` (hash)
#[must_use]
pub fn team(id: &str) -> String {
    format!("{TEAM}:{id}")
}

/// `teamid:<name>` holding the numeric id
#[must_use]
pub fn team_name(name: &str) -> String {
    format!("{TEAM_NAME}:{name}")
}

/// `teams:<league>:<season>`
#[must_use]
pub fn team_catalog(league: LeagueId, season: i32) -> String {
    format!("{TEAM_CATALOG}:{league}:{season}")
}

/// `hydrated:<league>:<season>`
#[must_use]
pub fn hydrated(league: LeagueId, season: i32) -> String {
    format!("{HYDRATED}:{league}:{season}")
}

/// `fixtures:<league>:<team>:<season>:<from>:<to>`; absent parts are empty.
#[must_use]
pub fn fixtures(query: &FixtureQuery) -> String {
    format!(
        "{FIXTURES}:{}:{}:{}:{}:{}",
        query.league,
        query.team.as_deref().unwrap_or_default(),
        query.season.map(|s| s.to_string()).unwrap_or_default(),
        query.from.map(|d| d.to_string()).unwrap_or_default(),
        query.to.map(|d| d.to_string()).unwrap_or_default(),
    )
}

/// `pf:<league>:<season>:<round>`
#[must_use]
pub fn round_fixtures(query: &RoundQuery) -> String {
    format!(
        "{ROUND_FIXTURES}:{}:{}:{}",
        query.league, query.season, query.round
    )
}

/// `<league>:<season>:<round>`
#[must_use]
pub fn round_window(query: &RoundQuery) -> String {
    format!("{}:{}:{}", query.league, query.season, query.round)
}

/// `standings:<league>:<season>`
#[must_use]
pub fn standings(league: LeagueId, season: i32) -> String {
    format!("{STANDINGS}:{league}:{season}")
}

/// `stats:<league>:<season>:<team>`
#[must_use]
pub fn statistics(league: LeagueId, season: i32, team: TeamId) -> String {
    format!("{STATISTICS}:{league}:{season}:{team}")
}

/// Smoke key written by the Redis health check.
#[must_use]
pub fn health() -> String {
    format!("{HEALTH}:ping")
}
