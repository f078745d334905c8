use crate::domain::{LeagueId, TeamId};
use serde::{Deserialize, Serialize};

/// Full league table for one league and season, cached as a single blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsResponse {
    pub league_id: LeagueId,
    pub league_name: String,
    pub season: i32,
    pub table: Vec<StandingRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingRow {
    pub rank: i32,
    pub team_id: TeamId,
    pub team_name: String,
    #[serde(default)]
    pub crest_url: String,
    pub points: i32,
    pub played: i32,
    pub won: i32,
    pub drawn: i32,
    pub lost: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_diff: i32,
    #[serde(default)]
    pub form: Option<String>,
}

impl StandingsResponse {
    /// Rows ordered by rank, best first.
    #[must_use]
    pub fn leaders(&self, count: usize) -> Vec<&StandingRow> {
        let mut rows: Vec<&StandingRow> = self.table.iter().collect();
        rows.sort_by_key(|row| row.rank);
        rows.truncate(count);
        rows
    }
}
