use crate::domain::{LeagueId, TeamId};
use serde::{Deserialize, Serialize};

/// Season aggregate for one team in one league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamComparison {
    pub team_id: TeamId,
    pub team_name: String,
    pub league_id: LeagueId,
    pub season: i32,
    #[serde(default)]
    pub form: String,
    pub played: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub clean_sheets: i32,
    pub failed_to_score: i32,
}

/// Side by side statistics for a two team comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonData {
    pub team_a: TeamComparison,
    pub team_b: TeamComparison,
}
