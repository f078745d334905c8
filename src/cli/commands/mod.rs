mod dispatch;
mod fixtures;
mod ping;
mod seed;
mod standings;
mod stats;
mod team;

pub use dispatch::cmd_dispatch;
pub use fixtures::cmd_fixtures;
pub use ping::cmd_ping;
pub use seed::cmd_seed_teams;
pub use standings::cmd_standings;
pub use stats::cmd_stats;
pub use team::cmd_team;

use crate::config::LeagueTable;
use crate::domain::LeagueId;

fn resolve_league(leagues: &LeagueTable, code: &str) -> anyhow::Result<LeagueId> {
    leagues
        .resolve_param(code)
        .ok_or_else(|| anyhow::anyhow!("Unknown league '{code}'"))
}
