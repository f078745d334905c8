//! Seed team catalog command handler

use super::resolve_league;
use crate::services::ServiceError;
use crate::state::SharedState;

pub async fn cmd_seed_teams(
    state: &SharedState,
    league: &str,
    season: Option<i32>,
) -> anyhow::Result<()> {
    let league_id = resolve_league(&state.config.league_table(), league)?;
    let season = season.unwrap_or(state.config.defaults.season);

    println!("Seeding teams for {league} ({league_id}) season {season}...");

    match state.teams.fetch_and_cache_teams(league_id, season).await {
        Ok(count) => println!("✓ Cached {count} teams"),
        Err(ServiceError::Upstream(e)) => anyhow::bail!("Provider request failed: {e}"),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
