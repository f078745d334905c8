//! League table command handler

use super::resolve_league;
use crate::state::SharedState;

pub async fn cmd_standings(
    state: &SharedState,
    league: &str,
    season: Option<i32>,
    cached_only: bool,
) -> anyhow::Result<()> {
    let league_id = resolve_league(&state.config.league_table(), league)?;
    let season = season.unwrap_or(state.config.defaults.season);

    let table = if cached_only {
        state
            .standings
            .get_standings_from_cache(league_id, season)
            .await?
    } else {
        state.standings.get_standings(league_id, season).await?
    };

    println!("{} {}", table.league_name, table.season);
    println!("{:-<60}", "");
    println!(
        "{:>3}  {:<28} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4}",
        "#", "Team", "P", "W", "D", "L", "GD", "Pts"
    );

    for row in table.leaders(table.table.len()) {
        println!(
            "{:>3}  {:<28} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4}",
            row.rank,
            row.team_name,
            row.played,
            row.won,
            row.drawn,
            row.lost,
            row.goal_diff,
            row.points
        );
    }

    Ok(())
}
