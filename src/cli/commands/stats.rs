//! Team statistics command handler

use super::resolve_league;
use crate::state::SharedState;

pub async fn cmd_stats(
    state: &SharedState,
    league: &str,
    season: Option<i32>,
    team: &str,
) -> anyhow::Result<()> {
    let league_id = resolve_league(&state.config.league_table(), league)?;
    let season = season.unwrap_or(state.config.defaults.season);

    let stats = state.statistics.statistics(league_id, season, team).await?;

    println!("{} ({season})", stats.team_name);
    println!("{:-<40}", "");
    println!(
        "  Played {} | W {} D {} L {}",
        stats.played, stats.wins, stats.draws, stats.losses
    );
    println!(
        "  Goals {}:{} | Clean sheets {} | Failed to score {}",
        stats.goals_for, stats.goals_against, stats.clean_sheets, stats.failed_to_score
    );
    if !stats.form.is_empty() {
        println!("  Form: {}", stats.form);
    }

    Ok(())
}
