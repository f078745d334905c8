//! Team lookup command handler

use crate::domain::TeamId;
use crate::services::ServiceError;
use crate::state::SharedState;

pub async fn cmd_team(state: &SharedState, id: &str) -> anyhow::Result<()> {
    let Some(team_id) = TeamId::parse(id) else {
        anyhow::bail!("Team id must be a positive integer, got '{id}'");
    };

    let team = match state.teams.get_team_by_id(team_id).await {
        Ok(team) => team,
        Err(ServiceError::NotFound(_)) => {
            println!("Team {team_id} not found in any configured league.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", team.name);
    println!("{:-<50}", "");
    println!("  ID:     {}", team.id);
    if !team.short.is_empty() {
        println!("  Code:   {}", team.short);
    }
    println!("  League: {}", team.league);
    if !team.bio.is_empty() {
        println!("  {}", team.bio);
    }
    if !team.crest_url.is_empty() {
        println!("  Crest:  {}", team.crest_url);
    }

    Ok(())
}
