//! Fixture listing command handler

use chrono::NaiveDate;

use crate::models::FixtureQuery;
use crate::state::SharedState;

pub async fn cmd_fixtures(
    state: &SharedState,
    league: &str,
    team: Option<String>,
    season: Option<i32>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let query = FixtureQuery {
        league: league.to_string(),
        team,
        season: season.or(Some(state.config.defaults.season)),
        from,
        to,
    };

    let fixtures = state.fixtures.get_fixtures(&query).await?;

    if fixtures.is_empty() {
        println!("No fixtures found.");
        return Ok(());
    }

    println!("Fixtures ({} total)", fixtures.len());
    println!("{:-<70}", "");

    for fixture in fixtures {
        println!(
            "{}  {} vs {}",
            fixture.date_utc, fixture.home_name, fixture.away_name
        );
    }

    Ok(())
}
