use crate::domain::TeamId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Hash field names used for `team:<id>` records.
pub const FIELD_ID: &str = "id";
pub const FIELD_NAME: &str = "name";
pub const FIELD_SHORT: &str = "short";
pub const FIELD_LEAGUE: &str = "league";
pub const FIELD_CREST_URL: &str = "crest_url";
pub const FIELD_BIO: &str = "bio";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub short: String,
    #[serde(default)]
    pub league: String,
    #[serde(default)]
    pub crest_url: String,
    #[serde(default)]
    pub bio: String,
}

impl Team {
    #[must_use]
    pub fn numeric_id(&self) -> Option<TeamId> {
        TeamId::parse(&self.id)
    }

    /// Flattens the team into hash fields, in a stable order.
    #[must_use]
    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            (FIELD_ID, self.id.clone()),
            (FIELD_NAME, self.name.clone()),
            (FIELD_SHORT, self.short.clone()),
            (FIELD_LEAGUE, self.league.clone()),
            (FIELD_CREST_URL, self.crest_url.clone()),
            (FIELD_BIO, self.bio.clone()),
        ]
    }

    /// Rebuilds a team from hash fields.
    ///
    /// Returns `None` when the hash is empty (a miss). A non-empty hash without
    /// an `id` field is malformed and also yields `None` so callers can report it.
    #[must_use]
    pub fn from_fields(fields: &HashMap<String, String>) -> Option<Self> {
        let id = fields.get(FIELD_ID)?.clone();
        let get = |name: &str| fields.get(name).cloned().unwrap_or_default();

        Some(Self {
            id,
            name: get(FIELD_NAME),
            short: get(FIELD_SHORT),
            league: get(FIELD_LEAGUE),
            crest_url: get(FIELD_CREST_URL),
            bio: get(FIELD_BIO),
        })
    }
}

/// Catalog entry as returned by the provider's teams endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub id: TeamId,
    pub name: String,
    pub code: Option<String>,
    pub country: Option<String>,
    pub founded: Option<i32>,
    pub logo: String,
}

impl TeamSummary {
    #[must_use]
    pub fn into_team(self, league_name: &str) -> Team {
        let bio = format!(
            "Founded: {}, Country: {}",
            self.founded.unwrap_or(0),
            self.country.as_deref().unwrap_or("Unknown")
        );

        Team {
            id: self.id.to_string(),
            name: self.name,
            short: self.code.unwrap_or_default(),
            league: league_name.to_string(),
            crest_url: self.logo,
            bio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Team {
        Team {
            id: "2461".to_string(),
            name: "Saint George".to_string(),
            short: "SGE".to_string(),
            league: "Ethiopian Premier League".to_string(),
            crest_url: "https://media.example/teams/2461.png".to_string(),
            bio: "Founded: 1935, Country: Ethiopia".to_string(),
        }
    }

    #[test]
    fn fields_round_trip() {
        let team = sample();
        let fields: HashMap<String, String> = team
            .to_fields()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert_eq!(Team::from_fields(&fields), Some(team));
    }

    #[test]
    fn empty_hash_is_not_a_team() {
        assert_eq!(Team::from_fields(&HashMap::new()), None);
    }

    #[test]
    fn summary_into_team_builds_bio() {
        let summary = TeamSummary {
            id: TeamId::new(2461),
            name: "Saint George".to_string(),
            code: None,
            country: Some("Ethiopia".to_string()),
            founded: None,
            logo: "logo.png".to_string(),
        };
        let team = summary.into_team("Ethiopian Premier League");
        assert_eq!(team.id, "2461");
        assert_eq!(team.short, "");
        assert_eq!(team.bio, "Founded: 0, Country: Ethiopia");
        assert_eq!(team.numeric_id(), Some(TeamId::new(2461)));
    }
}
