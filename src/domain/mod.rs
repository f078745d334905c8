//! Domain types for football lookups with strong typing.
//!
//! Numeric provider identifiers are wrapped in newtypes so a league id can
//! never be passed where a team id is expected.

pub mod context;
pub mod intent;

pub use context::{Answer, AnswerContext, ContextData, NewsItem, NewsKind};
pub use intent::{Intent, Topic};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream identifier of a league (e.g. `363` for the Ethiopian Premier League).
///
/// # Examples
///
/// ```rust
/// use ethiofb::domain::LeagueId;
///
/// let id = LeagueId::new(363);
/// assert_eq!(id.value(), 363);
/// assert_eq!(id.to_string(), "363");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LeagueId(i32);

impl LeagueId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        debug_assert!(id > 0, "LeagueId should be positive");
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for LeagueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<LeagueId> for i32 {
    fn from(id: LeagueId) -> Self {
        id.0
    }
}

impl Serialize for LeagueId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for LeagueId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        if id <= 0 {
            return Err(serde::de::Error::custom(format!(
                "league id must be positive, got {id}"
            )));
        }
        Ok(Self(id))
    }
}

/// Upstream identifier of a team.
///
/// Cached team records store their id as a string; [`TeamId::parse`] is the
/// single place where that string is turned back into a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TeamId(i32);

impl TeamId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        debug_assert!(id > 0, "TeamId should be positive");
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }

    /// Parses a cached or user supplied id. Zero and negative values are
    /// placeholders, never real teams, and are rejected.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim()
            .parse::<i32>()
            .ok()
            .filter(|id| *id > 0)
            .map(Self)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TeamId> for i32 {
    fn from(id: TeamId) -> Self {
        id.0
    }
}

impl Serialize for TeamId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for TeamId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        if id <= 0 {
            return Err(serde::de::Error::custom(format!(
                "team id must be positive, got {id}"
            )));
        }
        Ok(Self(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_id_parse_rejects_placeholders() {
        assert_eq!(TeamId::parse("42"), Some(TeamId::new(42)));
        assert_eq!(TeamId::parse(" 7 "), Some(TeamId::new(7)));
        assert_eq!(TeamId::parse("0"), None);
        assert_eq!(TeamId::parse("-3"), None);
        assert_eq!(TeamId::parse("Saint George"), None);
    }

    #[test]
    fn league_id_display() {
        assert_eq!(LeagueId::new(39).to_string(), "39");
        assert_eq!(i32::from(LeagueId::new(39)), 39);
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&TeamId::new(1234)).unwrap();
        assert_eq!(json, "1234");
        let back: TeamId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TeamId::new(1234));

        assert!(serde_json::from_str::<LeagueId>("0").is_err());
    }
}
