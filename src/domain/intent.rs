//! Classified user intent, as produced by the external intent classifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Structured meaning of a natural-language query.
///
/// `topic` is kept as the raw classifier label; the dispatcher parses it
/// and fails fast on anything it does not recognise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Intent {
    pub topic: String,

    #[serde(default)]
    pub league: String,

    #[serde(default)]
    pub language: String,

    #[serde(default)]
    pub teams: Vec<String>,

    /// Season year; the configured default season is used when absent.
    #[serde(default)]
    pub season: Option<i32>,
}

/// Topics the dispatcher knows how to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Fixture,
    Table,
    News,
    Compare,
    Fact,
}

impl Topic {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fixture => "fixture",
            Self::Table => "table",
            Self::News => "news",
            Self::Compare => "compare",
            Self::Fact => "fact",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "fixture" | "fixtures" => Ok(Self::Fixture),
            "table" | "standings" => Ok(Self::Table),
            "news" => Ok(Self::News),
            "compare" => Ok(Self::Compare),
            "fact" => Ok(Self::Fact),
            other => Err(format!("unsupported topic: {other}")),
        }
    }
}
