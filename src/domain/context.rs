//! Aggregate envelope handed to the answer composer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::intent::Topic;
use crate::models::fixture::Fixture;
use crate::models::standings::StandingsResponse;
use crate::models::statistics::ComparisonData;

/// Source tag attached to every context built from provider data.
pub const SOURCE_API: &str = "api";

/// Context assembled fresh for each request. It has no persisted identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerContext {
    pub topic: Topic,
    pub language: String,
    pub source: String,
    pub freshness: DateTime<Utc>,
    pub context_data: ContextData,
}

impl AnswerContext {
    #[must_use]
    pub fn new(topic: Topic, language: impl Into<String>, data: ContextData) -> Self {
        Self {
            topic,
            language: language.into(),
            source: SOURCE_API.to_string(),
            freshness: Utc::now(),
            context_data: data,
        }
    }
}

/// Topic specific payload. Serialized as `{"kind": ..., "data": ...}` so the
/// composer always finds exactly one `data` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum ContextData {
    Fixtures(Vec<Fixture>),
    Table(StandingsResponse),
    News(Vec<NewsItem>),
    Compare(ComparisonData),
    Fact(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsKind {
    Standings,
    Upcoming,
    LiveScores,
    General,
}

/// One generated news block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub kind: NewsKind,
    pub headline: String,
    #[serde(default)]
    pub lines: Vec<String>,
}

/// Composed prose returned by the answer composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub markdown: String,
    pub source: String,
    pub freshness: DateTime<Utc>,
}

impl Answer {
    /// Builds an answer that carries the source tag and freshness of the
    /// context it was composed from.
    #[must_use]
    pub fn from_context(markdown: impl Into<String>, context: &AnswerContext) -> Self {
        Self {
            markdown: markdown.into(),
            source: context.source.clone(),
            freshness: context.freshness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_data_has_single_data_key() {
        let context = AnswerContext::new(
            Topic::Fact,
            "en",
            ContextData::Fact(vec!["Saint George".to_string()]),
        );
        let value = serde_json::to_value(&context).unwrap();
        let data = value.get("context_data").unwrap().as_object().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data["kind"], "fact");
        assert_eq!(data["data"][0], "Saint George");
        assert_eq!(value["source"], "api");
    }

    #[test]
    fn answer_copies_source_and_freshness() {
        let context = AnswerContext::new(Topic::News, "am", ContextData::News(vec![]));
        let answer = Answer::from_context("## News", &context);
        assert_eq!(answer.source, context.source);
        assert_eq!(answer.freshness, context.freshness);
    }
}
