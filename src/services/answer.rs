//! Question answering pipeline: classify, dispatch, compose.
//!
//! The classifier and composer are external collaborators. Composition is
//! attempted once per request; a failed composition is never retried.

use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::{Answer, AnswerContext, Intent};
use crate::services::dispatcher::{DispatchError, IntentDispatcher};

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("classifier failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
#[error("failed to compose answer: {0}")]
pub struct ComposeError(pub String);

#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Intent classification failed: {0}")]
    Classify(String),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Compose(#[from] ComposeError),
}

impl From<ClassifyError> for AnswerError {
    fn from(err: ClassifyError) -> Self {
        match err {
            ClassifyError::InvalidInput(msg) => Self::InvalidInput(msg),
            ClassifyError::Failed(msg) => Self::Classify(msg),
        }
    }
}

/// Turns free text into a structured [`Intent`].
#[async_trait::async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn parse(&self, text: &str) -> Result<Intent, ClassifyError>;
}

/// Writes prose for an assembled context. Implementations copy the
/// context's source tag and freshness into the [`Answer`].
#[async_trait::async_trait]
pub trait AnswerComposer: Send + Sync {
    async fn compose(&self, context: &AnswerContext) -> Result<Answer, ComposeError>;
}

pub struct AnswerService {
    classifier: Arc<dyn IntentClassifier>,
    dispatcher: Arc<IntentDispatcher>,
    composer: Arc<dyn AnswerComposer>,
}

impl AnswerService {
    #[must_use]
    pub fn new(
        classifier: Arc<dyn IntentClassifier>,
        dispatcher: Arc<IntentDispatcher>,
        composer: Arc<dyn AnswerComposer>,
    ) -> Self {
        Self {
            classifier,
            dispatcher,
            composer,
        }
    }

    /// Answers a natural-language question.
    ///
    /// # Errors
    ///
    /// - [`AnswerError::InvalidInput`] when the text is empty or the classifier
    ///   rejects it
    /// - [`AnswerError::Dispatch`] when the intent cannot be served
    /// - [`AnswerError::Compose`] when composition fails
    pub async fn ask(&self, text: &str) -> Result<Answer, AnswerError> {
        if text.trim().is_empty() {
            return Err(AnswerError::InvalidInput("question is empty".to_string()));
        }

        let intent = self.classifier.parse(text).await?;
        info!(topic = %intent.topic, league = %intent.league, "Classified question");

        let context = self.dispatcher.dispatch(&intent).await?;

        self.composer.compose(&context).await.map_err(|e| {
            error!("Answer composition failed: {}", e);
            AnswerError::Compose(e)
        })
    }
}
