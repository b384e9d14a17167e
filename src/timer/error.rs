//! Pipeline Error Types

use crate::core::error_handling::ContextualError;
use crate::core::validation::ValidationError;
use crate::queue::QueueError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Invalid pipeline configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("Queue failure: {0}")]
    Queue(#[from] QueueError),

    #[error("Failed to spawn {role} thread: {source}")]
    Spawn {
        role: String,
        #[source]
        source: std::io::Error,
    },

    #[error("The {role} thread panicked")]
    WorkerPanicked { role: String },
}

impl ContextualError for PipelineError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, PipelineError::Config(_))
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            PipelineError::Config(error) => Some(error.message()),
            _ => None,
        }
    }
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
