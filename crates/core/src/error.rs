use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("path has no file name: {0}")]
    MissingFileName(String),

    #[error("invalid chunking config: {0}")]
    InvalidChunkConfig(String),

    #[error("embedding provider unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("index could not be written: {0}")]
    IndexUnavailable(String),
}

#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("no index has been built in this session")]
    NoIndexBuilt,

    #[error("index could not be loaded: {0}")]
    IndexUnavailable(String),

    #[error("retrieval unavailable: {0}")]
    RetrievalUnavailable(String),

    #[error("embedding provider unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("answer synthesis failed: {0}")]
    SynthesisFailed(String),
}

/// Failure reported by an embedding provider.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct EmbeddingError(pub String);

/// Failure reported by a vector index collaborator.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index not available: {0}")]
    Unavailable(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("index was built with model {expected}, queried with {actual}")]
    ModelMismatch { expected: String, actual: String },

    #[error("vector dimension {actual} does not match index dimension {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Failure reported by an answer synthesizer.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SynthesisError(pub String);

impl From<EmbeddingError> for IngestError {
    fn from(error: EmbeddingError) -> Self {
        IngestError::EmbeddingUnavailable(error.0)
    }
}

impl From<EmbeddingError> for AnswerError {
    fn from(error: EmbeddingError) -> Self {
        AnswerError::EmbeddingUnavailable(error.0)
    }
}

impl From<IndexError> for IngestError {
    fn from(error: IndexError) -> Self {
        IngestError::IndexUnavailable(error.to_string())
    }
}

impl From<IndexError> for AnswerError {
    fn from(error: IndexError) -> Self {
        AnswerError::IndexUnavailable(error.to_string())
    }
}

impl From<SynthesisError> for AnswerError {
    fn from(error: SynthesisError) -> Self {
        AnswerError::SynthesisFailed(error.0)
    }
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
