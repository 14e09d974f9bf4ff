use crate::error::IndexError;
use crate::models::{DocumentChunk, ScoredChunk};
use async_trait::async_trait;

/// Capability interface for the vector-search collaborator.
///
/// The index owns its persistence format. `rebuild` fully replaces any
/// previous state; there is no incremental update. `search` must not mutate
/// the index.
#[async_trait]
pub trait VectorIndex {
    async fn rebuild(
        &self,
        model: &str,
        chunks: &[DocumentChunk],
        embeddings: &[Vec<f32>],
    ) -> Result<(), IndexError>;

    async fn search(
        &self,
        model: &str,
        query_vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>, IndexError>;

    /// Whether a previously persisted, non-empty state can be served.
    async fn is_ready(&self) -> bool;
}
