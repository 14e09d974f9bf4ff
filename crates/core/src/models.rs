use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFingerprint {
    pub document_id: String,
    pub document_title: String,
    pub source_path: String,
    pub checksum: String,
    pub ingested_at: DateTime<Utc>,
}

/// One retrievable unit of a document. Order of `chunk_index` reflects
/// document order; the index itself treats chunks as an unordered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub chunk_id: String,
    pub document_id: String,
    pub source_path: String,
    pub title: String,
    pub chunk_index: u64,
    pub text: String,
}

/// A retrieved chunk with its similarity to the query embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: DocumentChunk,
    pub score: f64,
}

/// Summary of a completed index build.
#[derive(Debug, Clone)]
pub struct IndexReport {
    pub document: DocumentFingerprint,
    pub chunk_count: usize,
    pub dimensions: usize,
}
