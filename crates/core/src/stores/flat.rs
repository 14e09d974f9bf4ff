use crate::error::IndexError;
use crate::models::{DocumentChunk, ScoredChunk};
use crate::traits::VectorIndex;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_INDEX_FILE: &str = "pdf_chat_index.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    chunk: DocumentChunk,
    vector: Vec<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexFile {
    model: String,
    dimensions: usize,
    entries: Vec<IndexEntry>,
}

/// File-backed brute-force cosine index.
///
/// The whole state lives in one JSON file that is rewritten on every
/// rebuild and reloaded on every search. The rewrite goes through a staging
/// file, so a failed save leaves the previous index intact.
pub struct FlatFileIndex {
    path: PathBuf,
}

impl FlatFileIndex {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<IndexFile, IndexError> {
        if !self.path.exists() {
            return Err(IndexError::Unavailable(format!(
                "no index at {}",
                self.path.display()
            )));
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[async_trait]
impl VectorIndex for FlatFileIndex {
    async fn rebuild(
        &self,
        model: &str,
        chunks: &[DocumentChunk],
        embeddings: &[Vec<f32>],
    ) -> Result<(), IndexError> {
        if chunks.len() != embeddings.len() {
            return Err(IndexError::Unavailable(format!(
                "embedding count {} does not match chunk count {}",
                embeddings.len(),
                chunks.len()
            )));
        }

        let dimensions = embeddings.first().map(Vec::len).unwrap_or(0);
        for embedding in embeddings {
            if embedding.len() != dimensions {
                return Err(IndexError::DimensionMismatch {
                    expected: dimensions,
                    actual: embedding.len(),
                });
            }
        }

        let file = IndexFile {
            model: model.to_string(),
            dimensions,
            entries: chunks
                .iter()
                .zip(embeddings.iter())
                .map(|(chunk, vector)| IndexEntry {
                    chunk: chunk.clone(),
                    vector: vector.clone(),
                })
                .collect(),
        };

        let serialized = serde_json::to_string(&file)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, serialized)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }

    async fn search(
        &self,
        model: &str,
        query_vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>, IndexError> {
        let file = self.load()?;

        if file.model != model {
            return Err(IndexError::ModelMismatch {
                expected: file.model,
                actual: model.to_string(),
            });
        }
        if query_vector.len() != file.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: file.dimensions,
                actual: query_vector.len(),
            });
        }

        let mut hits: Vec<ScoredChunk> = file
            .entries
            .into_iter()
            .map(|entry| ScoredChunk {
                score: cosine_similarity(query_vector, &entry.vector),
                chunk: entry.chunk,
            })
            .collect();

        hits.sort_by(|left, right| right.score.total_cmp(&left.score));
        hits.truncate(top_k);
        Ok(hits)
    }

    async fn is_ready(&self) -> bool {
        self.load()
            .map(|file| !file.entries.is_empty())
            .unwrap_or(false)
    }
}

pub fn cosine_similarity(left: &[f32], right: &[f32]) -> f64 {
    let mut dot = 0f64;
    let mut left_norm = 0f64;
    let mut right_norm = 0f64;

    for (l, r) in left.iter().zip(right.iter()) {
        dot += f64::from(l * r);
        left_norm += f64::from(l * l);
        right_norm += f64::from(r * r);
    }

    if left_norm == 0.0 || right_norm == 0.0 {
        return 0.0;
    }
    dot / (left_norm.sqrt() * right_norm.sqrt())
}
