use crate::error::IngestError;
use crate::models::{DocumentChunk, DocumentFingerprint};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    pub max_chars: usize,
    pub overlap_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: 1_000,
            overlap_chars: 200,
        }
    }
}

impl ChunkingConfig {
    fn validate(&self) -> Result<(), IngestError> {
        if self.max_chars == 0 {
            return Err(IngestError::InvalidChunkConfig(
                "max_chars must be positive".to_string(),
            ));
        }
        if self.overlap_chars >= self.max_chars {
            return Err(IngestError::InvalidChunkConfig(format!(
                "overlap {} must be smaller than max chunk size {}",
                self.overlap_chars, self.max_chars
            )));
        }
        Ok(())
    }
}

/// Splits text into windows of at most `max_chars` characters, consecutive
/// windows sharing exactly `overlap_chars` characters. Deterministic and
/// pure; concatenating the pieces with the overlap removed reproduces the
/// input exactly.
pub fn split_text(text: &str, config: ChunkingConfig) -> Result<Vec<String>, IngestError> {
    config.validate()?;

    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Ok(Vec::new());
    }

    let stride = config.max_chars - config.overlap_chars;
    let mut pieces = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + config.max_chars).min(chars.len());
        pieces.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += stride;
    }

    Ok(pieces)
}

pub fn build_chunks(
    document: &DocumentFingerprint,
    text: &str,
    config: ChunkingConfig,
) -> Result<Vec<DocumentChunk>, IngestError> {
    let mut chunks = Vec::new();

    for (index, piece) in split_text(text, config)?.into_iter().enumerate() {
        let index = index as u64;
        chunks.push(DocumentChunk {
            chunk_id: make_chunk_id(&document.document_id, index, &piece),
            document_id: document.document_id.clone(),
            source_path: document.source_path.clone(),
            title: document.document_title.clone(),
            chunk_index: index,
            text: piece,
        });
    }

    Ok(chunks)
}

fn make_chunk_id(document_id: &str, index: u64, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document_id.as_bytes());
    hasher.update(index.to_le_bytes());
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
