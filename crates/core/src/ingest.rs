use crate::chunking::{build_chunks, ChunkingConfig};
use crate::error::IngestError;
use crate::extractor::PdfExtractor;
use crate::models::{DocumentChunk, DocumentFingerprint};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

pub fn digest_file(path: &Path) -> Result<String, IngestError> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

pub fn build_document_fingerprint(path: &Path) -> Result<DocumentFingerprint, IngestError> {
    let checksum = digest_file(path)?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            IngestError::MissingFileName(format!("path missing filename: {}", path.display()))
        })?;

    Ok(DocumentFingerprint {
        document_id: generate_document_id(path),
        document_title: name.to_string(),
        source_path: path.to_string_lossy().to_string(),
        checksum,
        ingested_at: Utc::now(),
    })
}

fn generate_document_id(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Runs the extraction half of an index build: fingerprint the file, pull
/// its text, and cut it into retrievable chunks.
pub fn extract_document_chunks<X: PdfExtractor>(
    extractor: &X,
    path: &Path,
    config: ChunkingConfig,
) -> Result<(DocumentFingerprint, Vec<DocumentChunk>), IngestError> {
    let fingerprint = build_document_fingerprint(path)?;
    let text = extractor.extract_text(path)?;
    let chunks = build_chunks(&fingerprint, &text, config)?;
    Ok((fingerprint, chunks))
}
