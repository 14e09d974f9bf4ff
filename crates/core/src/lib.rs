pub mod chunking;
pub mod embeddings;
pub mod error;
pub mod extractor;
pub mod ingest;
pub mod models;
pub mod orchestrator;
pub mod prompt;
pub mod stores;
pub mod synthesis;
pub mod traits;

pub use chunking::{build_chunks, split_text, ChunkingConfig};
pub use embeddings::{
    CharacterNgramEmbedder, EmbeddingProvider, OllamaEmbedder, DEFAULT_EMBEDDING_DIMENSIONS,
};
pub use error::{
    AnswerError, EmbeddingError, IndexError, IngestError, SynthesisError,
};
pub use extractor::{LopdfExtractor, PdfExtractor};
pub use ingest::{build_document_fingerprint, digest_file, extract_document_chunks};
pub use models::{DocumentChunk, DocumentFingerprint, IndexReport, ScoredChunk};
pub use orchestrator::{ChatSession, DEFAULT_TOP_K};
pub use prompt::{build_context, build_prompt};
pub use stores::{cosine_similarity, FlatFileIndex, DEFAULT_INDEX_FILE};
pub use synthesis::{AnswerSynthesizer, OllamaGenerator};
pub use traits::VectorIndex;
