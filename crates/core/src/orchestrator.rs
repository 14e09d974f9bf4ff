use crate::chunking::ChunkingConfig;
use crate::embeddings::EmbeddingProvider;
use crate::error::{AnswerError, IngestError};
use crate::extractor::PdfExtractor;
use crate::ingest::extract_document_chunks;
use crate::models::{IndexReport, ScoredChunk};
use crate::prompt::{build_context, build_prompt};
use crate::synthesis::AnswerSynthesizer;
use crate::traits::VectorIndex;
use std::path::Path;
use tracing::info;

pub const DEFAULT_TOP_K: usize = 3;

/// One interactive question-answering session over one document.
///
/// The session starts Empty: `answer` fails with `NoIndexBuilt` until a
/// `build_index` call succeeds (or `resume` adopts an index persisted by an
/// earlier run). A successful build moves it to Ready, where both rebuilding
/// and answering are valid. Collaborators are owned by the session, so two
/// sessions never share ambient state.
pub struct ChatSession<X, E, V, S>
where
    X: PdfExtractor,
    E: EmbeddingProvider,
    V: VectorIndex,
    S: AnswerSynthesizer,
{
    extractor: X,
    embedder: E,
    index: V,
    synthesizer: S,
    chunking: ChunkingConfig,
    top_k: usize,
    ready: bool,
}

impl<X, E, V, S> ChatSession<X, E, V, S>
where
    X: PdfExtractor + Send + Sync,
    E: EmbeddingProvider + Send + Sync,
    V: VectorIndex + Send + Sync,
    S: AnswerSynthesizer + Send + Sync,
{
    pub fn new(extractor: X, embedder: E, index: V, synthesizer: S) -> Self {
        Self {
            extractor,
            embedder,
            index,
            synthesizer,
            chunking: ChunkingConfig::default(),
            top_k: DEFAULT_TOP_K,
            ready: false,
        }
    }

    pub fn with_chunking(mut self, chunking: ChunkingConfig) -> Self {
        self.chunking = chunking;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Adopts an index persisted by an earlier process run, if one is
    /// loadable. Returns whether the session is Ready afterwards.
    pub async fn resume(&mut self) -> bool {
        if self.index.is_ready().await {
            self.ready = true;
        }
        self.ready
    }

    /// Extracts, chunks, embeds, and persists a fresh index for `path`,
    /// overwriting any previous one. On failure nothing is written and the
    /// session keeps its previous state.
    pub async fn build_index(&mut self, path: &Path) -> Result<IndexReport, IngestError> {
        info!(path = %path.display(), "reading document");
        let (fingerprint, chunks) = extract_document_chunks(&self.extractor, path, self.chunking)?;

        info!(chunk_count = chunks.len(), "indexing chunks");
        let mut embeddings = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            embeddings.push(self.embedder.embed(&chunk.text).await?);
        }

        self.index
            .rebuild(self.embedder.model_id(), &chunks, &embeddings)
            .await?;
        self.ready = true;

        info!(document_id = %fingerprint.document_id, "index ready");
        Ok(IndexReport {
            document: fingerprint,
            chunk_count: chunks.len(),
            dimensions: self.embedder.dimensions(),
        })
    }

    /// Embeds the question with the same provider used at build time and
    /// returns the top-k chunks, best first. The index is never mutated.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<ScoredChunk>, AnswerError> {
        if !self.ready {
            return Err(AnswerError::NoIndexBuilt);
        }

        let query_vector = self.embedder.embed(question).await?;
        let hits = self
            .index
            .search(self.embedder.model_id(), &query_vector, self.top_k)
            .await?;

        if hits.is_empty() {
            return Err(AnswerError::RetrievalUnavailable(
                "index returned no candidate chunks".to_string(),
            ));
        }
        Ok(hits)
    }

    /// Answers one question from the retrieved context. The synthesizer's
    /// text comes back unmodified, including any "I don't know".
    pub async fn answer(&self, question: &str) -> Result<String, AnswerError> {
        let hits = self.retrieve(question).await?;
        let prompt = build_prompt(&build_context(&hits), question);

        info!(hit_count = hits.len(), "thinking");
        let answer = self.synthesizer.synthesize(&prompt).await?;
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatSession, DEFAULT_TOP_K};
    use crate::embeddings::{CharacterNgramEmbedder, EmbeddingProvider};
    use crate::error::{AnswerError, EmbeddingError, IngestError, SynthesisError};
    use crate::extractor::PdfExtractor;
    use crate::stores::FlatFileIndex;
    use crate::synthesis::AnswerSynthesizer;
    use async_trait::async_trait;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use tempfile::{tempdir, TempDir};

    struct FixedTextExtractor {
        text: Option<String>,
    }

    impl PdfExtractor for FixedTextExtractor {
        fn extract_text(&self, path: &Path) -> Result<String, IngestError> {
            self.text.clone().ok_or_else(|| {
                IngestError::ExtractionFailed(format!("pdf had no readable text: {}", path.display()))
            })
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        fn dimensions(&self) -> usize {
            8
        }

        fn model_id(&self) -> &str {
            "failing"
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Err(EmbeddingError("provider unreachable".to_string()))
        }
    }

    struct StubSynthesizer {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl StubSynthesizer {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AnswerSynthesizer for StubSynthesizer {
        fn model_id(&self) -> &str {
            "stub"
        }

        async fn synthesize(&self, prompt: &str) -> Result<String, SynthesisError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    fn session_over(
        text: Option<&str>,
        reply: &str,
    ) -> (
        TempDir,
        PathBuf,
        ChatSession<FixedTextExtractor, CharacterNgramEmbedder, FlatFileIndex, StubSynthesizer>,
    ) {
        let dir = tempdir().expect("tempdir");
        let document_path = dir.path().join("doc.pdf");
        fs::write(&document_path, b"%PDF-1.4\n%fake").expect("write document");
        let index_path = dir.path().join("index.json");

        let session = ChatSession::new(
            FixedTextExtractor {
                text: text.map(str::to_string),
            },
            CharacterNgramEmbedder::default(),
            FlatFileIndex::new(index_path),
            StubSynthesizer::new(reply),
        );

        (dir, document_path, session)
    }

    #[tokio::test]
    async fn question_before_any_build_reports_no_index() {
        let (_dir, _path, session) = session_over(Some("unused"), "unused");
        let result = session.answer("anything?").await;
        assert!(matches!(result, Err(AnswerError::NoIndexBuilt)));
    }

    #[tokio::test]
    async fn single_chunk_document_is_retrieved_and_answered() {
        let (_dir, path, mut session) =
            session_over(Some("Paris is the capital of France."), "Paris");

        let report = session.build_index(&path).await.expect("build succeeds");
        assert_eq!(report.chunk_count, 1);
        assert!(session.is_ready());

        let hits = session
            .retrieve("What is the capital of France?")
            .await
            .expect("retrieval succeeds");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].chunk.text, "Paris is the capital of France.");

        let answer = session
            .answer("What is the capital of France?")
            .await
            .expect("answer succeeds");
        assert!(answer.contains("Paris"));
    }

    #[tokio::test]
    async fn prompt_reaching_the_synthesizer_carries_context_and_question() {
        let (_dir, path, mut session) =
            session_over(Some("Paris is the capital of France."), "Paris");
        session.build_index(&path).await.expect("build succeeds");
        session
            .answer("What is the capital of France?")
            .await
            .expect("answer succeeds");

        let prompts = session.synthesizer.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Paris is the capital of France."));
        assert!(prompts[0].contains("What is the capital of France?"));
        assert!(prompts[0].contains("I don't know"));
    }

    #[tokio::test]
    async fn model_refusal_comes_back_unmodified() {
        let (_dir, path, mut session) =
            session_over(Some("Paris is the capital of France."), "I don't know");
        session.build_index(&path).await.expect("build succeeds");

        let answer = session
            .answer("Who wrote War and Peace?")
            .await
            .expect("answer succeeds");
        assert_eq!(answer, "I don't know");
    }

    #[tokio::test]
    async fn failed_extraction_builds_nothing() {
        let (_dir, path, mut session) = session_over(None, "unused");

        let result = session.build_index(&path).await;
        assert!(matches!(result, Err(IngestError::ExtractionFailed(_))));
        assert!(!session.is_ready());
        assert!(!session.index.path().exists());

        let follow_up = session.answer("anything?").await;
        assert!(matches!(follow_up, Err(AnswerError::NoIndexBuilt)));
    }

    #[tokio::test]
    async fn failed_embedding_leaves_no_index_behind() {
        let dir = tempdir().expect("tempdir");
        let document_path = dir.path().join("doc.pdf");
        fs::write(&document_path, b"%PDF-1.4\n%fake").expect("write document");
        let index_path = dir.path().join("index.json");

        let mut session = ChatSession::new(
            FixedTextExtractor {
                text: Some("some document text".to_string()),
            },
            FailingEmbedder,
            FlatFileIndex::new(&index_path),
            StubSynthesizer::new("unused"),
        );

        let result = session.build_index(&document_path).await;
        assert!(matches!(result, Err(IngestError::EmbeddingUnavailable(_))));
        assert!(!session.is_ready());
        assert!(!index_path.exists());
    }

    #[tokio::test]
    async fn failed_rebuild_keeps_the_prior_index_usable() {
        let (_dir, path, mut session) =
            session_over(Some("Paris is the capital of France."), "Paris");
        session.build_index(&path).await.expect("first build");

        session.extractor.text = None;
        let result = session.build_index(&path).await;
        assert!(matches!(result, Err(IngestError::ExtractionFailed(_))));

        // The session stays Ready and the earlier index still answers.
        assert!(session.is_ready());
        let answer = session
            .answer("What is the capital of France?")
            .await
            .expect("answer succeeds");
        assert_eq!(answer, "Paris");
    }

    #[tokio::test]
    async fn rebuilding_from_the_same_document_retrieves_identically() {
        let text = "The Eiffel Tower is in Paris. ".repeat(60);
        let (_dir, path, mut session) = session_over(Some(&text), "unused");

        session.build_index(&path).await.expect("first build");
        let first = session
            .retrieve("Where is the Eiffel Tower?")
            .await
            .expect("first retrieval");

        session.build_index(&path).await.expect("second build");
        let second = session
            .retrieve("Where is the Eiffel Tower?")
            .await
            .expect("second retrieval");

        assert_eq!(first.len(), second.len());
        for (left, right) in first.iter().zip(second.iter()) {
            assert_eq!(left.chunk.chunk_id, right.chunk.chunk_id);
            assert_eq!(left.score, right.score);
        }
    }

    #[tokio::test]
    async fn retrieval_returns_top_k_in_score_order() {
        let text = "Alpha section about pumps. ".repeat(80)
            + &"Beta section about valves. ".repeat(80)
            + &"Gamma section about seals. ".repeat(80);
        let (_dir, path, mut session) = session_over(Some(&text), "unused");

        let report = session.build_index(&path).await.expect("build succeeds");
        assert!(report.chunk_count > DEFAULT_TOP_K);

        let hits = session
            .retrieve("Tell me about valves")
            .await
            .expect("retrieval succeeds");
        assert_eq!(hits.len(), DEFAULT_TOP_K);
        for window in hits.windows(2) {
            assert!(window[0].score >= window[1].score);
        }
    }

    #[tokio::test]
    async fn resume_adopts_an_index_from_an_earlier_run() {
        let (dir, path, mut session) =
            session_over(Some("Paris is the capital of France."), "Paris");
        session.build_index(&path).await.expect("build succeeds");

        let mut later = ChatSession::new(
            FixedTextExtractor { text: None },
            CharacterNgramEmbedder::default(),
            FlatFileIndex::new(dir.path().join("index.json")),
            StubSynthesizer::new("Paris"),
        );

        assert!(later.resume().await);
        let answer = later
            .answer("What is the capital of France?")
            .await
            .expect("answer succeeds");
        assert_eq!(answer, "Paris");
    }

    #[tokio::test]
    async fn resume_without_an_index_stays_empty() {
        let (_dir, _path, mut session) = session_over(Some("unused"), "unused");
        assert!(!session.resume().await);
        let result = session.answer("anything?").await;
        assert!(matches!(result, Err(AnswerError::NoIndexBuilt)));
    }
}
