use crate::models::ScoredChunk;

/// Concatenates retrieved chunk texts into the prompt context, best hit
/// first, separated by blank lines.
pub fn build_context(hits: &[ScoredChunk]) -> String {
    hits.iter()
        .map(|hit| hit.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Renders the grounding prompt. The "I don't know" instruction is
/// advisory; the model enforces it, not the pipeline.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Answer the question using ONLY the context below.\n\
         If the answer is not present, say \"I don't know\".\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         Question:\n\
         {question}\n"
    )
}
