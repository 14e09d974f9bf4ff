mod flat;

pub use flat::{cosine_similarity, FlatFileIndex, DEFAULT_INDEX_FILE};
