//! Lightweight retrieval: word chunking and keyword relevance selection

mod chunker;
mod selector;

pub use chunker::{chunk, Chunk, WordChunker};
pub use selector::{select_best_chunk, KeywordSelector, DEFAULT_MIN_TOKEN_CHARS};
