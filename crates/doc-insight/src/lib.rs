//! doc-insight: document summaries, question answering, insight extraction and
//! compliance checks backed by hosted LLMs
//!
//! Question answering uses a lightweight retrieval step: the document is split
//! into fixed-size word chunks and the chunk sharing the most content words
//! with the question is sent to the model. The other tasks send the whole
//! (length-capped) document.

pub mod assistant;
pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod retrieval;
pub mod types;

pub use assistant::DocumentAssistant;
pub use config::AppConfig;
pub use error::{Error, Result};
pub use retrieval::{chunk, select_best_chunk, Chunk};
pub use types::{
    Answer, ComplianceIssue, ComplianceReport, ComplianceStatus, ConversationTurn, Insights,
    Role, Severity, SourceDocument, Summary,
};
