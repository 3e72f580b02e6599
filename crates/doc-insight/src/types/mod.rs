//! Core types for documents, conversations and analysis results

pub mod conversation;
pub mod document;
pub mod response;

pub use conversation::{ConversationTurn, Role};
pub use document::{FileType, SourceDocument};
pub use response::{
    Answer, ComplianceIssue, ComplianceReport, ComplianceStatus, Insights, Severity, Summary,
};
