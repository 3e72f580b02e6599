//! Document and file type definitions

use serde::{Deserialize, Serialize};

/// File types recognised at intake
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document (text must be extracted upstream)
    Pdf,
    /// Microsoft Word document (text must be extracted upstream)
    Docx,
    /// Plain text file
    Txt,
    /// Markdown file
    #[serde(rename = "md")]
    Markdown,
    /// Unknown file type
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "txt" => Self::Txt,
            "md" => Self::Markdown,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from a filename
    pub fn from_filename(filename: &str) -> Self {
        match filename.rsplit_once('.') {
            Some((_, ext)) => Self::from_extension(ext),
            None => Self::Unknown,
        }
    }

    /// Whether text can be read directly from files of this type
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Txt | Self::Markdown)
    }

    /// Get display name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "Word Document (.docx)",
            Self::Txt => "Text File",
            Self::Markdown => "Markdown",
            Self::Unknown => "Unknown",
        }
    }

    /// Get reason why file type is not supported
    pub fn unsupported_reason(&self) -> Option<&str> {
        match self {
            Self::Pdf | Self::Docx => {
                Some("extract the text first and pass it as a .txt or .md file")
            }
            Self::Unknown => Some("only TXT and MD files are supported"),
            _ => None,
        }
    }
}

/// A document read from disk, ready for analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Original filename
    pub filename: String,
    /// File type
    pub file_type: FileType,
    /// Extracted text content
    pub content: String,
    /// File size in bytes
    pub file_size: u64,
}

impl SourceDocument {
    /// Number of characters in the trimmed content
    pub fn text_len(&self) -> usize {
        self.content.trim().chars().count()
    }
}
