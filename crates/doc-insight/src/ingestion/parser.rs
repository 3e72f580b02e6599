//! Plain-text document intake

use std::path::Path;

use crate::config::IntakeConfig;
use crate::error::{Error, Result};
use crate::types::{FileType, SourceDocument};

/// Validates files and turns them into [`SourceDocument`]s
pub struct FileParser {
    limits: IntakeConfig,
}

impl FileParser {
    /// Create a parser with the given limits
    pub fn new(limits: IntakeConfig) -> Self {
        Self { limits }
    }

    /// Check name and size before reading content
    pub fn validate(&self, filename: &str, size: u64) -> Result<FileType> {
        if size == 0 {
            return Err(Error::validation("File is empty"));
        }

        if size > self.limits.max_file_size {
            return Err(Error::validation(format!(
                "File size must be less than {}MB",
                self.limits.max_file_size / (1024 * 1024)
            )));
        }

        let file_type = FileType::from_filename(filename);
        if !file_type.is_supported() {
            let reason = file_type
                .unsupported_reason()
                .unwrap_or("File type not supported");
            return Err(Error::UnsupportedFileType(format!(
                "{} - {}. Received: {}",
                file_type.display_name(),
                reason,
                filename
            )));
        }

        Ok(file_type)
    }

    /// Parse file bytes
    pub fn parse(&self, filename: &str, data: &[u8]) -> Result<SourceDocument> {
        let file_type = self.validate(filename, data.len() as u64)?;
        let content = String::from_utf8_lossy(data).into_owned();

        let document = SourceDocument {
            filename: filename.to_string(),
            file_type,
            content,
            file_size: data.len() as u64,
        };

        let text_len = document.text_len();
        if text_len < self.limits.min_extracted_chars {
            return Err(Error::validation(format!(
                "Only {} characters were found in the file. Please ensure the file contains readable text.",
                text_len
            )));
        }

        tracing::info!(
            "Loaded {} ({}, {} bytes, {} characters)",
            filename,
            file_type.display_name(),
            document.file_size,
            text_len
        );

        Ok(document)
    }

    /// Read and parse a file from disk
    pub async fn load(&self, path: &Path) -> Result<SourceDocument> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let metadata = tokio::fs::metadata(path).await?;
        self.validate(&filename, metadata.len())?;

        let data = tokio::fs::read(path).await?;
        self.parse(&filename, &data)
    }
}

impl Default for FileParser {
    fn default() -> Self {
        Self::new(IntakeConfig::default())
    }
}
