//! Local files and the rules that decide whether they may be uploaded.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default upload size cap in megabytes.
pub const DEFAULT_MAX_SIZE_MB: u64 = 10;

/// Extensions accepted by the multi-file flow.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];

const BYTES_PER_MB: u64 = 1024 * 1024;

/// A file picked by the user, held in memory until it is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    /// Declared media type; guessed from the extension when absent
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: None,
            bytes,
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Declared media type, or the best guess from the filename.
    pub fn effective_media_type(&self) -> String {
        match &self.media_type {
            Some(media_type) => media_type.clone(),
            None => mime_guess::from_path(&self.name)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        }
    }

    /// Lowercased extension, if the name has one.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }
}

/// Why a file was refused before any request was made.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Invalid file type: '{name}' ({media_type}) is not an accepted document")]
    InvalidType { name: String, media_type: String },

    #[error("File too large: '{name}' is {size} bytes, limit is {limit} bytes")]
    TooLarge { name: String, size: u64, limit: u64 },
}

impl ValidationError {
    /// Short title used for user notifications.
    pub fn title(&self) -> &'static str {
        match self {
            Self::InvalidType { .. } => "Invalid file type",
            Self::TooLarge { .. } => "File too large",
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            Self::InvalidType { name, .. } | Self::TooLarge { name, .. } => name,
        }
    }
}

/// Type check applied before upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptRule {
    /// Single-file flow: the media type must mention PDF
    PdfMediaType,
    /// Multi-file flow: pdf, docx or txt by extension; the backend has the final say
    Extensions,
}

/// Size and type rules for a single upload flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPolicy {
    pub max_size_mb: u64,
    pub accept: AcceptRule,
}

impl UploadPolicy {
    /// Policy of the single-file uploader and the compare view.
    pub fn single_pdf(max_size_mb: u64) -> Self {
        Self {
            max_size_mb,
            accept: AcceptRule::PdfMediaType,
        }
    }

    /// Policy of the library's multi-file picker.
    pub fn multi_file(max_size_mb: u64) -> Self {
        Self {
            max_size_mb,
            accept: AcceptRule::Extensions,
        }
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(BYTES_PER_MB)
    }

    /// Checks type first, then size.
    pub fn validate(&self, file: &LocalFile) -> Result<(), ValidationError> {
        let type_ok = match self.accept {
            AcceptRule::PdfMediaType => file.effective_media_type().contains("pdf"),
            AcceptRule::Extensions => file
                .extension()
                .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str())),
        };
        if !type_ok {
            return Err(ValidationError::InvalidType {
                name: file.name.clone(),
                media_type: file.effective_media_type(),
            });
        }

        let limit = self.max_size_bytes();
        if file.size() > limit {
            return Err(ValidationError::TooLarge {
                name: file.name.clone(),
                size: file.size(),
                limit,
            });
        }

        Ok(())
    }

    /// Splits `files` into the batch to submit and the rejections to report.
    pub fn partition(&self, files: Vec<LocalFile>) -> (UploadBatch, Vec<ValidationError>) {
        let mut accepted = Vec::with_capacity(files.len());
        let mut rejected = Vec::new();
        for file in files {
            match self.validate(&file) {
                Ok(()) => accepted.push(file),
                Err(err) => rejected.push(err),
            }
        }
        (UploadBatch { files: accepted }, rejected)
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::multi_file(DEFAULT_MAX_SIZE_MB)
    }
}

/// Files accepted for one submission. Consumed by the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadBatch {
    pub files: Vec<LocalFile>,
}

impl UploadBatch {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn names(&self) -> Vec<String> {
        self.files.iter().map(|file| file.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_of_size(name: &str, size: usize) -> LocalFile {
        LocalFile::new(name, vec![0u8; size])
    }

    #[test]
    fn test_pdf_policy_accepts_declared_pdf() {
        let policy = UploadPolicy::single_pdf(10);
        let file = file_of_size("contract.pdf", 2 * 1024 * 1024).with_media_type("application/pdf");
        assert!(policy.validate(&file).is_ok());
    }

    #[test]
    fn test_pdf_policy_rejects_other_media_types() {
        let policy = UploadPolicy::single_pdf(10);
        let file = file_of_size("notes.pdf", 10).with_media_type("text/plain");
        let err = policy.validate(&file).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidType { .. }));
        assert_eq!(err.title(), "Invalid file type");
    }

    #[test]
    fn test_pdf_policy_guesses_media_type_from_name() {
        let policy = UploadPolicy::single_pdf(10);
        assert!(policy.validate(&file_of_size("scan.PDF", 10)).is_ok());
        assert!(policy.validate(&file_of_size("memo.docx", 10)).is_err());
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let policy = UploadPolicy::single_pdf(1);
        let exact = file_of_size("a.pdf", 1024 * 1024);
        let over = file_of_size("b.pdf", 1024 * 1024 + 1);
        assert!(policy.validate(&exact).is_ok());
        assert_eq!(
            policy.validate(&over),
            Err(ValidationError::TooLarge {
                name: "b.pdf".to_string(),
                size: 1024 * 1024 + 1,
                limit: 1024 * 1024,
            })
        );
    }

    #[test]
    fn test_multi_file_policy_accepts_by_extension() {
        let policy = UploadPolicy::multi_file(10);
        for name in ["a.pdf", "b.DOCX", "c.txt"] {
            assert!(policy.validate(&file_of_size(name, 1)).is_ok(), "{name}");
        }
        assert!(policy.validate(&file_of_size("d.png", 1)).is_err());
        assert!(policy.validate(&file_of_size("no_extension", 1)).is_err());
    }

    #[test]
    fn test_partition_keeps_only_accepted_files() {
        let policy = UploadPolicy::multi_file(10);
        let files = vec![
            file_of_size("ok.pdf", 10),
            file_of_size("huge.pdf", 15 * 1024 * 1024),
            file_of_size("image.png", 10),
            file_of_size("ok.txt", 10),
        ];

        let (batch, rejected) = policy.partition(files);

        assert_eq!(batch.names(), vec!["ok.pdf".to_string(), "ok.txt".to_string()]);
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0].file_name(), "huge.pdf");
        assert_eq!(rejected[1].file_name(), "image.png");
    }
}
