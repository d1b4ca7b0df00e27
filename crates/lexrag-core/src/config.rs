//! Client configuration model.
//!
//! Loaded from `config.toml` by `lexrag_infrastructure::ConfigService`.

use serde::{Deserialize, Serialize};

use crate::upload::{DEFAULT_MAX_SIZE_MB, UploadPolicy};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the retrieval backend
    pub backend_url: String,
    /// Upload size cap in megabytes
    pub max_upload_mb: u64,
    /// Whole-request timeout; network defaults apply when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// `tracing` filter directive used by the binary
    pub log_filter: String,
}

impl ClientConfig {
    pub fn with_backend_url(mut self, backend_url: impl Into<String>) -> Self {
        self.backend_url = backend_url.into();
        self
    }

    /// Policy for the multi-file library upload.
    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy::multi_file(self.max_upload_mb)
    }

    /// Policy for the single-file uploader and the compare view.
    pub fn single_file_policy(&self) -> UploadPolicy {
        UploadPolicy::single_pdf(self.max_upload_mb)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            max_upload_mb: DEFAULT_MAX_SIZE_MB,
            request_timeout_secs: None,
            log_filter: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::AcceptRule;

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ClientConfig = toml::from_str(r#"backend_url = "http://rag:9000""#).unwrap();
        assert_eq!(config.backend_url, "http://rag:9000");
        assert_eq!(config.max_upload_mb, 10);
        assert_eq!(config.request_timeout_secs, None);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_policies_share_size_limit() {
        let config = ClientConfig {
            max_upload_mb: 25,
            ..ClientConfig::default()
        };
        assert_eq!(config.upload_policy().accept, AcceptRule::Extensions);
        assert_eq!(config.single_file_policy().accept, AcceptRule::PdfMediaType);
        assert_eq!(config.upload_policy().max_size_mb, 25);
        assert_eq!(config.single_file_policy().max_size_mb, 25);
    }
}
