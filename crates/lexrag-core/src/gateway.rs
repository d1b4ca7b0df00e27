//! Backend gateway interface.
//!
//! The retrieval backend is reachable only through this small surface. The
//! trait keeps the session core independent of any HTTP client, so it can
//! be driven by an in-memory fake in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analysis::{Clause, ComparisonReport};
use crate::error::Result;
use crate::upload::{LocalFile, UploadBatch};

/// Reply to a question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub citations: Option<Vec<String>>,
}

impl AskResponse {
    pub fn answered(answer: impl Into<String>, citations: Vec<String>) -> Self {
        Self {
            answer: Some(answer.into()),
            citations: Some(citations),
        }
    }
}

/// Acknowledgement of an upload batch.
///
/// The backend reports totals only; per-file outcomes are not available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub chunks: Option<u32>,
}

/// Request/response access to the retrieval backend. Stateless.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Names of every document the backend has stored.
    async fn list_documents(&self) -> Result<Vec<String>>;

    /// Sends every file of the batch in one multipart request.
    async fn upload(&self, batch: UploadBatch) -> Result<UploadReceipt>;

    /// Asks one question against the indexed documents.
    async fn ask(&self, question: &str) -> Result<AskResponse>;

    /// Clauses extracted from a stored document.
    async fn fetch_clauses(&self, document: &str) -> Result<Vec<Clause>>;

    /// Raw bytes of a stored document, for the page renderer.
    async fn fetch_document_blob(&self, document: &str) -> Result<Vec<u8>>;

    /// Compares two local files without adding them to the library.
    async fn compare(&self, first: LocalFile, second: LocalFile) -> Result<ComparisonReport>;

    /// Drops every stored document and the search index.
    async fn clear(&self) -> Result<()>;
}
