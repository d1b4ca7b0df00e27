//! In-memory gateway used by the application tests.

use async_trait::async_trait;
use lexrag_core::analysis::{Clause, ComparisonReport};
use lexrag_core::gateway::{AskResponse, BackendGateway, UploadReceipt};
use lexrag_core::upload::{LocalFile, UploadBatch};
use lexrag_core::{LexError, Result};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListDocuments,
    Upload(Vec<String>),
    Ask(String),
    FetchClauses(String),
    FetchBlob(String),
    Compare(String, String),
    Clear,
}

/// Parks a call until released, so tests can observe the in-flight state.
#[derive(Debug, Default)]
pub struct Hold {
    pub entered: Notify,
    pub release: Notify,
}

pub struct MockGateway {
    documents: Mutex<Result<Vec<String>>>,
    ask_reply: Mutex<Result<AskResponse>>,
    upload_reply: Mutex<Result<UploadReceipt>>,
    compare_reply: Mutex<Result<ComparisonReport>>,
    clauses_reply: Mutex<Result<Vec<Clause>>>,
    clear_reply: Mutex<Result<()>>,
    calls: Mutex<Vec<Call>>,
    /// Parks `ask` and `upload`
    hold: Option<Arc<Hold>>,
    /// Parks `list_documents`
    list_hold: Option<Arc<Hold>>,
}

pub fn unreachable() -> LexError {
    LexError::transport("connection refused")
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(Ok(Vec::new())),
            ask_reply: Mutex::new(Ok(AskResponse::default())),
            upload_reply: Mutex::new(Ok(UploadReceipt::default())),
            compare_reply: Mutex::new(Ok(ComparisonReport::default())),
            clauses_reply: Mutex::new(Ok(Vec::new())),
            clear_reply: Mutex::new(Ok(())),
            calls: Mutex::new(Vec::new()),
            hold: None,
            list_hold: None,
        }
    }

    /// Every operation fails as if the backend were down.
    pub fn offline() -> Self {
        let gateway = Self::new();
        gateway.set_documents(Err(unreachable()));
        gateway.set_answer(Err(unreachable()));
        gateway.set_upload(Err(unreachable()));
        *gateway.compare_reply.lock().unwrap() = Err(unreachable());
        *gateway.clauses_reply.lock().unwrap() = Err(unreachable());
        *gateway.clear_reply.lock().unwrap() = Err(unreachable());
        gateway
    }

    pub fn with_hold(mut self) -> (Self, Arc<Hold>) {
        let hold = Arc::new(Hold::default());
        self.hold = Some(hold.clone());
        (self, hold)
    }

    pub fn with_list_hold(mut self) -> (Self, Arc<Hold>) {
        let hold = Arc::new(Hold::default());
        self.list_hold = Some(hold.clone());
        (self, hold)
    }

    pub fn set_documents(&self, documents: Result<Vec<String>>) {
        *self.documents.lock().unwrap() = documents;
    }

    pub fn set_answer(&self, reply: Result<AskResponse>) {
        *self.ask_reply.lock().unwrap() = reply;
    }

    pub fn set_upload(&self, reply: Result<UploadReceipt>) {
        *self.upload_reply.lock().unwrap() = reply;
    }

    pub fn set_compare(&self, reply: Result<ComparisonReport>) {
        *self.compare_reply.lock().unwrap() = reply;
    }

    pub fn set_clauses(&self, reply: Result<Vec<Clause>>) {
        *self.clauses_reply.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn park(hold: &Option<Arc<Hold>>) {
        if let Some(hold) = hold {
            hold.entered.notify_one();
            hold.release.notified().await;
        }
    }
}

#[async_trait]
impl BackendGateway for MockGateway {
    async fn list_documents(&self) -> Result<Vec<String>> {
        self.record(Call::ListDocuments);
        Self::park(&self.list_hold).await;
        self.documents.lock().unwrap().clone()
    }

    async fn upload(&self, batch: UploadBatch) -> Result<UploadReceipt> {
        self.record(Call::Upload(batch.names()));
        Self::park(&self.hold).await;
        self.upload_reply.lock().unwrap().clone()
    }

    async fn ask(&self, question: &str) -> Result<AskResponse> {
        self.record(Call::Ask(question.to_string()));
        Self::park(&self.hold).await;
        self.ask_reply.lock().unwrap().clone()
    }

    async fn fetch_clauses(&self, document: &str) -> Result<Vec<Clause>> {
        self.record(Call::FetchClauses(document.to_string()));
        self.clauses_reply.lock().unwrap().clone()
    }

    async fn fetch_document_blob(&self, document: &str) -> Result<Vec<u8>> {
        self.record(Call::FetchBlob(document.to_string()));
        Err(LexError::http_status(404, "Document not found"))
    }

    async fn compare(&self, first: LocalFile, second: LocalFile) -> Result<ComparisonReport> {
        self.record(Call::Compare(first.name, second.name));
        self.compare_reply.lock().unwrap().clone()
    }

    async fn clear(&self) -> Result<()> {
        self.record(Call::Clear);
        self.clear_reply.lock().unwrap().clone()
    }
}

pub fn pdf(name: &str, size: usize) -> LocalFile {
    LocalFile::new(name, vec![0u8; size]).with_media_type("application/pdf")
}
