//! Upload pipeline: validate, submit as one batch, merge on success.

use crate::gate::BusyGate;
use crate::notifier::Notifier;
use crate::state::SessionState;
use lexrag_core::LexError;
use lexrag_core::gateway::BackendGateway;
use lexrag_core::message::Message;
use lexrag_core::notice::Notice;
use lexrag_core::upload::{LocalFile, UploadPolicy, ValidationError};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Why no request was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another upload is still outstanding
    Busy,
    /// Every file was rejected, or none were given
    NothingToUpload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadStatus {
    Uploaded {
        names: Vec<String>,
        chunks: Option<u32>,
    },
    Failed(LexError),
    Skipped(SkipReason),
}

/// Outcome of one `upload` call.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReport {
    pub rejected: Vec<ValidationError>,
    pub status: UploadStatus,
}

impl UploadReport {
    fn skipped(rejected: Vec<ValidationError>, reason: SkipReason) -> Self {
        Self {
            rejected,
            status: UploadStatus::Skipped(reason),
        }
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self.status, UploadStatus::Uploaded { .. })
    }
}

pub fn success_message(count: usize) -> Message {
    Message::assistant(format!(
        "Successfully processed {count} document(s). You can now ask questions!"
    ))
}

pub fn failure_message(backend_url: &str) -> Message {
    Message::assistant(format!(
        "Error uploading documents. Make sure the backend is running on {backend_url}"
    ))
}

fn success_notice(names: &[String], chunks: Option<u32>) -> Notice {
    let description = match chunks {
        Some(chunks) => format!("Processed {} chunks from {}", chunks, names.join(", ")),
        None => format!("Processed {}", names.join(", ")),
    };
    Notice::success("Upload successful!", description)
}

pub struct UploadPipeline {
    gateway: Arc<dyn BackendGateway>,
    gate: BusyGate,
    backend_url: String,
    notifier: Notifier,
}

impl UploadPipeline {
    pub fn new(
        gateway: Arc<dyn BackendGateway>,
        backend_url: impl Into<String>,
        notifier: Notifier,
    ) -> Self {
        Self {
            gateway,
            gate: BusyGate::new(),
            backend_url: backend_url.into(),
            notifier,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Validates `files` against `policy` and sends the accepted ones in a
    /// single request.
    ///
    /// Each rejected file produces an error notice. The batch is
    /// all-or-nothing: on failure the library is not touched.
    pub async fn upload(
        &self,
        state: &RwLock<SessionState>,
        policy: &UploadPolicy,
        files: Vec<LocalFile>,
    ) -> UploadReport {
        let Some(_guard) = self.gate.try_acquire() else {
            tracing::debug!("[UploadPipeline] Upload already in flight, ignoring");
            return UploadReport::skipped(Vec::new(), SkipReason::Busy);
        };

        let (batch, rejected) = policy.partition(files);
        for err in &rejected {
            tracing::info!("[UploadPipeline] Rejected '{}': {}", err.file_name(), err);
            self.notifier.notify(Notice::from(err));
        }

        if batch.is_empty() {
            return UploadReport::skipped(rejected, SkipReason::NothingToUpload);
        }

        let names = batch.names();
        tracing::info!("[UploadPipeline] Uploading {} file(s)", names.len());

        let status = match self.gateway.upload(batch).await {
            Ok(receipt) => {
                {
                    let mut state = state.write().await;
                    state.merge_documents(names.iter().cloned());
                    state.transcript.append_assistant(success_message(names.len()));
                }
                self.notifier.notify(success_notice(&names, receipt.chunks));
                UploadStatus::Uploaded {
                    names,
                    chunks: receipt.chunks,
                }
            }
            Err(e) => {
                tracing::warn!("[UploadPipeline] Upload failed: {}", e);
                state
                    .write()
                    .await
                    .transcript
                    .append_assistant(failure_message(&self.backend_url));
                self.notifier.notify(Notice::error(
                    "Upload failed",
                    format!("Please make sure the backend is running on {}", self.backend_url),
                ));
                UploadStatus::Failed(e)
            }
        };

        UploadReport { rejected, status }
    }
}
