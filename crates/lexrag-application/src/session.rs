//! Composition root for one client session.
//!
//! `SessionController` owns the in-memory state, the shared busy gate and
//! the three services, and exposes the read model and actions the view
//! layer drives. Nothing here is fatal: every failure is turned into a
//! transcript message, a notice, or a returned error, and the session stays
//! usable.

use crate::conversation::{ConversationEngine, ConversationPhase, IgnoreReason, SubmitOutcome};
use crate::gate::BusyGate;
use crate::library::LibraryService;
use crate::notifier::Notifier;
use crate::state::SessionState;
use crate::upload::{SkipReason, UploadPipeline, UploadReport, UploadStatus};
use lexrag_core::analysis::{Clause, ComparisonReport};
use lexrag_core::config::ClientConfig;
use lexrag_core::gateway::BackendGateway;
use lexrag_core::library::DocumentRef;
use lexrag_core::message::Message;
use lexrag_core::notice::Notice;
use lexrag_core::upload::{LocalFile, UploadPolicy};
use lexrag_core::{LexError, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

pub const CLEARED_MESSAGE: &str = "The document library has been cleared.";

pub struct SessionController {
    state: RwLock<SessionState>,
    /// Shared by ask, upload, compare and clear
    busy: BusyGate,
    gateway: Arc<dyn BackendGateway>,
    library: LibraryService,
    uploads: UploadPipeline,
    conversation: ConversationEngine,
    config: ClientConfig,
    notifier: Notifier,
}

impl SessionController {
    pub fn new(
        gateway: Arc<dyn BackendGateway>,
        config: ClientConfig,
        notices: UnboundedSender<Notice>,
    ) -> Self {
        let notifier = Notifier::new(notices);
        Self {
            state: RwLock::new(SessionState::new()),
            busy: BusyGate::new(),
            library: LibraryService::new(gateway.clone()),
            uploads: UploadPipeline::new(gateway.clone(), &config.backend_url, notifier.clone()),
            conversation: ConversationEngine::new(gateway.clone(), &config.backend_url),
            gateway,
            config,
            notifier,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Loads the library in the background. Not gated by `busy`.
    pub fn start(self: &Arc<Self>) -> JoinHandle<bool> {
        let session = Arc::clone(self);
        tokio::spawn(async move { session.load_library().await })
    }

    /// Re-fetches the document list. Failures are only logged.
    pub async fn load_library(&self) -> bool {
        self.library.load(&self.state).await
    }

    // === Read model ===

    pub async fn messages(&self) -> Vec<Message> {
        self.state.read().await.transcript.messages().to_vec()
    }

    pub async fn documents(&self) -> Vec<DocumentRef> {
        self.state.read().await.library.entries().to_vec()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn conversation_phase(&self) -> ConversationPhase {
        self.conversation.phase()
    }

    // === Actions ===

    pub async fn submit_question(&self, text: &str) -> SubmitOutcome {
        if text.trim().is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::EmptyInput);
        }
        let Some(_guard) = self.busy.try_acquire() else {
            return SubmitOutcome::Ignored(IgnoreReason::Busy);
        };
        self.conversation.submit(&self.state, text).await
    }

    /// Library upload of several files, checked by extension.
    pub async fn upload_files(&self, files: Vec<LocalFile>) -> UploadReport {
        self.upload_with(self.config.upload_policy(), files).await
    }

    /// Single-file upload, PDF only.
    pub async fn upload_single(&self, file: LocalFile) -> UploadReport {
        self.upload_with(self.config.single_file_policy(), vec![file])
            .await
    }

    async fn upload_with(&self, policy: UploadPolicy, files: Vec<LocalFile>) -> UploadReport {
        let Some(_guard) = self.busy.try_acquire() else {
            tracing::debug!("[SessionController] Busy, upload ignored");
            return UploadReport {
                rejected: Vec::new(),
                status: UploadStatus::Skipped(SkipReason::Busy),
            };
        };
        self.uploads.upload(&self.state, &policy, files).await
    }

    /// Removes the document from the local library only.
    pub async fn remove_document(&self, name: &str) -> bool {
        let removed = self.library.remove(&self.state, name).await;
        if removed {
            self.notifier.notify(Notice::info(
                "Document deleted",
                format!("{name} has been removed"),
            ));
        }
        removed
    }

    /// Compares two local PDFs. Neither file is added to the library.
    pub async fn compare_documents(
        &self,
        first: LocalFile,
        second: LocalFile,
    ) -> Result<ComparisonReport> {
        let policy = self.config.single_file_policy();
        for file in [&first, &second] {
            if let Err(err) = policy.validate(file) {
                self.notifier.notify(Notice::from(&err));
                return Err(err.into());
            }
        }

        let _guard = self.busy.try_acquire().ok_or(LexError::Busy)?;
        tracing::info!(
            "[SessionController] Comparing '{}' with '{}'",
            first.name,
            second.name
        );
        self.gateway
            .compare(first, second)
            .await
            .inspect_err(|e| self.report("Failed to compare documents", e))
    }

    pub async fn clauses(&self, name: &str) -> Result<Vec<Clause>> {
        self.gateway
            .fetch_clauses(name)
            .await
            .inspect_err(|e| self.report("Failed to load clauses", e))
    }

    pub async fn document_bytes(&self, name: &str) -> Result<Vec<u8>> {
        self.gateway
            .fetch_document_blob(name)
            .await
            .inspect_err(|e| self.report("Failed to load document", e))
    }

    /// Drops every document on the backend, then empties the local library.
    pub async fn clear_knowledge_base(&self) -> Result<()> {
        let _guard = self.busy.try_acquire().ok_or(LexError::Busy)?;
        self.gateway
            .clear()
            .await
            .inspect_err(|e| self.report("Failed to clear documents", e))?;

        let mut state = self.state.write().await;
        state.library.clear();
        state
            .transcript
            .append_assistant(Message::assistant(CLEARED_MESSAGE));
        tracing::info!("[SessionController] Knowledge base cleared");
        Ok(())
    }

    fn report(&self, title: &str, err: &LexError) {
        tracing::warn!("[SessionController] {}: {}", title, err);
        self.notifier.notify(Notice::error(title, err.to_string()));
    }
}
