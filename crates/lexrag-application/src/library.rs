use crate::state::SessionState;
use lexrag_core::gateway::BackendGateway;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keeps the session's document library in step with the backend.
pub struct LibraryService {
    gateway: Arc<dyn BackendGateway>,
}

impl LibraryService {
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self { gateway }
    }

    /// Replaces the library with the backend's list. Uploads that complete
    /// while the request is in flight stay in the library.
    ///
    /// Returns `false` when the backend could not be reached; the library is
    /// left as it was and nothing is surfaced to the user.
    pub async fn load(&self, state: &RwLock<SessionState>) -> bool {
        let generation = state.read().await.merge_generation();
        match self.gateway.list_documents().await {
            Ok(names) => {
                let mut state = state.write().await;
                state.reconcile_library(names, generation);
                tracing::debug!(
                    "[LibraryService] Loaded {} document(s)",
                    state.library.len()
                );
                true
            }
            Err(e) => {
                tracing::warn!("[LibraryService] Failed to load documents: {}", e);
                false
            }
        }
    }

    /// Drops the entry from the local view only. The backend has no
    /// per-document delete, so the next `load` brings it back.
    pub async fn remove(&self, state: &RwLock<SessionState>, name: &str) -> bool {
        let removed = state.write().await.library.remove(name);
        if removed {
            tracing::info!("[LibraryService] Removed '{}' from the local library", name);
        } else {
            tracing::debug!("[LibraryService] '{}' not in library", name);
        }
        removed
    }
}
