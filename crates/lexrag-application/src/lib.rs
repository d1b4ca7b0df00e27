//! Application layer: the session's services and their composition.
//!
//! # Module Structure
//!
//! - `library`: keeps the document library in step with the backend
//! - `upload`: validation and batch submission of local files
//! - `conversation`: the question/answer state machine
//! - `session`: `SessionController`, the single entry point for views
//! - `gate`, `notifier`, `state`: shared plumbing

pub mod conversation;
pub mod gate;
pub mod library;
pub mod notifier;
pub mod session;
pub mod state;
pub mod upload;

#[cfg(test)]
mod testing;

pub use conversation::{ConversationPhase, IgnoreReason, SubmitOutcome};
pub use session::SessionController;
pub use upload::{SkipReason, UploadReport, UploadStatus};
