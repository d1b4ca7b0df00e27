//! Domain layer of the LexRAG client.
//!
//! # Module Structure
//!
//! - `message`: transcript entries and the append-only `Transcript`
//! - `library`: `DocumentRef` and the name-keyed `DocumentLibrary`
//! - `upload`: local files, `UploadPolicy` validation and `UploadBatch`
//! - `analysis`: clause and comparison payloads
//! - `gateway`: the `BackendGateway` trait and its response types
//! - `notice`: transient notifications for the view layer
//! - `config`: `ClientConfig`

pub mod analysis;
pub mod config;
pub mod error;
pub mod gateway;
pub mod library;
pub mod message;
pub mod notice;
pub mod upload;

// Re-export common error type
pub use error::{LexError, Result};
