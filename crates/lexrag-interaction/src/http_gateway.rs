//! HttpBackendGateway - REST implementation of `BackendGateway`.
//!
//! Talks to the retrieval backend over plain HTTP. Every non-success status
//! and every connection or decode failure becomes `LexError::Transport`.

use async_trait::async_trait;
use lexrag_core::analysis::{Clause, ComparisonReport};
use lexrag_core::config::ClientConfig;
use lexrag_core::gateway::{AskResponse, BackendGateway, UploadReceipt};
use lexrag_core::upload::{LocalFile, UploadBatch};
use lexrag_core::{LexError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Multipart field shared by every uploaded file.
const FILES_FIELD: &str = "files";

/// Gateway implementation that talks to the backend's HTTP API.
#[derive(Clone)]
pub struct HttpBackendGateway {
    client: Client,
    base_url: Url,
}

impl HttpBackendGateway {
    /// Creates a gateway for `base_url` with network-default timeouts.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    /// Creates a gateway from the client configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|err| LexError::config(format!("Failed to build HTTP client: {err}")))?;
        Self::with_client(&config.backend_url, client)
    }

    fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| LexError::config(format!("Invalid backend URL '{base_url}': {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(LexError::config(format!(
                "Backend URL '{base_url}' cannot carry a path"
            )));
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Joins percent-encoded path segments onto the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, request: reqwest::RequestBuilder, operation: &str) -> Result<Response> {
        let response = request.send().await.map_err(|err| {
            tracing::warn!("[HttpBackendGateway] {} request failed: {}", operation, err);
            LexError::transport(format!("{operation} request failed: {err}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            tracing::warn!(
                "[HttpBackendGateway] {} returned {}: {}",
                operation,
                status,
                body_text
            );
            return Err(map_http_error(status, body_text));
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> Result<T> {
        self.send(request, operation)
            .await?
            .json::<T>()
            .await
            .map_err(|err| LexError::transport(format!("Failed to parse {operation} response: {err}")))
    }
}

#[async_trait]
impl BackendGateway for HttpBackendGateway {
    async fn list_documents(&self) -> Result<Vec<String>> {
        let body: DocumentsResponse = self
            .send_json(self.client.get(self.endpoint(&["documents"])), "list documents")
            .await?;
        Ok(body.documents)
    }

    async fn upload(&self, batch: UploadBatch) -> Result<UploadReceipt> {
        let count = batch.len();
        let form = build_form(batch.files)?;
        tracing::debug!("[HttpBackendGateway] Uploading {} file(s)", count);
        self.send_json(
            self.client.post(self.endpoint(&["upload"])).multipart(form),
            "upload",
        )
        .await
    }

    async fn ask(&self, question: &str) -> Result<AskResponse> {
        let request = AskRequest { question };
        self.send_json(
            self.client.post(self.endpoint(&["ask"])).json(&request),
            "ask",
        )
        .await
    }

    async fn fetch_clauses(&self, document: &str) -> Result<Vec<Clause>> {
        let body: ClausesResponse = self
            .send_json(
                self.client.get(self.endpoint(&["clauses", document])),
                "fetch clauses",
            )
            .await?;
        Ok(body.clauses)
    }

    async fn fetch_document_blob(&self, document: &str) -> Result<Vec<u8>> {
        let response = self
            .send(
                self.client.get(self.endpoint(&["document", document])),
                "fetch document",
            )
            .await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|err| LexError::transport(format!("Failed to read document body: {err}")))?;
        Ok(bytes.to_vec())
    }

    async fn compare(&self, first: LocalFile, second: LocalFile) -> Result<ComparisonReport> {
        let form = build_form(vec![first, second])?;
        self.send_json(
            self.client.post(self.endpoint(&["compare"])).multipart(form),
            "compare",
        )
        .await
    }

    async fn clear(&self) -> Result<()> {
        self.send(self.client.delete(self.endpoint(&["clear"])), "clear")
            .await?;
        Ok(())
    }
}

fn build_form(files: Vec<LocalFile>) -> Result<Form> {
    let mut form = Form::new();
    for file in files {
        let media_type = file.effective_media_type();
        let part = Part::bytes(file.bytes)
            .file_name(file.name.clone())
            .mime_str(&media_type)
            .map_err(|err| {
                LexError::transport(format!(
                    "Invalid media type '{media_type}' for '{}': {err}",
                    file.name
                ))
            })?;
        form = form.part(FILES_FIELD, part);
    }
    Ok(form)
}

#[derive(Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

#[derive(Deserialize)]
struct DocumentsResponse {
    #[serde(default)]
    documents: Vec<String>,
}

#[derive(Deserialize)]
struct ClausesResponse {
    #[serde(default)]
    clauses: Vec<Clause>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    detail: String,
}

/// Prefers the backend's `{"detail": ...}` message over the raw body.
fn map_http_error(status: StatusCode, body: String) -> LexError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.detail)
        .unwrap_or(body);
    LexError::http_status(status.as_u16(), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_segments() {
        let gateway = HttpBackendGateway::new("http://localhost:8000").unwrap();
        assert_eq!(
            gateway.endpoint(&["clauses", "Master Agreement.pdf"]).as_str(),
            "http://localhost:8000/clauses/Master%20Agreement.pdf"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let gateway = HttpBackendGateway::new("http://rag.internal/api/").unwrap();
        assert_eq!(gateway.base_url(), "http://rag.internal/api/");
        assert_eq!(
            gateway.endpoint(&["ask"]).as_str(),
            "http://rag.internal/api/ask"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        assert!(matches!(
            HttpBackendGateway::new("not a url"),
            Err(LexError::Config(_))
        ));
        assert!(matches!(
            HttpBackendGateway::new("mailto:someone@example.com"),
            Err(LexError::Config(_))
        ));
    }

    #[test]
    fn test_map_http_error_prefers_detail() {
        let err = map_http_error(
            StatusCode::BAD_REQUEST,
            r#"{"detail":"No valid documents"}"#.to_string(),
        );
        assert_eq!(err, LexError::http_status(400, "No valid documents"));

        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream down".to_string());
        assert_eq!(err, LexError::http_status(502, "upstream down"));
    }
}
