use std::path::Path;

use anyhow::{Context, Result};
use lexrag_core::upload::LocalFile;

/// Reads a file from disk. The media type is left for `LocalFile` to guess
/// from the extension.
pub async fn read_local_file(path: impl AsRef<Path>) -> Result<LocalFile> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Not a file path: {}", path.display()))?
        .to_string();
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(LocalFile::new(name, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nda.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let file = read_local_file(&path).await.unwrap();
        assert_eq!(file.name, "nda.pdf");
        assert_eq!(file.bytes, b"%PDF-1.7".to_vec());
        assert_eq!(file.effective_media_type(), "application/pdf");
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_local_file(dir.path().join("missing.pdf"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
