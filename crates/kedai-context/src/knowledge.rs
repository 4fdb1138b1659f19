// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Product knowledge document loaded once at startup.
//!
//! The document is either plain text or a PDF catalogue (chosen by a `.pdf`
//! extension). PDF text is extracted once; pages are not kept.

use std::path::Path;

use kedai_core::KedaiError;
use tracing::{debug, info};

/// Product document the reply model answers from.
#[derive(Debug, Clone)]
pub struct ProductKnowledge {
    text: String,
}

impl ProductKnowledge {
    /// Reads the document. A missing, unreadable or blank document is an error.
    pub async fn load(path: &str) -> Result<Self, KedaiError> {
        let content = if is_pdf(path) {
            read_pdf(path).await?
        } else {
            tokio::fs::read_to_string(path).await.map_err(|e| {
                KedaiError::Config(format!("failed to read product knowledge {path}: {e}"))
            })?
        };
        let knowledge = Self::from_text(content)
            .ok_or_else(|| KedaiError::Config(format!("product knowledge {path} is empty")))?;
        info!(path, bytes = knowledge.text.len(), "product knowledge loaded");
        Ok(knowledge)
    }

    /// Wraps in-memory text, or `None` when blank.
    pub fn from_text(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            text: trimmed.to_string(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

fn is_pdf(path: &str) -> bool {
    Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

async fn read_pdf(path: &str) -> Result<String, KedaiError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        KedaiError::Config(format!("failed to read product knowledge {path}: {e}"))
    })?;
    debug!(path, bytes = bytes.len(), "extracting product knowledge from PDF");

    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| KedaiError::Config(format!("PDF extraction of {path} aborted: {e}")))?;
    extracted.map_err(|e| KedaiError::Config(format!("failed to extract text from {path}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn loads_trimmed_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "\n  Serum Waiteu 30ml: Rp 89.000  \n").unwrap();
        let knowledge = ProductKnowledge::load(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(knowledge.text(), "Serum Waiteu 30ml: Rp 89.000");
    }

    #[tokio::test]
    async fn missing_file_is_fatal() {
        let err = ProductKnowledge::load("/nonexistent/kedai/data_produk.txt").await.unwrap_err();
        assert!(matches!(err, KedaiError::Config(_)));
    }

    #[tokio::test]
    async fn blank_file_is_fatal() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = ProductKnowledge::load(file.path().to_str().unwrap()).await.unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn pdf_is_chosen_by_extension() {
        assert!(is_pdf("data_produk.pdf"));
        assert!(is_pdf("/srv/kedai/KATALOG.PDF"));
        assert!(!is_pdf("data_produk.txt"));
        assert!(!is_pdf("pdf"));
    }

    #[tokio::test]
    async fn extracts_text_from_pdf_catalogue() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/katalog.pdf");
        let knowledge = ProductKnowledge::load(path).await.unwrap();
        assert!(knowledge.text().contains("Waiteu"), "text: {:?}", knowledge.text());
        assert!(knowledge.text().contains("gram"));
    }

    #[tokio::test]
    async fn corrupt_pdf_is_fatal() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        write!(file, "not a pdf at all").unwrap();
        let err = ProductKnowledge::load(file.path().to_str().unwrap()).await.unwrap_err();
        assert!(matches!(err, KedaiError::Config(_)));
    }
}
