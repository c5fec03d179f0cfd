use crate::domain::ports::DocumentConverter;
use crate::utils::error::{IngestError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Remote converter: ships the PDF to a Docling-compatible sidecar that
/// answers with the document rendered as HTML. Layout-aware conversion
/// (tables, figures, page breaks) happens on that side.
pub struct RemoteConverter {
    endpoint: String,
    client: Client,
}

impl RemoteConverter {
    pub fn new(endpoint: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

#[async_trait]
impl DocumentConverter for RemoteConverter {
    async fn to_html(&self, pdf_bytes: &[u8], doc_name: &str) -> Result<String> {
        tracing::debug!(
            "Sending {} bytes of '{}' to converter: {}",
            pdf_bytes.len(),
            doc_name,
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/pdf")
            .header("X-Doc-Name", doc_name)
            .body(pdf_bytes.to_vec())
            .send()
            .await?;

        tracing::debug!("Converter response status: {}", response.status());

        if !response.status().is_success() {
            return Err(IngestError::ProcessingError {
                message: format!(
                    "converter returned status {} for '{}'",
                    response.status(),
                    doc_name
                ),
            });
        }

        let html = response.text().await?;
        if html.trim().is_empty() {
            return Err(IngestError::ProcessingError {
                message: format!("converter returned an empty body for '{}'", doc_name),
            });
        }

        Ok(html)
    }
}
