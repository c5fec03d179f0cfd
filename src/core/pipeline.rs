use crate::domain::model::{
    ContentElement, DocumentFormat, DocumentMetadata, IngestOutput, SourceDocument,
};
use crate::domain::ports::{ConfigProvider, DocumentConverter, Pipeline, Storage};
use crate::extract::{extract_document_metadata, ExtractionOptions};
use crate::parse::parse_html;
use crate::utils::error::{IngestError, Result};
use std::sync::Arc;

/// The document-ingestion pipeline: PDF (or HTML) in, structured content
/// plus metadata out, audit JSON persisted through `Storage`.
pub struct IngestPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    converter: Arc<dyn DocumentConverter>,
}

impl<S: Storage, C: ConfigProvider> IngestPipeline<S, C> {
    pub fn new(storage: S, config: C, converter: Arc<dyn DocumentConverter>) -> Self {
        Self {
            storage,
            config,
            converter,
        }
    }

    fn extraction_options(&self) -> ExtractionOptions {
        ExtractionOptions {
            context_window_chars: self.config.context_window_chars(),
            min_year: self.config.min_year(),
            max_year_offset: self.config.max_year_offset(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for IngestPipeline<S, C> {
    async fn extract(&self, document: &SourceDocument) -> Result<Vec<ContentElement>> {
        let html = match document.format {
            DocumentFormat::Pdf => {
                tracing::debug!("Converting PDF '{}' to HTML", document.doc_name);
                self.converter
                    .to_html(&document.bytes, &document.doc_name)
                    .await?
            }
            // HTML 上傳跳過轉換，直接解析
            DocumentFormat::Html => String::from_utf8_lossy(&document.bytes).into_owned(),
        };

        let elements = parse_html(&html);
        tracing::debug!(
            "Parsed {} structured elements from '{}'",
            elements.len(),
            document.doc_name
        );

        if elements.is_empty() {
            return Err(IngestError::HtmlParseError {
                message: format!(
                    "no recognizable content elements in '{}'",
                    document.doc_name
                ),
            });
        }

        Ok(elements)
    }

    async fn transform(
        &self,
        elements: &[ContentElement],
        doc_name: &str,
    ) -> Result<DocumentMetadata> {
        let opts = self.extraction_options();
        tracing::debug!(
            "Extracting metadata from {} elements of '{}'",
            elements.len(),
            doc_name
        );
        Ok(extract_document_metadata(elements, doc_name, &opts))
    }

    async fn load(&self, output: IngestOutput) -> Result<String> {
        let filename = format!(
            "{}_{}_processed_output.json",
            output.metadata.document_name, output.processing_id
        );

        let json_data = serde_json::to_string_pretty(&output)?;
        self.storage.write_file(&filename, json_data.as_bytes()).await?;

        let output_path = format!("{}/{}", self.config.output_path(), filename);
        tracing::debug!("Processed output saved to {}", output_path);
        Ok(output_path)
    }
}
