use crate::core::Pipeline;
use crate::domain::model::{IngestOutput, SourceDocument};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// The result of one ingestion run: the persisted output and where it
/// was written.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub output: IngestOutput,
    pub output_file: String,
}

/// Drives a document through the three pipeline stages.
pub struct IngestEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> IngestEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(pipeline: P, enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(enabled),
        }
    }

    pub async fn run(
        &self,
        document: &SourceDocument,
        source_filename: &str,
        processing_id: &str,
    ) -> Result<IngestReport> {
        tracing::info!(
            "Starting ingestion for '{}' (id: {})",
            source_filename,
            processing_id
        );

        // Extract: 轉檔 + 結構化解析
        let content = self.pipeline.extract(document).await?;
        tracing::info!("📄 Extracted {} content elements", content.len());
        self.monitor.log_stats("Extract");

        // Transform: metadata 萃取
        let metadata = self
            .pipeline
            .transform(&content, &document.doc_name)
            .await?;
        tracing::info!(
            "🔎 Extracted metadata: {} dates, {} persons, {} legal references, {} letters",
            metadata.dates.len(),
            metadata.references.persons.len(),
            metadata.references.laws_clauses_articles_acts.len(),
            metadata.references.letters_mentioned.len()
        );
        self.monitor.log_stats("Transform");

        // Load: 寫出 audit JSON
        let output = IngestOutput {
            source_filename: source_filename.to_string(),
            processing_id: processing_id.to_string(),
            content,
            metadata,
        };
        let output_file = self.pipeline.load(output.clone()).await?;
        tracing::info!("💾 Output saved to: {}", output_file);
        self.monitor.log_final_stats();

        Ok(IngestReport {
            output,
            output_file,
        })
    }
}
