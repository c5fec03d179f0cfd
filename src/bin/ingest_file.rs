use clap::Parser;
use lex_ingest::config::service_config::{OutputSection, PipelineInfo};
use lex_ingest::domain::model::{DocumentFormat, SourceDocument};
use lex_ingest::domain::ports::{ConfigProvider, DocumentConverter};
use lex_ingest::utils::{logger, validation::Validate};
use lex_ingest::{
    IngestEngine, IngestPipeline, LocalStorage, RemoteConverter, ServiceConfig, TextConverter,
};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// One-shot ingestion: run a single PDF/HTML file through the pipeline
/// without standing up the HTTP server.
#[derive(Debug, Parser)]
#[command(name = "ingest_file")]
#[command(about = "Process a single document through the ingestion pipeline")]
struct Args {
    /// PDF or HTML file to process
    file: PathBuf,

    /// Optional TOML service configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the output directory
    #[arg(long)]
    output_path: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    verbose: bool,

    #[arg(long, help = "Enable system resource monitoring")]
    monitor: bool,
}

fn default_config() -> ServiceConfig {
    ServiceConfig {
        pipeline: PipelineInfo {
            name: "lex-ingest".to_string(),
            description: "Legal document ingestion".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        service: None,
        converter: None,
        extraction: None,
        output: OutputSection {
            output_path: "./processed_outputs".to_string(),
            upload_path: None,
        },
        monitoring: None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let mut config = match &args.config {
        Some(path) => ServiceConfig::from_file(path)?,
        None => default_config(),
    };
    if let Some(output_path) = args.output_path {
        config.output.output_path = output_path;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let filename = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string();

    let Some(format) = DocumentFormat::from_filename(&filename) else {
        eprintln!("❌ Unsupported file type: {}. Only .pdf and .html are accepted.", filename);
        std::process::exit(1);
    };

    let bytes = tokio::fs::read(&args.file).await?;
    let document = SourceDocument::new(&filename, format, bytes);

    let converter: Arc<dyn DocumentConverter> = match config.converter_endpoint() {
        Some(endpoint) => Arc::new(RemoteConverter::new(
            endpoint.to_string(),
            config.converter_timeout_seconds(),
        )?),
        None => Arc::new(TextConverter::new()),
    };

    let monitor_enabled = args.monitor || config.monitoring_enabled();
    let storage = LocalStorage::new(config.output.output_path.clone());
    let pipeline = IngestPipeline::new(storage, config, converter);
    let engine = IngestEngine::new_with_monitoring(pipeline, monitor_enabled);

    let processing_id = Uuid::new_v4().simple().to_string();

    match engine.run(&document, &filename, &processing_id).await {
        Ok(report) => {
            tracing::info!("✅ Ingestion completed successfully!");
            tracing::info!("📁 Output saved to: {}", report.output_file);
            println!("✅ Ingestion completed successfully!");
            println!("📁 Output saved to: {}", report.output_file);
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Ingestion failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                lex_ingest::utils::error::ErrorSeverity::Low => 0,
                lex_ingest::utils::error::ErrorSeverity::Medium => 2,
                lex_ingest::utils::error::ErrorSeverity::High => 1,
                lex_ingest::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
