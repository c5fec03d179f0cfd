use clap::Parser;
use lex_ingest::domain::ports::{ConfigProvider, DocumentConverter};
use lex_ingest::server::{self, AppState};
use lex_ingest::utils::{logger, validation::Validate};
use lex_ingest::{CliConfig, IngestEngine, IngestPipeline, LocalStorage, RemoteConverter, TextConverter};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = CliConfig::parse();

    // 初始化日誌：伺服器預設輸出 JSON，--verbose 時改用人類可讀格式
    if config.verbose {
        logger::init_cli_logger(true);
    } else {
        logger::init_server_logger();
    }

    tracing::info!("Starting lex-ingest service");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 選擇 PDF 轉換器：有設定 endpoint 走遠端，否則本地文字抽取
    let converter: Arc<dyn DocumentConverter> = match &config.converter_endpoint {
        Some(endpoint) => {
            tracing::info!("Using remote PDF converter at {}", endpoint);
            Arc::new(RemoteConverter::new(
                endpoint.clone(),
                config.converter_timeout_seconds,
            )?)
        }
        None => {
            tracing::info!("No converter endpoint configured, using native text extraction");
            Arc::new(TextConverter::new())
        }
    };

    let addr = format!("{}:{}", config.host, config.port);
    let upload_dir = std::path::PathBuf::from(&config.upload_path);
    let max_upload_bytes = config.max_upload_bytes();
    let monitor_enabled = config.monitor;

    // 創建存儲和管道
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = IngestPipeline::new(storage, config, converter);
    let engine = IngestEngine::new_with_monitoring(pipeline, monitor_enabled);

    let state = Arc::new(AppState {
        engine,
        upload_dir,
        max_upload_bytes,
    });

    server::serve(state, &addr).await?;

    Ok(())
}
