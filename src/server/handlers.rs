use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::model::{ContentElement, DocumentFormat, DocumentMetadata, SourceDocument};
use crate::domain::ports::Pipeline;
use crate::server::error::AppError;
use crate::server::AppState;

/// What `/ingest` returns: the parsed content plus the extracted
/// metadata. The audit fields stay in the persisted output file only.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub content: Vec<ContentElement>,
    pub metadata: DocumentMetadata,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "message": "API is up and running."
    }))
}

// body limit 超限時 axum 以 413 回報，其餘的 multipart 錯誤當作壞掉的請求
fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::BadRequest(format!("Malformed multipart body: {}", e))
    }
}

pub async fn ingest<P: Pipeline>(
    State(state): State<Arc<AppState<P>>>,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>, AppError> {
    // 取出 multipart 裡名為 "file" 的欄位
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("file") {
            let Some(filename) = field.file_name().map(str::to_string) else {
                return Err(AppError::BadRequest("No file provided.".to_string()));
            };
            let data = field.bytes().await.map_err(multipart_error)?;
            upload = Some((filename, data.to_vec()));
            break;
        }
    }

    let Some((filename, data)) = upload else {
        return Err(AppError::BadRequest("No file provided.".to_string()));
    };

    let Some(format) = DocumentFormat::from_filename(&filename) else {
        return Err(AppError::BadRequest(
            "Invalid file type. Only PDF and HTML files are accepted.".to_string(),
        ));
    };

    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty.".to_string()));
    }
    if data.len() > state.max_upload_bytes {
        return Err(AppError::PayloadTooLarge);
    }

    let processing_id = Uuid::new_v4().simple().to_string();
    let document = SourceDocument::new(&filename, format, data.clone());

    info!(
        "Ingesting '{}' ({} bytes, id: {})",
        filename,
        data.len(),
        processing_id
    );

    // 先把上傳檔落地，處理完（成功或失敗）一律清掉
    let extension = match format {
        DocumentFormat::Pdf => "pdf",
        DocumentFormat::Html => "html",
    };
    let upload_name = format!("{}_{}.{}", document.doc_name, processing_id, extension);
    let upload_path = state.upload_dir.join(&upload_name);
    tokio::fs::write(&upload_path, &data)
        .await
        .map_err(AppError::internal)?;

    let result = state.engine.run(&document, &filename, &processing_id).await;

    if let Err(e) = tokio::fs::remove_file(&upload_path).await {
        warn!(
            "Failed to clean up uploaded file {}: {}",
            upload_path.display(),
            e
        );
    }

    let report = result.map_err(|e| {
        error!("Ingestion failed for '{}': {}", filename, e);
        AppError::from(e)
    })?;

    Ok(Json(IngestResponse {
        content: report.output.content,
        metadata: report.output.metadata,
    }))
}
