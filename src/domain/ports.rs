use crate::domain::model::{ContentElement, DocumentMetadata, IngestOutput, SourceDocument};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn converter_endpoint(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn context_window_chars(&self) -> usize;
    fn min_year(&self) -> i32;
    fn max_year_offset(&self) -> i32;
    fn max_upload_bytes(&self) -> usize;
}

/// 把 PDF 轉成 HTML 的轉換器（本地文字抽取或遠端 sidecar）
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    async fn to_html(&self, pdf_bytes: &[u8], doc_name: &str) -> Result<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, document: &SourceDocument) -> Result<Vec<ContentElement>>;
    async fn transform(
        &self,
        elements: &[ContentElement],
        doc_name: &str,
    ) -> Result<DocumentMetadata>;
    async fn load(&self, output: IngestOutput) -> Result<String>;
}
