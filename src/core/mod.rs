pub mod engine;
pub mod pipeline;

pub use crate::domain::model::{ContentElement, DocumentMetadata, IngestOutput, SourceDocument};
pub use crate::domain::ports::{ConfigProvider, DocumentConverter, Pipeline, Storage};
pub use crate::utils::error::Result;
