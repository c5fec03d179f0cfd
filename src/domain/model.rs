use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 文件內容元素的種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Paragraph,
    Header,
    ListItem,
    Table,
    Figure,
}

/// A single structured element extracted from the converted document,
/// attributed to the page it appeared on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentElement {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub page_number: u32,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ContentElement {
    pub fn text_block(kind: ElementKind, text: impl Into<String>, page_number: u32) -> Self {
        Self {
            kind,
            text: Some(text.into()),
            html: None,
            image_filename: None,
            caption: None,
            page_number,
            metadata: HashMap::new(),
        }
    }
}

/// 標準化後的日期（YYYY-MM-DD）與其出現的上下文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateMention {
    pub date: String,
    pub surrounding_context: String,
}

/// A named entity (person or letter reference) and the first page it
/// occurs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMention {
    pub name: String,
    pub page_number: u32,
}

// 變體順序即排序順序（與字串排序 act < article < clause < precedent 一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Act,
    Article,
    Clause,
    Precedent,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Act => "act",
            ReferenceKind::Article => "article",
            ReferenceKind::Clause => "clause",
            ReferenceKind::Precedent => "precedent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalReference {
    pub reference: String,
    #[serde(rename = "type")]
    pub kind: ReferenceKind,
    pub page_number: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct References {
    pub letters_mentioned: Vec<EntityMention>,
    pub laws_clauses_articles_acts: Vec<LegalReference>,
    pub persons: Vec<EntityMention>,
}

/// 整份文件的 metadata 彙整結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub document_name: String,
    pub document_date: Option<String>,
    pub dates: Vec<DateMention>,
    pub references: References,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Html,
}

impl DocumentFormat {
    /// 依副檔名判斷文件格式
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = std::path::Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())?
            .to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "html" | "htm" => Some(DocumentFormat::Html),
            _ => None,
        }
    }
}

/// An uploaded document waiting to be processed.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub doc_name: String,
    pub format: DocumentFormat,
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn new(filename: &str, format: DocumentFormat, bytes: Vec<u8>) -> Self {
        let doc_name = std::path::Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(filename)
            .to_string();
        Self {
            doc_name,
            format,
            bytes,
        }
    }
}

/// The full processing result: what the load stage persists. The HTTP
/// response carries only `content` and `metadata`; the saved file adds
/// the audit fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestOutput {
    pub source_filename: String,
    pub processing_id: String,
    pub content: Vec<ContentElement>,
    pub metadata: DocumentMetadata,
}
