use crate::domain::ports::DocumentConverter;
use crate::utils::error::{IngestError, Result};
use async_trait::async_trait;

/// Native converter: pulls per-page text straight out of the PDF and
/// synthesizes the minimal HTML the parse stage understands (one `<p>`
/// per paragraph, `<hr class="page-break">` between pages). No layout
/// analysis, so tables and figures come out as plain paragraphs.
pub struct TextConverter;

impl TextConverter {
    pub fn new() -> Self {
        Self
    }

    fn escape(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }

    /// 把單頁文字切成段落（以空白行為界）再包成 <p>
    fn page_to_html(page_text: &str, out: &mut String) {
        let mut paragraph = String::new();
        for line in page_text.lines() {
            if line.trim().is_empty() {
                if !paragraph.trim().is_empty() {
                    out.push_str("<p>");
                    out.push_str(&Self::escape(paragraph.trim()));
                    out.push_str("</p>\n");
                }
                paragraph.clear();
            } else {
                if !paragraph.is_empty() {
                    paragraph.push(' ');
                }
                paragraph.push_str(line.trim());
            }
        }
        if !paragraph.trim().is_empty() {
            out.push_str("<p>");
            out.push_str(&Self::escape(paragraph.trim()));
            out.push_str("</p>\n");
        }
    }
}

impl Default for TextConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentConverter for TextConverter {
    async fn to_html(&self, pdf_bytes: &[u8], doc_name: &str) -> Result<String> {
        tracing::debug!("Extracting text from PDF: {}", doc_name);

        // pdf-extract 是同步的 CPU-bound 工作，移到 blocking thread
        let bytes = pdf_bytes.to_vec();
        let pages = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
        })
        .await
        .map_err(|e| IngestError::ProcessingError {
            message: format!("PDF extraction task failed: {}", e),
        })?
        .map_err(|e| IngestError::PdfError {
            message: e.to_string(),
        })?;

        if pages.iter().all(|p| p.trim().is_empty()) {
            return Err(IngestError::PdfError {
                message: format!("no extractable text in '{}'", doc_name),
            });
        }

        let mut html = String::from("<html><body>\n");
        for (i, page) in pages.iter().enumerate() {
            if i > 0 {
                html.push_str("<hr class=\"page-break\">\n");
            }
            Self::page_to_html(page, &mut html);
        }
        html.push_str("</body></html>\n");

        tracing::debug!("Synthesized HTML for {} pages of {}", pages.len(), doc_name);
        Ok(html)
    }
}
