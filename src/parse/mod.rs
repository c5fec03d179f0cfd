use crate::domain::model::{ContentElement, ElementKind};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;

// 解析 converter 產出的 HTML 時關注的標籤
static RELEVANT_TAGS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("p, h1, h2, h3, h4, h5, h6, ul, ol, table, figure, hr")
        .expect("static selector")
});

static LI: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").expect("static selector"));
static IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").expect("static selector"));
static FIGCAPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("figcaption").expect("static selector"));

/// Flattens converter HTML into an ordered list of content elements with
/// page attribution. Pages start at 1; an `<hr class="page-break">`
/// advances the counter. Elements living inside a `table` or `figure`
/// are owned by their container and not re-emitted.
pub fn parse_html(html: &str) -> Vec<ContentElement> {
    let document = Html::parse_document(html);
    let mut elements: Vec<ContentElement> = Vec::new();
    let mut current_page: u32 = 1;

    for element in document.select(&RELEVANT_TAGS) {
        let tag = element.value().name();

        if tag == "hr" {
            if has_class(&element, "page-break") {
                current_page += 1;
            }
            continue;
        }

        // 巢狀在 table / figure 內的元素由容器本身處理
        // （深度 4：html5ever 會自動補上 tbody，td > tr > tbody > table）
        if has_container_ancestor(&element, 4) {
            continue;
        }

        let text = normalized_text(&element);

        let candidate = match tag {
            "p" => {
                if text.is_empty() {
                    continue;
                }
                Some(ContentElement::text_block(
                    ElementKind::Paragraph,
                    text,
                    current_page,
                ))
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                if text.is_empty() {
                    continue;
                }
                Some(ContentElement::text_block(
                    ElementKind::Header,
                    text,
                    current_page,
                ))
            }
            "ul" | "ol" => {
                // 只取直接子層的 li，每個 li 單獨成為一個元素
                for li in direct_children(&element, "li") {
                    let li_text = normalized_text(&li);
                    if !li_text.is_empty() {
                        elements.push(ContentElement::text_block(
                            ElementKind::ListItem,
                            li_text,
                            current_page,
                        ));
                    }
                }
                continue;
            }
            "table" => {
                if has_ancestor(&element, "table") {
                    continue;
                }
                let table_html = element.html();
                if text.is_empty() && !table_html.to_lowercase().contains("<td") {
                    continue;
                }
                Some(ContentElement {
                    kind: ElementKind::Table,
                    text: Some(text),
                    html: Some(table_html),
                    image_filename: None,
                    caption: None,
                    page_number: current_page,
                    metadata: HashMap::new(),
                })
            }
            "figure" => figure_element(&element, current_page),
            _ => None,
        };

        if let Some(candidate) = candidate {
            if !is_duplicate_of_last(&elements, &candidate) {
                elements.push(candidate);
            }
        }
    }

    elements
}

/// 連續重複元素（同 kind、同文字、同頁、同圖檔）視為 converter 的殘影，丟棄
fn is_duplicate_of_last(elements: &[ContentElement], candidate: &ContentElement) -> bool {
    elements.last().is_some_and(|last| {
        last.kind == candidate.kind
            && last.text == candidate.text
            && last.page_number == candidate.page_number
            && last.image_filename == candidate.image_filename
    })
}

fn figure_element(element: &ElementRef, page: u32) -> Option<ContentElement> {
    let img = element.select(&IMG).next()?;
    let src = img.value().attr("src")?;
    let image_filename = std::path::Path::new(src)
        .file_name()
        .and_then(|n| n.to_str())?
        .to_string();
    if image_filename.is_empty() {
        return None;
    }

    let caption = element
        .select(&FIGCAPTION)
        .next()
        .map(|c| normalized_text(&c))
        .unwrap_or_default();

    Some(ContentElement {
        kind: ElementKind::Figure,
        text: None,
        html: None,
        image_filename: Some(image_filename),
        caption: Some(caption),
        page_number: page,
        metadata: HashMap::new(),
    })
}

fn normalized_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(|t| t.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

fn has_class(element: &ElementRef, class: &str) -> bool {
    element
        .value()
        .attr("class")
        .is_some_and(|c| c.split_whitespace().any(|c| c == class))
}

fn has_container_ancestor(element: &ElementRef, limit: usize) -> bool {
    element
        .ancestors()
        .take(limit)
        .filter_map(|n| n.value().as_element())
        .any(|el| el.name() == "table" || el.name() == "figure")
}

fn has_ancestor(element: &ElementRef, tag: &str) -> bool {
    element
        .ancestors()
        .filter_map(|n| n.value().as_element())
        .any(|el| el.name() == tag)
}

fn direct_children<'a>(element: &ElementRef<'a>, tag: &str) -> Vec<ElementRef<'a>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == tag)
        .collect()
}
