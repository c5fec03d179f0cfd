pub mod dates;
pub mod entities;

use crate::domain::model::{
    ContentElement, DateMention, DocumentMetadata, EntityMention, LegalReference, ReferenceKind,
    References,
};
use chrono::{Datelike, NaiveDate, Utc};
use std::collections::{HashMap, HashSet};

/// Tunables for the extraction pass. Defaults mirror the constants the
/// extraction has always used: a ±50-char context window and a
/// 1800..=now+10 date plausibility corridor.
#[derive(Debug, Clone)]
pub struct ExtractionOptions {
    pub context_window_chars: usize,
    pub min_year: i32,
    pub max_year_offset: i32,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            context_window_chars: 50,
            min_year: 1800,
            max_year_offset: 10,
        }
    }
}

impl ExtractionOptions {
    pub fn max_year(&self) -> i32 {
        Utc::now().year() + self.max_year_offset
    }
}

#[derive(Debug, Clone)]
struct DateHit {
    date: NaiveDate,
    date_str: String,
    context: String,
    page: u32,
    fragment: String,
}

/// Runs the whole rule-based extraction pass over the parsed content and
/// assembles the document metadata: normalized dates with context, a
/// document-date guess, persons, letter references, and classified legal
/// references, each with the first page it occurs on.
pub fn extract_document_metadata(
    elements: &[ContentElement],
    doc_name: &str,
    opts: &ExtractionOptions,
) -> DocumentMetadata {
    let max_year = opts.max_year();

    let mut date_hits: Vec<DateHit> = Vec::new();
    let mut persons: HashMap<String, Vec<u32>> = HashMap::new();
    let mut letters: HashMap<String, Vec<u32>> = HashMap::new();
    let mut legal: HashMap<(ReferenceKind, String), Vec<u32>> = HashMap::new();

    for element in elements {
        let Some(text) = element.text.as_deref() else {
            continue;
        };
        if text.is_empty() {
            continue;
        }
        let page = element.page_number;

        for hit in dates::recognize_dates(text, opts.min_year, max_year) {
            date_hits.push(DateHit {
                context: dates::surrounding_context(
                    text,
                    hit.start,
                    hit.fragment.len(),
                    opts.context_window_chars,
                ),
                date: hit.date,
                date_str: hit.formatted,
                page,
                fragment: hit.fragment,
            });
        }

        for name in entities::find_persons(text) {
            persons.entry(name).or_default().push(page);
        }

        for name in entities::find_letter_references(text) {
            letters.entry(name).or_default().push(page);
        }

        for reference in entities::find_legal_references(text) {
            legal
                .entry((reference.kind, reference.reference))
                .or_default()
                .push(page);
        }
    }

    // 去重（同日期、同頁、同片段只留第一筆）再依 (日期, 頁碼) 排序
    let mut seen: HashSet<(String, u32, String)> = HashSet::new();
    let mut unique_dates: Vec<DateHit> = Vec::new();
    for hit in date_hits {
        let key = (hit.date_str.clone(), hit.page, hit.fragment.clone());
        if seen.insert(key) {
            unique_dates.push(hit);
        }
    }
    unique_dates.sort_by(|a, b| (a.date, a.page).cmp(&(b.date, b.page)));

    let document_date = pick_document_date(&unique_dates);
    if let Some(date) = &document_date {
        tracing::info!("Selected document_date: {} for '{}'", date, doc_name);
    }

    let dates = unique_dates
        .iter()
        .map(|hit| DateMention {
            date: hit.date_str.clone(),
            surrounding_context: hit.context.clone(),
        })
        .collect();

    DocumentMetadata {
        document_name: doc_name.to_string(),
        document_date,
        dates,
        references: References {
            letters_mentioned: format_entity_list(letters),
            laws_clauses_articles_acts: format_legal_references(legal),
            persons: format_entity_list(persons),
        },
    }
}

/// Document-date heuristic, in the order the extraction has always
/// preferred: page-1 dates whose context says "dated", else anything on
/// the first three pages, else any date at all; earliest wins.
fn pick_document_date(dates: &[DateHit]) -> Option<String> {
    if dates.is_empty() {
        return None;
    }

    let page1_dated: Vec<&DateHit> = dates
        .iter()
        .filter(|d| d.page == 1 && d.context.to_lowercase().contains("dated"))
        .collect();

    let candidates: Vec<&DateHit> = if !page1_dated.is_empty() {
        page1_dated
    } else {
        let early: Vec<&DateHit> = dates.iter().filter(|d| d.page <= 3).collect();
        if early.is_empty() {
            dates.iter().collect()
        } else {
            early
        }
    };

    candidates
        .into_iter()
        .min_by_key(|d| d.date)
        .map(|d| d.date_str.clone())
}

/// 每個名字只回報最早出現的頁碼，依 (頁碼, 名字) 排序
fn format_entity_list(items: HashMap<String, Vec<u32>>) -> Vec<EntityMention> {
    let mut result: Vec<EntityMention> = items
        .into_iter()
        .filter_map(|(name, pages)| {
            pages.iter().min().copied().map(|page_number| EntityMention {
                name,
                page_number,
            })
        })
        .collect();
    result.sort_by(|a, b| (a.page_number, &a.name).cmp(&(b.page_number, &b.name)));
    result
}

fn format_legal_references(items: HashMap<(ReferenceKind, String), Vec<u32>>) -> Vec<LegalReference> {
    let mut result: Vec<LegalReference> = items
        .into_iter()
        .filter_map(|((kind, reference), pages)| {
            pages.iter().min().copied().map(|page_number| LegalReference {
                reference,
                kind,
                page_number,
            })
        })
        .collect();
    result.sort_by(|a, b| {
        (a.page_number, a.kind, &a.reference).cmp(&(b.page_number, b.kind, &b.reference))
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ElementKind;

    fn paragraph(text: &str, page: u32) -> ContentElement {
        ContentElement::text_block(ElementKind::Paragraph, text, page)
    }

    #[test]
    fn test_full_metadata_extraction() {
        let elements = vec![
            paragraph(
                "This agreement dated 1st January 2023 between Mr. Foo Bar and Ms. Alice Wonder.",
                1,
            ),
            paragraph("Refer to Clause 5 of the Services Act.", 1),
            paragraph("Our letter Ref: XYZ/123 was sent on 3 February 2023.", 2),
        ];

        let metadata =
            extract_document_metadata(&elements, "dummy_agreement", &ExtractionOptions::default());

        assert_eq!(metadata.document_name, "dummy_agreement");
        assert_eq!(metadata.document_date.as_deref(), Some("2023-01-01"));
        assert_eq!(metadata.dates.len(), 2);
        assert_eq!(metadata.dates[0].date, "2023-01-01");
        assert_eq!(metadata.dates[1].date, "2023-02-03");

        let persons: Vec<&str> = metadata
            .references
            .persons
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(persons, vec!["Alice Wonder", "Foo Bar"]);

        assert!(metadata
            .references
            .letters_mentioned
            .iter()
            .any(|l| l.name == "Ref: XYZ/123" && l.page_number == 2));

        assert!(metadata
            .references
            .laws_clauses_articles_acts
            .iter()
            .any(|r| r.reference == "Clause 5" && r.kind == ReferenceKind::Clause));
        assert!(metadata
            .references
            .laws_clauses_articles_acts
            .iter()
            .any(|r| r.reference == "Services Act" && r.kind == ReferenceKind::Act));
    }

    #[test]
    fn test_document_date_prefers_dated_context_on_page_one() {
        let elements = vec![
            paragraph("Performance review occurred on 5 June 2019.", 1),
            paragraph("This deed is dated 10 August 2020.", 1),
        ];

        let metadata = extract_document_metadata(&elements, "deed", &ExtractionOptions::default());
        // 2019 較早，但只有 2020 的上下文含 "dated"
        assert_eq!(metadata.document_date.as_deref(), Some("2020-08-10"));
    }

    #[test]
    fn test_document_date_falls_back_to_early_pages() {
        let elements = vec![
            paragraph("Milestone on 9 April 2021.", 2),
            paragraph("Kickoff on 1 March 2021.", 3),
            paragraph("Wrap-up on 1 January 2021.", 7),
        ];

        let metadata = extract_document_metadata(&elements, "report", &ExtractionOptions::default());
        // 第 7 頁的日期更早，但 fallback 只看前三頁
        assert_eq!(metadata.document_date.as_deref(), Some("2021-03-01"));
    }

    #[test]
    fn test_document_date_last_resort_uses_all_pages() {
        let elements = vec![paragraph("Archived on 2 May 2018.", 9)];
        let metadata = extract_document_metadata(&elements, "annex", &ExtractionOptions::default());
        assert_eq!(metadata.document_date.as_deref(), Some("2018-05-02"));
    }

    #[test]
    fn test_duplicate_dates_on_same_page_deduplicated() {
        let elements = vec![
            paragraph("dated 1 January 2023", 1),
            paragraph("dated 1 January 2023", 1),
        ];
        let metadata = extract_document_metadata(&elements, "dup", &ExtractionOptions::default());
        assert_eq!(metadata.dates.len(), 1);
    }

    #[test]
    fn test_same_date_on_different_pages_kept() {
        let elements = vec![
            paragraph("dated 1 January 2023", 1),
            paragraph("dated 1 January 2023", 4),
        ];
        let metadata = extract_document_metadata(&elements, "dup", &ExtractionOptions::default());
        assert_eq!(metadata.dates.len(), 2);
    }

    #[test]
    fn test_person_first_page_reported() {
        let elements = vec![
            paragraph("Mr. Foo Bar appeared.", 3),
            paragraph("Mr. Foo Bar appeared again.", 1),
        ];
        let metadata = extract_document_metadata(&elements, "x", &ExtractionOptions::default());
        assert_eq!(metadata.references.persons.len(), 1);
        assert_eq!(metadata.references.persons[0].page_number, 1);
    }

    #[test]
    fn test_empty_content_yields_empty_metadata() {
        let metadata = extract_document_metadata(&[], "empty", &ExtractionOptions::default());
        assert!(metadata.document_date.is_none());
        assert!(metadata.dates.is_empty());
        assert!(metadata.references.persons.is_empty());
        assert!(metadata.references.letters_mentioned.is_empty());
        assert!(metadata.references.laws_clauses_articles_acts.is_empty());
    }

    #[test]
    fn test_legal_reference_sort_order() {
        let elements = vec![
            paragraph("See Clause 9 and Article 4 of the Stamp Act.", 1),
        ];
        let metadata = extract_document_metadata(&elements, "x", &ExtractionOptions::default());
        let kinds: Vec<ReferenceKind> = metadata
            .references
            .laws_clauses_articles_acts
            .iter()
            .map(|r| r.kind)
            .collect();
        // 同頁時依類型排序：act < article < clause
        assert_eq!(
            kinds,
            vec![ReferenceKind::Act, ReferenceKind::Article, ReferenceKind::Clause]
        );
    }

    #[test]
    fn test_repeated_legal_reference_reports_first_page() {
        let elements = vec![
            paragraph("Under Section 34 of the Arbitration Act.", 4),
            paragraph("Section 34 again.", 2),
        ];
        let metadata = extract_document_metadata(&elements, "x", &ExtractionOptions::default());
        let refs = &metadata.references.laws_clauses_articles_acts;

        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].reference, "Section 34");
        assert_eq!(refs[0].kind, ReferenceKind::Clause);
        assert_eq!(refs[0].page_number, 2);
        assert_eq!(refs[1].reference, "Arbitration Act");
        assert_eq!(refs[1].page_number, 4);
    }
}
