use lex_ingest::extract::{extract_document_metadata, ExtractionOptions};
use lex_ingest::parse::parse_html;

// A converted judgment, three pages, the kind of layout the converter
// sidecar produces.
const JUDGMENT_HTML: &str = r#"
<html><body>
<h1>In the Court of Small Causes</h1>
<p>Suit No. 118 of 2019, heard on 12 February 2019.</p>
<hr class="page-break"/>
<p>The plaintiff relies on the agreement dated 1st June 2018 executed by
Shri Vikram Singh, and on Letter No. ABC/45/2018 sent by the defendant.</p>
<p>Under Section 73 of the Indian Contract Act, 1872 the plaintiff claims
damages. See also State of Punjab vs. Mohinder Singh, among others.</p>
<hr class="page-break"/>
<ul>
<li>Your letter dated 14 May 2018 acknowledging receipt.</li>
<li>Invoice raised on 2018-06-15.</li>
</ul>
<p>Heard on 12 February 2019.</p>
</body></html>
"#;

#[test]
fn test_judgment_metadata_extraction() {
    let elements = parse_html(JUDGMENT_HTML);
    assert!(!elements.is_empty());

    let metadata =
        extract_document_metadata(&elements, "judgment_118_2019", &ExtractionOptions::default());

    assert_eq!(metadata.document_name, "judgment_118_2019");

    // No page-1 "dated" context, so the earliest date within the first
    // three pages wins
    assert_eq!(metadata.document_date.as_deref(), Some("2018-05-14"));

    // Dates are sorted by (date, page); the repeated hearing date on
    // pages 1 and 3 stays, same-page repeats would not
    let just_dates: Vec<&str> = metadata.dates.iter().map(|d| d.date.as_str()).collect();
    assert_eq!(
        just_dates,
        vec![
            "2018-05-14",
            "2018-06-01",
            "2018-06-15",
            "2019-02-12",
            "2019-02-12"
        ]
    );

    assert!(metadata.dates[1].surrounding_context.contains("1st June 2018"));

    assert_eq!(metadata.references.persons.len(), 1);
    assert_eq!(metadata.references.persons[0].name, "Vikram Singh");
    assert_eq!(metadata.references.persons[0].page_number, 2);

    let letters: Vec<&str> = metadata
        .references
        .letters_mentioned
        .iter()
        .map(|l| l.name.as_str())
        .collect();
    assert!(letters.contains(&"Letter No. ABC/45/2018"));

    let legal: Vec<(&str, &str, u32)> = metadata
        .references
        .laws_clauses_articles_acts
        .iter()
        .map(|r| (r.reference.as_str(), r.kind.as_str(), r.page_number))
        .collect();
    assert!(legal.contains(&("Indian Contract Act, 1872", "act", 2)));
    assert!(legal.contains(&("Section 73", "clause", 2)));
    assert!(legal.contains(&("State of Punjab vs. Mohinder Singh", "precedent", 2)));
}

#[test]
fn test_context_window_is_honored() {
    let html = format!(
        "<html><body><p>{} signed on 3 April 2021 {}</p></body></html>",
        "x".repeat(200),
        "y".repeat(200)
    );
    let elements = parse_html(&html);

    let opts = ExtractionOptions {
        context_window_chars: 20,
        ..ExtractionOptions::default()
    };
    let metadata = extract_document_metadata(&elements, "doc", &opts);

    assert_eq!(metadata.dates.len(), 1);
    let context = &metadata.dates[0].surrounding_context;
    assert!(context.starts_with("..."));
    assert!(context.ends_with("..."));
    assert!(context.contains("3 April 2021"));
    // fragment + 2 * window + two ellipses
    assert_eq!(context.chars().count(), "3 April 2021".len() + 40 + 6);
}

#[test]
fn test_implausible_years_are_discarded() {
    let html = "<html><body>\
        <p>Founded on 1 January 1650, renovated 5 May 1999.</p>\
        </body></html>";
    let elements = parse_html(html);

    let metadata = extract_document_metadata(&elements, "doc", &ExtractionOptions::default());

    assert_eq!(metadata.dates.len(), 1);
    assert_eq!(metadata.dates[0].date, "1999-05-05");
}

#[test]
fn test_duplicate_dates_on_same_page_collapse() {
    let html = "<html><body>\
        <p>Dated 1 March 2020.</p>\
        <p>Execution copy. Dated 1 March 2020.</p>\
        <hr class=\"page-break\"/>\
        <p>Dated 1 March 2020.</p>\
        </body></html>";
    let elements = parse_html(html);

    let metadata = extract_document_metadata(&elements, "doc", &ExtractionOptions::default());

    // Same date, page, fragment keeps one entry per page
    assert_eq!(metadata.dates.len(), 2);
    assert_eq!(metadata.document_date.as_deref(), Some("2020-03-01"));
}
