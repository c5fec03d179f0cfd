use crate::domain::model::ReferenceKind;
use regex::Regex;
use std::sync::LazyLock;

// 尊稱開頭的人名，"Mr. Foo Bar" 只取 "Foo Bar"
static PERSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:Mr|Mrs|Ms|Miss|Dr|Prof|Shri|Smt)\.?\s+((?:[A-Z][A-Za-z'’-]+)(?:\s+[A-Z][A-Za-z'’-]+){0,3})",
    )
    .expect("static regex")
});

// "State of Maharashtra v. United Traders" 式的判例引用
static PRECEDENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b([A-Z][A-Za-z'’.&-]*(?:\s+(?:of\s+)?[A-Z][A-Za-z'’.&-]*){0,4})\s+vs?\.?\s+([A-Z][A-Za-z'’.&-]*(?:\s+(?:of\s+)?[A-Z][A-Za-z'’.&-]*){0,4})",
    )
    .expect("static regex")
});

// "Indian Contract Act, 1872"、"the Services Act"、"Civil Procedure Code"
static STATUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b((?:[A-Z][A-Za-z'’-]*\s+){1,6}(?:Act|Code)(?:,?\s+\d{4})?)\b")
        .expect("static regex")
});

// "Section 12(1)(a)"、"Clause 5"、"Article 14"
static PROVISION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b((?:sub-)?(?:section|clause|article|rule|regulation|paragraph)s?\s+\d+[0-9A-Za-z().\-]*)")
        .expect("static regex")
});

// 原始資料裡常見的三種信件引用寫法
static LETTER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(Letter\s*(?:No\.?|Ref\.?)\s*[:\-]?\s*[\w.\-/()]+)\b")
            .expect("static regex"),
        Regex::new(r"(?i)\b(Ref[:.]\s*[\w.\-/()]+)\b").expect("static regex"),
        Regex::new(r"(?i)\b((?:our|your|their|his|her)\s+letter\s+(?:dated|of)\s+[\w\s,\-.]+)\b")
            .expect("static regex"),
    ]
});

/// Person names found in a text block, honorific-anchored. The honorific
/// itself is not part of the reported name.
pub fn find_persons(text: &str) -> Vec<String> {
    PERSON
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .collect()
}

/// A classified legal reference found in running text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundReference {
    pub reference: String,
    pub kind: ReferenceKind,
}

/// Statutes, provisions, and precedents, classified the way the original
/// extraction labelled them: statutes/codes -> act, numbered provisions
/// -> clause (or article when the keyword says so), case citations ->
/// precedent.
pub fn find_legal_references(text: &str) -> Vec<FoundReference> {
    let mut found = Vec::new();
    let mut claimed: Vec<(usize, usize)> = Vec::new();

    // 判例優先，避免 "X v. Y Act" 之類的片段被法條模式重複吃掉
    for m in PRECEDENT.find_iter(text) {
        claimed.push((m.start(), m.end()));
        found.push(FoundReference {
            reference: m.as_str().trim().to_string(),
            kind: ReferenceKind::Precedent,
        });
    }

    for m in STATUTE.find_iter(text) {
        if overlaps(&claimed, m.start(), m.end()) {
            continue;
        }
        let reference = m.as_str().trim().trim_start_matches("The ").to_string();
        found.push(FoundReference {
            reference,
            kind: ReferenceKind::Act,
        });
    }

    for m in PROVISION.find_iter(text) {
        if overlaps(&claimed, m.start(), m.end()) {
            continue;
        }
        let reference = m.as_str().trim().trim_end_matches('.').to_string();
        let kind = if reference.to_lowercase().contains("article") {
            ReferenceKind::Article
        } else {
            // Section、Rule、Regulation 等一律歸入 clause
            ReferenceKind::Clause
        };
        found.push(FoundReference { reference, kind });
    }

    found
}

/// Letter references ("Letter No. ...", "Ref: ...", "your letter dated
/// ..."), trailing period stripped.
pub fn find_letter_references(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    for pattern in LETTER_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let name = caps[1].trim().trim_end_matches('.').to_string();
            if !name.is_empty() {
                found.push(name);
            }
        }
    }
    found
}

fn overlaps(claimed: &[(usize, usize)], start: usize, end: usize) -> bool {
    claimed.iter().any(|&(s, e)| start < e && end > s)
}
