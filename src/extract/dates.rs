use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// A date recognized in a block of text, with the byte span of the
/// matched fragment so callers can cut a context window around it.
#[derive(Debug, Clone)]
pub struct RecognizedDate {
    pub date: NaiveDate,
    pub formatted: String,
    pub fragment: String,
    pub start: usize,
}

const MONTHS: &str = r"Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?";

// "1st January 2023", "5th day of March, 2020", "1 January 2023"
static DAY_MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:day\s+of\s+)?({MONTHS})\.?,?\s+(\d{{4}})\b"
    ))
    .expect("static regex")
});

// "January 1, 2023", "Jan. 5, 2021"
static MONTH_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTHS})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s+(\d{{4}})\b"
    ))
    .expect("static regex")
});

// "2023-01-31"
static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").expect("static regex"));

// "31/01/2023", "1-2-2023", "01.02.2023"
static NUMERIC_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{4})\b").expect("static regex"));

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_ascii_lowercase();
    let prefix = lower.get(..3)?;
    match prefix {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}

/// Finds every date expression in `text` and normalizes it. Matches
/// whose year falls outside `min_year..=max_year` are discarded, the
/// same plausibility bound the extraction layer has always applied.
/// Overlapping matches keep the earlier, richer pattern.
pub fn recognize_dates(text: &str, min_year: i32, max_year: i32) -> Vec<RecognizedDate> {
    let mut hits: Vec<RecognizedDate> = Vec::new();
    let mut spans: Vec<(usize, usize)> = Vec::new();

    let mut push = |start: usize, end: usize, date: Option<NaiveDate>, fragment: &str| {
        let Some(date) = date else { return };
        let year = chrono::Datelike::year(&date);
        if year < min_year || year > max_year {
            return;
        }
        // 與已接受的匹配重疊就跳過（模式依優先順序套用）
        if spans.iter().any(|&(s, e)| start < e && end > s) {
            return;
        }
        spans.push((start, end));
        hits.push(RecognizedDate {
            date,
            formatted: date.format("%Y-%m-%d").to_string(),
            fragment: fragment.to_string(),
            start,
        });
    };

    for caps in DAY_MONTH_YEAR.captures_iter(text) {
        let m = caps.get(0).expect("whole match");
        let date = parse_parts(&caps[3], month_number(&caps[2]), caps[1].parse().ok());
        push(m.start(), m.end(), date, m.as_str());
    }

    for caps in MONTH_DAY_YEAR.captures_iter(text) {
        let m = caps.get(0).expect("whole match");
        let date = parse_parts(&caps[3], month_number(&caps[1]), caps[2].parse().ok());
        push(m.start(), m.end(), date, m.as_str());
    }

    for caps in ISO_DATE.captures_iter(text) {
        let m = caps.get(0).expect("whole match");
        let date = parse_parts(&caps[1], caps[2].parse().ok(), caps[3].parse().ok());
        push(m.start(), m.end(), date, m.as_str());
    }

    for caps in NUMERIC_DATE.captures_iter(text) {
        let m = caps.get(0).expect("whole match");
        let first: Option<u32> = caps[1].parse().ok();
        let second: Option<u32> = caps[2].parse().ok();
        // 先試 month-first（對齊原本 en-locale 解析器），不合法再試 day-first
        let date = parse_parts(&caps[3], first, second)
            .or_else(|| parse_parts(&caps[3], second, first));
        push(m.start(), m.end(), date, m.as_str());
    }

    hits.sort_by_key(|h| h.start);
    hits
}

fn parse_parts(year: &str, month: Option<u32>, day: Option<u32>) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month?, day?)
}

/// ±window 字元的上下文，裁切處加上省略號
pub fn surrounding_context(text: &str, start: usize, fragment_len: usize, window: usize) -> String {
    let mut begin = start.saturating_sub(window);
    while begin > 0 && !text.is_char_boundary(begin) {
        begin -= 1;
    }
    let mut end = (start + fragment_len + window).min(text.len());
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }

    let prefix = if begin > 0 { "..." } else { "" };
    let suffix = if end < text.len() { "..." } else { "" };
    format!("{}{}{}", prefix, &text[begin..end], suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates_in(text: &str) -> Vec<String> {
        recognize_dates(text, 1800, 2100)
            .into_iter()
            .map(|d| d.formatted)
            .collect()
    }

    #[test]
    fn test_day_month_year_forms() {
        assert_eq!(dates_in("dated 1st January 2023"), vec!["2023-01-01"]);
        assert_eq!(dates_in("on 21 March 1999"), vec!["1999-03-21"]);
        assert_eq!(dates_in("this 5th day of March, 2020"), vec!["2020-03-05"]);
    }

    #[test]
    fn test_month_day_year_forms() {
        assert_eq!(dates_in("signed January 1, 2023"), vec!["2023-01-01"]);
        assert_eq!(dates_in("effective Jan. 5, 2021"), vec!["2021-01-05"]);
        assert_eq!(dates_in("due Sept 30, 2022"), vec!["2022-09-30"]);
    }

    #[test]
    fn test_iso_and_numeric_forms() {
        assert_eq!(dates_in("ref 2023-04-18 herein"), vec!["2023-04-18"]);
        // month-first 優先
        assert_eq!(dates_in("paid 03/04/2021"), vec!["2021-03-04"]);
        // 第一個數字不可能是月份時退回 day-first
        assert_eq!(dates_in("paid 25/04/2021"), vec!["2021-04-25"]);
        assert_eq!(dates_in("paid 15.08.1947"), vec!["1947-08-15"]);
    }

    #[test]
    fn test_invalid_calendar_dates_rejected() {
        assert!(dates_in("impossible 31st February 2020").is_empty());
        assert!(dates_in("bogus 2020-13-40").is_empty());
    }

    #[test]
    fn test_year_plausibility_bounds() {
        assert!(recognize_dates("ancient 1 January 1750", 1800, 2100).is_empty());
        assert!(recognize_dates("future 1 January 2500", 1800, 2100).is_empty());
        assert_eq!(recognize_dates("valid 1 January 1800", 1800, 2100).len(), 1);
    }

    #[test]
    fn test_multiple_dates_keep_text_order() {
        let found = dates_in("from 1 April 2020 until March 31, 2021");
        assert_eq!(found, vec!["2020-04-01", "2021-03-31"]);
    }

    #[test]
    fn test_overlapping_patterns_resolve_once() {
        // "5 March 2020" 同時符合 day-month-year 與 month-day-year 的一部分
        let found = recognize_dates("on 5 March 2020 it was agreed", 1800, 2100);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].formatted, "2020-03-05");
    }

    #[test]
    fn test_fragment_and_offset_are_reported() {
        let text = "the agreement dated 1st January 2023 between the parties";
        let found = recognize_dates(text, 1800, 2100);
        assert_eq!(found[0].fragment, "1st January 2023");
        assert_eq!(&text[found[0].start..found[0].start + found[0].fragment.len()], "1st January 2023");
    }

    #[test]
    fn test_surrounding_context_window() {
        let text = "the agreement dated 1st January 2023 between the parties";
        let start = text.find("1st").unwrap();
        let ctx = surrounding_context(text, start, "1st January 2023".len(), 10);
        assert_eq!(ctx, "...ent dated 1st January 2023 between t...");
    }

    #[test]
    fn test_surrounding_context_no_ellipsis_at_edges() {
        let text = "dated 1 May 2020";
        let start = text.find('1').unwrap();
        let ctx = surrounding_context(text, start, "1 May 2020".len(), 50);
        assert_eq!(ctx, "dated 1 May 2020");
    }
}
