use crate::error::{PdfError, Result};
use regex::Regex;
use std::sync::LazyLock;

static RANGE_EXPR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+(-[0-9]+)?(,[0-9]+(-[0-9]+)?)*$").expect("range grammar is a valid regex")
});

/// One comma-separated term of a range expression, e.g. "3" or "2-4"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeTerm {
    /// The term exactly as written; used to name the output file
    pub text: String,
    pub start: u32,
    pub end: Option<u32>,
}

impl RangeTerm {
    fn parse(s: &str) -> Option<Self> {
        let (start, end) = match s.split_once('-') {
            Some((start, end)) => (start.parse().ok()?, Some(end.parse().ok()?)),
            None => (s.parse().ok()?, None),
        };
        Some(RangeTerm {
            text: s.to_string(),
            start,
            end,
        })
    }

    fn within(&self, page_count: u32) -> bool {
        let in_bounds = |n: u32| (1..=page_count).contains(&n);
        in_bounds(self.start) && self.end.is_none_or(in_bounds)
    }

    /// 1-based pages this term selects when splitting.
    ///
    /// `start-end` covers `end - start + 1` pages beginning at `start`, clamped
    /// to the last page. A reversed term covers no pages at all.
    pub fn pages(&self, page_count: u32) -> Vec<u32> {
        let width = match self.end {
            Some(end) => i64::from(end) - i64::from(self.start) + 1,
            None => 1,
        };
        if width <= 0 {
            return Vec::new();
        }
        let last = (i64::from(self.start) + width - 1).min(i64::from(page_count));
        (i64::from(self.start)..=last).map(|p| p as u32).collect()
    }
}

/// Whether `range` is an acceptable split expression for a document with
/// `page_count` pages.
///
/// Blank input is accepted and means "no custom range". Otherwise every term
/// must be `N` or `N-M` with each number in `1..=page_count`. Term order,
/// overlap and `N <= M` are not checked.
pub fn is_page_range_valid(range: &str, page_count: u32) -> bool {
    let range = range.trim();
    if range.is_empty() {
        return true;
    }
    if !RANGE_EXPR.is_match(range) {
        return false;
    }
    range
        .split(',')
        .all(|term| RangeTerm::parse(term).is_some_and(|t| t.within(page_count)))
}

/// Parse a validated range expression into its terms, in input order.
pub fn parse_split_ranges(range: &str, page_count: u32) -> Result<Vec<RangeTerm>> {
    let invalid = || PdfError::InvalidRange {
        range: range.to_string(),
        page_count,
    };

    let trimmed = range.trim();
    if trimmed.is_empty() || !is_page_range_valid(trimmed, page_count) {
        return Err(invalid());
    }

    trimmed
        .split(',')
        .map(|term| RangeTerm::parse(term).ok_or_else(invalid))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", 4, true)]
    #[case("   ", 0, true)]
    #[case("1,2-4", 4, true)]
    #[case("1,5-8", 4, false)]
    #[case("abc", 4, false)]
    #[case("0", 4, false)]
    #[case("4-1", 4, true)]
    #[case("2,2,1-3", 4, true)]
    #[case("1,", 4, false)]
    #[case(",1", 4, false)]
    #[case("1-2-3", 4, false)]
    #[case("1 - 2", 4, false)]
    #[case(" 1,3 ", 4, true)]
    #[case("10", 12, true)]
    #[case("99999999999", 12, false)]
    fn test_range_validation(#[case] range: &str, #[case] pages: u32, #[case] valid: bool) {
        assert_eq!(is_page_range_valid(range, pages), valid, "range {range:?}");
    }

    #[test]
    fn test_parse_keeps_term_text() {
        let terms = parse_split_ranges("1,3-5", 10).unwrap();
        assert_eq!(
            terms,
            vec![
                RangeTerm {
                    text: "1".to_string(),
                    start: 1,
                    end: None
                },
                RangeTerm {
                    text: "3-5".to_string(),
                    start: 3,
                    end: Some(5)
                },
            ]
        );
    }

    #[test]
    fn test_parse_rejects_blank_and_invalid() {
        assert!(parse_split_ranges("", 10).is_err());
        assert!(matches!(
            parse_split_ranges("1,11", 10),
            Err(PdfError::InvalidRange { page_count: 10, .. })
        ));
    }

    #[test]
    fn test_term_pages() {
        let single = RangeTerm::parse("3").unwrap();
        assert_eq!(single.pages(10), vec![3]);

        let span = RangeTerm::parse("3-5").unwrap();
        assert_eq!(span.pages(10), vec![3, 4, 5]);

        let clamped = RangeTerm::parse("8-12").unwrap();
        assert_eq!(clamped.pages(10), vec![8, 9, 10]);
    }

    #[test]
    fn test_reversed_term_selects_nothing() {
        let reversed = RangeTerm::parse("5-2").unwrap();
        assert!(reversed.pages(10).is_empty());

        let same = RangeTerm::parse("4-4").unwrap();
        assert_eq!(same.pages(10), vec![4]);
    }
}
