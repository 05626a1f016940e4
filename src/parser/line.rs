//! Line-level building blocks shared by both grammars: marker
//! classification, bullet stripping, trailing-price and quantity suffixes.

use crate::currency::{scan_price_tokens, PriceToken, PriceUnit};
use crate::domain::{PackageItem, Won};

pub(crate) const MAIN_MARKER: char = '■';
pub(crate) const SUB_MARKER: char = 'ㄴ';
const BULLETS: [char; 6] = ['●', '•', '·', '-', '*', '■'];
const SESSION_SUFFIX: char = '회';

/// Role of a trimmed, non-blank input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineKind<'a> {
    /// `■ ...` opens a package (enhanced grammar).
    Main(&'a str),
    /// `ㄴ ...` adds to the open package (enhanced grammar).
    Sub(&'a str),
    Plain(&'a str),
}

pub(crate) fn classify(line: &str) -> LineKind<'_> {
    if let Some(rest) = line.strip_prefix(MAIN_MARKER) {
        LineKind::Main(rest.trim())
    } else if let Some(rest) = line.strip_prefix(SUB_MARKER) {
        LineKind::Sub(rest.trim())
    } else {
        LineKind::Plain(line)
    }
}

pub(crate) fn is_enhanced_marker(line: &str) -> bool {
    line.starts_with(MAIN_MARKER) || line.starts_with(SUB_MARKER)
}

/// Trims the text and yields the non-blank lines.
pub(crate) fn meaningful_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

pub(crate) fn strip_bullet(line: &str) -> &str {
    match line.chars().next() {
        Some(first) if BULLETS.contains(&first) => line[first.len_utf8()..].trim(),
        _ => line,
    }
}

/// Splits `"name 690,000원"` into the name and the trailing price.
///
/// The price must close the line, consist of digits and commas only and be
/// separated from the name by whitespace.
pub(crate) fn split_trailing_price(line: &str) -> (&str, Option<Won>) {
    let trailing = scan_price_tokens(line).into_iter().rev().find(|token| {
        token.end == line.len() && matches!(token.unit, PriceUnit::Won | PriceUnit::Bare)
    });
    match trailing {
        Some(token) if is_plain_amount(line, &token) && preceded_by_space(line, token.start) => {
            (line[..token.start].trim(), Some(token.amount))
        }
        _ => (line, None),
    }
}

fn is_plain_amount(line: &str, token: &PriceToken) -> bool {
    !line[token.start..token.end].contains('.')
}

fn preceded_by_space(line: &str, at: usize) -> bool {
    line[..at]
        .chars()
        .next_back()
        .map(char::is_whitespace)
        .unwrap_or(false)
}

/// Splits a `"시술명 3회"` segment into its name and session quantity.
pub(crate) fn split_quantity(segment: &str) -> (&str, u32) {
    let Some(body) = segment.strip_suffix(SESSION_SUFFIX) else {
        return (segment, 1);
    };
    let digits_start = body
        .char_indices()
        .rev()
        .take_while(|(_, ch)| ch.is_ascii_digit())
        .last()
        .map(|(idx, _)| idx);
    let Some(digits_start) = digits_start else {
        return (segment, 1);
    };
    let name = body[..digits_start].trim();
    if name.is_empty() {
        return (segment, 1);
    }
    let quantity = body[digits_start..].parse::<u32>().unwrap_or(1).max(1);
    (name, quantity)
}

/// Decomposes `"A+B 3회"` into unpriced manual items.
pub(crate) fn decompose_items(name: &str) -> Vec<PackageItem> {
    name.split('+')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (procedure, quantity) = split_quantity(segment);
            PackageItem::manual(procedure, quantity)
        })
        .collect()
}

/// Removes `( ... )` groups from a line, returning the remaining text with
/// whitespace collapsed and the non-empty group contents in order.
pub(crate) fn take_parentheticals(line: &str) -> (String, Vec<String>) {
    let mut remaining = String::with_capacity(line.len());
    let mut memos = Vec::new();
    let mut rest = line;

    while let Some(open) = rest.find(['(', '（']) {
        let open_len = rest[open..].chars().next().map(char::len_utf8).unwrap_or(1);
        let inner_start = open + open_len;
        let Some(close_rel) = rest[inner_start..].find([')', '）']) else {
            break;
        };
        let close = inner_start + close_rel;
        let close_len = rest[close..].chars().next().map(char::len_utf8).unwrap_or(1);

        remaining.push_str(&rest[..open]);
        remaining.push(' ');
        let inner = rest[inner_start..close].trim();
        if !inner.is_empty() {
            memos.push(inner.to_string());
        }
        rest = &rest[close + close_len..];
    }
    remaining.push_str(rest);

    let collapsed = remaining.split_whitespace().collect::<Vec<_>>().join(" ");
    (collapsed, memos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_markers() {
        assert_eq!(classify("■패키지"), LineKind::Main("패키지"));
        assert_eq!(classify("ㄴ 시술A: 5만원"), LineKind::Sub("시술A: 5만원"));
        assert_eq!(classify("나머지"), LineKind::Plain("나머지"));
    }

    #[test]
    fn strips_one_leading_bullet() {
        assert_eq!(strip_bullet("● 슈링크"), "슈링크");
        assert_eq!(strip_bullet("- 울쎄라"), "울쎄라");
        assert_eq!(strip_bullet("슈링크"), "슈링크");
    }

    #[test]
    fn trailing_price_needs_whitespace_before_it() {
        assert_eq!(
            split_trailing_price("파워윤곽주사 3회 99,000원"),
            ("파워윤곽주사 3회", Some(99_000))
        );
        assert_eq!(split_trailing_price("슈링크300"), ("슈링크300", None));
        assert_eq!(split_trailing_price("패키지 5.5"), ("패키지 5.5", None));
    }

    #[test]
    fn quantity_suffix_is_optional() {
        assert_eq!(split_quantity("파워윤곽주사 3회"), ("파워윤곽주사", 3));
        assert_eq!(split_quantity("리쥬란2회"), ("리쥬란", 2));
        assert_eq!(split_quantity("인모드fx 얼전"), ("인모드fx 얼전", 1));
        assert_eq!(split_quantity("3회"), ("3회", 1));
        assert_eq!(split_quantity("보톡스 0회"), ("보톡스", 1));
    }

    #[test]
    fn parentheticals_become_memos() {
        let (rest, memos) = take_parentheticals("테스트 패키지 (부가세별도) 29만원 (1인 1회)");
        assert_eq!(rest, "테스트 패키지 29만원");
        assert_eq!(memos, vec!["부가세별도".to_string(), "1인 1회".to_string()]);

        let (rest, memos) = take_parentheticals("열린 괄호 (미완성");
        assert_eq!(rest, "열린 괄호 (미완성");
        assert!(memos.is_empty());
    }
}
