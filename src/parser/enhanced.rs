//! Multi-line grammar:
//!
//! ```text
//! ■패키지명 29만원 추가 설명 (메모)
//! ㄴ시술A: 1체 5.5만원 / 이벤트 12.9만원
//! ㄴ안내 문구
//! 자유 설명
//! ```

use crate::currency::{extract_prices, scan_price_tokens, PriceToken};
use crate::domain::{Package, PackageItem, PriceSource, Won};
use crate::utils::ids::IdGenerator;

use super::line::{classify, decompose_items, meaningful_lines, take_parentheticals, LineKind};

const MEMO_SEPARATOR: &str = " / ";

/// The parsed `■` line of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MainLine {
    pub name: String,
    pub price: Won,
    pub memos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SubItem {
    name: String,
    expression: String,
}

/// A package while its lines are still being read.
#[derive(Debug)]
struct OpenPackage {
    main: MainLine,
    sub_items: Vec<SubItem>,
    notes: Vec<String>,
}

impl OpenPackage {
    fn new(main: MainLine) -> Self {
        Self {
            main,
            sub_items: Vec::new(),
            notes: Vec::new(),
        }
    }

    fn add_sub_line(&mut self, content: &str) {
        if !content.contains([':', '：']) {
            if !content.is_empty() {
                self.notes.push(content.to_string());
            }
            return;
        }

        for segment in content.split('/').map(str::trim) {
            if segment.is_empty() {
                continue;
            }
            match named_segment(segment) {
                Some((name, expression)) => self.sub_items.push(SubItem {
                    name: name.to_string(),
                    expression: expression.to_string(),
                }),
                None => self.continue_expression(segment),
            }
        }
    }

    fn continue_expression(&mut self, segment: &str) {
        match self.sub_items.last_mut() {
            Some(current) => {
                if !current.expression.is_empty() {
                    current.expression.push_str(MEMO_SEPARATOR);
                }
                current.expression.push_str(segment);
            }
            None => tracing::trace!(segment, "price continuation without a sub-item"),
        }
    }

    fn finalize<G: IdGenerator + ?Sized>(self, ids: &mut G) -> Package {
        let priced: Vec<PackageItem> = self
            .sub_items
            .iter()
            .filter_map(|sub| {
                let prices = extract_prices(&sub.expression);
                if !prices.is_priced() {
                    return None;
                }
                let (price, source) = if prices.trial > 0 {
                    (prices.trial, PriceSource::Trial)
                } else {
                    (prices.event, PriceSource::Event)
                };
                Some(PackageItem::priced(sub.name.clone(), price, source))
            })
            .collect();

        let items = if priced.is_empty() {
            decompose_items(&self.main.name)
        } else {
            priced
        };

        let mut memo_parts = self.main.memos;
        memo_parts.extend(self.notes);
        let memo = memo_parts.join(MEMO_SEPARATOR);

        Package::new(ids.next_id(), self.main.name, self.main.price)
            .with_items(items)
            .with_memo(Some(memo))
    }
}

/// `name: expression`, where the segment does not start with a digit.
fn named_segment(segment: &str) -> Option<(&str, &str)> {
    if segment.starts_with(|ch: char| ch.is_ascii_digit()) {
        return None;
    }
    let colon = segment.find([':', '：'])?;
    let name = segment[..colon].trim();
    if name.is_empty() {
        return None;
    }
    let colon_len = segment[colon..].chars().next().map(char::len_utf8).unwrap_or(1);
    Some((name, segment[colon + colon_len..].trim()))
}

/// Parses the text after `■`. Returns `None` when no name remains.
///
/// Only `만`/`원` amounts count as the package price, so counts such as
/// `300샷` or `2회` stay in the name. The amount may touch the text around
/// it: `패키지29만원` and `29만원부터 시작` both carry a price.
pub(crate) fn parse_main_line(content: &str) -> Option<MainLine> {
    let (cleaned, parentheticals) = take_parentheticals(content);

    let candidates: Vec<PriceToken> = scan_price_tokens(&cleaned)
        .into_iter()
        .filter(PriceToken::has_suffix)
        .collect();
    let chosen = candidates
        .iter()
        .find(|token| token.end == cleaned.len())
        .or_else(|| candidates.first());

    let (name, price, trailing) = match chosen {
        Some(token) => (
            cleaned[..token.start].trim(),
            token.amount,
            cleaned[token.end..].trim(),
        ),
        None => (cleaned.as_str(), 0, ""),
    };

    if name.is_empty() {
        return None;
    }

    let mut memos = Vec::with_capacity(parentheticals.len() + 1);
    if !trailing.is_empty() {
        memos.push(trailing.to_string());
    }
    memos.extend(parentheticals);

    Some(MainLine {
        name: name.to_string(),
        price,
        memos,
    })
}

pub(crate) fn parse<G: IdGenerator + ?Sized>(text: &str, ids: &mut G) -> Vec<Package> {
    let mut packages = Vec::new();
    let mut open: Option<OpenPackage> = None;

    for line in meaningful_lines(text) {
        match classify(line) {
            LineKind::Main(content) => {
                if let Some(done) = open.take() {
                    packages.push(done.finalize(ids));
                }
                open = parse_main_line(content).map(OpenPackage::new);
            }
            LineKind::Sub(content) => match open.as_mut() {
                Some(package) => package.add_sub_line(content),
                None => tracing::trace!(line, "sub-item outside of a package"),
            },
            LineKind::Plain(content) => match open.as_mut() {
                Some(package) => package.notes.push(content.to_string()),
                None => tracing::trace!(line, "text outside of a package"),
            },
        }
    }

    if let Some(done) = open.take() {
        packages.push(done.finalize(ids));
    }

    packages
}
