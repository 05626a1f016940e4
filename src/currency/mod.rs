//! Korean won price idioms: tokenizing "5.5만원" / "99,000원" style
//! expressions and rendering amounts back for display.

use serde::{Deserialize, Serialize};

use crate::domain::Won;

const MAN: u64 = 10_000;
const TRIAL_LABEL: &str = "1체";
const EVENT_LABEL: &str = "이벤트";

/// Suffix that followed the digits of a price token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceUnit {
    /// `<number>만` or `<number>만원`: ten-thousands of won.
    Man,
    /// `<digits>원`.
    Won,
    /// Digits with no recognised suffix.
    Bare,
}

/// A price expression located inside a larger string. Offsets are byte
/// offsets into the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceToken {
    pub start: usize,
    pub end: usize,
    pub amount: Won,
    pub unit: PriceUnit,
}

impl PriceToken {
    /// Whether the token carries an explicit `만`/`원` suffix.
    pub fn has_suffix(&self) -> bool {
        !matches!(self.unit, PriceUnit::Bare)
    }
}

/// Trial and event prices pulled out of a sub-item expression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPrices {
    pub trial: Won,
    pub event: Won,
}

impl ExtractedPrices {
    pub fn is_priced(&self) -> bool {
        self.trial > 0 || self.event > 0
    }
}

/// Scans `text` once, left to right, returning every digit run together with
/// the unit suffix that follows it.
pub fn scan_price_tokens(text: &str) -> Vec<PriceToken> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        if !ch.is_ascii_digit() {
            continue;
        }
        let mut end = start + ch.len_utf8();
        while let Some(&(idx, next)) = chars.peek() {
            if next.is_ascii_digit() || next == ',' || next == '.' {
                end = idx + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        let number = text[start..end].trim_end_matches([',', '.']);
        let number_end = start + number.len();
        let rest = &text[number_end..];

        let (unit, token_end) = if let Some(after_man) = rest.strip_prefix('만') {
            let mut len = '만'.len_utf8();
            if after_man.starts_with('원') {
                len += '원'.len_utf8();
            }
            (PriceUnit::Man, number_end + len)
        } else if rest.starts_with('원') {
            (PriceUnit::Won, number_end + '원'.len_utf8())
        } else {
            (PriceUnit::Bare, number_end)
        };

        while let Some(&(idx, _)) = chars.peek() {
            if idx < token_end {
                chars.next();
            } else {
                break;
            }
        }

        tokens.push(PriceToken {
            start,
            end: token_end,
            amount: token_amount(number, unit),
            unit,
        });
    }

    tokens
}

fn token_amount(number: &str, unit: PriceUnit) -> Won {
    match unit {
        PriceUnit::Man => {
            let cleaned: String = number.chars().filter(|c| *c != ',').collect();
            match cleaned.parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => {
                    let scaled = (value * MAN as f64).round();
                    if scaled >= u64::MAX as f64 {
                        0
                    } else {
                        scaled as u64
                    }
                }
                _ => 0,
            }
        }
        PriceUnit::Won | PriceUnit::Bare => {
            let digits: String = number.chars().filter(char::is_ascii_digit).collect();
            digits.parse::<u64>().unwrap_or(0)
        }
    }
}

/// Parses a Korean price expression into won.
///
/// A `만` amount anywhere in the text wins; otherwise the first `원` amount,
/// otherwise the first bare digit run. Anything unparseable is `0`.
pub fn parse_korean_price(text: &str) -> Won {
    let tokens = scan_price_tokens(text);
    tokens
        .iter()
        .find(|token| token.unit == PriceUnit::Man)
        .or_else(|| tokens.iter().find(|token| token.unit == PriceUnit::Won))
        .or_else(|| tokens.first())
        .map(|token| token.amount)
        .unwrap_or(0)
}

/// Reads the trial (`1체`) and event (`이벤트`) prices out of `text`.
///
/// Each label's window runs to the next `/` or to the other label. When
/// neither label is present any bare price counts as the event price.
pub fn extract_prices(text: &str) -> ExtractedPrices {
    let trial_at = text.find(TRIAL_LABEL);
    let event_at = text.find(EVENT_LABEL);

    if trial_at.is_none() && event_at.is_none() {
        return ExtractedPrices {
            trial: 0,
            event: parse_korean_price(text),
        };
    }

    ExtractedPrices {
        trial: trial_at
            .map(|at| labelled_price(text, at + TRIAL_LABEL.len(), EVENT_LABEL))
            .unwrap_or(0),
        event: event_at
            .map(|at| labelled_price(text, at + EVENT_LABEL.len(), TRIAL_LABEL))
            .unwrap_or(0),
    }
}

fn labelled_price(text: &str, from: usize, other_label: &str) -> Won {
    let tail = &text[from..];
    let mut window_end = tail.find('/').unwrap_or(tail.len());
    if let Some(other) = tail.find(other_label) {
        window_end = window_end.min(other);
    }
    parse_korean_price(&tail[..window_end])
}

/// Renders an amount with thousands separators and the `원` suffix.
pub fn format_won(amount: Won) -> String {
    format!("{}원", group_digits(&amount.to_string(), ','))
}

/// Same as [`format_won`] for signed values such as savings.
pub fn format_signed_won(amount: i64) -> String {
    if amount < 0 {
        format!("-{}", format_won(amount.unsigned_abs()))
    } else {
        format_won(amount.unsigned_abs())
    }
}

/// Renders an amount in the `만원` idiom when it is a whole number of
/// thousands, e.g. `55000` → `5.5만원`.
pub fn format_man(amount: Won) -> String {
    if amount == 0 || amount % 1_000 != 0 {
        return format_won(amount);
    }
    let whole = amount / MAN;
    let tenths = (amount % MAN) / 1_000;
    if tenths == 0 {
        format!("{}만원", group_digits(&whole.to_string(), ','))
    } else {
        format!("{}.{}만원", group_digits(&whole.to_string(), ','), tenths)
    }
}

/// Renders a percentage rate, or `-` when the rate is undefined.
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(value) => format!("{:.1}%", value),
        None => "-".into(),
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    let mut count = 0;
    for ch in digits.chars().rev() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
        count += 1;
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_man_form_with_fraction() {
        assert_eq!(parse_korean_price("5.5만원"), 55_000);
        assert_eq!(parse_korean_price("12.9만원"), 129_000);
        assert_eq!(parse_korean_price("29만"), 290_000);
    }

    #[test]
    fn parses_won_form_with_separators() {
        assert_eq!(parse_korean_price("99,000원"), 99_000);
        assert_eq!(parse_korean_price("1,200,000"), 1_200_000);
    }

    #[test]
    fn unparseable_input_is_zero() {
        assert_eq!(parse_korean_price(""), 0);
        assert_eq!(parse_korean_price("가격 문의"), 0);
        assert_eq!(parse_korean_price("99999999999999999999999원"), 0);
    }

    #[test]
    fn man_form_takes_priority_over_earlier_won() {
        assert_eq!(parse_korean_price("정가 300,000원 → 19.9만원"), 199_000);
    }

    #[test]
    fn won_suffixed_run_beats_leading_count() {
        assert_eq!(parse_korean_price("3회 99,000원"), 99_000);
    }

    #[test]
    fn man_form_round_trips_multiples_of_ten_thousand() {
        for man in [1u64, 7, 10, 99, 150, 1_000, 12_345] {
            let text = format!("{}만원", man);
            assert_eq!(parse_korean_price(&text), man * MAN, "input {text}");
        }
    }

    #[test]
    fn extracts_trial_and_event_independently() {
        let prices = extract_prices("1체 5.5만원 / 이벤트 12.9만원");
        assert_eq!(prices.trial, 55_000);
        assert_eq!(prices.event, 129_000);

        let event_only = extract_prices("이벤트가 9.9만원");
        assert_eq!(event_only, ExtractedPrices { trial: 0, event: 99_000 });
    }

    #[test]
    fn bare_price_counts_as_event() {
        let prices = extract_prices("39,000원");
        assert_eq!(prices.trial, 0);
        assert_eq!(prices.event, 39_000);
    }

    #[test]
    fn trial_window_stops_at_event_label() {
        let prices = extract_prices("1체 이벤트 12.9만원");
        assert_eq!(prices.trial, 0);
        assert_eq!(prices.event, 129_000);
    }

    #[test]
    fn scanner_reports_units_and_offsets() {
        let text = "슈링크300 29만원";
        let tokens = scan_price_tokens(text);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].unit, PriceUnit::Bare);
        assert_eq!(tokens[1].unit, PriceUnit::Man);
        assert_eq!(&text[tokens[1].start..tokens[1].end], "29만원");
    }

    #[test]
    fn formats_amounts_for_display() {
        assert_eq!(format_won(1_234_000), "1,234,000원");
        assert_eq!(format_signed_won(-5_000), "-5,000원");
        assert_eq!(format_man(55_000), "5.5만원");
        assert_eq!(format_man(690_000), "69만원");
        assert_eq!(format_man(1_250), "1,250원");
        assert_eq!(format_rate(Some(13.333)), "13.3%");
        assert_eq!(format_rate(None), "-");
    }
}
