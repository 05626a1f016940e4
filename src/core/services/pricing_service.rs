use crate::core::PriceBook;
use crate::domain::{CompetitorQuote, PriceOption, PricingItem, PricingType, Won};
use crate::pricing::{compute_item_rows, validate_all, validate_monotonic, ValidationOutcome};
use crate::utils::ids::IdGenerator;

use super::{ServiceError, ServiceResult};

pub struct PricingService;

impl PricingService {
    /// Builds the rows of one procedure and checks the discount rule on them.
    pub fn evaluate(item: &PricingItem, round_unit: i64) -> ValidationOutcome {
        let rows = compute_item_rows(item, round_unit);
        validate_monotonic(&rows, Some(&item.name))
    }

    pub fn evaluate_named<'a>(
        book: &'a PriceBook,
        name: &str,
        round_unit: i64,
    ) -> ServiceResult<(&'a PricingItem, ValidationOutcome)> {
        let item = Self::find_item(book, name)?;
        Ok((item, Self::evaluate(item, round_unit)))
    }

    pub fn validate_book(book: &PriceBook, round_unit: i64) -> Vec<String> {
        let violations = validate_all(&book.pricing_items, round_unit);
        tracing::debug!(
            items = book.pricing_items.len(),
            violations = violations.len(),
            "validated price book"
        );
        violations
    }

    pub fn find_item<'a>(book: &'a PriceBook, name: &str) -> ServiceResult<&'a PricingItem> {
        book.find_pricing_item(name)
            .ok_or_else(|| ServiceError::not_found("pricing item", name, &book.pricing_items))
    }

    /// Loads priced procedures from a JSON array, replacing same-named ones.
    pub fn import_items(book: &mut PriceBook, json: &str) -> ServiceResult<usize> {
        let items: Vec<PricingItem> = serde_json::from_str(json)
            .map_err(|err| ServiceError::Invalid(format!("invalid pricing items: {}", err)))?;
        let count = items.len();
        for item in items {
            book.upsert_pricing_item(item);
        }
        Ok(count)
    }

    /// Creates or replaces a priced procedure without options.
    pub fn add_item<G: IdGenerator + ?Sized>(
        book: &mut PriceBook,
        ids: &mut G,
        name: &str,
        kind: PricingType,
        prices: (Won, Won),
        base_shots: Option<u32>,
    ) -> ServiceResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Invalid("item name must not be empty".into()));
        }
        if base_shots == Some(0) {
            return Err(ServiceError::Invalid("base shots must be greater than zero".into()));
        }
        let mut item = PricingItem::new(ids.next_id(), name, kind).with_prices(prices.0, prices.1);
        if kind.uses_shots() {
            if let Some(shots) = base_shots {
                item = item.with_base_shots(shots);
            }
        }
        book.upsert_pricing_item(item);
        Ok(())
    }

    /// Appends a quantity tier. The quantities required depend on the item's
    /// pricing type.
    pub fn add_option<G: IdGenerator + ?Sized>(
        book: &mut PriceBook,
        ids: &mut G,
        name: &str,
        sessions: Option<u32>,
        shots: Option<u32>,
        price: Won,
    ) -> ServiceResult<()> {
        let item = Self::find_item_mut(book, name)?;
        let option = match (item.kind, sessions, shots) {
            (PricingType::Session, Some(sessions), _) if sessions > 0 => {
                PriceOption::sessions(ids.next_id(), sessions, price)
            }
            (PricingType::Shot, _, Some(shots)) if shots > 0 => {
                PriceOption::shots(ids.next_id(), shots, price)
            }
            (PricingType::Mixed, Some(sessions), Some(shots)) if sessions > 0 && shots > 0 => {
                PriceOption::mixed(ids.next_id(), shots, sessions, price)
            }
            (kind, _, _) => {
                return Err(ServiceError::Invalid(format!(
                    "{} options need {}",
                    kind,
                    match kind {
                        PricingType::Session => "a session count",
                        PricingType::Shot => "a shot count",
                        PricingType::Mixed => "both shot and session counts",
                    }
                )))
            }
        };
        item.options.push(option);
        Ok(())
    }

    pub fn set_competitor(
        book: &mut PriceBook,
        name: &str,
        quote: CompetitorQuote,
    ) -> ServiceResult<()> {
        let item = Self::find_item_mut(book, name)?;
        item.competitor = quote;
        Ok(())
    }

    fn find_item_mut<'a>(book: &'a mut PriceBook, name: &str) -> ServiceResult<&'a mut PricingItem> {
        let id = Self::find_item(book, name)?.id;
        book.pricing_items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| ServiceError::Invalid(format!("pricing item `{}` disappeared", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ids::SequentialIds;

    fn shot_book() -> (PriceBook, SequentialIds) {
        let mut book = PriceBook::new();
        let mut ids = SequentialIds::new();
        PricingService::add_item(
            &mut book,
            &mut ids,
            "슈링크",
            PricingType::Shot,
            (99_000, 150_000),
            Some(100),
        )
        .unwrap();
        (book, ids)
    }

    #[test]
    fn evaluate_flags_rising_unit_prices() {
        let (mut book, mut ids) = shot_book();
        PricingService::add_option(&mut book, &mut ids, "슈링크", None, Some(300), 390_000).unwrap();
        PricingService::add_option(&mut book, &mut ids, "슈링크", None, Some(600), 900_000).unwrap();

        let (item, outcome) = PricingService::evaluate_named(&book, "슈링크", 1_000).unwrap();
        assert_eq!(item.options.len(), 2);
        assert_eq!(outcome.violations.len(), 1);
        assert!(outcome.rows[3].violation);
        assert_eq!(PricingService::validate_book(&book, 1_000), outcome.violations);
    }

    #[test]
    fn option_quantities_follow_pricing_type() {
        let (mut book, mut ids) = shot_book();
        let err = PricingService::add_option(&mut book, &mut ids, "슈링크", Some(3), None, 1)
            .unwrap_err();
        assert_eq!(err.to_string(), "shot options need a shot count");
    }

    #[test]
    fn competitor_quote_is_replaced() {
        let (mut book, _) = shot_book();
        let quote = CompetitorQuote {
            enabled: true,
            name: Some("B의원".into()),
            price: 200_000,
            ..CompetitorQuote::default()
        };
        PricingService::set_competitor(&mut book, "슈링크", quote).unwrap();
        let outcome = PricingService::evaluate(&book.pricing_items[0], 1_000);
        let competitor = outcome.rows.last().unwrap();
        assert_eq!(competitor.label, "경쟁사 B의원 (100샷)");
        assert!(!competitor.violation);
    }

    #[test]
    fn import_items_upserts_by_name() {
        let (mut book, _) = shot_book();
        let json = r#"[{"id":"00000000-0000-0000-0000-000000000063","name":"슈링크","type":"shot","event_price":120000}]"#;
        assert_eq!(PricingService::import_items(&mut book, json).unwrap(), 1);
        assert_eq!(book.pricing_items.len(), 1);
        assert_eq!(book.pricing_items[0].event_price, 120_000);
        assert_eq!(book.pricing_items[0].trial_price, 0);
    }

    #[test]
    fn unknown_items_are_not_found() {
        let (book, _) = shot_book();
        let err = PricingService::evaluate_named(&book, "울쎄라", 1_000).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }
}
