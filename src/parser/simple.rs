//! One package per line: `[bullet] name[+name...] [N회] [price]`.

use crate::domain::Package;
use crate::utils::ids::IdGenerator;

use super::line::{decompose_items, meaningful_lines, split_trailing_price, strip_bullet};

pub(crate) fn parse<G: IdGenerator + ?Sized>(text: &str, ids: &mut G) -> Vec<Package> {
    meaningful_lines(text)
        .filter_map(|line| parse_line(line, ids))
        .collect()
}

fn parse_line<G: IdGenerator + ?Sized>(line: &str, ids: &mut G) -> Option<Package> {
    let body = strip_bullet(line);
    let (name, price) = split_trailing_price(body);
    if name.is_empty() {
        tracing::trace!(line, "dropping line without a package name");
        return None;
    }
    let package = Package::new(ids.next_id(), name, price.unwrap_or(0))
        .with_items(decompose_items(name));
    Some(package)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceSource;
    use crate::utils::ids::SequentialIds;

    #[test]
    fn splits_bundle_on_plus() {
        let packages = parse("●슈링크300+인모드fx 얼전 690,000원", &mut SequentialIds::new());
        assert_eq!(packages.len(), 1);
        let package = &packages[0];
        assert_eq!(package.package_price, 690_000);
        assert_eq!(package.name, "슈링크300+인모드fx 얼전");
        let names: Vec<_> = package.items.iter().map(|i| i.procedure_name.as_str()).collect();
        assert_eq!(names, ["슈링크300", "인모드fx 얼전"]);
        assert!(package
            .items
            .iter()
            .all(|i| i.quantity == 1 && i.individual_price == 0 && i.price_source == PriceSource::Manual));
    }

    #[test]
    fn line_without_price_keeps_whole_name() {
        let packages = parse("• 리쥬란힐러 2회", &mut SequentialIds::new());
        assert_eq!(packages[0].package_price, 0);
        assert_eq!(packages[0].name, "리쥬란힐러 2회");
        assert_eq!(packages[0].items[0].quantity, 2);
    }

    #[test]
    fn bare_bullet_lines_are_dropped() {
        let packages = parse("●\n- \n울쎄라 300샷 1,290,000원", &mut SequentialIds::new());
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "울쎄라 300샷");
    }
}
