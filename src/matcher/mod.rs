//! Resolves free-text procedure names against price libraries.

use std::fmt;

use strsim::normalized_levenshtein;

use crate::domain::{BranchProcedure, NamedEntity, Package, PackageItem, PriceSource, Procedure};

/// Matching strategy that produced a hit, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
    Exact,
    Normalized,
    Contains,
    Tokens,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchTier::Exact => "exact",
            MatchTier::Normalized => "normalized",
            MatchTier::Contains => "contains",
            MatchTier::Tokens => "tokens",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult<'a, T> {
    pub candidate: &'a T,
    pub tier: MatchTier,
}

/// Strips all whitespace and lower-cases.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Returns the first candidate of the strongest tier that matches `query`.
pub fn find_best_match<'a, T: NamedEntity>(
    query: &str,
    candidates: &'a [T],
) -> Option<MatchResult<'a, T>> {
    let normalized_query = normalize_name(query);
    if normalized_query.is_empty() || candidates.is_empty() {
        return None;
    }

    if let Some(candidate) = candidates.iter().find(|c| c.name() == query) {
        return Some(MatchResult {
            candidate,
            tier: MatchTier::Exact,
        });
    }

    let normalized: Vec<String> = candidates.iter().map(|c| normalize_name(c.name())).collect();
    let hit = |tier: MatchTier, idx: usize| MatchResult {
        candidate: &candidates[idx],
        tier,
    };

    if let Some(idx) = normalized.iter().position(|name| *name == normalized_query) {
        return Some(hit(MatchTier::Normalized, idx));
    }

    if let Some(idx) = normalized.iter().position(|name| {
        !name.is_empty()
            && (name.contains(normalized_query.as_str()) || normalized_query.contains(name.as_str()))
    }) {
        return Some(hit(MatchTier::Contains, idx));
    }

    let tokens: Vec<String> = query
        .split_whitespace()
        .filter(|token| token.chars().count() > 1)
        .map(str::to_lowercase)
        .collect();
    if tokens.len() >= 2 {
        if let Some(idx) = normalized
            .iter()
            .position(|name| tokens.iter().all(|token| name.contains(token.as_str())))
        {
            return Some(hit(MatchTier::Tokens, idx));
        }
    }

    None
}

/// Ranks candidate names by similarity to `query` for "did you mean" hints.
pub fn suggest_names<'a, T: NamedEntity>(
    query: &str,
    candidates: &'a [T],
    limit: usize,
) -> Vec<&'a str> {
    let normalized_query = normalize_name(query);
    if normalized_query.is_empty() {
        return Vec::new();
    }
    let mut scored: Vec<(f64, usize)> = candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| (normalized_levenshtein(&normalized_query, &normalize_name(c.name())), idx))
        .filter(|(score, _)| *score >= 0.4)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, idx)| candidates[idx].name())
        .collect()
}

/// Fills unpriced items from the procedure library. Items already priced
/// from a non-manual source are left untouched.
pub fn match_procedure_prices(packages: &[Package], procedures: &[Procedure]) -> Vec<Package> {
    apply_to_items(packages, |item| {
        let found = find_best_match(&item.procedure_name, procedures)?;
        let (price, source) = found.candidate.preferred_price()?;
        tracing::trace!(
            name = %item.procedure_name,
            matched = %found.candidate.name,
            tier = %found.tier,
            "procedure price matched"
        );
        Some(PackageItem {
            individual_price: price,
            price_source: source,
            procedure_id: Some(found.candidate.id),
            ..item.clone()
        })
    })
}

/// Fills unpriced items from a branch's official price sheet.
pub fn match_branch_prices(packages: &[Package], sheet: &[BranchProcedure]) -> Vec<Package> {
    apply_to_items(packages, |item| {
        let found = find_best_match(&item.procedure_name, sheet)?;
        if found.candidate.standard_price == 0 {
            return None;
        }
        tracing::trace!(
            name = %item.procedure_name,
            matched = %found.candidate.name,
            tier = %found.tier,
            "branch price matched"
        );
        Some(PackageItem {
            individual_price: found.candidate.standard_price,
            price_source: PriceSource::Branch,
            branch_category: Some(found.candidate.category.clone()),
            ..item.clone()
        })
    })
}

fn apply_to_items<F>(packages: &[Package], mut price_item: F) -> Vec<Package>
where
    F: FnMut(&PackageItem) -> Option<PackageItem>,
{
    let mut matched = 0usize;
    let result = packages
        .iter()
        .map(|package| {
            let items = package
                .items
                .iter()
                .map(|item| {
                    if item.is_locked() {
                        return item.clone();
                    }
                    match price_item(item) {
                        Some(priced) => {
                            matched += 1;
                            priced
                        }
                        None => item.clone(),
                    }
                })
                .collect();
            Package {
                items,
                ..package.clone()
            }
        })
        .collect();
    tracing::debug!(matched, "applied library prices to package items");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn procedure(n: u128, name: &str, trial: u64, event: u64) -> Procedure {
        Procedure::new(Uuid::from_u128(n), name, trial, event)
    }

    #[test]
    fn tiers_apply_in_priority_order() {
        let library = vec![
            procedure(1, "슈링크 유니버스 300샷", 0, 0),
            procedure(2, "슈링크", 0, 0),
            procedure(3, "Inmode FX", 0, 0),
        ];

        let exact = find_best_match("슈링크", &library).unwrap();
        assert_eq!(exact.tier, MatchTier::Exact);
        assert_eq!(exact.candidate.id, Uuid::from_u128(2));

        let normalized = find_best_match("inmode  fx", &library).unwrap();
        assert_eq!(normalized.tier, MatchTier::Normalized);
        assert_eq!(normalized.candidate.id, Uuid::from_u128(3));

        let contains = find_best_match("슈링크300", &library).unwrap();
        assert_eq!(contains.tier, MatchTier::Contains);
        assert_eq!(contains.candidate.id, Uuid::from_u128(2));

        let contained = find_best_match("유니버스", &library).unwrap();
        assert_eq!(contained.tier, MatchTier::Contains);
        assert_eq!(contained.candidate.id, Uuid::from_u128(1));
    }

    #[test]
    fn token_tier_requires_every_token() {
        let library = vec![procedure(1, "울쎄라 리프팅 300샷", 0, 0)];
        let found = find_best_match("300샷 울쎄라 전체", &library);
        assert!(found.is_none());
        let found = find_best_match("300샷 울쎄라", &library).unwrap();
        assert_eq!(found.tier, MatchTier::Tokens);
    }

    #[test]
    fn single_token_query_never_uses_token_tier() {
        let library = vec![procedure(1, "리쥬란 힐러", 0, 0)];
        assert!(find_best_match("힐러리쥬란", &library).is_none());
    }

    #[test]
    fn empty_names_never_match() {
        let library = vec![procedure(1, "  ", 0, 0), procedure(2, "보톡스", 0, 0)];
        assert!(find_best_match("", &library).is_none());
        let found = find_best_match("사각턱 보톡스", &library).unwrap();
        assert_eq!(found.candidate.id, Uuid::from_u128(2));
    }

    #[test]
    fn suggestions_rank_closest_first() {
        let library = vec![
            procedure(1, "써마지", 0, 0),
            procedure(2, "슈링크", 0, 0),
            procedure(3, "슈링크 유니버스", 0, 0),
        ];
        let suggestions = suggest_names("슈링코", &library, 2);
        assert_eq!(suggestions.first().copied(), Some("슈링크"));
    }
}
