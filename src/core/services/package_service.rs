use crate::core::PriceBook;
use crate::domain::{BranchProcedure, Package, Procedure, Won};
use crate::matcher::{find_best_match, match_branch_prices, match_procedure_prices};
use crate::parser::{detect_format, parse_bulk_text, TextFormat};
use crate::pricing::{compute_package_summary, PackageSummary};
use crate::utils::ids::IdGenerator;

use super::{ServiceError, ServiceResult};

/// Outcome of importing a block of package text.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub format: TextFormat,
    pub added: usize,
    pub matched: MatchReport,
}

/// Priced versus unpriced item counts after matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchReport {
    pub priced: usize,
    pub unpriced: usize,
}

impl MatchReport {
    fn tally(packages: &[Package]) -> Self {
        packages
            .iter()
            .flat_map(|package| package.items.iter())
            .fold(Self::default(), |mut report, item| {
                if item.individual_price > 0 {
                    report.priced += 1;
                } else {
                    report.unpriced += 1;
                }
                report
            })
    }
}

pub struct PackageService;

impl PackageService {
    /// Parses `text`, prices the new items from the library and the branch
    /// sheet, then appends the packages to the book.
    pub fn import_text<G: IdGenerator + ?Sized>(
        book: &mut PriceBook,
        text: &str,
        ids: &mut G,
        branch: Option<&str>,
    ) -> ServiceResult<ImportReport> {
        let sheet = Self::branch_sheet(book, branch)?;
        let format = detect_format(text);
        let parsed = parse_bulk_text(text, ids);
        let packages = Self::price_packages(&parsed, &book.procedures, sheet);
        let matched = MatchReport::tally(&packages);
        let added = packages.len();
        book.packages.extend(packages);
        tracing::info!(%format, added, priced = matched.priced, "imported packages");
        Ok(ImportReport {
            format,
            added,
            matched,
        })
    }

    /// Re-applies library and branch prices to every stored package.
    pub fn rematch(book: &mut PriceBook, branch: Option<&str>) -> ServiceResult<MatchReport> {
        let sheet = Self::branch_sheet(book, branch)?;
        let packages = Self::price_packages(&book.packages, &book.procedures, sheet);
        let report = MatchReport::tally(&packages);
        book.packages = packages;
        Ok(report)
    }

    pub fn find_package<'a>(book: &'a PriceBook, name: &str) -> ServiceResult<&'a Package> {
        find_best_match(name, &book.packages)
            .map(|found| found.candidate)
            .ok_or_else(|| ServiceError::not_found("package", name, &book.packages))
    }

    pub fn summarize(book: &PriceBook, name: &str) -> ServiceResult<PackageSummary> {
        Self::find_package(book, name).map(compute_package_summary)
    }

    /// Deletes the package that best matches `name` and returns it.
    pub fn remove_package(book: &mut PriceBook, name: &str) -> ServiceResult<Package> {
        let id = Self::find_package(book, name)?.id;
        book.remove_package(id)
            .ok_or_else(|| ServiceError::Invalid(format!("package `{}` was not stored", name)))
    }

    /// Adds or reprices a library procedure. Returns the stored entry.
    pub fn upsert_procedure<'a, G: IdGenerator + ?Sized>(
        book: &'a mut PriceBook,
        ids: &mut G,
        name: &str,
        trial_price: Won,
        event_price: Won,
    ) -> ServiceResult<&'a Procedure> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Invalid("procedure name must not be empty".into()));
        }
        book.upsert_procedure(Procedure::new(ids.next_id(), name, trial_price, event_price));
        book.procedures
            .iter()
            .find(|procedure| procedure.name == name)
            .ok_or_else(|| ServiceError::Invalid(format!("procedure `{}` was not stored", name)))
    }

    /// Installs a branch price sheet from its JSON form (an array of entries).
    pub fn import_branch_sheet(book: &mut PriceBook, branch: &str, json: &str) -> ServiceResult<usize> {
        let branch = branch.trim();
        if branch.is_empty() {
            return Err(ServiceError::Invalid("branch name must not be empty".into()));
        }
        let sheet: Vec<BranchProcedure> = serde_json::from_str(json)
            .map_err(|err| ServiceError::Invalid(format!("invalid branch sheet: {}", err)))?;
        let count = sheet.len();
        book.branches.insert(branch, sheet);
        Ok(count)
    }

    /// Forgets a branch price sheet. Returns how many entries it held.
    pub fn drop_branch(book: &mut PriceBook, branch: &str) -> ServiceResult<usize> {
        book.branches
            .remove(branch)
            .map(|sheet| sheet.len())
            .ok_or_else(|| ServiceError::Invalid(format!("branch `{}` has no price sheet", branch)))
    }

    fn branch_sheet<'a>(
        book: &'a PriceBook,
        branch: Option<&str>,
    ) -> ServiceResult<Option<&'a [BranchProcedure]>> {
        match branch {
            None => Ok(None),
            Some(name) => book.branches.sheet(name).map(Some).ok_or_else(|| {
                ServiceError::Invalid(format!("branch `{}` has no price sheet", name))
            }),
        }
    }

    fn price_packages(
        packages: &[Package],
        procedures: &[Procedure],
        sheet: Option<&[BranchProcedure]>,
    ) -> Vec<Package> {
        let priced = match_procedure_prices(packages, procedures);
        match sheet {
            Some(sheet) => match_branch_prices(&priced, sheet),
            None => priced,
        }
    }
}
