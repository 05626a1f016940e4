use std::fs;

use crate::cli::core::{require_arg, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{render_table, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::core::services::PackageService;
use crate::currency::{format_man, format_signed_won, format_won};
use crate::pricing::compute_package_summary;

const PACKAGES_USAGE: &str = "packages | packages remove <package name>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "import",
            "Import packages from a text file",
            "import <file>",
            cmd_import,
        ),
        CommandEntry::new(
            "packages",
            "List or remove imported packages",
            PACKAGES_USAGE,
            cmd_packages,
        ),
        CommandEntry::new(
            "summary",
            "Show how a package price spreads over its items",
            "summary <package name>",
            cmd_summary,
        ),
        CommandEntry::new(
            "match",
            "Re-apply library and branch prices to all packages",
            "match",
            cmd_match,
        ),
    ]
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = require_arg(args, 0, "import <file>")?;
    let text = fs::read_to_string(path)?;
    let branch = context.config.active_branch.clone();
    let report = PackageService::import_text(
        &mut context.book_manager.current,
        &text,
        &mut context.ids,
        branch.as_deref(),
    )?;
    context.book_manager.mark_dirty();
    io::print_success(format!(
        "Imported {} package(s) using the {} grammar: {} item(s) priced, {} unpriced.",
        report.added, report.format, report.matched.priced, report.matched.unpriced
    ));
    Ok(())
}

fn cmd_packages(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let action = args.first().map(|value| value.to_lowercase());
    match action.as_deref() {
        None | Some("list") => list_packages(context),
        Some("remove") => {
            let name = require_arg(args, 1, PACKAGES_USAGE)?;
            let removed = PackageService::remove_package(&mut context.book_manager.current, name)?;
            context.book_manager.mark_dirty();
            io::print_success(format!(
                "Removed package `{}` ({} item(s)).",
                removed.name,
                removed.items.len()
            ));
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown packages action `{}`; usage: {}",
            other, PACKAGES_USAGE
        ))),
    }
}

fn list_packages(context: &ShellContext) -> CommandResult {
    let packages = &context.book_manager.current.packages;
    if packages.is_empty() {
        io::print_info("No packages imported yet. Use `import <file>`.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = packages
        .iter()
        .enumerate()
        .map(|(idx, package)| {
            let summary = compute_package_summary(package);
            vec![
                (idx + 1).to_string(),
                package.name.clone(),
                package.items.len().to_string(),
                format_man(package.package_price),
                format_man(summary.total_regular_price),
                package.memo.clone().unwrap_or_default(),
            ]
        })
        .collect();
    output_section("Packages");
    println!(
        "{}",
        render_table(&["#", "name", "items", "price", "regular", "memo"], &rows)
    );
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = require_arg(args, 0, "summary <package name>")?;
    let book = &context.book_manager.current;
    let package = PackageService::find_package(book, name)?;
    let summary = compute_package_summary(package);

    output_section(format!("Summary: {}", package.name));
    io::print_info(format!("  Package price : {}", format_won(summary.package_price)));
    io::print_info(format!(
        "  Regular total : {}",
        format_won(summary.total_regular_price)
    ));
    io::print_info(format!(
        "  Savings       : {} ({:.1}%)",
        format_signed_won(summary.savings_amount),
        summary.savings_percent
    ));

    let rows: Vec<Vec<String>> = package
        .items
        .iter()
        .zip(summary.per_item_breakdown.iter())
        .map(|(item, line)| {
            vec![
                line.procedure_name.clone(),
                line.quantity.to_string(),
                format_won(line.individual_price),
                item.price_source.to_string(),
                format_won(line.allocated_price),
                format!("{:.1}%", line.savings_percent),
            ]
        })
        .collect();
    println!(
        "{}",
        render_table(
            &["item", "qty", "unit", "source", "allocated", "savings"],
            &rows
        )
    );
    Ok(())
}

fn cmd_match(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let branch = context.config.active_branch.clone();
    let report = PackageService::rematch(&mut context.book_manager.current, branch.as_deref())?;
    context.book_manager.mark_dirty();
    io::print_success(format!(
        "Matched prices: {} item(s) priced, {} unpriced.",
        report.priced, report.unpriced
    ));
    Ok(())
}
