use std::fs;

use crate::cli::core::{
    parse_count_arg, parse_price_arg, require_arg, CommandError, CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::output::{render_table, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::core::services::PricingService;
use crate::currency::{format_rate, format_won};
use crate::domain::{CompetitorQuote, PricingType, Row};
use crate::pricing::unit_label;

const ITEM_USAGE: &str = "item list | item load <file.json> \
| item add <name> <session|shot|mixed> <trial> <event> [base shots] \
| item option <name> <price> <sessions|shots> [sessions] \
| item competitor <name> <price> [sessions] [shots] [label] | item competitor <name> off";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("item", "Manage tiered pricing items", ITEM_USAGE, cmd_item),
        CommandEntry::new(
            "rows",
            "Show the price table of an item",
            "rows <item name>",
            cmd_rows,
        ),
        CommandEntry::new(
            "validate",
            "Check the volume discount rule",
            "validate [item name]",
            cmd_validate,
        ),
        CommandEntry::new(
            "round",
            "Show or set the unit price rounding unit",
            "round [unit]",
            cmd_round,
        ),
    ]
}

fn cmd_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let action = args.first().map(|value| value.to_lowercase());
    match action.as_deref() {
        Some("list") | None => list_items(context),
        Some("load") => {
            let path = require_arg(args, 1, ITEM_USAGE)?;
            let json = fs::read_to_string(path)?;
            let count = PricingService::import_items(&mut context.book_manager.current, &json)?;
            context.book_manager.mark_dirty();
            io::print_success(format!("Loaded {} pricing item(s).", count));
            Ok(())
        }
        Some("add") => add_item(context, &args[1..]),
        Some("option") => add_option(context, &args[1..]),
        Some("competitor") => set_competitor(context, &args[1..]),
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown item action `{}`; usage: {}",
            other, ITEM_USAGE
        ))),
    }
}

fn list_items(context: &ShellContext) -> CommandResult {
    let items = &context.book_manager.current.pricing_items;
    if items.is_empty() {
        io::print_info("No pricing items yet. Use `item add` or `item load`.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| {
            vec![
                item.name.clone(),
                item.kind.to_string(),
                format_won(item.trial_price),
                format_won(item.event_price),
                item.options.len().to_string(),
                if item.competitor.enabled { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    output_section("Pricing items");
    println!(
        "{}",
        render_table(
            &["name", "type", "trial", "event", "options", "competitor"],
            &rows
        )
    );
    Ok(())
}

fn add_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = require_arg(args, 0, ITEM_USAGE)?;
    let raw_kind = require_arg(args, 1, ITEM_USAGE)?;
    let kind = PricingType::parse(raw_kind).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown pricing type `{}` (use session, shot or mixed)",
            raw_kind
        ))
    })?;
    let trial = parse_price_arg(require_arg(args, 2, ITEM_USAGE)?)?;
    let event = parse_price_arg(require_arg(args, 3, ITEM_USAGE)?)?;
    let base_shots = match args.get(4) {
        Some(value) => parse_count_arg(value, "base shots")?,
        None => context.config.base_shots,
    };
    PricingService::add_item(
        &mut context.book_manager.current,
        &mut context.ids,
        name,
        kind,
        (trial, event),
        Some(base_shots),
    )?;
    context.book_manager.mark_dirty();
    io::print_success(format!("Pricing item `{}` saved ({}).", name, kind));
    Ok(())
}

fn add_option(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = require_arg(args, 0, ITEM_USAGE)?;
    let price = parse_price_arg(require_arg(args, 1, ITEM_USAGE)?)?;
    let first = parse_count_arg(require_arg(args, 2, ITEM_USAGE)?, "quantity")?;
    let second = args
        .get(3)
        .map(|value| parse_count_arg(value, "sessions"))
        .transpose()?;

    let kind = PricingService::find_item(&context.book_manager.current, name)?.kind;
    let (sessions, shots) = match kind {
        PricingType::Session => (Some(first), None),
        PricingType::Shot => (None, Some(first)),
        PricingType::Mixed => (second, Some(first)),
    };
    PricingService::add_option(
        &mut context.book_manager.current,
        &mut context.ids,
        name,
        sessions,
        shots,
        price,
    )?;
    context.book_manager.mark_dirty();
    io::print_success(format!("Option added to `{}`.", name));
    Ok(())
}

fn set_competitor(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = require_arg(args, 0, ITEM_USAGE)?;
    let raw_price = require_arg(args, 1, ITEM_USAGE)?;
    let quote = if raw_price.eq_ignore_ascii_case("off") {
        CompetitorQuote::default()
    } else {
        CompetitorQuote {
            enabled: true,
            price: parse_price_arg(raw_price)?,
            sessions: args
                .get(2)
                .map(|value| parse_count_arg(value, "sessions"))
                .transpose()?,
            shots: args
                .get(3)
                .map(|value| parse_count_arg(value, "shots"))
                .transpose()?,
            name: args.get(4).map(|value| value.to_string()),
        }
    };
    let enabled = quote.enabled;
    PricingService::set_competitor(&mut context.book_manager.current, name, quote)?;
    context.book_manager.mark_dirty();
    if enabled {
        io::print_success(format!("Competitor quote set for `{}`.", name));
    } else {
        io::print_success(format!("Competitor quote removed from `{}`.", name));
    }
    Ok(())
}

fn cmd_rows(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = require_arg(args, 0, "rows <item name>")?;
    let (item, outcome) = PricingService::evaluate_named(
        &context.book_manager.current,
        name,
        context.config.round_unit,
    )?;
    let unit_header = unit_label(Some(item.kind));
    output_section(format!("{} ({})", item.name, item.kind));
    let rows: Vec<Vec<String>> = outcome.rows.iter().map(row_cells).collect();
    println!(
        "{}",
        render_table(
            &["tier", "price", unit_header, "vs trial", "vs event", "vs competitor", ""],
            &rows
        )
    );
    for violation in &outcome.violations {
        io::print_warning(violation);
    }
    Ok(())
}

fn row_cells(row: &Row) -> Vec<String> {
    vec![
        row.label.clone(),
        format_won(row.price),
        format_won(row.unit_price),
        format_rate(row.discount_from_trial),
        format_rate(row.discount_from_event),
        format_rate(row.competitor_advantage),
        if row.violation { "!" } else { "" }.to_string(),
    ]
}

fn cmd_validate(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let round_unit = context.config.round_unit;
    let book = &context.book_manager.current;
    let violations = match args.first() {
        Some(name) => PricingService::evaluate_named(book, name, round_unit)?.1.violations,
        None => PricingService::validate_book(book, round_unit),
    };
    if violations.is_empty() {
        io::print_success("All unit prices decrease with quantity.");
    } else {
        for violation in &violations {
            io::print_warning(violation);
        }
        io::print_error(format!("{} violation(s) found.", violations.len()));
    }
    Ok(())
}

fn cmd_round(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(value) = args.first() else {
        io::print_info(format!(
            "Rounding unit: {}",
            format_won(context.config.round_unit.max(0) as u64)
        ));
        return Ok(());
    };
    let unit = value.parse::<i64>().map_err(|_| {
        CommandError::InvalidArguments(format!("`{}` is not a whole number", value))
    })?;
    if unit < 0 {
        return Err(CommandError::InvalidArguments(
            "rounding unit must not be negative".into(),
        ));
    }
    context.config.round_unit = unit;
    context.persist_config()?;
    io::print_success(format!("Rounding unit set to {}.", format_won(unit as u64)));
    Ok(())
}
