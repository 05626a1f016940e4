use std::fs;

use crate::cli::core::{parse_price_arg, require_arg, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{render_table, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::core::services::PackageService;
use crate::currency::format_won;

const PROCEDURE_USAGE: &str = "procedure <name> <trial price> <event price>";
const BRANCH_USAGE: &str =
    "branch list | branch load <name> <file.json> | branch use <name> | branch drop <name> | branch clear";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "procedure",
            "Add or reprice a library procedure",
            PROCEDURE_USAGE,
            cmd_procedure,
        ),
        CommandEntry::new(
            "procedures",
            "List the procedure library",
            "procedures",
            cmd_procedures,
        ),
        CommandEntry::new(
            "branch",
            "Manage branch price sheets",
            BRANCH_USAGE,
            cmd_branch,
        ),
    ]
}

fn cmd_procedure(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = require_arg(args, 0, PROCEDURE_USAGE)?;
    let trial = parse_price_arg(require_arg(args, 1, PROCEDURE_USAGE)?)?;
    let event = parse_price_arg(require_arg(args, 2, PROCEDURE_USAGE)?)?;
    let procedure = PackageService::upsert_procedure(
        &mut context.book_manager.current,
        &mut context.ids,
        name,
        trial,
        event,
    )?;
    io::print_success(format!(
        "Procedure `{}` saved (trial {}, event {}).",
        procedure.name,
        format_won(procedure.trial_price),
        format_won(procedure.event_price)
    ));
    context.book_manager.mark_dirty();
    Ok(())
}

fn cmd_procedures(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let procedures = &context.book_manager.current.procedures;
    if procedures.is_empty() {
        io::print_info("The procedure library is empty.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = procedures
        .iter()
        .map(|procedure| {
            vec![
                procedure.name.clone(),
                format_won(procedure.trial_price),
                format_won(procedure.event_price),
            ]
        })
        .collect();
    output_section("Procedures");
    println!("{}", render_table(&["name", "trial", "event"], &rows));
    Ok(())
}

fn cmd_branch(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let action = args.first().map(|value| value.to_lowercase());
    match action.as_deref() {
        Some("list") | None => {
            let branches = &context.book_manager.current.branches;
            if branches.is_empty() {
                io::print_info("No branch price sheets loaded.");
                return Ok(());
            }
            output_section("Branches");
            for name in branches.branch_names() {
                let count = branches.sheet(name).map(<[_]>::len).unwrap_or(0);
                let marker = if context.config.active_branch.as_deref() == Some(name) {
                    " (active)"
                } else {
                    ""
                };
                io::print_info(format!("  {} : {} procedure(s){}", name, count, marker));
            }
            Ok(())
        }
        Some("load") => {
            let name = require_arg(args, 1, BRANCH_USAGE)?;
            let path = require_arg(args, 2, BRANCH_USAGE)?;
            let json = fs::read_to_string(path)?;
            let count =
                PackageService::import_branch_sheet(&mut context.book_manager.current, name, &json)?;
            context.book_manager.mark_dirty();
            io::print_success(format!(
                "Loaded {} procedure(s) for branch `{}`.",
                count, name
            ));
            Ok(())
        }
        Some("use") => {
            let name = require_arg(args, 1, BRANCH_USAGE)?;
            if context.book_manager.current.branches.sheet(name).is_none() {
                return Err(CommandError::InvalidArguments(format!(
                    "branch `{}` has no price sheet; use `branch load` first",
                    name
                )));
            }
            context.config.active_branch = Some(name.to_string());
            context.persist_config()?;
            io::print_success(format!("Active branch set to `{}`.", name));
            Ok(())
        }
        Some("drop") => {
            let name = require_arg(args, 1, BRANCH_USAGE)?;
            let count = PackageService::drop_branch(&mut context.book_manager.current, name)?;
            context.book_manager.mark_dirty();
            if context.config.active_branch.as_deref() == Some(name) {
                context.config.active_branch = None;
                context.persist_config()?;
                io::print_warning("The dropped branch was active; active branch cleared.");
            }
            io::print_success(format!(
                "Dropped branch `{}` ({} procedure(s)).",
                name, count
            ));
            Ok(())
        }
        Some("clear") => {
            context.config.active_branch = None;
            context.persist_config()?;
            io::print_success("Active branch cleared.");
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown branch action `{}`; usage: {}",
            other, BRANCH_USAGE
        ))),
    }
}
