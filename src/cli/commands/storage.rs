use std::path::Path;

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "save",
            "Save the price book",
            "save [path]",
            cmd_save,
        ),
        CommandEntry::new(
            "load",
            "Load a price book, replacing the current one",
            "load [path]",
            cmd_load,
        ),
    ]
}

fn cmd_save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        Some(path) => {
            let path = Path::new(path);
            context.book_manager.save_to_path(path)?;
            io::print_success(format!("Price book saved to `{}`.", path.display()));
        }
        None => {
            let path = context.book_manager.save()?;
            io::print_success(format!("Price book saved to `{}`.", path.display()));
        }
    }
    Ok(())
}

fn cmd_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if context.book_manager.is_dirty() {
        io::print_warning("Discarding unsaved changes.");
    }
    match args.first() {
        Some(path) => context.book_manager.load_from_path(Path::new(path))?,
        None => context.book_manager.load()?,
    }
    let book = &context.book_manager.current;
    io::print_success(format!(
        "Loaded price book: {} package(s), {} procedure(s), {} pricing item(s).",
        book.packages.len(),
        book.procedures.len(),
        book.pricing_items.len()
    ));
    Ok(())
}
