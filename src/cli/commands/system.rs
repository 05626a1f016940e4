use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::core::CURRENT_SCHEMA_VERSION;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "version",
            "Show the version and data file locations",
            "version",
            cmd_version,
        ),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

const VERSION: &str = env!("CARGO_PKG_VERSION");
const GIT_REV: &str = match option_env!("CLINIC_PRICING_GIT_REV") {
    Some(rev) => rev,
    None => "unknown",
};

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section(format!("Clinic Pricing {} ({})", VERSION, GIT_REV));
    io::print_info(format!("  Book schema : v{}", CURRENT_SCHEMA_VERSION));
    io::print_info(format!(
        "  Book file   : {}",
        context.book_manager.save_target().display()
    ));
    io::print_info(format!(
        "  Config file : {}",
        context.config_manager.path().display()
    ));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.book_manager.is_dirty() {
        io::print_warning("Unsaved changes were discarded. Use `save` before `exit` to keep them.");
    }
    Err(CommandError::ExitRequested)
}
