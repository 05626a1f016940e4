//! Shell context construction, dispatch, and error reporting.

use std::io;

use rustyline::error::ReadlineError;
use strsim::levenshtein;

use crate::{
    config::ConfigManager,
    core::{services::ServiceError, BookManager},
    currency::parse_korean_price,
    domain::Won,
    errors::PricingError,
    storage::JsonStorage,
    utils::ids::RandomIds,
};

use super::commands;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] PricingError),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(err) => CommandError::Core(err),
            ServiceError::Invalid(message) => CommandError::InvalidArguments(message),
            not_found @ ServiceError::NotFound { .. } => CommandError::Message(not_found.to_string()),
        }
    }
}

/// Failures that end the shell.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] PricingError),
    #[error("readline failure: {0}")]
    Readline(#[from] ReadlineError),
    #[error("{0}")]
    Command(String),
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let storage = JsonStorage::new_default()?;
        let mut book_manager = BookManager::new(Box::new(storage));
        book_manager.load()?;
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;

        if mode == CliMode::Script {
            colored::control::set_override(false);
        }

        Ok(Self {
            registry,
            book_manager,
            config_manager,
            config,
            ids: RandomIds,
            running: true,
        })
    }

    pub(crate) fn prompt(&self) -> String {
        let dirty = if self.book_manager.is_dirty() { "*" } else { "" };
        match self.config.active_branch.as_deref() {
            Some(branch) => format!("clinic[{}]{}> ", branch, dirty),
            None => format!("clinic{}> ", dirty),
        }
    }

    /// Command names with their usage lines, in registration order.
    pub(crate) fn command_usages(&self) -> Vec<(&'static str, &'static str)> {
        self.registry
            .list()
            .into_iter()
            .map(|entry| (entry.name, entry.usage))
            .collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager
            .save(&self.config)
            .map_err(CommandError::from)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &input.to_lowercase()), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_info("Use `help <command>` for usage details.");
            }
            other => cli_io::print_error(other),
        }
    }
}

/// Parses a price argument such as `99000`, `99,000원` or `9.9만`.
pub(crate) fn parse_price_arg(value: &str) -> Result<Won, CommandError> {
    if !value.chars().any(|ch| ch.is_ascii_digit()) {
        return Err(CommandError::InvalidArguments(format!(
            "`{}` is not a price",
            value
        )));
    }
    Ok(parse_korean_price(value))
}

pub(crate) fn parse_count_arg(value: &str, what: &str) -> Result<u32, CommandError> {
    match value.trim().parse::<u32>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(CommandError::InvalidArguments(format!(
            "{} must be a positive whole number (got `{}`)",
            what, value
        ))),
    }
}

pub(crate) fn require_arg<'a>(args: &[&'a str], idx: usize, usage: &str) -> Result<&'a str, CommandError> {
    args.get(idx)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))
}
