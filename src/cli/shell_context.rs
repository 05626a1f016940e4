use crate::{
    config::{Config, ConfigManager},
    core::BookManager,
    utils::ids::RandomIds,
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub registry: CommandRegistry,
    pub book_manager: BookManager,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub ids: RandomIds,
    pub running: bool,
}
