use std::{
    collections::HashMap,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output::{info as output_info, warning as output_warning};
use crate::core::PriceBook;

const SCRIPT_ENV: &str = "CLINIC_PRICING_CLI_SCRIPT";
const COMMENT_MARKER: char = '#';

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_usages())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    while context.running {
        if let Some(helper) = editor.helper_mut() {
            helper.names = CompletionNames::from_book(&context.book_manager.current);
        }

        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                if run_line(context, trimmed) == LoopControl::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => output_info("Use `exit` to leave the shell."),
            Err(ReadlineError::Eof) => {
                output_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

/// Reads one command per stdin line. Blank lines and `#` comments are
/// skipped so price scripts can be annotated.
fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
            continue;
        }
        if run_line(context, trimmed) == LoopControl::Exit || !context.running {
            break;
        }
    }
    Ok(())
}

fn run_line(context: &mut ShellContext, line: &str) -> LoopControl {
    match handle_line(context, line) {
        Ok(control) => control,
        Err(err) => {
            context.report_error(err);
            LoopControl::Continue
        }
    }
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output_warning(format!("Could not read `{}`: {}", line, err));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    let control = context.dispatch(&raw.to_lowercase(), raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

/// Names from the price book offered when completing arguments.
#[derive(Debug, Default)]
struct CompletionNames {
    packages: Vec<String>,
    items: Vec<String>,
    procedures: Vec<String>,
    branches: Vec<String>,
}

impl CompletionNames {
    fn from_book(book: &PriceBook) -> Self {
        Self {
            packages: book.packages.iter().map(|p| p.name.clone()).collect(),
            items: book.pricing_items.iter().map(|i| i.name.clone()).collect(),
            procedures: book.procedures.iter().map(|p| p.name.clone()).collect(),
            branches: book.branches.branch_names().map(str::to_string).collect(),
        }
    }
}

const PACKAGE_ACTIONS: &[&str] = &["list", "remove"];
const ITEM_ACTIONS: &[&str] = &["list", "load", "add", "option", "competitor"];
const BRANCH_ACTIONS: &[&str] = &["list", "load", "use", "drop", "clear"];
const ITEM_KINDS: &[&str] = &["session", "shot", "mixed"];

struct CommandHelper {
    commands: Vec<String>,
    usages: HashMap<String, &'static str>,
    names: CompletionNames,
}

impl CommandHelper {
    fn new(entries: Vec<(&'static str, &'static str)>) -> Self {
        let usages: HashMap<String, &'static str> = entries
            .into_iter()
            .map(|(name, usage)| (name.to_lowercase(), usage))
            .collect();
        let mut commands: Vec<String> = usages.keys().cloned().collect();
        commands.sort();
        Self {
            commands,
            usages,
            names: CompletionNames::default(),
        }
    }

    /// Candidates for the argument that follows `words`.
    fn argument_candidates(&self, words: &[String]) -> Vec<String> {
        let command = words.first().map(|word| word.to_lowercase());
        let action = words.get(1).map(|word| word.to_lowercase());
        let owned = |values: &[String]| values.to_vec();
        let fixed = |values: &[&str]| -> Vec<String> {
            values.iter().map(|value| value.to_string()).collect()
        };

        match (command.as_deref(), action.as_deref(), words.len()) {
            (Some("summary"), _, 1) => owned(&self.names.packages),
            (Some("packages"), None, 1) => fixed(PACKAGE_ACTIONS),
            (Some("packages"), Some("remove"), 2) => owned(&self.names.packages),
            (Some("rows") | Some("validate"), _, 1) => owned(&self.names.items),
            (Some("item"), None, 1) => fixed(ITEM_ACTIONS),
            (Some("item"), Some("option") | Some("competitor"), 2) => owned(&self.names.items),
            (Some("item"), Some("add"), 3) => fixed(ITEM_KINDS),
            (Some("branch"), None, 1) => fixed(BRANCH_ACTIONS),
            (Some("branch"), Some("use") | Some("drop"), 2) => owned(&self.names.branches),
            (Some("procedure"), _, 1) => owned(&self.names.procedures),
            (Some("help"), _, 1) => self.commands.clone(),
            _ => Vec::new(),
        }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .char_indices()
            .rev()
            .find(|(_, ch)| ch.is_whitespace())
            .map(|(idx, ch)| idx + ch.len_utf8())
            .unwrap_or(0);
        let Ok(words) = shell_words::split(&prefix[..start]) else {
            return Ok((start, Vec::new()));
        };

        let needle = prefix[start..].to_lowercase();
        let pool = if words.is_empty() {
            self.commands.clone()
        } else {
            self.argument_candidates(&words)
        };
        let candidates = pool
            .into_iter()
            .filter(|name| name.to_lowercase().starts_with(&needle))
            .map(|name| Pair {
                replacement: shell_words::quote(&name).into_owned(),
                display: name,
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    /// Shows the usage line once a known command is followed by a space.
    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos != line.len() {
            return None;
        }
        let command = line.strip_suffix(' ')?.trim_start();
        let usage = self.usages.get(&command.to_lowercase())?;
        usage
            .strip_prefix(command)
            .map(|rest| rest.trim_start().to_string())
            .filter(|rest| !rest.is_empty())
    }
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}
