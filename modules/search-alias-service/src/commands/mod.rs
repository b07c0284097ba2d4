//! Built-in query commands
//!
//! A query whose first word names one of these runs the command instead of a
//! bookmark lookup. A leading `!` is accepted (`!ping`).

mod add;
mod clock;
mod ping;
mod remove;

use crate::registry::{Registry, RegistryError};

pub const LIST_PATH: &str = "/list";
pub const HELP_PATH: &str = "/help";

/// Available commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Liveness check: `ping`
    Ping,
    /// Show all bookmarks: `list`
    List,
    /// Show command help: `help`
    Help,
    /// Current local time: `time`
    Time,
    /// Current date in HTTP-date form: `date`
    Date,
    /// Add or replace a bookmark: `add <name> <url>`
    Add,
    /// Remove a bookmark: `remove <name>`
    Remove,
}

impl Command {
    pub const ALL: [Command; 7] = [
        Command::Ping,
        Command::List,
        Command::Help,
        Command::Time,
        Command::Date,
        Command::Add,
        Command::Remove,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::Ping => "ping",
            Command::List => "list",
            Command::Help => "help",
            Command::Time => "time",
            Command::Date => "date",
            Command::Add => "add",
            Command::Remove => "remove",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::Ping => "ping the service, replies with pong and the current unix time",
            Command::List => "list all bookmarks",
            Command::Help => "show help for all commands",
            Command::Time => "show the current local time",
            Command::Date => "show the current date and time (HTTP date)",
            Command::Add => "add a bookmark, replacing any bookmark with the same name",
            Command::Remove => "remove a bookmark",
        }
    }

    pub fn usage(&self) -> &'static str {
        match self {
            Command::Add => "add <name> <url>",
            Command::Remove => "remove <name>",
            other => other.name(),
        }
    }

    /// Look up a command by the first word of a query.
    pub fn parse(word: &str) -> Option<Command> {
        let word = word.strip_prefix('!').unwrap_or(word);
        Command::ALL.into_iter().find(|cmd| cmd.name() == word)
    }
}

/// What a query resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Send the client elsewhere
    Redirect(String),
    /// Plain text response body
    Text(String),
}

/// Error type for a single query.
#[derive(Debug)]
pub enum CommandError {
    /// Wrong number of arguments; carries the expected usage
    Usage(&'static str),
    /// The bookmark name would be shadowed by a command
    Reserved(String),
    /// The registry rejected the operation
    Registry(RegistryError),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Usage(usage) => write!(f, "Usage: {}", usage),
            CommandError::Reserved(name) => {
                write!(f, "'{}' is a command and cannot be used as a bookmark name", name)
            }
            CommandError::Registry(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Registry(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RegistryError> for CommandError {
    fn from(e: RegistryError) -> Self {
        CommandError::Registry(e)
    }
}

/// Execute a command with the words that followed it
pub fn execute(cmd: Command, args: &[&str], registry: &Registry) -> Result<Outcome, CommandError> {
    log::debug!("[SEARCH_ALIAS] Running '{}' with {} args", cmd.name(), args.len());

    match cmd {
        Command::Ping => Ok(Outcome::Text(ping::execute())),
        Command::List => Ok(Outcome::Redirect(LIST_PATH.to_string())),
        Command::Help => Ok(Outcome::Redirect(HELP_PATH.to_string())),
        Command::Time => Ok(Outcome::Text(clock::time())),
        Command::Date => Ok(Outcome::Text(clock::date())),
        Command::Add => match args {
            [name, url] => add::execute(name, url, registry),
            _ => Err(CommandError::Usage(cmd.usage())),
        },
        Command::Remove => match args {
            [name] => remove::execute(name, registry),
            _ => Err(CommandError::Usage(cmd.usage())),
        },
    }
}
