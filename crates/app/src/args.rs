use std::fmt;

use atlas_core::model::StepStatus;

pub const DEFAULT_DB_URL: &str = "sqlite://atlas.sqlite3";

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { what: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidIndex { raw: String },
    InvalidStatus { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { what } => write!(f, "missing {what}"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidIndex { raw } => write!(f, "invalid step index: {raw}"),
            ArgsError::InvalidStatus { raw } => {
                write!(f, "invalid status (expected locked|unlocked|finished): {raw}")
            }
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Path,
    Unlock { index: usize },
    Finish { index: usize },
    Set { index: usize, status: StepStatus },
    Reset,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Args {
    pub db_url: String,
    pub json: bool,
    pub command: Command,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Parsed {
    Help,
    Run(Args),
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  atlas [--db <sqlite_url>] [--json] path");
    eprintln!("  atlas [--db <sqlite_url>] [--json] unlock <index>");
    eprintln!("  atlas [--db <sqlite_url>] [--json] finish <index>");
    eprintln!("  atlas [--db <sqlite_url>] [--json] set <index> <locked|unlocked|finished>");
    eprintln!("  atlas [--db <sqlite_url>] [--json] reset");
    eprintln!();
    eprintln!("Every command prints the resulting learning path; --json prints it as JSON.");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  ATLAS_DB_URL, RUST_LOG");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_index(raw: Option<String>) -> Result<usize, ArgsError> {
    let raw = raw.ok_or(ArgsError::MissingArgument { what: "step index" })?;
    raw.parse()
        .map_err(|_| ArgsError::InvalidIndex { raw: raw.clone() })
}

fn parse_status(raw: Option<String>) -> Result<StepStatus, ArgsError> {
    let raw = raw.ok_or(ArgsError::MissingArgument { what: "status" })?;
    raw.parse()
        .map_err(|_| ArgsError::InvalidStatus { raw: raw.clone() })
}

/// Parse CLI arguments (without the program name).
///
/// `env_db_url` is the value of `ATLAS_DB_URL`, if set; `--db` wins over it.
pub fn parse(
    argv: impl IntoIterator<Item = String>,
    env_db_url: Option<String>,
) -> Result<Parsed, ArgsError> {
    let mut db_url = env_db_url
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DB_URL.to_owned());
    let mut json = false;
    let mut positional = Vec::new();

    let mut args = argv.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => {
                let value = require_value(&mut args, "--db")?;
                if value.trim().is_empty() {
                    return Err(ArgsError::InvalidDbUrl { raw: value });
                }
                db_url = value;
            }
            "--json" => json = true,
            "--help" | "-h" => return Ok(Parsed::Help),
            flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let command = match positional.next().as_deref() {
        None | Some("path") => Command::Path,
        Some("unlock") => Command::Unlock {
            index: parse_index(positional.next())?,
        },
        Some("finish") => Command::Finish {
            index: parse_index(positional.next())?,
        },
        Some("set") => Command::Set {
            index: parse_index(positional.next())?,
            status: parse_status(positional.next())?,
        },
        Some("reset") => Command::Reset,
        Some(other) => return Err(ArgsError::UnknownCommand(other.to_owned())),
    };

    if let Some(extra) = positional.next() {
        return Err(ArgsError::UnknownArg(extra));
    }

    Ok(Parsed::Run(Args {
        db_url,
        json,
        command,
    }))
}
