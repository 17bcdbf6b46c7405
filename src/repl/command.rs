//! Parsing of interactive input lines.
//!
//! A line is either a `:` command or a sequence of keypad keys.

use lazy_static::lazy_static;
use regex::Regex;

use crate::compute::Operation;
use crate::keys::{Key, KeyError, parse_keys};

lazy_static! {
    /// `:name rest...`
    static ref COMMAND: Regex = Regex::new(r"^:([a-z][a-z-]*)\s*(.*)$").unwrap();

    /// Numbers accepted as command arguments, with optional thousands commas.
    static ref NUMBER_ARG: Regex = Regex::new(r"^[+-]?(\d[\d,]*)?(\.\d+)?$").unwrap();
}

/// A `:` command.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    History,
    Use(usize),
    Compute {
        operation: Operation,
        num1: f64,
        num2: Option<f64>,
    },
    ClearHistory,
    Help,
    Quit,
}

/// One line of interactive input.
#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    /// An empty line: the Enter key.
    Enter,
    Keys(Vec<Key>),
    Command(Command),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("unknown command ':{0}', try :help")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("{0}")]
    Invalid(String),
}

pub const HELP: &str = "\
Type keys to edit the display, then = (or an empty line) to evaluate.
  digits .      enter a number
  + - * / ^     operators (also − × ÷)
  r             square root of the current number
  <             backspace
  c             clear
Commands:
  :history                  show recent calculations
  :use N                    load history item N into the display
  :compute OP NUM1 [NUM2]   run one operation (add subtract multiply divide modulo power sqrt)
  :clear-history            delete all history
  :help                     show this help
  :quit                     exit";

impl Input {
    pub fn parse(line: &str) -> Result<Self, InputError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Self::Enter);
        }
        if trimmed.starts_with(':') {
            return parse_command(trimmed).map(Self::Command);
        }
        Ok(Self::Keys(parse_keys(trimmed)?))
    }
}

fn parse_command(line: &str) -> Result<Command, InputError> {
    let captures = COMMAND
        .captures(line)
        .ok_or_else(|| InputError::UnknownCommand(line.trim_start_matches(':').to_string()))?;
    let name = &captures[1];
    let args: Vec<&str> = captures[2].split_whitespace().collect();

    match (name, args.as_slice()) {
        ("history" | "h", []) => Ok(Command::History),
        ("use" | "u", [index]) => index
            .parse()
            .map(Command::Use)
            .map_err(|_| InputError::Invalid(format!("not a history index: {index}"))),
        ("use" | "u", _) => Err(InputError::Usage(":use N")),
        ("compute", [operation, num1, rest @ ..]) if rest.len() <= 1 => {
            let operation: Operation = operation
                .parse()
                .map_err(|e: crate::compute::ServiceError| InputError::Invalid(e.to_string()))?;
            Ok(Command::Compute {
                operation,
                num1: parse_number(num1)?,
                num2: rest.first().map(|n| parse_number(n)).transpose()?,
            })
        }
        ("compute", _) => Err(InputError::Usage(":compute OP NUM1 [NUM2]")),
        ("clear-history", []) => Ok(Command::ClearHistory),
        ("help" | "?", []) => Ok(Command::Help),
        ("quit" | "q" | "exit", []) => Ok(Command::Quit),
        ("history" | "h" | "clear-history" | "help" | "quit" | "q" | "exit", _) => {
            Err(InputError::Usage("this command takes no arguments"))
        }
        _ => Err(InputError::UnknownCommand(name.to_string())),
    }
}

/// Parse a numeric command argument.
pub fn parse_number(arg: &str) -> Result<f64, InputError> {
    let invalid = || InputError::Invalid(format!("not a number: {arg}"));
    if !NUMBER_ARG.is_match(arg) || !arg.chars().any(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    arg.replace(',', "").parse().map_err(|_| invalid())
}
