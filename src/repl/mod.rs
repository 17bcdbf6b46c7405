//! Interactive calculator loop.
//!
//! Reads lines from the input, feeds them to a [`Calculator`] and prints the
//! display after each one. Errors never end the loop.

mod command;

pub use command::{Command, HELP, Input, InputError, parse_number};

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::debug;

use crate::keys::Key;
use crate::session::Calculator;
use crate::ui::{Status, render_display, render_history, render_status};

/// Whether to keep reading input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Repl<R, W> {
    calculator: Calculator,
    lines: Lines<R>,
    out: W,
}

impl<R, W> Repl<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(calculator: Calculator, input: R, out: W) -> Self {
        Self {
            calculator,
            lines: input.lines(),
            out,
        }
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Run until `:quit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "calcdeck ({} backend), :help for keys and commands",
            self.calculator.backend()
        )?;

        loop {
            write!(self.out, "{}\n> ", render_display(self.calculator.display()))?;
            self.out.flush()?;

            let Some(line) = self.lines.next_line().await? else {
                writeln!(self.out)?;
                break;
            };
            if self.handle_line(&line).await? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let input = match Input::parse(line) {
            Ok(input) => input,
            Err(err) => {
                self.error(&err.to_string())?;
                return Ok(Flow::Continue);
            }
        };
        debug!(?input, "repl input");

        match input {
            Input::Enter => self.press(&[Key::Equals]).await?,
            Input::Keys(keys) => self.press(&keys).await?,
            Input::Command(command) => return self.execute(command).await,
        }
        Ok(Flow::Continue)
    }

    async fn press(&mut self, keys: &[Key]) -> Result<()> {
        for err in self.calculator.press_keys(keys).await {
            self.error(&err.to_string())?;
        }
        Ok(())
    }

    async fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::History => {
                let panel = self.calculator.refresh_history().await;
                writeln!(self.out, "{}", render_history(panel))?;
            }
            Command::Use(index) => match self.calculator.recall(index) {
                Ok(true) => {}
                Ok(false) => self.error(&format!("no history item {index}, see :history"))?,
                Err(err) => self.error(&err.to_string())?,
            },
            Command::Compute {
                operation,
                num1,
                num2,
            } => {
                if let Err(err) = self.calculator.compute_direct(operation, num1, num2).await {
                    self.error(&err.to_string())?;
                }
            }
            Command::ClearHistory => {
                if self.confirm("Clear all history?").await? {
                    match self.calculator.clear_history().await {
                        Ok(()) => self.success("History cleared")?,
                        Err(err) => self.error(&err.to_string())?,
                    }
                }
            }
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Ask a yes/no question; anything but `y`/`yes` is a no.
    async fn confirm(&mut self, question: &str) -> Result<bool> {
        write!(self.out, "{question} [y/N] ")?;
        self.out.flush()?;
        let answer = self.lines.next_line().await?.unwrap_or_default();
        Ok(is_yes(&answer))
    }

    fn success(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{}", render_status(Status::Success(message)))?;
        Ok(())
    }

    fn error(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{}", render_status(Status::Error(message)))?;
        Ok(())
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
