//! Command-line interface.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::compute::{ComputeClient, HttpComputeClient, LocalCompute, Operation};
use crate::config::{Backend, Config};
use crate::keys::{Key, parse_keys};
use crate::repl::{Repl, is_yes};
use crate::session::Calculator;
use crate::ui::{Status, render_display, render_history, render_status};

#[derive(Parser, Debug)]
#[command(name = "calcdeck")]
#[command(version)]
#[command(about = "Keypad calculator backed by a remote compute service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (defaults to <config_dir>/calcdeck/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Compute service URL, overrides the config file
    #[arg(long, global = true, conflicts_with = "local")]
    pub api_url: Option<String>,

    /// Compute in-process instead of calling the service
    #[arg(long, global = true)]
    pub local: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Press a sequence of keys and print the display
    Eval {
        /// Keys, e.g. "2+3*4" (evaluated at the end unless they end with '=')
        #[arg(allow_hyphen_values = true)]
        keys: String,
    },

    /// Interactive calculator (default)
    Repl,

    /// Run a single operation on the compute service
    #[command(allow_negative_numbers = true)]
    Compute {
        /// add, subtract, multiply, divide, modulo, power or sqrt
        operation: Operation,
        num1: f64,
        num2: Option<f64>,
    },

    /// Show recent calculations
    History,

    /// Delete all recorded calculations
    ClearHistory {
        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Check that the compute service is up
    Health,
}

impl Cli {
    /// Default log filter for the `-v` count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    pub async fn run(self) -> Result<ExitCode> {
        let config = Config::load(self.config.as_deref())?
            .with_overrides(self.api_url.as_deref(), self.local);
        info!(backend = ?config.backend, api_url = %config.api_url, "resolved config");

        match self.command.unwrap_or(Commands::Repl) {
            Commands::Eval { keys } => Ok(exit_code(eval(connect(&config)?, &keys).await?)),
            Commands::Repl => {
                let stdin = BufReader::new(tokio::io::stdin());
                Repl::new(Calculator::new(connect(&config)?), stdin, io::stdout())
                    .run()
                    .await?;
                Ok(ExitCode::SUCCESS)
            }
            Commands::Compute {
                operation,
                num1,
                num2,
            } => compute(connect(&config)?, operation, num1, num2).await,
            Commands::History => {
                let mut calculator = Calculator::new(connect(&config)?);
                println!("{}", render_history(calculator.refresh_history().await));
                Ok(ExitCode::SUCCESS)
            }
            Commands::ClearHistory { yes } => clear_history(connect(&config)?, yes).await,
            Commands::Health => health(&config).await,
        }
    }
}

/// Build the compute client the config asks for.
pub fn connect(config: &Config) -> Result<Arc<dyn ComputeClient>> {
    Ok(match config.backend {
        Backend::Http => Arc::new(HttpComputeClient::new(&config.api_url, config.timeout())?),
        Backend::Local => Arc::new(LocalCompute::new()),
    })
}

/// Returns whether every key went through without a visible error.
async fn eval(client: Arc<dyn ComputeClient>, input: &str) -> Result<bool> {
    let mut keys = parse_keys(input)?;
    if keys.last() != Some(&Key::Equals) {
        keys.push(Key::Equals);
    }

    let mut calculator = Calculator::new(client);
    let errors = calculator.press_keys(&keys).await;
    println!("{}", render_display(calculator.display()));

    for err in &errors {
        eprintln!("{}", render_status(Status::Error(&err.to_string())));
    }
    Ok(errors.is_empty())
}

async fn compute(
    client: Arc<dyn ComputeClient>,
    operation: Operation,
    num1: f64,
    num2: Option<f64>,
) -> Result<ExitCode> {
    let mut calculator = Calculator::new(client);
    match calculator.compute_direct(operation, num1, num2).await {
        Ok(_) => {
            println!("{}", render_display(calculator.display()));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", render_status(Status::Error(&err.to_string())));
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn clear_history(client: Arc<dyn ComputeClient>, yes: bool) -> Result<ExitCode> {
    if !yes {
        print!("Clear all history? [y/N] ");
        io::stdout().flush()?;
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let answer = lines.next_line().await?.unwrap_or_default();
        if !is_yes(&answer) {
            return Ok(ExitCode::SUCCESS);
        }
    }

    let mut calculator = Calculator::new(client);
    match calculator.clear_history().await {
        Ok(()) => {
            println!("{}", render_status(Status::Success("History cleared")));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", render_status(Status::Error(&err.to_string())));
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn health(config: &Config) -> Result<ExitCode> {
    if config.backend == Backend::Local {
        bail!("health checks need the HTTP backend");
    }
    let client = HttpComputeClient::new(&config.api_url, config.timeout())?;
    let status = client
        .health()
        .await
        .with_context(|| format!("Compute service at {} is unreachable", client.base_url()))?;
    println!("{}: {status}", client.base_url());
    Ok(exit_code(status == "healthy"))
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
