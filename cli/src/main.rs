//! RLP simulator: command line entry point.

mod render;
mod shell;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rlp_session::{Session, SessionConfig, SessionError};
use rlp_types::Amount;
use rlp_utils::LogFormat;
use serde::Serialize;

use crate::shell::{Shell, DEFAULT_NOTE};

#[derive(Parser)]
#[command(name = "rlp", about = "Revenue Labor Protocol revenue distribution simulator")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "RLP_CONFIG")]
    config: Option<PathBuf>,

    /// Absolute tolerance when checking that active shares sum to 100%.
    #[arg(long, env = "RLP_TOLERANCE")]
    tolerance: Option<f64>,

    /// Cosmetic processing delay before each distribution, in milliseconds.
    #[arg(long, env = "RLP_DELAY_MS")]
    delay_ms: Option<u64>,

    /// Display unit for amounts.
    #[arg(long, env = "RLP_UNIT")]
    unit: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "RLP_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "RLP_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Show the cap table and its total allocation.
    Table,

    /// Execute payments in order and print the resulting ledger.
    Simulate {
        /// A payment as AMOUNT or AMOUNT=NOTE. Repeatable.
        #[arg(long = "payment", short = 'p', required = true, value_parser = parse_payment)]
        payments: Vec<Payment>,

        /// Write the ledger as CSV to this path afterwards.
        #[arg(long)]
        export: Option<PathBuf>,

        /// Print the ledger and stats as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Interactive session reading commands from stdin.
    Shell,

    /// Print the effective configuration as TOML.
    Config,
}

/// One `--payment` argument.
#[derive(Clone, Debug, PartialEq)]
struct Payment {
    amount: Amount,
    note: String,
}

/// Parse a user-supplied amount: finite and not negative.
pub(crate) fn parse_amount(s: &str) -> Result<Amount, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid amount: {s}"))?;
    let amount = Amount::try_new(value).map_err(|e| e.to_string())?;
    if amount.is_negative() {
        return Err(format!("amount must not be negative: {s}"));
    }
    Ok(amount)
}

fn parse_payment(s: &str) -> Result<Payment, String> {
    let (amount, note) = match s.split_once('=') {
        Some((amount, note)) => (amount, note.to_string()),
        None => (s, DEFAULT_NOTE.to_string()),
    };
    Ok(Payment {
        amount: parse_amount(amount)?,
        note,
    })
}

fn load_config(cli: &Cli) -> anyhow::Result<SessionConfig> {
    let mut config = match cli.config {
        Some(ref path) => SessionConfig::from_toml_file(path)?,
        None => SessionConfig::default(),
    };
    if let Some(tolerance) = cli.tolerance {
        config.allocation_tolerance = tolerance;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.processing_delay_ms = delay_ms;
    }
    if let Some(ref unit) = cli.unit {
        config.unit = unit.clone();
    }
    if let Some(ref level) = cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    config.validate()?;
    Ok(config)
}

#[derive(Serialize)]
struct SimulationReport<'a> {
    ledger: &'a [rlp_ledger::LedgerRecord],
    summary: rlp_session::SessionSummary,
}

fn simulate(
    session: &mut Session,
    payments: &[Payment],
    export: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let unit = session.config().unit.clone();
    let mut refused = false;

    for payment in payments {
        match session.execute_distribution(payment.amount, &payment.note) {
            Ok(receipt) => {
                if !json {
                    println!("{}", receipt.describe(&unit));
                }
            }
            Err(SessionError::InvalidAllocation { total }) => {
                eprintln!("{}", render::allocation_warning(total));
                eprintln!("Cannot execute: Cap Table Logic Error (Shares != 100%)");
                refused = true;
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        let report = SimulationReport {
            ledger: session.ledger().records(),
            summary: session.summary(),
        };
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        writeln!(out)?;
        write!(out, "{}", render::ledger(&session.ledger().newest_first(), &unit))?;
        writeln!(out)?;
        write!(out, "{}", render::summary(&session.summary(), &unit))?;
        write!(
            out,
            "{}",
            render::recipient_totals(&session.ledger().totals_by_recipient(), &unit)
        )?;
    }

    if let Some(path) = export {
        let path = session.export_csv(Some(path.as_path()))?;
        tracing::info!("Compliance report written to {}", path.display());
    }

    Ok(if refused {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    rlp_utils::init_tracing(config.log_format, &config.log_level)?;

    if let Some(ref path) = cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command {
        Command::Table => {
            let table = config.cap_table();
            print!("{}", render::cap_table(&table));
            if table.validate(config.allocation_tolerance).is_err() {
                println!("{}", render::allocation_warning(table.total_active_share()));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Simulate {
            payments,
            export,
            json,
        } => {
            let mut session = Session::new(config);
            simulate(&mut session, &payments, export, json)
        }
        Command::Shell => {
            let mut shell = Shell::new(Session::new(config));
            shell.run(io::stdin().lock(), io::stdout().lock())?;
            let summary = shell.session().summary();
            tracing::info!(
                distributions = summary.distributions,
                records = summary.records,
                "session ended"
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
