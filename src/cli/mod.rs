use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::application::{CommandKind, CommandProcessor, CommandRequest, LedgerService};
use crate::io::{ChatSession, ExportFormat, Exporter};

/// Tally - chat-driven personal ledger
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Track a running balance, income, expenses and debts from a chat or the command line")]
#[command(version)]
pub struct Cli {
    /// Ledger record file path
    #[arg(
        short,
        long,
        env = "TALLY_DATA_FILE",
        default_value = "ledger.json",
        global = true
    )]
    pub data_file: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the current balance
    Balance,

    /// Add income under a label
    Income {
        /// Label, e.g. "salary"
        label: String,

        /// Amount with up to two decimals, dot or comma as separator (e.g. "50.00" or "50,00")
        amount: String,
    },

    /// Record an expense under a label
    Expense {
        /// Label, e.g. "rent"
        label: String,

        /// Amount with up to two decimals, dot or comma as separator
        amount: String,
    },

    /// Debt management commands
    #[command(subcommand)]
    Debt(DebtCommands),

    /// Start an interactive chat session on stdin/stdout
    Chat {
        /// Do not print the menu when the session starts
        #[arg(long)]
        no_menu: bool,
    },

    /// Export the ledger totals
    Export {
        /// Format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum DebtCommands {
    /// Add a debt under a label
    Add {
        /// Label, e.g. "friend"
        label: String,

        /// Amount with up to two decimals, dot or comma as separator
        amount: String,
    },

    /// List all debts
    List,

    /// Remove a debt
    Remove {
        /// Label of the debt to remove
        label: String,
    },
}

/// Install the global tracing subscriber.
/// Logs go to stderr so replies on stdout stay clean. RUST_LOG overrides
/// the default level (info, or debug with --verbose).
pub fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    Ok(())
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let service = Arc::new(LedgerService::open(&self.data_file).await?);
        let processor = CommandProcessor::new(service.clone());

        match self.command {
            Commands::Balance => {
                run_command(&processor, CommandKind::Balance, vec![]).await?;
            }

            Commands::Income { label, amount } => {
                run_command(&processor, CommandKind::AddIncome, vec![label, amount]).await?;
            }

            Commands::Expense { label, amount } => {
                run_command(&processor, CommandKind::AddExpense, vec![label, amount]).await?;
            }

            Commands::Debt(debt_cmd) => {
                run_debt_command(&processor, debt_cmd).await?;
            }

            Commands::Chat { no_menu } => {
                let stdin = BufReader::new(tokio::io::stdin());
                let summary = ChatSession::new(processor, stdin, tokio::io::stdout())
                    .with_greeting(!no_menu)
                    .run()
                    .await?;
                if self.verbose {
                    eprintln!(
                        "Handled {} command(s), {} failed",
                        summary.handled, summary.failed
                    );
                }
            }

            Commands::Export { format, output } => {
                run_export_command(&service, format, output).await?;
            }
        }

        Ok(())
    }
}

/// Route a one-shot command through the command processor and print the reply.
async fn run_command(
    processor: &CommandProcessor,
    kind: CommandKind,
    args: Vec<String>,
) -> Result<()> {
    let request = CommandRequest::new(kind.name(), args);
    let reply = processor.process(&request).await?;
    println!("{}", reply);
    Ok(())
}

async fn run_debt_command(processor: &CommandProcessor, cmd: DebtCommands) -> Result<()> {
    match cmd {
        DebtCommands::Add { label, amount } => {
            run_command(processor, CommandKind::AddDebt, vec![label, amount]).await
        }
        DebtCommands::List => run_command(processor, CommandKind::ListDebts, vec![]).await,
        DebtCommands::Remove { label } => {
            run_command(processor, CommandKind::RemoveDebt, vec![label]).await
        }
    }
}

async fn run_export_command(
    service: &LedgerService,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let exporter = Exporter::new(service);

    let count = match &output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            exporter.export(format, file).await?
        }
        None => exporter.export(format, std::io::stdout().lock()).await?,
    };

    if let Some(path) = output {
        info!(rows = count, path = %path.display(), "Export written");
        println!("Exported {} row(s) to {}", count, path.display());
    }
    Ok(())
}
