use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{EntryKind, format_cents};

use super::{AppError, Command, CommandRequest, LedgerService, menu};

/// Turns decoded commands into ledger operations and reply text.
///
/// The processor holds no state of its own. Validation problems (missing
/// arguments, bad amounts, unknown debts or commands) are answered with a
/// reply; only persistence failures are returned as errors so a transport
/// never reports a change that was not saved.
#[derive(Clone)]
pub struct CommandProcessor {
    service: Arc<LedgerService>,
}

impl CommandProcessor {
    pub fn new(service: Arc<LedgerService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &LedgerService {
        &self.service
    }

    /// Handle one request and produce the reply text.
    pub async fn process(&self, request: &CommandRequest) -> Result<String, AppError> {
        debug!(command = %request.name, args = ?request.args, "Processing command");

        let result = match Command::parse(request) {
            Ok(command) => self.execute(&command).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(reply) => Ok(reply),
            Err(err) if err.is_user_error() => {
                debug!(command = %request.name, reason = %err, "Command rejected");
                Ok(err.to_string())
            }
            Err(err) => {
                warn!(command = %request.name, error = %err, "Command failed");
                Err(err)
            }
        }
    }

    /// Run a validated command.
    pub async fn execute(&self, command: &Command) -> Result<String, AppError> {
        match command {
            Command::Balance => {
                let balance = self.service.balance().await;
                Ok(format!("current balance: {}", format_cents(balance)))
            }

            Command::Record {
                kind,
                label,
                amount,
            } => {
                self.service.record(*kind, label, *amount).await?;
                let amount = format_cents(*amount);
                Ok(match kind {
                    EntryKind::Income => format!("income '{}' added: {}", label, amount),
                    EntryKind::Expense => format!("expense '{}' recorded: {}", label, amount),
                    EntryKind::Debt => format!("debt '{}' added: {}", label, amount),
                })
            }

            Command::ListDebts => {
                let debts = self.service.debts().await;
                if debts.is_empty() {
                    return Ok("no debts".to_string());
                }
                let mut text = String::from("debts:");
                for (label, amount) in &debts {
                    text.push_str(&format!("\n- {}: {}", label, format_cents(*amount)));
                }
                Ok(text)
            }

            Command::RemoveDebt { label } => match self.service.remove_debt(label).await? {
                Some(_) => Ok(format!("debt '{}' removed", label)),
                None => Err(AppError::DebtNotFound(label.clone())),
            },

            Command::Help => Ok(menu::render()),
        }
    }
}
