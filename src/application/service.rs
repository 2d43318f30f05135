use std::path::PathBuf;

use tokio::sync::Mutex;
use tracing::{error, info};

use crate::domain::{Cents, EntryKind, LabelTotals, LedgerState, format_cents};
use crate::storage::Repository;

use super::AppError;

/// Application service owning the ledger state and its durable record.
/// This is the primary interface for any client (CLI, chat session, etc.).
///
/// All mutations go through one lock that covers both the in-memory update
/// and the save, so concurrent callers never observe a half-applied command.
/// When the save fails the in-memory state is restored before the error is
/// returned.
pub struct LedgerService {
    repo: Repository,
    state: Mutex<LedgerState>,
}

impl LedgerService {
    /// Create a service around an already loaded state.
    pub fn new(repo: Repository, state: LedgerState) -> Self {
        Self {
            repo,
            state: Mutex::new(state),
        }
    }

    /// Open the ledger stored at `path`, starting empty if there is no record yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let repo = Repository::new(path);
        let state = repo.load().await?;
        info!(
            path = %repo.path().display(),
            balance = %format_cents(state.balance),
            "Ledger opened"
        );
        Ok(Self::new(repo, state))
    }

    // ========================
    // Mutations
    // ========================

    /// Record income under `label`. Returns the new total for the label.
    pub async fn record_income(&self, label: &str, amount: Cents) -> Result<Cents, AppError> {
        self.record(EntryKind::Income, label, amount).await
    }

    /// Record an expense under `label`. Returns the new total for the label.
    pub async fn record_expense(&self, label: &str, amount: Cents) -> Result<Cents, AppError> {
        self.record(EntryKind::Expense, label, amount).await
    }

    /// Record a debt under `label`. Returns the new total for the label.
    pub async fn record_debt(&self, label: &str, amount: Cents) -> Result<Cents, AppError> {
        self.record(EntryKind::Debt, label, amount).await
    }

    /// Add `amount` to the `kind` table under `label` and persist.
    pub async fn record(
        &self,
        kind: EntryKind,
        label: &str,
        amount: Cents,
    ) -> Result<Cents, AppError> {
        let total = self
            .commit(kind.as_str(), |state| {
                let result = match kind {
                    EntryKind::Income => state.record_income(label, amount),
                    EntryKind::Expense => state.record_expense(label, amount),
                    EntryKind::Debt => state.record_debt(label, amount),
                };
                result
                    .map(Some)
                    .map_err(|_| AppError::InvalidAmount(format_cents(amount)))
            })
            .await?;

        // commit only yields None when the closure does
        let total = total.unwrap_or_default();
        info!(
            kind = %kind,
            label,
            amount = %format_cents(amount),
            total = %format_cents(total),
            "Entry recorded"
        );
        Ok(total)
    }

    /// Remove the debt for `label`.
    /// Returns the removed amount, or None when there was no such debt.
    /// Nothing is saved when the label is unknown.
    pub async fn remove_debt(&self, label: &str) -> Result<Option<Cents>, AppError> {
        let removed = self
            .commit("remove-debt", |state| Ok(state.remove_debt(label)))
            .await?;
        if let Some(amount) = removed {
            info!(label, amount = %format_cents(amount), "Debt removed");
        }
        Ok(removed)
    }

    /// Apply `apply` under the lock; when it changed something (returned
    /// Some), save the new state, restoring the previous one if the save fails.
    async fn commit<T>(
        &self,
        operation: &str,
        apply: impl FnOnce(&mut LedgerState) -> Result<Option<T>, AppError>,
    ) -> Result<Option<T>, AppError> {
        let mut state = self.state.lock().await;
        let before = state.clone();

        let Some(value) = apply(&mut *state)? else {
            return Ok(None);
        };

        if let Err(err) = self.repo.save(&state).await {
            *state = before;
            let reason = format!("{:#}", err);
            error!(operation, error = %reason, "Save failed, change rolled back");
            return Err(AppError::Persistence(err));
        }

        Ok(Some(value))
    }

    // ========================
    // Queries
    // ========================

    /// Current balance: all income minus all expenses.
    pub async fn balance(&self) -> Cents {
        self.state.lock().await.snapshot_balance()
    }

    /// All open debts by label.
    pub async fn debts(&self) -> LabelTotals {
        self.state.lock().await.snapshot_debts()
    }

    /// A full copy of the current ledger.
    pub async fn snapshot(&self) -> LedgerState {
        self.state.lock().await.clone()
    }
}
