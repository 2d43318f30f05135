use std::collections::BTreeMap;

use super::{Cents, in_range};

/// Per-label running totals. Labels are free text chosen by the user.
pub type LabelTotals = BTreeMap<String, Cents>;

/// Running aggregates of the ledger: the cash balance plus cumulative
/// income, expense and debt totals per label.
///
/// Only running totals are kept, there is no transaction history.
/// `balance` is maintained incrementally: every income adds to it and every
/// expense subtracts from it, debts never touch it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerState {
    pub balance: Cents,
    pub income: LabelTotals,
    pub expenses: LabelTotals,
    pub debts: LabelTotals,
}

/// Which per-label table an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Income,
    Expense,
    Debt,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
            EntryKind::Debt => "debt",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add income under `label` and credit the balance.
    /// Returns the new total for the label.
    pub fn record_income(&mut self, label: &str, amount: Cents) -> Result<Cents, LedgerError> {
        let balance = checked(self.balance.checked_add(amount))?;
        let total = accumulate(&mut self.income, label, amount)?;
        self.balance = balance;
        Ok(total)
    }

    /// Add an expense under `label` and debit the balance.
    /// Returns the new total for the label.
    pub fn record_expense(&mut self, label: &str, amount: Cents) -> Result<Cents, LedgerError> {
        let balance = checked(self.balance.checked_sub(amount))?;
        let total = accumulate(&mut self.expenses, label, amount)?;
        self.balance = balance;
        Ok(total)
    }

    /// Add a debt under `label`. The balance is not affected.
    pub fn record_debt(&mut self, label: &str, amount: Cents) -> Result<Cents, LedgerError> {
        accumulate(&mut self.debts, label, amount)
    }

    /// Remove the debt entry for `label`, returning its amount if it existed.
    pub fn remove_debt(&mut self, label: &str) -> Option<Cents> {
        self.debts.remove(label)
    }

    pub fn snapshot_balance(&self) -> Cents {
        self.balance
    }

    pub fn snapshot_debts(&self) -> LabelTotals {
        self.debts.clone()
    }

    pub fn totals(&self, kind: EntryKind) -> &LabelTotals {
        match kind {
            EntryKind::Income => &self.income,
            EntryKind::Expense => &self.expenses,
            EntryKind::Debt => &self.debts,
        }
    }
}

fn accumulate(totals: &mut LabelTotals, label: &str, amount: Cents) -> Result<Cents, LedgerError> {
    if amount < 0 {
        return Err(LedgerError::NegativeAmount(amount));
    }
    let current = totals.get(label).copied().unwrap_or(0);
    let total = checked(current.checked_add(amount))?;
    totals.insert(label.to_string(), total);
    Ok(total)
}

/// Totals and the balance must stay within [`super::MAX_AMOUNT`] so they
/// survive the decimal representation of the durable record.
fn checked(value: Option<Cents>) -> Result<Cents, LedgerError> {
    value.filter(|cents| in_range(*cents)).ok_or(LedgerError::Overflow)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    NegativeAmount(Cents),
    Overflow,
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::NegativeAmount(amount) => {
                write!(f, "Amount must not be negative: {} cents", amount)
            }
            LedgerError::Overflow => write!(f, "Amount would overflow the ledger totals"),
        }
    }
}

impl std::error::Error for LedgerError {}
