use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::{Cents, LabelTotals, LedgerState, cents_from_f64, cents_to_f64};

pub const FIELD_BALANCE: &str = "balance";
pub const FIELD_INCOME: &str = "entradas";
pub const FIELD_EXPENSES: &str = "saidas";
pub const FIELD_DEBTS: &str = "dividas";

/// Older records stored the balance under this key.
const LEGACY_FIELD_BALANCE: &str = "saldo_total";

/// On-disk shape of the ledger: four top-level fields, amounts as decimal numbers.
#[derive(Debug, Serialize)]
pub struct LedgerRecord {
    pub balance: f64,
    pub entradas: BTreeMap<String, f64>,
    pub saidas: BTreeMap<String, f64>,
    pub dividas: BTreeMap<String, f64>,
}

impl From<&LedgerState> for LedgerRecord {
    fn from(state: &LedgerState) -> Self {
        Self {
            balance: cents_to_f64(state.balance),
            entradas: to_decimal_map(&state.income),
            saidas: to_decimal_map(&state.expenses),
            dividas: to_decimal_map(&state.debts),
        }
    }
}

fn to_decimal_map(totals: &LabelTotals) -> BTreeMap<String, f64> {
    totals
        .iter()
        .map(|(label, cents)| (label.clone(), cents_to_f64(*cents)))
        .collect()
}

/// Serialize the full ledger state into the durable record format.
pub fn encode(state: &LedgerState) -> Result<String> {
    serde_json::to_string_pretty(&LedgerRecord::from(state))
        .context("Failed to serialize ledger record")
}

/// Parse a durable record.
///
/// Loading is permissive per field: each of the four top-level fields is
/// defaulted on its own when missing or malformed, and malformed entries
/// inside a map are skipped. An empty record yields the zero state. Content
/// that is not a JSON object at all is treated as corruption.
pub fn decode(text: &str) -> Result<LedgerState> {
    if text.trim().is_empty() {
        return Ok(LedgerState::default());
    }

    let value: Value = serde_json::from_str(text).context("Ledger record is not valid JSON")?;
    let Value::Object(fields) = value else {
        bail!("Ledger record is not a JSON object");
    };

    Ok(LedgerState {
        balance: decode_balance(&fields),
        income: decode_totals(&fields, FIELD_INCOME),
        expenses: decode_totals(&fields, FIELD_EXPENSES),
        debts: decode_totals(&fields, FIELD_DEBTS),
    })
}

fn decode_balance(fields: &Map<String, Value>) -> Cents {
    let Some(value) = fields
        .get(FIELD_BALANCE)
        .or_else(|| fields.get(LEGACY_FIELD_BALANCE))
    else {
        return 0;
    };

    match value.as_f64().and_then(cents_from_f64) {
        Some(cents) => cents,
        None => {
            warn!(field = FIELD_BALANCE, value = %value, "Malformed field, using default");
            0
        }
    }
}

fn decode_totals(fields: &Map<String, Value>, field: &str) -> LabelTotals {
    let Some(value) = fields.get(field) else {
        return LabelTotals::new();
    };
    let Some(entries) = value.as_object() else {
        warn!(field, value = %value, "Malformed field, using default");
        return LabelTotals::new();
    };

    entries
        .iter()
        .filter_map(|(label, amount)| {
            match amount.as_f64().and_then(cents_from_f64) {
                Some(cents) if cents >= 0 => Some((label.clone(), cents)),
                _ => {
                    warn!(field, label = %label, value = %amount, "Skipping malformed entry");
                    None
                }
            }
        })
        .collect()
}
