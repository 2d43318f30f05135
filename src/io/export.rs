use anyhow::{Context, Result};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{EntryKind, format_cents};
use crate::storage::record;

/// Output format for exports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!("Unknown export format '{}'. Use csv or json", s)),
        }
    }
}

/// Exporter for dumping the ledger aggregates
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    pub async fn export<W: Write>(&self, format: ExportFormat, writer: W) -> Result<usize> {
        match format {
            ExportFormat::Csv => self.export_csv(writer).await,
            ExportFormat::Json => self.export_json(writer).await,
        }
    }

    /// Export label totals to CSV: one `kind,label,amount` row per label,
    /// plus a final `balance` row. Returns the number of rows written.
    pub async fn export_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let state = self.service.snapshot().await;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["kind", "label", "amount"])?;

        let mut count = 0;
        for kind in [EntryKind::Income, EntryKind::Expense, EntryKind::Debt] {
            for (label, amount) in state.totals(kind) {
                let amount = format_cents(*amount);
                csv_writer.write_record([kind.as_str(), label.as_str(), amount.as_str()])?;
                count += 1;
            }
        }

        let balance = format_cents(state.balance);
        csv_writer.write_record(["balance", "", balance.as_str()])?;
        count += 1;

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the ledger in the durable record format.
    /// Returns the number of labels written.
    pub async fn export_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let state = self.service.snapshot().await;
        let text = record::encode(&state)?;
        writeln!(writer, "{}", text).context("Failed to write JSON export")?;
        Ok(state.income.len() + state.expenses.len() + state.debts.len())
    }
}
