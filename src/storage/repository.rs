use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::domain::LedgerState;

use super::record;

/// Repository for the durable ledger record: a single JSON file that is
/// fully rewritten on every save.
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
}

impl Repository {
    /// Create a repository backed by the file at `path`.
    /// The file does not need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ledger state.
    /// A missing or empty file yields the zero state.
    pub async fn load(&self) -> Result<LedgerState> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No ledger record yet, starting empty");
                return Ok(LedgerState::default());
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("Failed to read ledger record {}", self.path.display())
                });
            }
        };

        let state = record::decode(&text)
            .with_context(|| format!("Corrupt ledger record {}", self.path.display()))?;
        debug!(
            path = %self.path.display(),
            income_labels = state.income.len(),
            expense_labels = state.expenses.len(),
            debt_labels = state.debts.len(),
            "Loaded ledger record"
        );
        Ok(state)
    }

    /// Overwrite the durable record with `state`.
    ///
    /// The record is written to a sibling temp file first and then renamed
    /// over the target, so readers see either the old or the new record.
    pub async fn save(&self, state: &LedgerState) -> Result<()> {
        let text = record::encode(state)?;
        let tmp_path = self.tmp_path();

        tokio::fs::write(&tmp_path, text.as_bytes())
            .await
            .with_context(|| format!("Failed to write ledger record {}", tmp_path.display()))?;

        if let Err(err) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(err).with_context(|| {
                format!("Failed to replace ledger record {}", self.path.display())
            });
        }

        debug!(path = %self.path.display(), bytes = text.len(), "Saved ledger record");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "ledger".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
