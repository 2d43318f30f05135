// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tally::application::{CommandProcessor, CommandRequest, LedgerService};
use tempfile::TempDir;

/// Helper to create a test service backed by a ledger file in a temporary directory
pub async fn test_service() -> Result<(Arc<LedgerService>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = LedgerService::open(ledger_path(&temp_dir)).await?;
    Ok((Arc::new(service), temp_dir))
}

/// Helper to create a command processor over a fresh test service
pub async fn test_processor() -> Result<(CommandProcessor, TempDir)> {
    let (service, temp_dir) = test_service().await?;
    Ok((CommandProcessor::new(service), temp_dir))
}

/// Path of the ledger record inside a test directory
pub fn ledger_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("ledger.json")
}

/// Send one chat-style line through the processor
pub async fn send(processor: &CommandProcessor, line: &str) -> Result<String> {
    let request = CommandRequest::parse_line(line).expect("line should not be blank");
    Ok(processor.process(&request).await?)
}
