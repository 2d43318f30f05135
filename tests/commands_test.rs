mod common;

use std::sync::Arc;

use anyhow::Result;
use common::{send, test_processor};
use tally::application::{AppError, CommandProcessor, CommandRequest, LedgerService};
use tally::domain::LedgerState;
use tally::storage::Repository;
use tempfile::TempDir;

#[tokio::test]
async fn test_scenario_replies() -> Result<()> {
    let (processor, _temp) = test_processor().await?;

    assert_eq!(
        send(&processor, "add-income salary 1000").await?,
        "income 'salary' added: 1000.00"
    );
    assert_eq!(
        send(&processor, "add-expense rent 300").await?,
        "expense 'rent' recorded: 300.00"
    );
    assert_eq!(
        send(&processor, "add-debt friend 50").await?,
        "debt 'friend' added: 50.00"
    );
    assert_eq!(send(&processor, "balance").await?, "current balance: 700.00");
    assert_eq!(
        send(&processor, "list-debts").await?,
        "debts:\n- friend: 50.00"
    );

    Ok(())
}

#[tokio::test]
async fn test_legacy_command_names() -> Result<()> {
    let (processor, _temp) = test_processor().await?;

    send(&processor, "/entrada salario 1000,50").await?;
    send(&processor, "/saida aluguel 200").await?;
    send(&processor, "/divida_add amigo 10").await?;

    assert_eq!(send(&processor, "/saldo").await?, "current balance: 800.50");
    assert_eq!(
        send(&processor, "/divida_remove amigo").await?,
        "debt 'amigo' removed"
    );
    assert_eq!(send(&processor, "/divida_list").await?, "no debts");

    Ok(())
}

#[tokio::test]
async fn test_comma_and_period_amounts_are_equal() -> Result<()> {
    let (processor, _temp) = test_processor().await?;

    send(&processor, "add-income a 10,50").await?;
    send(&processor, "add-income b 10.50").await?;

    let state = processor.service().snapshot().await;
    assert_eq!(state.income.get("a"), state.income.get("b"));
    assert_eq!(state.income.get("a"), Some(&1050));
    assert_eq!(state.balance, 2100);

    Ok(())
}

#[tokio::test]
async fn test_invalid_amount_changes_nothing() -> Result<()> {
    let (processor, temp) = test_processor().await?;

    send(&processor, "add-income salary 1000").await?;
    let before = processor.service().snapshot().await;

    let reply = send(&processor, "add-expense rent abc").await?;
    assert_eq!(
        reply,
        "invalid amount 'abc': use a number with up to two decimals, dot or comma as separator"
    );

    let reply = send(&processor, "add-debt friend -5").await?;
    assert!(reply.starts_with("invalid amount '-5'"));

    assert_eq!(processor.service().snapshot().await, before);
    assert_eq!(
        Repository::new(common::ledger_path(&temp)).load().await?,
        before
    );

    Ok(())
}

#[tokio::test]
async fn test_out_of_range_and_overprecise_amounts_are_rejected() -> Result<()> {
    let (processor, temp) = test_processor().await?;

    let reply = send(&processor, "add-income jackpot 92233720368547758").await?;
    assert!(reply.starts_with("invalid amount '92233720368547758'"));

    let reply = send(&processor, "add-income big 90071992547409.93").await?;
    assert!(reply.starts_with("invalid amount '90071992547409.93'"));

    let reply = send(&processor, "add-expense coffee 0,999").await?;
    assert!(reply.starts_with("invalid amount '0,999'"));

    assert_eq!(processor.service().snapshot().await, LedgerState::default());
    assert!(!common::ledger_path(&temp).exists());

    // The largest accepted amount is recorded and reads back unchanged
    assert_eq!(
        send(&processor, "add-income jackpot 9999999999999,99").await?,
        "income 'jackpot' added: 9999999999999.99"
    );
    let stored = Repository::new(common::ledger_path(&temp)).load().await?;
    assert_eq!(stored, processor.service().snapshot().await);
    assert_eq!(stored.balance, 999_999_999_999_999);

    Ok(())
}

#[tokio::test]
async fn test_missing_arguments_reply_with_usage() -> Result<()> {
    let (processor, temp) = test_processor().await?;

    assert_eq!(
        send(&processor, "add-income salary").await?,
        "use: add-income <label> <amount>"
    );
    assert_eq!(
        send(&processor, "add-expense").await?,
        "use: add-expense <label> <amount>"
    );
    assert_eq!(
        send(&processor, "remove-debt").await?,
        "use: remove-debt <label>"
    );

    assert_eq!(processor.service().snapshot().await, LedgerState::default());
    assert!(!common::ledger_path(&temp).exists());

    Ok(())
}

#[tokio::test]
async fn test_remove_debt_replies() -> Result<()> {
    let (processor, _temp) = test_processor().await?;

    send(&processor, "add-debt friend 50").await?;
    send(&processor, "add-debt phone 20").await?;

    assert_eq!(send(&processor, "remove-debt bank").await?, "debt not found");
    assert_eq!(
        send(&processor, "remove-debt friend").await?,
        "debt 'friend' removed"
    );
    assert_eq!(send(&processor, "list-debts").await?, "debts:\n- phone: 20.00");

    Ok(())
}

#[tokio::test]
async fn test_list_debts_is_sorted_by_label() -> Result<()> {
    let (processor, _temp) = test_processor().await?;

    send(&processor, "add-debt zoe 1").await?;
    send(&processor, "add-debt adam 2").await?;
    send(&processor, "add-debt adam 0,5").await?;

    assert_eq!(
        send(&processor, "list-debts").await?,
        "debts:\n- adam: 2.50\n- zoe: 1.00"
    );

    Ok(())
}

#[tokio::test]
async fn test_unknown_command_and_help() -> Result<()> {
    let (processor, _temp) = test_processor().await?;

    let reply = send(&processor, "withdraw 10").await?;
    assert_eq!(reply, "unknown command 'withdraw', send 'help' to see the menu");

    let help = send(&processor, "/start").await?;
    assert!(help.starts_with("choose an option:"));
    assert!(help.contains("add-income <label> <amount>"));

    Ok(())
}

#[tokio::test]
async fn test_persistence_failure_is_not_reported_as_success() -> Result<()> {
    let temp = TempDir::new()?;
    let repo = Repository::new(temp.path().join("missing").join("ledger.json"));
    let processor = CommandProcessor::new(Arc::new(LedgerService::new(
        repo,
        LedgerState::default(),
    )));

    let request = CommandRequest::parse_line("add-income salary 1000").unwrap();
    let result = processor.process(&request).await;
    assert!(matches!(result, Err(AppError::Persistence(_))));

    // Read-only commands keep working and show the rolled-back state
    assert_eq!(send(&processor, "balance").await?, "current balance: 0.00");

    Ok(())
}
