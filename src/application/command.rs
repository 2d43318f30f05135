use crate::domain::{Cents, EntryKind, parse_amount};

use super::AppError;

/// A command as delivered by a transport: a name plus its raw arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub name: String,
    pub args: Vec<String>,
}

impl CommandRequest {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Split a chat line into command name and arguments.
    ///
    /// A leading `/` and a trailing `@botname` on the command name are
    /// dropped, so "/saldo@my_bot" and "saldo" are the same request.
    /// Returns None for a blank line.
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let first = words.next()?;
        let name = first.strip_prefix('/').unwrap_or(first);
        let name = match name.split_once('@') {
            Some((name, _bot)) => name,
            None => name,
        };
        Some(Self::new(name, words.map(str::to_string).collect()))
    }
}

/// Every command the processor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Balance,
    AddIncome,
    AddExpense,
    AddDebt,
    ListDebts,
    RemoveDebt,
    Help,
}

impl CommandKind {
    pub const ALL: [CommandKind; 7] = [
        CommandKind::Balance,
        CommandKind::AddIncome,
        CommandKind::AddExpense,
        CommandKind::AddDebt,
        CommandKind::ListDebts,
        CommandKind::RemoveDebt,
        CommandKind::Help,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::Balance => "balance",
            CommandKind::AddIncome => "add-income",
            CommandKind::AddExpense => "add-expense",
            CommandKind::AddDebt => "add-debt",
            CommandKind::ListDebts => "list-debts",
            CommandKind::RemoveDebt => "remove-debt",
            CommandKind::Help => "help",
        }
    }

    /// Other accepted names, including the Portuguese chat commands.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            CommandKind::Balance => &["balance-query", "saldo"],
            CommandKind::AddIncome => &["income", "entrada"],
            CommandKind::AddExpense => &["expense", "saida"],
            CommandKind::AddDebt => &["debt", "divida_add"],
            CommandKind::ListDebts => &["debts", "divida_list"],
            CommandKind::RemoveDebt => &["divida_remove"],
            CommandKind::Help => &["menu", "start"],
        }
    }

    pub fn arg_names(&self) -> &'static [&'static str] {
        match self {
            CommandKind::AddIncome | CommandKind::AddExpense | CommandKind::AddDebt => {
                &["<label>", "<amount>"]
            }
            CommandKind::RemoveDebt => &["<label>"],
            CommandKind::Balance | CommandKind::ListDebts | CommandKind::Help => &[],
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CommandKind::Balance => "show the current balance",
            CommandKind::AddIncome => "add income",
            CommandKind::AddExpense => "record an expense",
            CommandKind::AddDebt => "add a debt",
            CommandKind::ListDebts => "list debts",
            CommandKind::RemoveDebt => "remove a debt",
            CommandKind::Help => "show this menu",
        }
    }

    /// Usage line, e.g. "add-income <label> <amount>".
    pub fn usage(&self) -> String {
        std::iter::once(self.name())
            .chain(self.arg_names().iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name || kind.aliases().contains(&name.as_str()))
    }
}

/// A validated command, ready to run against the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Balance,
    Record {
        kind: EntryKind,
        label: String,
        amount: Cents,
    },
    ListDebts,
    RemoveDebt { label: String },
    Help,
}

impl Command {
    /// Validate a request: known name, enough arguments, parseable amount.
    /// Arguments past the required ones are ignored.
    pub fn parse(request: &CommandRequest) -> Result<Self, AppError> {
        let kind = CommandKind::from_name(&request.name)
            .ok_or_else(|| AppError::UnknownCommand(request.name.clone()))?;

        if request.args.len() < kind.arg_names().len() {
            return Err(AppError::MissingArguments {
                usage: kind.usage(),
            });
        }

        let command = match kind {
            CommandKind::Balance => Command::Balance,
            CommandKind::AddIncome => record(EntryKind::Income, &request.args)?,
            CommandKind::AddExpense => record(EntryKind::Expense, &request.args)?,
            CommandKind::AddDebt => record(EntryKind::Debt, &request.args)?,
            CommandKind::ListDebts => Command::ListDebts,
            CommandKind::RemoveDebt => Command::RemoveDebt {
                label: request.args[0].clone(),
            },
            CommandKind::Help => Command::Help,
        };
        Ok(command)
    }
}

fn record(kind: EntryKind, args: &[String]) -> Result<Command, AppError> {
    let raw = &args[1];
    let amount = parse_amount(raw).map_err(|_| AppError::InvalidAmount(raw.clone()))?;
    Ok(Command::Record {
        kind,
        label: args[0].clone(),
        amount,
    })
}
