use super::CommandKind;

/// A numbered shortcut in the chat menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub key: &'static str,
    pub title: &'static str,
    pub command: CommandKind,
}

/// What selecting a menu entry does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Zero-argument command: run it right away.
    Run(CommandKind),
    /// Command that needs arguments: answer with its usage line.
    Prompt(CommandKind),
}

pub const MENU: [MenuEntry; 5] = [
    MenuEntry {
        key: "1",
        title: "Balance",
        command: CommandKind::Balance,
    },
    MenuEntry {
        key: "2",
        title: "Income",
        command: CommandKind::AddIncome,
    },
    MenuEntry {
        key: "3",
        title: "Expense",
        command: CommandKind::AddExpense,
    },
    MenuEntry {
        key: "4",
        title: "Add debt",
        command: CommandKind::AddDebt,
    },
    MenuEntry {
        key: "5",
        title: "List debts",
        command: CommandKind::ListDebts,
    },
];

impl MenuEntry {
    pub fn action(&self) -> MenuAction {
        if self.command.arg_names().is_empty() {
            MenuAction::Run(self.command)
        } else {
            MenuAction::Prompt(self.command)
        }
    }
}

/// Look up the shortcut selected by `key`.
pub fn select(key: &str) -> Option<MenuAction> {
    let key = key.trim();
    MENU.iter()
        .find(|entry| entry.key == key)
        .map(MenuEntry::action)
}

/// Menu text: the numbered shortcuts followed by the full command list.
pub fn render() -> String {
    let mut text = String::from("choose an option:\n");
    for entry in &MENU {
        text.push_str(&format!("  {}. {}\n", entry.key, entry.title));
    }
    text.push_str("\ncommands:\n");
    for kind in CommandKind::ALL {
        text.push_str(&format!("  {:<30} {}\n", kind.usage(), kind.description()));
    }
    text.trim_end().to_string()
}
