use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("use: {usage}")]
    MissingArguments { usage: String },

    #[error("invalid amount '{0}': use a number with up to two decimals, dot or comma as separator")]
    InvalidAmount(String),

    #[error("debt not found")]
    DebtNotFound(String),

    #[error("unknown command '{0}', send 'help' to see the menu")]
    UnknownCommand(String),

    #[error("persistence failure: {0:#}")]
    Persistence(#[from] anyhow::Error),
}

impl AppError {
    /// Errors caused by what the user typed. These are answered with a reply
    /// and never leave the command processor.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, AppError::Persistence(_))
    }
}
