use rust_decimal::Decimal;

use crate::domain::AccountId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("PIN code must be exactly 4 characters")]
    InvalidPin,

    #[error("Account {0} not found")]
    AccountNotFound(AccountId),

    #[error("Wrong PIN for account {0}")]
    WrongPin(AccountId),

    #[error("Insufficient funds in account {0}")]
    InsufficientFunds(AccountId),

    #[error("Balance of account {0} would exceed the supported range")]
    BalanceOverflow(AccountId),

    #[error("No transactions found for account {0}")]
    NoTransactionsFound(AccountId),

    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    #[error("Seeding failed with: {0}")]
    Seed(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Storage failed with: {0}")]
    Storage(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

impl Error {
    /// True when the failure was caused by the caller's input rather than
    /// by the storage layer or the environment.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Error::InvalidPin
                | Error::AccountNotFound(_)
                | Error::WrongPin(_)
                | Error::InsufficientFunds(_)
                | Error::BalanceOverflow(_)
                | Error::NoTransactionsFound(_)
                | Error::InvalidAmount(_)
        )
    }
}
