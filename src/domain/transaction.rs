use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, Amount, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    Transfer,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdraw => "WITHDRAW",
            TransactionKind::Transfer => "TRANSFER",
        }
    }
}

impl core::str::FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPOSIT" => Ok(TransactionKind::Deposit),
            "WITHDRAW" => Ok(TransactionKind::Withdraw),
            "TRANSFER" => Ok(TransactionKind::Transfer),
            other => Err(Error::Storage(format!(
                "Unknown transaction kind: {}",
                other
            ))),
        }
    }
}

/// A transaction that has not been appended yet and so has no id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub account_from: AccountId,
    pub account_to: AccountId,
    pub time: NaiveTime,
    pub amount: Amount,
    pub kind: TransactionKind,
}

impl NewTransaction {
    pub fn deposit(account: &AccountId, amount: Amount, time: NaiveTime) -> Self {
        Self {
            account_from: account.clone(),
            account_to: account.clone(),
            time,
            amount,
            kind: TransactionKind::Deposit,
        }
    }

    pub fn withdraw(account: &AccountId, amount: Amount, time: NaiveTime) -> Self {
        Self {
            kind: TransactionKind::Withdraw,
            ..Self::deposit(account, amount, time)
        }
    }

    pub fn transfer(from: &AccountId, to: &AccountId, amount: Amount, time: NaiveTime) -> Self {
        Self {
            account_from: from.clone(),
            account_to: to.clone(),
            time,
            amount,
            kind: TransactionKind::Transfer,
        }
    }

    pub fn assign(self, id: u64) -> Transaction {
        Transaction {
            id,
            account_from: self.account_from,
            account_to: self.account_to,
            time: self.time,
            amount: self.amount.value(),
            kind: self.kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: u64,
    pub account_from: AccountId,
    pub account_to: AccountId,
    pub time: NaiveTime,
    pub amount: Decimal,
    pub kind: TransactionKind,
}

impl core::fmt::Display for Transaction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            TransactionKind::Transfer => write!(
                f,
                "{:?},tx={},from={},to={},amount={}",
                self.kind, self.id, self.account_from, self.account_to, self.amount
            ),
            _ => write!(
                f,
                "{:?},tx={},account={},amount={}",
                self.kind, self.id, self.account_from, self.amount
            ),
        }
    }
}
