//! Minimal account ledger: accounts, deposits, withdrawals, transfers and
//! their transaction history, served over HTTP.
//!
//! [`Ledger`] holds the operations and is generic over a [`LedgerStore`];
//! [`store::MemoryStore`] and [`store::SqliteStore`] are the two stores,
//! [`api::router`] is the HTTP adapter.

pub mod api;
pub mod config;
pub mod dlq;
pub mod domain;
pub mod ledger;
pub mod seed;
pub mod store;
pub mod telemetry;

pub use config::Config;
pub use domain::{Account, AccountId, Amount, Error, LedgerStore, Transaction, TransactionKind};
pub use ledger::Ledger;
