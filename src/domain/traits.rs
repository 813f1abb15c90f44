use futures::Stream;

use crate::domain::{Account, AccountId, Error, NewTransaction, Transaction};

/// Writes (and reads) performed inside one atomic unit.
///
/// Reads see the unit's own uncommitted writes.
pub trait UnitOfWork {
    fn get_account(&mut self, id: &AccountId) -> Result<Option<Account>, Error>;

    /// Insert or replace the account with the same id.
    fn put_account(&mut self, account: &Account) -> Result<(), Error>;

    /// Appends the transaction and returns it with its assigned id.
    fn append_transaction(&mut self, transaction: NewTransaction) -> Result<Transaction, Error>;
}

/// Durable home of accounts and the append-only transaction log.
pub trait LedgerStore {
    fn get_account(&self, id: &AccountId) -> Result<Option<Account>, Error>;

    fn list_accounts(&self) -> Result<Vec<Account>, Error>;

    fn list_transactions(&self) -> Result<Vec<Transaction>, Error>;

    fn list_transactions_by_source(&self, id: &AccountId) -> Result<Vec<Transaction>, Error>;

    /// Runs `f` as one all-or-nothing unit.
    ///
    /// Every write made through the unit is committed when `f` returns `Ok`
    /// and discarded when it returns `Err`. Units never interleave.
    fn atomic_unit<T, F>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, Error>;
}

/// One opening account read from a seed source.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedAccount {
    pub name: String,
    pub pin_code: String,
    pub balance: rust_decimal::Decimal,
}

pub trait SeedStream {
    type AccountStream: Stream<Item = Result<SeedAccount, Error>> + Send + Unpin + 'static;
    fn stream(&mut self) -> Self::AccountStream;
}

pub trait DeadLetterQueue {
    fn report(&self, error: &Error);
}
