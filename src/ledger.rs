use chrono::{Local, NaiveTime};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::domain::{
    Account, AccountId, Amount, Error, LedgerStore, NewTransaction, PinCode, SeedAccount,
    Transaction,
};

/// Account and transaction operations over a [`LedgerStore`].
///
/// Every mutating operation performs its lookups, checks and writes inside a
/// single atomic unit, so a failed check never leaves a partial write behind
/// and a balance change is never visible without its transaction record.
#[derive(Debug)]
pub struct Ledger<S>
where
    S: LedgerStore,
{
    store: S,
}

impl<S> Ledger<S>
where
    S: LedgerStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Opens a new account with a zero balance.
    ///
    /// A missing name is reported as [`Error::InvalidPin`], same as a PIN of the
    /// wrong length. An empty name is accepted.
    #[instrument(skip(self, pin_code), err(level = "warn"))]
    pub fn create_account(&self, name: Option<&str>, pin_code: &str) -> Result<Account, Error> {
        let name = name.ok_or(Error::InvalidPin)?;
        let account = Account::open(name, PinCode::parse(pin_code)?);

        self.store.atomic_unit(|unit| unit.put_account(&account))?;

        tracing::info!(account = %account.id, "account created");
        Ok(account)
    }

    /// Opens an account with an externally credited opening balance. No
    /// transaction is recorded for the opening balance.
    #[instrument(skip(self, seed), fields(name = %seed.name), err(level = "warn"))]
    pub fn import_account(&self, seed: SeedAccount) -> Result<Account, Error> {
        if seed.balance < Decimal::ZERO {
            return Err(Error::Seed(format!(
                "Opening balance must not be negative, got {}",
                seed.balance
            )));
        }

        let mut account = Account::open(seed.name, PinCode::parse(&seed.pin_code)?);
        account.balance = seed.balance;

        self.store.atomic_unit(|unit| unit.put_account(&account))?;

        tracing::debug!(account = %account.id, balance = %account.balance, "account imported");
        Ok(account)
    }

    pub fn accounts(&self) -> Result<Vec<Account>, Error> {
        self.store.list_accounts()
    }

    pub fn account(&self, id: &AccountId) -> Result<Option<Account>, Error> {
        self.store.get_account(id)
    }

    #[instrument(skip(self, amount), fields(amount = %amount), err(level = "warn"))]
    pub fn deposit(&self, id: &AccountId, amount: Amount) -> Result<Transaction, Error> {
        let tx = self.store.atomic_unit(|unit| {
            let mut account = unit
                .get_account(id)?
                .ok_or_else(|| Error::AccountNotFound(id.clone()))?;

            account.balance = credit(&account, amount)?;
            unit.put_account(&account)?;
            unit.append_transaction(NewTransaction::deposit(id, amount, now()))
        })?;

        tracing::info!(%tx, "deposit applied");
        Ok(tx)
    }

    /// Funds are checked before the PIN, so a wrong PIN on an account that
    /// cannot cover the amount reports [`Error::InsufficientFunds`].
    #[instrument(skip(self, amount, pin_code), fields(amount = %amount), err(level = "warn"))]
    pub fn withdraw(
        &self,
        id: &AccountId,
        amount: Amount,
        pin_code: &str,
    ) -> Result<Transaction, Error> {
        let tx = self.store.atomic_unit(|unit| {
            let mut account = unit
                .get_account(id)?
                .ok_or_else(|| Error::AccountNotFound(id.clone()))?;

            if account.balance < amount.value() {
                return Err(Error::InsufficientFunds(id.clone()));
            }
            if !account.pin_code.matches(pin_code) {
                return Err(Error::WrongPin(id.clone()));
            }

            account.balance -= amount.value();
            unit.put_account(&account)?;
            unit.append_transaction(NewTransaction::withdraw(id, amount, now()))
        })?;

        tracing::info!(%tx, "withdrawal applied");
        Ok(tx)
    }

    /// Moves `amount` from `from` to `to`, authorised by the source PIN.
    ///
    /// Unlike [`Ledger::withdraw`], the PIN is checked before the funds.
    #[instrument(skip(self, amount, pin_code), fields(amount = %amount), err(level = "warn"))]
    pub fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
        pin_code: &str,
    ) -> Result<Transaction, Error> {
        let tx = self.store.atomic_unit(|unit| {
            let mut source = unit
                .get_account(from)?
                .ok_or_else(|| Error::AccountNotFound(from.clone()))?;
            if unit.get_account(to)?.is_none() {
                return Err(Error::AccountNotFound(to.clone()));
            }

            if !source.pin_code.matches(pin_code) {
                return Err(Error::WrongPin(from.clone()));
            }
            if source.balance < amount.value() {
                return Err(Error::InsufficientFunds(from.clone()));
            }

            source.balance -= amount.value();
            unit.put_account(&source)?;

            // Re-read so a transfer to the same account credits the debited copy.
            let mut destination = unit
                .get_account(to)?
                .ok_or_else(|| Error::AccountNotFound(to.clone()))?;
            destination.balance = credit(&destination, amount)?;
            unit.put_account(&destination)?;

            unit.append_transaction(NewTransaction::transfer(from, to, amount, now()))
        })?;

        tracing::info!(%tx, "transfer applied");
        Ok(tx)
    }

    pub fn transactions(&self) -> Result<Vec<Transaction>, Error> {
        self.store.list_transactions()
    }

    /// Transactions originating from `id`. An empty history is an error.
    #[instrument(skip(self), err(level = "warn"))]
    pub fn transactions_by_account(&self, id: &AccountId) -> Result<Vec<Transaction>, Error> {
        let transactions = self.store.list_transactions_by_source(id)?;
        if transactions.is_empty() {
            return Err(Error::NoTransactionsFound(id.clone()));
        }
        Ok(transactions)
    }
}

fn credit(account: &Account, amount: Amount) -> Result<Decimal, Error> {
    account
        .balance
        .checked_add(amount.value())
        .ok_or_else(|| Error::BalanceOverflow(account.id.clone()))
}

fn now() -> NaiveTime {
    Local::now().time()
}
