use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::{
    Account, AccountId, Error, LedgerStore, NewTransaction, Transaction, UnitOfWork,
};

#[derive(Default, Debug)]
struct MemoryState {
    accounts: Vec<Account>,
    index: HashMap<AccountId, usize>,
    ledger: Vec<Transaction>,
    next_transaction_id: u64,
}

impl MemoryState {
    fn account(&self, id: &AccountId) -> Option<&Account> {
        self.index.get(id).map(|&pos| &self.accounts[pos])
    }

    fn upsert(&mut self, account: Account) {
        match self.index.get(&account.id) {
            Some(&pos) => self.accounts[pos] = account,
            None => {
                self.index.insert(account.id.clone(), self.accounts.len());
                self.accounts.push(account);
            }
        }
    }
}

/// Process-local store. Whole-ledger lock, so atomic units are fully serialized.
#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                next_transaction_id: 1,
                ..MemoryState::default()
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, Error> {
        self.state
            .lock()
            .map_err(|_| Error::Storage("lock poisoned".to_string()))
    }
}

struct MemoryUnit<'a> {
    state: &'a MemoryState,
    staged_accounts: Vec<Account>,
    staged_ledger: Vec<Transaction>,
}

impl MemoryUnit<'_> {
    fn next_id(&self) -> u64 {
        self.state.next_transaction_id + self.staged_ledger.len() as u64
    }
}

impl UnitOfWork for MemoryUnit<'_> {
    fn get_account(&mut self, id: &AccountId) -> Result<Option<Account>, Error> {
        if let Some(staged) = self.staged_accounts.iter().find(|a| &a.id == id) {
            return Ok(Some(staged.clone()));
        }
        Ok(self.state.account(id).cloned())
    }

    fn put_account(&mut self, account: &Account) -> Result<(), Error> {
        match self.staged_accounts.iter_mut().find(|a| a.id == account.id) {
            Some(staged) => *staged = account.clone(),
            None => self.staged_accounts.push(account.clone()),
        }
        Ok(())
    }

    fn append_transaction(&mut self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let committed = transaction.assign(self.next_id());
        self.staged_ledger.push(committed.clone());
        Ok(committed)
    }
}

impl LedgerStore for MemoryStore {
    fn get_account(&self, id: &AccountId) -> Result<Option<Account>, Error> {
        Ok(self.lock()?.account(id).cloned())
    }

    fn list_accounts(&self) -> Result<Vec<Account>, Error> {
        Ok(self.lock()?.accounts.clone())
    }

    fn list_transactions(&self) -> Result<Vec<Transaction>, Error> {
        Ok(self.lock()?.ledger.clone())
    }

    fn list_transactions_by_source(&self, id: &AccountId) -> Result<Vec<Transaction>, Error> {
        Ok(self
            .lock()?
            .ledger
            .iter()
            .filter(|tx| &tx.account_from == id)
            .cloned()
            .collect())
    }

    fn atomic_unit<T, F>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, Error>,
    {
        let mut state = self.lock()?;

        let (result, staged_accounts, staged_ledger) = {
            let mut unit = MemoryUnit {
                state: &state,
                staged_accounts: Vec::new(),
                staged_ledger: Vec::new(),
            };
            let result = f(&mut unit);
            (result, unit.staged_accounts, unit.staged_ledger)
        };

        // Nothing staged reaches the shared state unless the unit succeeded.
        let value = result?;

        if let Some(last) = staged_ledger.last() {
            state.next_transaction_id = last.id + 1;
        }
        for account in staged_accounts {
            state.upsert(account);
        }
        state.ledger.extend(staged_ledger);

        Ok(value)
    }
}
