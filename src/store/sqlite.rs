use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveTime;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};
use rust_decimal::Decimal;

use crate::domain::{
    Account, AccountId, Error, LedgerStore, NewTransaction, PinCode, Transaction,
    TransactionKind, UnitOfWork,
};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS accounts (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        pin_code TEXT NOT NULL CHECK (length(pin_code) = 4),
        balance TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        account_from TEXT NOT NULL,
        account_to TEXT NOT NULL,
        time TEXT NOT NULL,
        amount TEXT NOT NULL,
        kind TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_transactions_account_from
        ON transactions (account_from);
";

const ACCOUNT_COLUMNS: &str = "id, name, pin_code, balance";
const TRANSACTION_COLUMNS: &str = "id, account_from, account_to, time, amount, kind";

/// SQLite-backed store. Decimals and times are kept as TEXT so no precision is lost.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open(path)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, Error> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, Error> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.conn
            .lock()
            .map_err(|_| Error::Storage("lock poisoned".to_string()))
    }
}

fn conversion_error(
    idx: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str(&raw).map_err(|e| conversion_error(idx, e))
}

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    let id: String = row.get(0)?;
    let pin: String = row.get(2)?;
    Ok(Account {
        id: AccountId::from(id),
        name: row.get(1)?,
        pin_code: PinCode::parse(&pin).map_err(|e| conversion_error(2, e))?,
        balance: decimal_column(row, 3)?,
    })
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let id: i64 = row.get(0)?;
    let from: String = row.get(1)?;
    let to: String = row.get(2)?;
    let time: String = row.get(3)?;
    let kind: String = row.get(5)?;
    Ok(Transaction {
        id: id as u64,
        account_from: AccountId::from(from),
        account_to: AccountId::from(to),
        time: NaiveTime::from_str(&time).map_err(|e| conversion_error(3, e))?,
        amount: decimal_column(row, 4)?,
        kind: TransactionKind::from_str(&kind).map_err(|e| conversion_error(5, e))?,
    })
}

fn select_account(conn: &Connection, id: &AccountId) -> Result<Option<Account>, Error> {
    let account = conn
        .query_row(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?1"),
            params![id.as_str()],
            account_from_row,
        )
        .optional()?;
    Ok(account)
}

struct SqliteUnit<'a> {
    conn: &'a Connection,
}

impl UnitOfWork for SqliteUnit<'_> {
    fn get_account(&mut self, id: &AccountId) -> Result<Option<Account>, Error> {
        select_account(self.conn, id)
    }

    fn put_account(&mut self, account: &Account) -> Result<(), Error> {
        self.conn.execute(
            "INSERT INTO accounts (id, name, pin_code, balance) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                pin_code = excluded.pin_code,
                balance = excluded.balance",
            params![
                account.id.as_str(),
                account.name,
                account.pin_code.as_str(),
                account.balance.to_string(),
            ],
        )?;
        Ok(())
    }

    fn append_transaction(&mut self, transaction: NewTransaction) -> Result<Transaction, Error> {
        self.conn.execute(
            "INSERT INTO transactions (account_from, account_to, time, amount, kind)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                transaction.account_from.as_str(),
                transaction.account_to.as_str(),
                transaction.time.to_string(),
                transaction.amount.value().to_string(),
                transaction.kind.as_str(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        Ok(transaction.assign(id as u64))
    }
}

impl LedgerStore for SqliteStore {
    fn get_account(&self, id: &AccountId) -> Result<Option<Account>, Error> {
        let conn = self.lock()?;
        select_account(&conn, id)
    }

    fn list_accounts(&self) -> Result<Vec<Account>, Error> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY rowid"
        ))?;
        let accounts = stmt
            .query_map([], account_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(accounts)
    }

    fn list_transactions(&self) -> Result<Vec<Transaction>, Error> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY id"
        ))?;
        let transactions = stmt
            .query_map([], transaction_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    fn list_transactions_by_source(&self, id: &AccountId) -> Result<Vec<Transaction>, Error> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE account_from = ?1 ORDER BY id"
        ))?;
        let transactions = stmt
            .query_map(params![id.as_str()], transaction_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    fn atomic_unit<T, F>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, Error>,
    {
        let mut conn = self.lock()?;
        // IMMEDIATE takes the write lock up front, so a unit's reads cannot go stale.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let value = {
            let mut unit = SqliteUnit { conn: &tx };
            f(&mut unit)?
        };

        // Dropping `tx` on the error path above rolls it back.
        tx.commit()?;
        Ok(value)
    }
}
