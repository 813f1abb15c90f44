pub mod account;
pub mod error;
pub mod money;
pub mod traits;
pub mod transaction;

pub use account::{Account, AccountId, PinCode};
pub use error::Error;
pub use money::Amount;
pub use traits::{DeadLetterQueue, LedgerStore, SeedAccount, SeedStream, UnitOfWork};
pub use transaction::{NewTransaction, Transaction, TransactionKind};
