use std::io::Read;
use std::pin::Pin;

use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;

use crate::domain::money::parse_balance;
use crate::domain::traits::SeedStream;
use crate::domain::{DeadLetterQueue, Error, LedgerStore, SeedAccount};
use crate::ledger::Ledger;

/// Reads opening accounts from CSV with a `name,pin_code,balance` header.
pub struct CsvSeed<R: Read> {
    reader: Option<csv::Reader<R>>,
}

impl<R: Read> CsvSeed<R> {
    pub fn new(reader: R) -> Self {
        let rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        Self { reader: Some(rdr) }
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    name: String,
    pin_code: String,
    balance: String,
}

impl TryFrom<CsvRow> for SeedAccount {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self, Self::Error> {
        let balance = parse_balance(&row.balance).ok_or_else(|| {
            Error::Seed(format!(
                "Invalid opening balance '{}' for {}",
                row.balance, row.name
            ))
        })?;

        Ok(SeedAccount {
            name: row.name,
            pin_code: row.pin_code,
            balance,
        })
    }
}

impl<R: Read + Send + 'static> SeedStream for CsvSeed<R> {
    type AccountStream = Pin<Box<dyn Stream<Item = Result<SeedAccount, Error>> + Send>>;

    fn stream(&mut self) -> Self::AccountStream {
        let Some(reader) = self.reader.take() else {
            return Box::pin(stream::iter(Vec::<Result<SeedAccount, Error>>::new()));
        };

        let iter = reader
            .into_deserialize::<CsvRow>()
            .map(|row_res| match row_res {
                Ok(row) => SeedAccount::try_from(row),
                Err(e) => Err(Error::Seed(format!("CSV deserialization error: {}", e))),
            });

        Box::pin(stream::iter(iter))
    }
}

/// Imports every valid account from `source`. Rejected rows go to `dlq` and
/// loading carries on. Returns the number of accounts created.
pub async fn load<S, I, D>(ledger: &Ledger<S>, source: &mut I, dlq: &D) -> usize
where
    S: LedgerStore,
    I: SeedStream,
    D: DeadLetterQueue,
{
    let mut accounts = source.stream();
    let mut imported = 0;

    while let Some(row) = accounts.next().await {
        match row.and_then(|seed| ledger.import_account(seed)) {
            Ok(_) => imported += 1,
            Err(e) => dlq.report(&e),
        }
    }

    tracing::info!(imported, "seed accounts loaded");
    imported
}
