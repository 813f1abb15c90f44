use std::net::SocketAddr;
use std::path::PathBuf;

use crate::domain::Error;

pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub addr: SocketAddr,
    /// SQLite database file. `None` keeps the ledger in memory.
    pub database: Option<PathBuf>,
    /// CSV file of opening accounts loaded at startup.
    pub seed: Option<PathBuf>,
}

impl Config {
    /// Reads `LEDGER_ADDR`, `LEDGER_DATABASE` and `LEDGER_SEED`; a first
    /// command line argument overrides the seed file.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok(), std::env::args().nth(1))
    }

    pub fn from_lookup<F>(lookup: F, seed_arg: Option<String>) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup("LEDGER_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("invalid LEDGER_ADDR '{}': {}", raw_addr, e)))?;

        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        Ok(Self {
            addr,
            database: non_empty(lookup("LEDGER_DATABASE")).map(PathBuf::from),
            seed: non_empty(seed_arg)
                .or_else(|| non_empty(lookup("LEDGER_SEED")))
                .map(PathBuf::from),
        })
    }
}
