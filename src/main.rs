use std::{fs::File, sync::Arc};

use ledger_service::{
    Config, Error, Ledger, LedgerStore, api,
    dlq::TracingDlq,
    seed::{self, CsvSeed},
    store::{MemoryStore, SqliteStore},
    telemetry,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();

    let config = Config::from_env()?;

    match &config.database {
        Some(path) => {
            tracing::info!(database = %path.display(), "using sqlite store");
            serve(Ledger::new(SqliteStore::open(path)?), &config).await?;
        }
        None => {
            tracing::info!("using in-memory store");
            serve(Ledger::new(MemoryStore::new()), &config).await?;
        }
    }

    Ok(())
}

async fn serve<S>(ledger: Ledger<S>, config: &Config) -> Result<(), Error>
where
    S: LedgerStore + Send + Sync + 'static,
{
    if let Some(path) = &config.seed {
        let file = File::open(path)?;
        let mut source = CsvSeed::new(file);
        seed::load(&ledger, &mut source, &TracingDlq::default()).await;
    }

    let app = api::router(Arc::new(ledger));
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
