use std::io::Write;
use std::net::TcpListener;
use std::process::{Child, Command as StdCommand};
use std::time::Duration;

use assert_cmd::Command;
use predicates as pred;
use tempfile::NamedTempFile;

const EXE: &str = env!("CARGO_BIN_EXE_ledger_service");

#[test]
fn invalid_address_fails_startup() {
    let mut cmd = Command::new(EXE);
    cmd.env("LEDGER_ADDR", "not-an-address")
        .env_remove("LEDGER_DATABASE")
        .env_remove("LEDGER_SEED");

    cmd.assert()
        .failure()
        .stderr(pred::str::contains("LEDGER_ADDR"));
}

#[test]
fn missing_seed_file_fails_startup() {
    let mut cmd = Command::new(EXE);
    cmd.env("LEDGER_ADDR", "127.0.0.1:0")
        .env_remove("LEDGER_DATABASE")
        .arg("/definitely/not/here.csv");

    cmd.assert()
        .failure()
        .stderr(pred::str::contains("NotFound"));
}

struct RunningServer {
    child: Child,
    base_url: String,
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().unwrap().port()
}

fn start_server(seed: &NamedTempFile, database: &std::path::Path) -> RunningServer {
    let port = free_port();
    let child = StdCommand::new(EXE)
        .env("LEDGER_ADDR", format!("127.0.0.1:{port}"))
        .env("LEDGER_DATABASE", database)
        .env("RUST_LOG", "warn")
        .arg(seed.path())
        .spawn()
        .expect("spawn server");

    RunningServer {
        child,
        base_url: format!("http://127.0.0.1:{port}"),
    }
}

async fn get_accounts_eventually(client: &reqwest::Client, base_url: &str) -> serde_json::Value {
    for _ in 0..100 {
        if let Ok(res) = client.get(format!("{base_url}/api/accounts")).send().await {
            if res.status().is_success() {
                return res.json().await.unwrap();
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("server did not come up in time");
}

#[tokio::test]
async fn binary_seeds_accounts_and_persists_to_sqlite() {
    let mut seed = NamedTempFile::new().expect("create temp file");
    writeln!(
        seed,
        "name, pin_code, balance\n\
         Name Surname1, 1111, 1000\n\
         Name Surname2, 2222, 2000\n\
         Broken, 22, 10"
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let database = dir.path().join("ledger.db");
    let client = reqwest::Client::new();

    {
        let server = start_server(&seed, &database);
        let accounts = get_accounts_eventually(&client, &server.base_url).await;
        let accounts = accounts.as_array().unwrap();

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0]["name"], "Name Surname1");
        assert_eq!(accounts[0]["balance"], "1000");
        assert!(accounts[0].get("pinCode").is_none());
    }

    // same database, empty seed: the accounts are still there
    let empty_seed = NamedTempFile::new().unwrap();
    let server = start_server(&empty_seed, &database);
    let accounts = get_accounts_eventually(&client, &server.base_url).await;
    assert_eq!(accounts.as_array().unwrap().len(), 2);
}
