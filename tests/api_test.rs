use std::sync::Arc;

use ledger_service::{Ledger, api, store::MemoryStore};
use reqwest::StatusCode;
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let app = api::router(Arc::new(Ledger::new(MemoryStore::new())));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_account(client: &reqwest::Client, server: &TestServer, pin: &str) -> String {
    let res = client
        .post(server.url("/api/accounts"))
        .json(&json!({ "name": "Account Holder", "pinCode": pin }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

async fn patch(
    client: &reqwest::Client,
    server: &TestServer,
    path: &str,
    body: Value,
) -> (StatusCode, Value) {
    let res = client
        .patch(server.url(path))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

async fn balance(client: &reqwest::Client, server: &TestServer, id: &str) -> String {
    let body: Value = client
        .get(server.url(&format!("/api/accounts/{id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["balance"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn deposit_then_transfer_scenario() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let a = create_account(&client, &server, "1111").await;
    let b = create_account(&client, &server, "2222").await;

    let (status, tx) = patch(
        &client,
        &server,
        &format!("/api/accounts/{a}/deposit"),
        json!({ "amount": "1000.00" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tx["kind"], "DEPOSIT");
    assert_eq!(tx["amount"], "1000.00");
    assert_eq!(balance(&client, &server, &a).await, "1000.00");

    let (status, _) = patch(
        &client,
        &server,
        &format!("/api/accounts/{b}/deposit"),
        json!({ "amount": "2000.00" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, tx) = patch(
        &client,
        &server,
        &format!("/api/accounts/{b}/transfer/{a}"),
        json!({ "amount": "500.00", "pinCode": "2222" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tx["kind"], "TRANSFER");
    assert_eq!(tx["accountFrom"], b.as_str());
    assert_eq!(tx["accountTo"], a.as_str());

    assert_eq!(balance(&client, &server, &a).await, "1500.00");
    assert_eq!(balance(&client, &server, &b).await, "1500.00");

    let history: Value = client
        .get(server.url(&format!("/api/transactions/{b}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let kinds: Vec<_> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds, vec!["DEPOSIT", "TRANSFER"]);

    let all: Value = client
        .get(server.url("/api/transactions"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn each_failure_has_its_own_signal() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let a = create_account(&client, &server, "1111").await;
    let b = create_account(&client, &server, "2222").await;

    patch(
        &client,
        &server,
        &format!("/api/accounts/{a}/deposit"),
        json!({ "amount": 10 }),
    )
    .await;

    let res = client
        .post(server.url("/api/accounts"))
        .json(&json!({ "name": "x", "pinCode": "12" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await.unwrap()["error"], "invalid_pin");

    let (status, body) = patch(
        &client,
        &server,
        &format!("/api/accounts/{a}/withdraw"),
        json!({ "amount": 25, "pinCode": "1111" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "insufficient_funds");
    assert_eq!(balance(&client, &server, &a).await, "10");

    let (status, body) = patch(
        &client,
        &server,
        &format!("/api/accounts/{a}/withdraw"),
        json!({ "amount": 5, "pinCode": "0000" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "wrong_pin");

    let (status, body) = patch(
        &client,
        &server,
        &format!("/api/accounts/{a}/transfer/unknown"),
        json!({ "amount": 5, "pinCode": "1111" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "account_not_found");

    let (status, body) = patch(
        &client,
        &server,
        &format!("/api/accounts/{a}/deposit"),
        json!({ "amount": -3 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_amount");

    let (status, body) = patch(
        &client,
        &server,
        &format!("/api/accounts/{a}/deposit"),
        json!({ "pinCode": "1111" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");

    let res = client
        .get(server.url(&format!("/api/transactions/{b}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        res.json::<Value>().await.unwrap()["error"],
        "no_transactions_found"
    );

    let res = client
        .get(server.url("/api/accounts/unknown"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn account_listing_hides_pins() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create_account(&client, &server, "1111").await;

    let accounts: Value = client
        .get(server.url("/api/accounts"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let first = &accounts.as_array().unwrap()[0];
    assert_eq!(first["balance"], "0");
    assert_eq!(first["name"], "Account Holder");
    assert!(first.get("pinCode").is_none());
}
