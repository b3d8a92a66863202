//! HTTP Tests: JSON-RPC client against a local mock node, and the workbench router
//!
//! Both sides run in-process on 127.0.0.1:0.

#![cfg(feature = "server")]

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use safewallet::rpc::RpcClient;
use safewallet::{create_router, AppState, Error, Session, WalletStore};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
const ONE_ETHER_HEX: &str = "0xde0b6b3a7640000";

#[derive(Clone)]
struct MockNode {
    requests: Arc<Mutex<Vec<Value>>>,
    reply: Value,
    status: StatusCode,
}

async fn mock_rpc(State(node): State<MockNode>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    node.requests.lock().unwrap().push(body);
    (node.status, Json(node.reply.clone()))
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

async fn spawn_node(reply: Value, status: StatusCode) -> (String, Arc<Mutex<Vec<Value>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let node = MockNode { requests: requests.clone(), reply, status };
    let addr = spawn(Router::new().route("/", post(mock_rpc)).with_state(node)).await;
    (format!("http://{}/", addr), requests)
}

fn client(url: &str) -> RpcClient {
    RpcClient::new(url, Duration::from_secs(5)).expect("client")
}

// ============================================================================
// RPC client
// ============================================================================

#[tokio::test]
async fn get_balance_sends_eth_get_balance() {
    let (url, requests) = spawn_node(json!({"jsonrpc": "2.0", "id": 1, "result": ONE_ETHER_HEX}), StatusCode::OK).await;

    let wei = client(&url).get_balance("0x9858EfFD232B4033E47d90003D41EC34EcaEda94").await.expect("balance");
    assert_eq!(wei, 1_000_000_000_000_000_000);

    let seen = requests.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_getBalance",
            "params": ["0x9858EfFD232B4033E47d90003D41EC34EcaEda94", "latest"]
        })]
    );
}

#[tokio::test]
async fn rpc_error_object_is_surfaced() {
    let (url, _) = spawn_node(
        json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32602, "message": "invalid address"}}),
        StatusCode::OK,
    )
    .await;

    match client(&url).get_balance("0xnope").await {
        Err(Error::Rpc { code, message }) => {
            assert_eq!(code, -32602);
            assert_eq!(message, "invalid address");
        }
        other => panic!("expected rpc error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_result_and_http_failures_are_errors() {
    let (url, _) = spawn_node(json!({"jsonrpc": "2.0", "id": 1}), StatusCode::OK).await;
    assert!(matches!(client(&url).get_balance("0x00").await, Err(Error::Rpc { .. })));

    let (url, _) = spawn_node(json!({"result": "0x1"}), StatusCode::SERVICE_UNAVAILABLE).await;
    assert!(matches!(client(&url).get_balance("0x00").await, Err(Error::Http(_))));

    let (url, _) = spawn_node(json!({"result": 12}), StatusCode::OK).await;
    assert!(matches!(client(&url).get_balance("0x00").await, Err(Error::Quantity(_))));
}

// ============================================================================
// Workbench router
// ============================================================================

struct Workbench {
    base: String,
    http: reqwest::Client,
    _dir: TempDir,
}

impl Workbench {
    async fn start(rpc_url: Option<&str>) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let shared = Session::load(WalletStore::at(dir.path())).expect("session").shared();
        let mut state = AppState::new(shared, "workbench-test");
        if let Some(url) = rpc_url {
            state = state.with_source(Arc::new(client(url)));
        }
        let addr = spawn(create_router(state)).await;
        Self { base: format!("http://{}", addr), http: reqwest::Client::new(), _dir: dir }
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.http.get(format!("{}{}", self.base, path)).send().await.expect("send");
        Self::parts(resp).await
    }

    async fn post(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.http.post(format!("{}{}", self.base, path)).send().await.expect("send");
        Self::parts(resp).await
    }

    async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let resp = self.http.put(format!("{}{}", self.base, path)).json(&body).send().await.expect("send");
        Self::parts(resp).await
    }

    async fn parts(resp: reqwest::Response) -> (StatusCode, Value) {
        let status = StatusCode::from_u16(resp.status().as_u16()).expect("status");
        let text = resp.text().await.expect("body");
        (status, serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

#[tokio::test]
async fn health_and_about() {
    let bench = Workbench::start(None).await;

    let (status, body) = bench.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "workbench-test");

    let (_, body) = bench.get("/about").await;
    assert_eq!(body["name"], "SafeWallet");
    assert!(body["github"].as_str().unwrap().starts_with("https://github.com/"));
}

#[tokio::test]
async fn create_requires_a_phrase() {
    let bench = Workbench::start(None).await;
    let (status, _) = bench.post("/wallets").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, state) = bench.get("/state").await;
    assert_eq!(state["createLabel"], "Create a Wallet");
    assert_eq!(state["wallets"], json!([]));
}

#[tokio::test]
async fn generate_and_import_phrase() {
    let bench = Workbench::start(None).await;

    let (status, body) = bench.post("/phrase").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["words"], 12);

    let (status, body) = bench.put("/phrase", json!({"phrase": TEST_MNEMONIC.to_uppercase()})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phrase"], TEST_MNEMONIC);

    let (status, _) = bench.put("/phrase", json!({"phrase": "abandon abandon"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_select_and_fetch_balance() {
    let (url, requests) = spawn_node(json!({"jsonrpc": "2.0", "id": 1, "result": ONE_ETHER_HEX}), StatusCode::OK).await;
    let bench = Workbench::start(Some(&url)).await;
    bench.put("/phrase", json!({"phrase": TEST_MNEMONIC})).await;

    let (status, body) = bench.post("/wallets").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["wallet"]["id"], 1);
    assert_eq!(body["wallet"]["address"], "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
    assert_eq!(body["balance"]["ether"], "1.0000");
    assert_eq!(requests.lock().unwrap().len(), 1);

    let (_, body) = bench.post("/wallets").await;
    assert_eq!(body["wallet"]["id"], 2);
    assert_eq!(body["wallet"]["path"], "m/44'/60'/0'/0/1");

    bench.put("/transaction-form", json!({"open": true})).await;
    let (status, selected) = bench.put("/wallets/selected", json!({"index": 0})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(selected["id"], 1);

    let (status, _) = bench.put("/wallets/selected", json!({"index": 9})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, state) = bench.get("/state").await;
    assert_eq!(state["selectedIndex"], 0);
    assert_eq!(state["transactionFormOpen"], false);
    assert_eq!(state["createLabel"], "Add Account");
    assert_eq!(state["selectedWallet"]["signingKey"]["privateKey"], state["wallets"][0]["privateKey"]);
    assert!(state["balance"]["updatedAt"].is_string());

    let (_, list) = bench.get("/wallets").await;
    assert_eq!(list["count"], 2);
    assert_eq!(list["selectedIndex"], 0);
}

#[tokio::test]
async fn balance_missing_until_fetched_and_limit_roundtrip() {
    let bench = Workbench::start(None).await;
    bench.put("/phrase", json!({"phrase": TEST_MNEMONIC})).await;
    let (status, body) = bench.post("/wallets").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["balance"], Value::Null);

    let (status, _) = bench.get("/balance").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = bench.put("/limit", json!({"limit": 250})).await;
    assert_eq!(body["limit"], 250);
    let (_, body) = bench.put("/limit", json!({"limit": null})).await;
    assert_eq!(body["limit"], Value::Null);
}
