//! JSON-RPC HTTP client for `eth_getBalance`.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::core::paths::rpc as consts;
use crate::error::{Error, Result};
use crate::rpc::units::parse_hex_quantity;

/// Anything that can report an address balance in wei.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn fetch_balance(&self, address: &str) -> Result<u128>;
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// HTTP JSON-RPC endpoint (Alchemy, Infura, a local node, ...).
#[derive(Debug, Clone)]
pub struct RpcClient {
    url: String,
    client: reqwest::Client,
}

impl RpcClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(Error::Config("RPC URL is empty".into()));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { url, client })
    }

    pub fn url(&self) -> &str { &self.url }

    /// One JSON-RPC call; returns the `result` member.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let request = RpcRequest { jsonrpc: consts::VERSION, id: 1, method, params };
        let resp = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: RpcResponse = resp.json().await?;
        if let Some(err) = body.error {
            return Err(Error::Rpc { code: err.code, message: err.message });
        }
        body.result
            .filter(|v| !v.is_null())
            .ok_or_else(|| Error::Rpc { code: 0, message: format!("{method}: response has no result") })
    }

    /// Balance at the latest block, in wei.
    pub async fn get_balance(&self, address: &str) -> Result<u128> {
        let result = self.call(consts::GET_BALANCE, json!([address, consts::LATEST])).await?;
        let hex = result
            .as_str()
            .ok_or_else(|| Error::Quantity(format!("expected hex string, got {result}")))?;
        let wei = parse_hex_quantity(hex)?;
        debug!(%address, %wei, "balance fetched");
        Ok(wei)
    }
}

#[async_trait]
impl BalanceSource for RpcClient {
    async fn fetch_balance(&self, address: &str) -> Result<u128> {
        self.get_balance(address).await
    }
}
