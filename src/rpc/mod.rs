//! RPC - balance lookups against an Ethereum JSON-RPC endpoint.

mod client;
mod units;

pub use client::{BalanceSource, RpcClient};
pub use units::{format_ether, parse_hex_quantity, Balance};
