//! Crate-wide error type

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid seed phrase: {0}")]
    InvalidPhrase(String),
    #[error("Invalid entropy length: {0} bytes")]
    InvalidEntropy(usize),
    #[error("No seed phrase generated yet")]
    NoSeedPhrase,
    #[error("Derivation failed: {0}")]
    Derivation(String),
    #[error("No wallet at index {index} ({count} wallets)")]
    WalletIndex { index: usize, count: usize },
    #[error("Store I/O at {path}: {source}")]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("Invalid quantity: {0}")]
    Quantity(String),
    #[error("Session lock poisoned")]
    Poisoned,
    #[error("Config: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn store(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Store { path: path.into(), source }
    }
}
