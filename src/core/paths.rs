//! Path and name constants
//!
//! Centralized registry for storage keys, HTTP routes, env vars and
//! derivation constants.

/// Product name shown in the navigation bar
pub const PRODUCT_NAME: &str = "SafeWallet";
pub const PROJECT_URL: &str = "https://github.com/kartikmehta18/SafeWallet";
pub const DEFAULT_APP: &str = "safewallet";

/// Storage keys (one JSON file per key under `<root>/<app>/data/`)
pub mod storage {
    pub const WALLETS: &str = "wallets";
    pub const DATA_DIR: &str = "data";
    pub const EXTENSION: &str = "json";
}

/// BIP44 Ethereum account path; the address index is appended
pub mod derivation {
    pub const PREFIX: &str = "m/44'/60'/0'/0";
    pub const ENTROPY_BYTES: usize = 16;
}

/// JSON-RPC
pub mod rpc {
    pub const VERSION: &str = "2.0";
    pub const GET_BALANCE: &str = "eth_getBalance";
    pub const LATEST: &str = "latest";
    pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;
    pub const DISPLAY_DECIMALS: u32 = 4;
}

/// HTTP routes
pub mod routes {
    pub const HEALTH: &str = "/health";
    pub const ABOUT: &str = "/about";
    pub const STATE: &str = "/state";
    pub const PHRASE: &str = "/phrase";
    pub const WALLETS: &str = "/wallets";
    pub const SELECTED: &str = "/wallets/selected";
    pub const BALANCE: &str = "/balance";
    pub const TRANSACTION_FORM: &str = "/transaction-form";
    pub const LIMIT: &str = "/limit";
}

/// Environment variables
pub mod env {
    pub const APP: &str = "SAFEWALLET_APP";
    pub const ROOT: &str = "SAFEWALLET_ROOT";
    pub const RPC_URL: &str = "SAFEWALLET_RPC_URL";
    /// Fallbacks kept for `.env` files written for the browser build
    pub const RPC_URL_FALLBACKS: &[&str] = &["ALCHEMY_RPC_URL", "VITE_ALCHEMY_RPC_URL"];
    pub const POLL_MS: &str = "SAFEWALLET_POLL_MS";
    pub const RPC_TIMEOUT_MS: &str = "SAFEWALLET_RPC_TIMEOUT_MS";
    pub const PORT: &str = "SAFEWALLET_PORT";
    pub const MNEMONIC: &str = "SAFEWALLET_MNEMONIC";
    pub const LOG_JSON: &str = "SAFEWALLET_LOG_JSON";
    pub const LOG_FORMAT: &str = "SAFEWALLET_LOG_FORMAT";
}

/// Labels for the create button
pub mod labels {
    pub const CREATE_FIRST: &str = "Create a Wallet";
    pub const ADD_ACCOUNT: &str = "Add Account";
}
