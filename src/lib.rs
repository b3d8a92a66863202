//! SafeWallet: a hands-on workbench for seed phrases and HD accounts.
//!
//! # Architecture
//!
//! ```text
//! Session (shared state)
//!   │
//!   ├── seed phrase ── identity::generate_seed_phrase / validate_seed_phrase
//!   │
//!   ├── Vec<Wallet> ── identity::derive_wallet(phrase, m/44'/60'/0'/0/{i})
//!   │        │
//!   │        └── WalletStore (<root>/<app>/data/wallets.json, plaintext)
//!   │
//!   └── Balance ◀── Poller (fixed interval) ◀── RpcClient (eth_getBalance)
//!
//! server::create_router ── JSON endpoints over the session
//! bin/main.rs           ── CLI over the same operations
//! ```
//!
//! Key material is stored unencrypted. This is a learning tool; never put
//! real funds behind a phrase generated or stored here.
//!
//! # Usage
//!
//! ```ignore
//! use safewallet::{Config, Session};
//!
//! let config = Config::new("demo").with_rpc_url("https://eth-sepolia.example/v2/key");
//! let mut session = Session::from_config(&config)?;
//! session.generate_seed_phrase()?;
//! let wallet = session.create_wallet_from_seed()?.expect("phrase is set");
//! println!("{} at {}", wallet.address, wallet.path);
//! ```

pub mod core;
pub mod error;
pub mod identity;
pub mod logging;
pub mod poller;
pub mod rpc;
pub mod runtime;
pub mod session;
pub mod wallet;

#[cfg(feature = "server")]
pub mod server;

pub use error::{Error, Result};
pub use identity::{derive_wallet, generate_seed_phrase, validate_seed_phrase, DerivedKey, SigningKey};
pub use poller::{refresh_now, Poller};
pub use rpc::{format_ether, Balance, BalanceSource, RpcClient};
pub use runtime::{install_signal_handlers, Shutdown};
pub use session::{Config, Session, SessionSnapshot, SharedSession};
pub use wallet::{Wallet, WalletStore};

#[cfg(feature = "server")]
pub use server::{create_router, AppState};
