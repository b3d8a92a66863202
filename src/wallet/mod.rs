//! Wallet module - the ordered account list and its persistence.
//!
//! # Lifecycle
//!
//! ```text
//! phrase ──derive(index = len)──▶ Wallet{id = len + 1} ──append──▶ Vec<Wallet>
//!                                                                    │
//!                                                          save (full overwrite)
//!                                                                    ▼
//!                                                   <root>/<app>/data/wallets.json
//! ```
//!
//! List order is display order. Records are never edited in place or removed.

pub mod record;
mod store;

pub use record::Wallet;
pub use store::WalletStore;
