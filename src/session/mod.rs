//! Session - the wallet workbench state and the operations that change it.
//!
//! One session holds the current seed phrase, the account list, which account
//! is selected, its last known balance, and two pieces of form state (the
//! transaction form toggle and a spending limit). Accounts are persisted on
//! every change; everything else lives only as long as the session.

mod config;

pub use config::{load_dotenv, parse_poll_ms, parse_timeout_ms, Config, DEFAULT_POLL_INTERVAL, DEFAULT_PORT, DEFAULT_RPC_TIMEOUT};

use serde::Serialize;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

use crate::core::paths::labels;
use crate::error::{Error, Result};
use crate::identity::{generate_seed_phrase, validate_seed_phrase};
use crate::rpc::Balance;
use crate::wallet::{record, Wallet, WalletStore};

pub struct Session {
    store: WalletStore,
    seed_phrase: Option<String>,
    wallets: Vec<Wallet>,
    selected_index: usize,
    balance: Option<Balance>,
    transaction_form_open: bool,
    limit: Option<u64>,
}

/// Serializable view of a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub seed_phrase: Option<String>,
    pub wallets: Vec<Wallet>,
    pub selected_index: usize,
    pub selected_wallet: Option<Wallet>,
    pub balance: Option<Balance>,
    pub transaction_form_open: bool,
    pub limit: Option<u64>,
    pub create_label: &'static str,
}

impl Session {
    /// Empty session; nothing is read from the store.
    pub fn new(store: WalletStore) -> Self {
        Self {
            store,
            seed_phrase: None,
            wallets: Vec::new(),
            selected_index: 0,
            balance: None,
            transaction_form_open: false,
            limit: None,
        }
    }

    /// Session with the stored accounts; the first one is selected.
    pub fn load(store: WalletStore) -> Result<Self> {
        let mut session = Self::new(store);
        session.wallets = session.store.load()?;
        session.selected_index = 0;
        info!(count = session.wallets.len(), dir = %session.store.dir().display(), "wallets loaded");
        Ok(session)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let mut session = Self::load(config.store())?;
        if let Some(phrase) = config.mnemonic.as_deref() {
            session.set_seed_phrase(phrase)?;
        }
        Ok(session)
    }

    pub fn shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }

    // Phrase

    pub fn seed_phrase(&self) -> Option<&str> { self.seed_phrase.as_deref() }

    /// Replace the current phrase with a fresh 12-word one.
    pub fn generate_seed_phrase(&mut self) -> Result<String> {
        let phrase = generate_seed_phrase()?;
        self.seed_phrase = Some(phrase.clone());
        debug!("seed phrase generated");
        Ok(phrase)
    }

    /// Use an existing phrase. Later accounts derive from it.
    pub fn set_seed_phrase(&mut self, phrase: &str) -> Result<String> {
        let phrase = validate_seed_phrase(phrase)?;
        self.seed_phrase = Some(phrase.clone());
        Ok(phrase)
    }

    // Accounts

    pub fn wallets(&self) -> &[Wallet] { &self.wallets }

    pub fn selected_index(&self) -> usize { self.selected_index }

    pub fn selected_wallet(&self) -> Option<&Wallet> {
        self.wallets.get(self.selected_index)
    }

    /// Derive the next account from the current phrase, append it, select it
    /// and persist the list. `Ok(None)` when no phrase is set.
    pub fn create_wallet_from_seed(&mut self) -> Result<Option<Wallet>> {
        let Some(phrase) = self.seed_phrase.as_deref() else {
            return Ok(None);
        };
        let wallet = Wallet::next_for(&self.wallets, phrase)?;

        let mut next = self.wallets.clone();
        next.push(wallet.clone());
        self.store.save(&next)?;

        self.wallets = next;
        self.selected_index = self.wallets.len() - 1;
        self.transaction_form_open = false;
        info!(id = wallet.id, address = %wallet.address, path = %wallet.path, "wallet created");
        Ok(Some(wallet))
    }

    /// Select by list position; closes the transaction form.
    pub fn select_wallet(&mut self, index: usize) -> Result<&Wallet> {
        record::get(&self.wallets, index)?;
        self.selected_index = index;
        self.transaction_form_open = false;
        self.selected_wallet().ok_or(Error::WalletIndex { index, count: self.wallets.len() })
    }

    // Balance

    pub fn balance(&self) -> Option<&Balance> { self.balance.as_ref() }

    /// Record a fetched balance. Dropped (returns false) if `address` is no
    /// longer the selected account.
    pub fn record_balance(&mut self, address: &str, wei: u128) -> bool {
        let is_selected = self.selected_wallet().is_some_and(|w| w.address == address);
        if is_selected {
            self.balance = Some(Balance::new(address, wei));
        } else {
            debug!(%address, "stale balance dropped");
        }
        is_selected
    }

    // Form state

    pub fn transaction_form_open(&self) -> bool { self.transaction_form_open }

    pub fn set_transaction_form(&mut self, open: bool) { self.transaction_form_open = open; }

    pub fn limit(&self) -> Option<u64> { self.limit }

    pub fn set_limit(&mut self, limit: Option<u64>) { self.limit = limit; }

    pub fn create_label(&self) -> &'static str {
        if self.wallets.is_empty() { labels::CREATE_FIRST } else { labels::ADD_ACCOUNT }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            seed_phrase: self.seed_phrase.clone(),
            wallets: self.wallets.clone(),
            selected_index: self.selected_index,
            selected_wallet: self.selected_wallet().cloned(),
            balance: self.balance.clone(),
            transaction_form_open: self.transaction_form_open,
            limit: self.limit,
            create_label: self.create_label(),
        }
    }
}

/// Session shared between the HTTP handlers and the poller.
pub type SharedSession = Arc<RwLock<Session>>;

pub fn read(session: &SharedSession) -> Result<RwLockReadGuard<'_, Session>> {
    session.read().map_err(|_| Error::Poisoned)
}

pub fn write(session: &SharedSession) -> Result<RwLockWriteGuard<'_, Session>> {
    session.write().map_err(|_| Error::Poisoned)
}
