//! Wallet record - one derived account, persisted verbatim.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::identity::{derive_wallet, DerivedKey, SigningKey};

/// One account. Field names are camelCase on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    /// 1-based position at creation time
    pub id: u32,
    pub address: String,
    pub private_key: String,
    pub public_key: String,
    pub signing_key: SigningKey,
    pub mnemonic: String,
    pub path: String,
}

impl Wallet {
    pub fn from_derived(id: u32, key: DerivedKey) -> Self {
        Self {
            id,
            address: key.address,
            private_key: key.private_key,
            public_key: key.public_key,
            signing_key: key.signing_key,
            mnemonic: key.mnemonic,
            path: key.path,
        }
    }

    /// Derive the next account for `wallets` from `phrase`.
    pub fn next_for(wallets: &[Wallet], phrase: &str) -> Result<Self> {
        let index = next_index(wallets)?;
        let key = derive_wallet(phrase, index)?;
        Ok(Self::from_derived(index + 1, key))
    }

    /// Short form for list views: `#2 0xAbCd…1234`.
    pub fn label(&self) -> String {
        let addr = &self.address;
        if addr.len() > 12 {
            format!("#{} {}…{}", self.id, &addr[..6], &addr[addr.len() - 4..])
        } else {
            format!("#{} {}", self.id, addr)
        }
    }
}

/// Derivation index of the next account: the current list length.
pub fn next_index(wallets: &[Wallet]) -> Result<u32> {
    u32::try_from(wallets.len()).map_err(|_| Error::Derivation("too many wallets".into()))
}

pub fn get(wallets: &[Wallet], index: usize) -> Result<&Wallet> {
    wallets.get(index).ok_or(Error::WalletIndex { index, count: wallets.len() })
}

pub fn find_by_id(wallets: &[Wallet], id: u32) -> Option<(usize, &Wallet)> {
    wallets.iter().enumerate().find(|(_, w)| w.id == id)
}
