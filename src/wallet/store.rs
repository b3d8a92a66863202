//! WalletStore - key/value JSON files standing in for browser local storage.
//!
//! Layout: `<root>/<app>/data/<key>.json`. Root is `$SAFEWALLET_ROOT`, else the
//! platform local-data directory. Key material is stored in plaintext.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::paths::{env as vars, storage};
use crate::error::{Error, Result};
use crate::wallet::Wallet;

#[derive(Debug, Clone)]
pub struct WalletStore {
    dir: PathBuf,
}

impl WalletStore {
    /// Store for `app` under the configured root.
    pub fn open(app: &str) -> Self {
        Self::at(default_root().join(app).join(storage::DATA_DIR))
    }

    /// Store rooted at an explicit data directory.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path { &self.dir }

    pub fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, storage::EXTENSION))
    }

    /// All wallets in display order. Missing file means no wallets yet.
    pub fn load(&self) -> Result<Vec<Wallet>> {
        Ok(self.get_item(storage::WALLETS)?.unwrap_or_default())
    }

    /// Overwrite the whole list.
    pub fn save(&self, wallets: &[Wallet]) -> Result<()> {
        self.set_item(storage::WALLETS, &wallets)?;
        debug!(count = wallets.len(), "wallets saved");
        Ok(())
    }

    fn get_item<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.key_path(key);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::store(path, e)),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Write to a sibling temp file, then rename over the target.
    fn set_item<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| Error::store(&self.dir, e))?;
        let path = self.key_path(key);
        let tmp = path.with_extension(format!("{}.tmp", storage::EXTENSION));
        let body = serde_json::to_string_pretty(value)?;
        std::fs::write(&tmp, body).map_err(|e| Error::store(&tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| Error::store(&path, e))?;
        Ok(())
    }
}

fn default_root() -> PathBuf {
    std::env::var(vars::ROOT)
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")))
}
