//! Session configuration - built by the CLI/server from flags, env and `.env`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::paths::{env as vars, DEFAULT_APP};
use crate::error::{Error, Result};
use crate::rpc::RpcClient;
use crate::wallet::WalletStore;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5_000);
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: String,
    /// Overrides `<root>/<app>/data`
    pub data_dir: Option<PathBuf>,
    pub rpc_url: Option<String>,
    pub poll_interval: Duration,
    pub rpc_timeout: Duration,
    pub port: u16,
    /// Phrase to start the session with instead of generating one
    pub mnemonic: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: DEFAULT_APP.into(),
            data_dir: None,
            rpc_url: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
            port: DEFAULT_PORT,
            mnemonic: None,
        }
    }
}

impl Config {
    pub fn new(app: impl Into<String>) -> Self {
        Self { app: app.into(), ..Default::default() }
    }
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self { self.data_dir = Some(path.into()); self }
    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self { self.rpc_url = Some(url.into()); self }
    pub fn with_poll_interval(mut self, interval: Duration) -> Self { self.poll_interval = interval; self }
    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self { self.rpc_timeout = timeout; self }
    pub fn with_port(mut self, port: u16) -> Self { self.port = port; self }
    pub fn with_mnemonic(mut self, m: impl Into<String>) -> Self { self.mnemonic = Some(m.into()); self }

    /// Everything from `SAFEWALLET_*` variables; unset ones keep defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::new(env_string(vars::APP).unwrap_or_else(|| DEFAULT_APP.into()));

        config.rpc_url = env_string(vars::RPC_URL)
            .or_else(|| vars::RPC_URL_FALLBACKS.iter().find_map(|key| env_string(key)));
        config.mnemonic = env_string(vars::MNEMONIC);

        if let Some(ms) = env_string(vars::POLL_MS) {
            config.poll_interval = parse_poll_ms(&ms)?;
        }
        if let Some(ms) = env_string(vars::RPC_TIMEOUT_MS) {
            config.rpc_timeout = parse_timeout_ms(&ms)?;
        }
        if let Some(port) = env_string(vars::PORT) {
            config.port = port
                .parse()
                .map_err(|_| Error::Config(format!("{}: invalid port {port:?}", vars::PORT)))?;
        }
        Ok(config)
    }

    pub fn store(&self) -> WalletStore {
        match &self.data_dir {
            Some(dir) => WalletStore::at(dir),
            None => WalletStore::open(&self.app),
        }
    }

    pub fn rpc_client(&self) -> Result<RpcClient> {
        let url = self.rpc_url.as_deref().ok_or_else(|| {
            Error::Config(format!("RPC URL not set (--rpc-url or {})", vars::RPC_URL))
        })?;
        RpcClient::new(url, self.rpc_timeout)
    }
}

pub fn parse_poll_ms(value: &str) -> Result<Duration> {
    positive_ms("poll interval", value)
}

pub fn parse_timeout_ms(value: &str) -> Result<Duration> {
    positive_ms("RPC timeout", value)
}

fn positive_ms(what: &str, value: &str) -> Result<Duration> {
    match value.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(Error::Config(format!("{what} must be a positive number of ms, got {value:?}"))),
    }
}

/// Load `KEY=value` lines into the process env. Existing variables win.
/// Returns how many variables were set; a missing file sets none.
pub fn load_dotenv(path: impl AsRef<Path>) -> usize {
    let Ok(contents) = std::fs::read_to_string(path) else { return 0 };
    let mut set = 0;
    for (key, value) in contents.lines().filter_map(parse_dotenv_line) {
        if std::env::var(key).is_err() {
            std::env::set_var(key, value);
            set += 1;
        }
    }
    set
}

/// One `.env` line. Quoted values are taken verbatim; unquoted values end
/// at a ` #` comment.
fn parse_dotenv_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, raw) = line.split_once('=')?;
    let key = key.trim();
    let raw = raw.trim();

    let value = match raw.chars().next() {
        Some(q @ ('"' | '\'')) => {
            let inner = &raw[1..];
            inner.find(q).map_or(inner, |end| &inner[..end])
        }
        Some('#') => "",
        _ => raw.find(" #").or_else(|| raw.find("\t#")).map_or(raw, |at| &raw[..at]).trim_end(),
    };
    (!key.is_empty() && !value.is_empty()).then_some((key, value))
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
