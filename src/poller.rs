//! Poller - refreshes the selected account's balance on a fixed interval.
//!
//! ```text
//! every interval (first tick after one full period unless immediate):
//!     session has wallets? ──no──▶ skip
//!            │ yes
//!            ▼
//!     fetch(selected.address)  (lock released while in flight)
//!            │
//!            ▼
//!     record_balance(address, wei)  (dropped if selection moved on)
//! ```

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::rpc::{Balance, BalanceSource};
use crate::runtime::Shutdown;
use crate::session::{self, SharedSession};

/// Fetch the selected account's balance once. `Ok(None)` when there is no
/// account or the selection changed while the request was in flight.
pub async fn refresh_now(session: &SharedSession, source: &dyn BalanceSource) -> Result<Option<Balance>> {
    let address = {
        let guard = session::read(session)?;
        match guard.selected_wallet() {
            Some(w) => w.address.clone(),
            None => return Ok(None),
        }
    };

    let wei = source.fetch_balance(&address).await?;

    let mut guard = session::write(session)?;
    if guard.record_balance(&address, wei) {
        Ok(guard.balance().cloned())
    } else {
        Ok(None)
    }
}

pub struct Poller {
    session: SharedSession,
    source: Arc<dyn BalanceSource>,
    interval: Duration,
    immediate: bool,
    updates: watch::Sender<Option<Balance>>,
}

impl Poller {
    pub fn new(session: SharedSession, source: Arc<dyn BalanceSource>, interval: Duration) -> Self {
        let (updates, _) = watch::channel(None);
        Self { session, source, interval, immediate: false, updates }
    }

    /// Fetch once at start instead of waiting a full period.
    pub fn with_immediate_first_tick(mut self) -> Self { self.immediate = true; self }

    /// Receives each recorded balance; only the latest is retained.
    pub fn updates(&self) -> watch::Receiver<Option<Balance>> {
        self.updates.subscribe()
    }

    /// Poll until `shutdown` fires. Fetch errors are logged and polling continues.
    pub async fn run(self, shutdown: Shutdown) {
        let start = if self.immediate { Instant::now() } else { Instant::now() + self.interval };
        let mut ticker = interval_at(start, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut stop = shutdown.subscribe();
        if shutdown.is_triggered() {
            return;
        }
        info!(interval_ms = self.interval.as_millis() as u64, "balance poller started");

        loop {
            tokio::select! {
                _ = stop.recv() => break,
                _ = ticker.tick() => self.tick().await,
            }
        }
        info!("balance poller stopped");
    }

    pub fn spawn(self, shutdown: Shutdown) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    async fn tick(&self) {
        match refresh_now(&self.session, self.source.as_ref()).await {
            Ok(Some(balance)) => {
                debug!(address = %balance.address, ether = %balance.ether, "balance updated");
                self.updates.send_replace(Some(balance));
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Error fetching balance"),
        }
    }
}
