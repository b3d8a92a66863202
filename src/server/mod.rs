//! HTTP server - the workbench as JSON endpoints
//!
//! | Route | Method | Description |
//! |-------|--------|-------------|
//! | `/health` | GET | liveness |
//! | `/about` | GET | product name and project link |
//! | `/state` | GET | full session snapshot |
//! | `/phrase` | POST | generate a new phrase |
//! | `/phrase` | PUT | import `{phrase}` |
//! | `/wallets` | GET | account list |
//! | `/wallets` | POST | derive the next account, then fetch its balance |
//! | `/wallets/selected` | PUT | select `{index}` |
//! | `/balance` | GET | last fetched balance of the selected account |
//! | `/transaction-form` | PUT | `{open}` |
//! | `/limit` | PUT | `{limit}` |

mod routes;

pub use routes::{create_router, AppState};

use tokio::net::TcpListener;
use tracing::info;

use crate::runtime::Shutdown;

/// Serve `router` on `listener` until `shutdown` fires.
pub async fn serve(listener: TcpListener, router: axum::Router, shutdown: Shutdown) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("SafeWallet listening on http://{}", addr);
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.wait().await })
        .await
}
